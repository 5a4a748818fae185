// src/database/models.rs
use chrono::{DateTime, Utc};

use crate::{
    errors::AisWatchError,
    models::{Mmsi, SeenVessel},
};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SeenVesselRow {
    pub mmsi: i32,
    pub last_seen: DateTime<Utc>,
}

impl TryFrom<SeenVesselRow> for SeenVessel {
    type Error = AisWatchError;

    fn try_from(row: SeenVesselRow) -> Result<Self, Self::Error> {
        Ok(SeenVessel {
            mmsi: Mmsi::try_from(row.mmsi)?,
            last_seen: row.last_seen,
        })
    }
}
