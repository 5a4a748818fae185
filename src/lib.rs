//! Vessel arrival notifier
//!
//! Polls an AIS provider for vessels inside a monitored area and announces
//! each vessel once per arrival.

pub mod barentswatch;
pub mod config;
pub mod database;
pub mod dedup;
pub mod errors;
pub mod formatter;
pub mod geometry;
pub mod models;
pub mod notifier;
pub mod poll;
pub mod server;
pub mod store;
