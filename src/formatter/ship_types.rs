// src/formatter/ship_types.rs
//! AIS ship type codes (ITU-R M.1371, message 5 field "type of ship and
//! cargo type") with Norwegian descriptions.

/// Inclusive code range and description
pub(super) const SHIP_TYPES: &[(i64, i64, &str)] = &[
    (20, 29, "Bakkeeffektfartøy"),
    (30, 30, "Fiskefartøy"),
    (31, 31, "Slepefartøy"),
    (32, 32, "Slepefartøy (stort slep)"),
    (33, 33, "Mudringsfartøy"),
    (34, 34, "Dykkerfartøy"),
    (35, 35, "Militært fartøy"),
    (36, 36, "Seilfartøy"),
    (37, 37, "Fritidsfartøy"),
    (40, 49, "Hurtigbåt"),
    (50, 50, "Losfartøy"),
    (51, 51, "Redningsfartøy"),
    (52, 52, "Slepebåt"),
    (53, 53, "Havnetjenestefartøy"),
    (54, 54, "Oljevernfartøy"),
    (55, 55, "Politifartøy"),
    (56, 57, "Lokalt fartøy"),
    (58, 58, "Ambulansefartøy"),
    (59, 59, "Spesialfartøy"),
    (60, 69, "Passasjerskip"),
    (70, 79, "Lasteskip"),
    (80, 89, "Tankskip"),
    (90, 99, "Annet fartøy"),
];
