// Domain layer: run data, ports, and the pure parts of the harvest
// (slug discovery, freshness ranking, table reading, sheet naming).

pub mod freshness;
pub mod model;
pub mod ports;
pub mod sheet_name;
pub mod slugs;
pub mod tables;
