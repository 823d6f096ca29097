// Domain layer: record and report models plus the ports the pipeline talks through.

pub mod model;
pub mod ports;
