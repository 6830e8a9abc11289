// Domain layer: tabular data model, processing options and ports (interfaces).

pub mod model;
pub mod options;
pub mod ports;
