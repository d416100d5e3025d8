// Domain layer: report models, OS dispatch and ports. No I/O here.

pub mod model;
pub mod os;
pub mod ports;
