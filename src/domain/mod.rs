// Domain layer: plan records and the ports used to obtain them.

pub mod model;
pub mod ports;
