// Domain layer: registry target, push request models and the ports the engine drives.

pub mod model;
pub mod ports;
