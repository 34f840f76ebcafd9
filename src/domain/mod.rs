// Domain layer: models and the ports the search pipeline talks through.

pub mod model;
pub mod ports;
