// Domain layer: request/feature models and ports (interfaces) for the model artifacts.

pub mod model;
pub mod ports;
