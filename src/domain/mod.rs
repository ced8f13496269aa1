// Domain layer: model types and the store port. No dependency on core or
// adapters.

pub mod model;
pub mod ports;
