pub mod errors;
pub mod evaluation;
pub mod features;
pub mod metrics;
pub mod model;
pub mod ports;
pub mod split;
pub mod types;
