//! Port traits (hexagonal architecture boundaries).

pub mod config_port;
pub mod feature_sink_port;
pub mod indicator_port;
pub mod market_data_port;
