//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod timeframe;
pub mod resample;
pub mod indicator;
pub mod length;
pub mod feature_table;
pub mod pipeline;
pub mod hawkes;
pub mod fetch;
pub mod config_validation;
pub mod error;
