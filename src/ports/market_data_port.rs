//! Market data access port trait.

use crate::domain::error::CandlelabError;
use crate::domain::ohlcv::Candle;
use crate::domain::timeframe::Timeframe;
use chrono::{DateTime, Utc};

pub trait MarketDataPort {
    /// Up to `limit` candles with timestamp >= `since`, ascending.
    fn fetch_page(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Candle>, CandlelabError>;
}
