#![allow(dead_code)]

use candlelab::domain::error::CandlelabError;
pub use candlelab::domain::ohlcv::Candle;
use candlelab::domain::timeframe::Timeframe;
use candlelab::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory market data keyed by symbol, served in pages like an exchange.
pub struct MockMarketDataPort {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<DateTime<Utc>>>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_page(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Candle>, CandlelabError> {
        self.requests.borrow_mut().push(since);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CandlelabError::Data {
                reason: reason.clone(),
            });
        }
        let mut page: Vec<Candle> = self
            .data
            .get(symbol)
            .map(|candles| candles.iter().filter(|c| c.timestamp >= since).copied().collect())
            .unwrap_or_default();
        page.sort_by_key(|c| c.timestamp);
        page.truncate(limit);
        Ok(page)
    }
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn make_candle(timestamp: DateTime<Utc>, close: f64) -> Candle {
    Candle {
        timestamp,
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 100.0,
    }
}

/// `n` candles `step` apart from [`start`], with a gently oscillating close.
pub fn make_candles(n: usize, step: TimeDelta) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
            make_candle(start() + step * i as i32, close)
        })
        .collect()
}

pub fn hourly(n: usize) -> Vec<Candle> {
    make_candles(n, TimeDelta::hours(1))
}

pub fn minutes(n: usize) -> Vec<Candle> {
    make_candles(n, TimeDelta::minutes(1))
}
