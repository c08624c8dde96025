//! Paginated candle download.

use crate::domain::error::CandlelabError;
use crate::domain::ohlcv::{sort_and_check, Candle};
use crate::domain::timeframe::Timeframe;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, TimeDelta, Utc};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Largest page requested from the market-data port.
pub const PAGE_LIMIT: usize = 500;

/// Pause between page requests unless configured otherwise.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

/// Downloads every candle in `[since, until)` page by page.
///
/// Each page starts 1 ms after the previous page's last candle. The loop
/// ends on an empty page, once `until` is reached, or when a page fails to
/// move the cursor forward.
pub fn fetch_candles(
    port: &dyn MarketDataPort,
    request: &FetchRequest,
    pacing: Duration,
) -> Result<Vec<Candle>, CandlelabError> {
    let mut all = Vec::new();
    let mut since = request.since;
    let mut pages = 0usize;

    while since < request.until {
        let page = port.fetch_page(&request.symbol, request.timeframe, since, PAGE_LIMIT)?;
        let Some(last) = page.iter().map(|c| c.timestamp).max() else {
            break;
        };
        pages += 1;
        all.extend(page);

        let next = last + TimeDelta::milliseconds(1);
        if next <= since {
            break;
        }
        since = next;

        if !pacing.is_zero() && since < request.until {
            thread::sleep(pacing);
        }
    }

    all.retain(|c| c.timestamp >= request.since && c.timestamp < request.until);
    sort_and_check(&mut all)?;

    debug!(
        symbol = %request.symbol,
        timeframe = %request.timeframe,
        pages,
        candles = all.len(),
        "fetched candles"
    );
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;

    struct PagedSource {
        candles: Vec<Candle>,
        page_size: usize,
        requests: RefCell<Vec<DateTime<Utc>>>,
    }

    impl MarketDataPort for PagedSource {
        fn fetch_page(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            since: DateTime<Utc>,
            limit: usize,
        ) -> Result<Vec<Candle>, CandlelabError> {
            self.requests.borrow_mut().push(since);
            Ok(self
                .candles
                .iter()
                .filter(|c| c.timestamp >= since)
                .take(limit.min(self.page_size))
                .copied()
                .collect())
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn hourly(n: i64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle {
                timestamp: start() + TimeDelta::hours(i),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: i as f64,
                volume: 1.0,
            })
            .collect()
    }

    fn request(hours: i64) -> FetchRequest {
        FetchRequest {
            symbol: "BTC/USDT".into(),
            timeframe: "1h".parse().unwrap(),
            since: start(),
            until: start() + TimeDelta::hours(hours),
        }
    }

    #[test]
    fn pages_until_source_is_exhausted() {
        let source = PagedSource {
            candles: hourly(10),
            page_size: 4,
            requests: RefCell::new(Vec::new()),
        };
        let candles = fetch_candles(&source, &request(100), Duration::ZERO).unwrap();

        assert_eq!(candles.len(), 10);
        let requests = source.requests.borrow();
        // 4 + 4 + 2, then an empty page.
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[1], start() + TimeDelta::hours(3) + TimeDelta::milliseconds(1));
    }

    #[test]
    fn stops_at_until_and_trims() {
        let source = PagedSource {
            candles: hourly(10),
            page_size: 4,
            requests: RefCell::new(Vec::new()),
        };
        let candles = fetch_candles(&source, &request(5), Duration::ZERO).unwrap();

        assert_eq!(candles.len(), 5);
        assert_eq!(candles.last().unwrap().close, 4.0);
        assert_eq!(source.requests.borrow().len(), 2);
    }

    #[test]
    fn empty_range_makes_no_requests() {
        let source = PagedSource {
            candles: hourly(3),
            page_size: 4,
            requests: RefCell::new(Vec::new()),
        };
        let candles = fetch_candles(&source, &request(0), Duration::ZERO).unwrap();
        assert!(candles.is_empty());
        assert!(source.requests.borrow().is_empty());
    }

    struct StuckSource;

    impl MarketDataPort for StuckSource {
        fn fetch_page(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _since: DateTime<Utc>,
            _limit: usize,
        ) -> Result<Vec<Candle>, CandlelabError> {
            Ok(hourly(1))
        }
    }

    #[test]
    fn stops_when_cursor_does_not_advance() {
        let mut req = request(10);
        req.since = start() + TimeDelta::hours(2);
        let candles = fetch_candles(&StuckSource, &req, Duration::ZERO).unwrap();
        assert!(candles.is_empty());
    }
}
