//! CSV file data adapter.
//!
//! Candle files are named `<symbol>_<timeframe>.csv` with `/` in the symbol
//! replaced by `-`, and carry a `timestamp,open,high,low,close,volume`
//! header. Timestamps are either epoch milliseconds or RFC 3339.

use crate::domain::error::CandlelabError;
use crate::domain::feature_table::FeatureTable;
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;
use crate::domain::timeframe::Timeframe;
use crate::ports::feature_sink_port::FeatureSinkPort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};

const CANDLE_HEADER: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.replace('/', "-"), timeframe))
    }
}

fn data_error(reason: String) -> CandlelabError {
    CandlelabError::Data { reason }
}

/// Reads every candle in `path`, in file order. Empty price cells read as NaN.
pub fn read_candles(path: &Path) -> Result<Vec<Candle>, CandlelabError> {
    let content = fs::read_to_string(path)
        .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut candles = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
        candles.push(parse_record(&record, row + 1)?);
    }

    Ok(candles)
}

fn parse_record(record: &StringRecord, row: usize) -> Result<Candle, CandlelabError> {
    let field = |i: usize| {
        record
            .get(i)
            .map(str::trim)
            .ok_or_else(|| data_error(format!("row {row}: missing {} column", CANDLE_HEADER[i])))
    };
    let number = |i: usize| -> Result<f64, CandlelabError> {
        let raw = field(i)?;
        if raw.is_empty() {
            return Ok(f64::NAN);
        }
        raw.parse()
            .map_err(|e| data_error(format!("row {row}: invalid {} value: {}", CANDLE_HEADER[i], e)))
    };

    Ok(Candle {
        timestamp: parse_timestamp(field(0)?)
            .ok_or_else(|| data_error(format!("row {row}: invalid timestamp {:?}", record.get(0))))?,
        open: number(1)?,
        high: number(2)?,
        low: number(3)?,
        close: number(4)?,
        volume: number(5)?,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match raw.parse::<i64>() {
        Ok(ms) => DateTime::from_timestamp_millis(ms),
        Err(_) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn cell(value: Value) -> String {
    match value {
        Value::Defined(v) => v.to_string(),
        Value::Undefined => String::new(),
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_page(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Candle>, CandlelabError> {
        let mut candles = read_candles(&self.csv_path(symbol, timeframe))?;
        candles.retain(|c| c.timestamp >= since);
        candles.sort_by_key(|c| c.timestamp);
        candles.truncate(limit);
        Ok(candles)
    }
}

impl FeatureSinkPort for CsvAdapter {
    fn write(&self, table: &FeatureTable, output_path: &Path) -> Result<(), CandlelabError> {
        let mut wtr = csv::Writer::from_path(output_path)
            .map_err(|e| data_error(format!("failed to create {}: {}", output_path.display(), e)))?;

        let indicator_columns: Vec<Vec<Value>> = table
            .indicators
            .values()
            .map(|series| table.align(&series.to_series()))
            .collect();

        let mut header: Vec<String> = CANDLE_HEADER.iter().map(|h| h.to_string()).collect();
        header.extend(table.indicators.keys().map(|t| t.to_string()));
        header.extend(table.hawkes.iter().map(|h| h.name()));
        wtr.write_record(&header)
            .map_err(|e| data_error(format!("CSV write error: {}", e)))?;

        for (i, candle) in table.candles().iter().enumerate() {
            let mut record = vec![candle.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)];
            record.extend(
                [candle.open, candle.high, candle.low, candle.close, candle.volume]
                    .into_iter()
                    .map(|v| cell(Value::from_f64(v))),
            );
            record.extend(indicator_columns.iter().map(|column| cell(column[i])));
            record.extend(
                table
                    .hawkes
                    .iter()
                    .map(|h| cell(h.values.get(i).copied().unwrap_or(Value::Undefined))),
            );
            wtr.write_record(&record)
                .map_err(|e| data_error(format!("CSV write error: {}", e)))?;
        }

        wtr.flush()?;
        Ok(())
    }
}
