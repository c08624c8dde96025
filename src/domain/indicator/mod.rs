//! Technical indicator implementations.
//!
//! This module provides types for representing indicator series:
//! - `IndicatorType`: indicator identity + length (serves as column key)
//! - `IndicatorSeries`: an indicator's values on the candle index
//!
//! Leading positions are `Value::Undefined` while an indicator's window is
//! not yet full. Lengths are validated by the library adapter before any of
//! the `calculate_*` functions run, so they all take `period >= 1`.

pub mod adx;
pub mod atr;
pub mod cci;
pub mod cmf;
pub mod ema;
pub mod obv;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod vwap;
pub mod vwma;
pub mod willr;

use crate::domain::error::CandlelabError;
use crate::domain::ohlcv::Candle;
use crate::domain::series::{Series, SeriesPoint, Value};
use std::fmt;
use std::str::FromStr;

/// Lengths are signed: any integer is carried through to the library,
/// which is the one place that rejects invalid windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Ema(i64),
    Sma(i64),
    Rsi(i64),
    Atr(i64),
    Vwap,
    Adx(i64),
    Cci(i64),
    Obv,
    Roc(i64),
    WilliamsR(i64),
    Cmf(i64),
    Vwma(i64),
}

impl IndicatorType {
    pub fn length(&self) -> Option<i64> {
        match *self {
            IndicatorType::Ema(n)
            | IndicatorType::Sma(n)
            | IndicatorType::Rsi(n)
            | IndicatorType::Atr(n)
            | IndicatorType::Adx(n)
            | IndicatorType::Cci(n)
            | IndicatorType::Roc(n)
            | IndicatorType::WilliamsR(n)
            | IndicatorType::Cmf(n)
            | IndicatorType::Vwma(n) => Some(n),
            IndicatorType::Vwap | IndicatorType::Obv => None,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            IndicatorType::Ema(_) => "EMA",
            IndicatorType::Sma(_) => "SMA",
            IndicatorType::Rsi(_) => "RSI",
            IndicatorType::Atr(_) => "ATR",
            IndicatorType::Vwap => "VWAP",
            IndicatorType::Adx(_) => "ADX",
            IndicatorType::Cci(_) => "CCI",
            IndicatorType::Obv => "OBV",
            IndicatorType::Roc(_) => "ROC",
            IndicatorType::WilliamsR(_) => "Williams_%R",
            IndicatorType::Cmf(_) => "CMF",
            IndicatorType::Vwma(_) => "VWMA",
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length() {
            Some(n) => write!(f, "{}_{}", self.prefix(), n),
            None => f.write_str(self.prefix()),
        }
    }
}

impl FromStr for IndicatorType {
    type Err = CandlelabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CandlelabError::UnknownColumn {
            column: s.to_string(),
        };
        let name = s.trim();

        match name.to_uppercase().as_str() {
            "VWAP" => return Ok(IndicatorType::Vwap),
            "OBV" => return Ok(IndicatorType::Obv),
            _ => {}
        }

        let (prefix, length) = name.rsplit_once('_').ok_or_else(unknown)?;
        let n: i64 = length.parse().map_err(|_| unknown())?;
        match prefix.to_uppercase().as_str() {
            "EMA" => Ok(IndicatorType::Ema(n)),
            "SMA" => Ok(IndicatorType::Sma(n)),
            "RSI" => Ok(IndicatorType::Rsi(n)),
            "ATR" => Ok(IndicatorType::Atr(n)),
            "ADX" => Ok(IndicatorType::Adx(n)),
            "CCI" => Ok(IndicatorType::Cci(n)),
            "ROC" => Ok(IndicatorType::Roc(n)),
            "WILLIAMS_%R" | "WILLR" => Ok(IndicatorType::WilliamsR(n)),
            "CMF" => Ok(IndicatorType::Cmf(n)),
            "VWMA" => Ok(IndicatorType::Vwma(n)),
            _ => Err(unknown()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<SeriesPoint>,
}

impl IndicatorSeries {
    pub fn to_series(&self) -> Series {
        Series::new(self.values.clone())
    }
}

pub(crate) fn point(candle: &Candle, value: Value) -> SeriesPoint {
    SeriesPoint {
        timestamp: candle.timestamp,
        value,
    }
}
