//! Candle table with derived feature columns.

use crate::domain::error::CandlelabError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{sort_and_check, Candle, PriceField};
use crate::domain::series::{Series, SeriesPoint, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A column that can feed the Hawkes engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Price(PriceField),
    Indicator(IndicatorType),
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Price(field) => write!(f, "{field}"),
            Column::Indicator(t) => write!(f, "{t}"),
        }
    }
}

impl FromStr for Column {
    type Err = CandlelabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<PriceField>()
            .map(Column::Price)
            .or_else(|_| s.parse::<IndicatorType>().map(Column::Indicator))
    }
}

/// Hawkes output aligned to the table index.
#[derive(Debug, Clone, PartialEq)]
pub struct HawkesColumn {
    pub source: Column,
    pub kappa: f64,
    pub values: Vec<Value>,
}

impl HawkesColumn {
    pub fn name(&self) -> String {
        format!("HAWKES_{}_{}", self.source, self.kappa)
    }
}

#[derive(Debug, Clone)]
pub struct FeatureTable {
    candles: Vec<Candle>,
    pub indicators: BTreeMap<IndicatorType, IndicatorSeries>,
    pub hawkes: Vec<HawkesColumn>,
}

impl FeatureTable {
    /// Sorts the candles and rejects duplicate timestamps.
    pub fn new(mut candles: Vec<Candle>) -> Result<Self, CandlelabError> {
        sort_and_check(&mut candles)?;
        Ok(Self {
            candles,
            indicators: BTreeMap::new(),
            hawkes: Vec::new(),
        })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator_type)
    }

    /// Adds or replaces the column keyed by the series' indicator type.
    pub fn insert_indicator(&mut self, series: IndicatorSeries) -> Option<IndicatorSeries> {
        self.indicators.insert(series.indicator_type, series)
    }

    /// Adds a Hawkes column, replacing one with the same source and kappa.
    pub fn insert_hawkes(&mut self, column: HawkesColumn) {
        match self
            .hawkes
            .iter_mut()
            .find(|h| h.source == column.source && h.kappa == column.kappa)
        {
            Some(existing) => *existing = column,
            None => self.hawkes.push(column),
        }
    }

    pub fn series(&self, column: &Column) -> Option<Series> {
        match column {
            Column::Price(field) => Some(Series::from_candles(&self.candles, *field)),
            Column::Indicator(t) => self.indicators.get(t).map(IndicatorSeries::to_series),
        }
    }

    /// Re-indexes `series` onto the table index; missing timestamps become `Undefined`.
    pub fn align(&self, series: &Series) -> Vec<Value> {
        let by_time: BTreeMap<_, _> = series
            .points
            .iter()
            .map(|SeriesPoint { timestamp, value }| (*timestamp, *value))
            .collect();
        self.candles
            .iter()
            .map(|c| by_time.get(&c.timestamp).copied().unwrap_or(Value::Undefined))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn ts(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::hours(i)
    }

    fn candle(i: i64, close: f64) -> Candle {
        Candle {
            timestamp: ts(i),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn new_sorts_candles() {
        let table = FeatureTable::new(vec![candle(2, 3.0), candle(0, 1.0), candle(1, 2.0)]).unwrap();
        let closes: Vec<f64> = table.candles().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn new_rejects_duplicates() {
        let err = FeatureTable::new(vec![candle(0, 1.0), candle(0, 2.0)]).unwrap_err();
        assert!(matches!(err, CandlelabError::MalformedInput { .. }));
    }

    #[test]
    fn column_parse_and_display() {
        assert_eq!("close".parse::<Column>().unwrap(), Column::Price(PriceField::Close));
        assert_eq!(
            "ATR_14".parse::<Column>().unwrap(),
            Column::Indicator(IndicatorType::Atr(14))
        );
        assert!("nonsense".parse::<Column>().is_err());
        assert_eq!(Column::Indicator(IndicatorType::Obv).to_string(), "OBV");
    }

    #[test]
    fn series_for_price_and_missing_indicator() {
        let table = FeatureTable::new(vec![candle(0, 1.0), candle(1, 2.0)]).unwrap();
        let close = table.series(&Column::Price(PriceField::Close)).unwrap();
        assert_eq!(close.values(), vec![Value::Defined(1.0), Value::Defined(2.0)]);
        assert!(table.series(&Column::Indicator(IndicatorType::Ema(3))).is_none());
    }

    #[test]
    fn align_fills_missing_with_undefined() {
        let table = FeatureTable::new(vec![candle(0, 1.0), candle(1, 2.0), candle(2, 3.0)]).unwrap();
        let partial = Series::new(vec![SeriesPoint {
            timestamp: ts(1),
            value: Value::Defined(9.0),
        }]);
        assert_eq!(
            table.align(&partial),
            vec![Value::Undefined, Value::Defined(9.0), Value::Undefined]
        );
    }

    #[test]
    fn insert_hawkes_replaces_same_key() {
        let mut table = FeatureTable::new(vec![candle(0, 1.0)]).unwrap();
        let source = Column::Price(PriceField::Close);
        table.insert_hawkes(HawkesColumn { source, kappa: 0.1, values: vec![Value::Undefined] });
        table.insert_hawkes(HawkesColumn { source, kappa: 0.5, values: vec![Value::Undefined] });
        table.insert_hawkes(HawkesColumn { source, kappa: 0.1, values: vec![Value::Defined(1.0)] });
        assert_eq!(table.hawkes.len(), 2);
        assert_eq!(table.hawkes[0].values, vec![Value::Defined(1.0)]);
        assert_eq!(table.hawkes[1].name(), "HAWKES_close_0.5");
    }
}
