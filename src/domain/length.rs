//! Indicator length resolution.
//!
//! One default length feeds every indicator unless that indicator's own
//! override is set. RSI has no override slot and always takes the default;
//! VWAP and OBV take no length at all.

use crate::domain::indicator::IndicatorType;
use std::fmt;

/// Returns `override_length` when set, otherwise `default`. No validation.
pub fn resolve(default: i64, override_length: Option<i64>) -> i64 {
    override_length.unwrap_or(default)
}

/// Indicators with an override slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorName {
    Ema,
    Sma,
    Atr,
    Adx,
    Cci,
    Roc,
    WilliamsR,
    Cmf,
    Vwma,
}

impl IndicatorName {
    pub const ALL: [IndicatorName; 9] = [
        IndicatorName::Ema,
        IndicatorName::Sma,
        IndicatorName::Atr,
        IndicatorName::Adx,
        IndicatorName::Cci,
        IndicatorName::Roc,
        IndicatorName::WilliamsR,
        IndicatorName::Cmf,
        IndicatorName::Vwma,
    ];

    /// Key under `[indicators]` in the config file.
    pub fn config_key(&self) -> &'static str {
        match self {
            IndicatorName::Ema => "ema_length",
            IndicatorName::Sma => "sma_length",
            IndicatorName::Atr => "atr_length",
            IndicatorName::Adx => "adx_length",
            IndicatorName::Cci => "cci_length",
            IndicatorName::Roc => "roc_length",
            IndicatorName::WilliamsR => "willr_length",
            IndicatorName::Cmf => "cmf_length",
            IndicatorName::Vwma => "vwma_length",
        }
    }
}

impl fmt::Display for IndicatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key().trim_end_matches("_length"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthOverrides {
    pub ema: Option<i64>,
    pub sma: Option<i64>,
    pub atr: Option<i64>,
    pub adx: Option<i64>,
    pub cci: Option<i64>,
    pub roc: Option<i64>,
    pub willr: Option<i64>,
    pub cmf: Option<i64>,
    pub vwma: Option<i64>,
}

impl LengthOverrides {
    pub fn get(&self, name: IndicatorName) -> Option<i64> {
        match name {
            IndicatorName::Ema => self.ema,
            IndicatorName::Sma => self.sma,
            IndicatorName::Atr => self.atr,
            IndicatorName::Adx => self.adx,
            IndicatorName::Cci => self.cci,
            IndicatorName::Roc => self.roc,
            IndicatorName::WilliamsR => self.willr,
            IndicatorName::Cmf => self.cmf,
            IndicatorName::Vwma => self.vwma,
        }
    }

    pub fn set(&mut self, name: IndicatorName, length: i64) {
        let slot = match name {
            IndicatorName::Ema => &mut self.ema,
            IndicatorName::Sma => &mut self.sma,
            IndicatorName::Atr => &mut self.atr,
            IndicatorName::Adx => &mut self.adx,
            IndicatorName::Cci => &mut self.cci,
            IndicatorName::Roc => &mut self.roc,
            IndicatorName::WilliamsR => &mut self.willr,
            IndicatorName::Cmf => &mut self.cmf,
            IndicatorName::Vwma => &mut self.vwma,
        };
        *slot = Some(length);
    }

    pub fn with(mut self, name: IndicatorName, length: i64) -> Self {
        self.set(name, length);
        self
    }
}

/// The full indicator set for one pipeline run, in column order.
pub fn indicator_plan(default: i64, overrides: &LengthOverrides) -> Vec<IndicatorType> {
    let len = |name| resolve(default, overrides.get(name));
    vec![
        IndicatorType::Ema(len(IndicatorName::Ema)),
        IndicatorType::Sma(len(IndicatorName::Sma)),
        IndicatorType::Rsi(default),
        IndicatorType::Atr(len(IndicatorName::Atr)),
        IndicatorType::Vwap,
        IndicatorType::Adx(len(IndicatorName::Adx)),
        IndicatorType::Cci(len(IndicatorName::Cci)),
        IndicatorType::Obv,
        IndicatorType::Roc(len(IndicatorName::Roc)),
        IndicatorType::WilliamsR(len(IndicatorName::WilliamsR)),
        IndicatorType::Cmf(len(IndicatorName::Cmf)),
        IndicatorType::Vwma(len(IndicatorName::Vwma)),
    ]
}
