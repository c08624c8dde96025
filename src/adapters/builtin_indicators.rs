//! In-process indicator library backed by `domain::indicator`.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{
    adx, atr, cci, cmf, ema, obv, roc, rsi, sma, vwap, vwma, willr, IndicatorSeries,
    IndicatorType,
};
use crate::domain::ohlcv::Candle;
use crate::ports::indicator_port::IndicatorLibrary;

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinIndicators;

impl BuiltinIndicators {
    /// Lengths below 1 and windows longer than the input are rejected.
    fn window(indicator: IndicatorType, length: i64, available: usize) -> Result<usize, IndicatorError> {
        if length < 1 {
            return Err(IndicatorError::InvalidLength { indicator, length });
        }
        match usize::try_from(length) {
            Ok(period) if period <= available => Ok(period),
            _ => Err(IndicatorError::InsufficientData {
                indicator,
                length,
                available,
            }),
        }
    }
}

impl IndicatorLibrary for BuiltinIndicators {
    fn compute(
        &self,
        indicator: IndicatorType,
        candles: &[Candle],
    ) -> Result<IndicatorSeries, IndicatorError> {
        let series = match indicator {
            IndicatorType::Vwap => vwap::calculate_vwap(candles),
            IndicatorType::Obv => obv::calculate_obv(candles),
            IndicatorType::Ema(n) => ema::calculate_ema(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Sma(n) => sma::calculate_sma(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Rsi(n) => rsi::calculate_rsi(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Atr(n) => atr::calculate_atr(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Adx(n) => adx::calculate_adx(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Cci(n) => cci::calculate_cci(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Roc(n) => roc::calculate_roc(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::WilliamsR(n) => {
                willr::calculate_willr(candles, Self::window(indicator, n, candles.len())?)
            }
            IndicatorType::Cmf(n) => cmf::calculate_cmf(candles, Self::window(indicator, n, candles.len())?),
            IndicatorType::Vwma(n) => {
                vwma::calculate_vwma(candles, Self::window(indicator, n, candles.len())?)
            }
        };
        Ok(series)
    }
}
