//! Indicator library port trait.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;

/// Pure indicator computations over an aligned candle slice.
///
/// The returned series has one point per candle, undefined where the window
/// is not yet full. Invalid lengths are rejected here and nowhere else.
pub trait IndicatorLibrary {
    fn compute(
        &self,
        indicator: IndicatorType,
        candles: &[Candle],
    ) -> Result<IndicatorSeries, IndicatorError>;
}
