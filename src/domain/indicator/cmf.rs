//! CMF (Chaikin Money Flow) indicator.
//!
//! MFV[i] = ((C - L) - (H - C)) / (H - L) * V, with MFV = 0 when H == L.
//! CMF = sum(MFV, n) / sum(V, n); zero window volume is undefined.
//! Warmup: first (n-1) bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

fn money_flow_volume(candle: &Candle) -> f64 {
    let range = candle.high - candle.low;
    if range == 0.0 {
        0.0
    } else {
        ((candle.close - candle.low) - (candle.high - candle.close)) / range * candle.volume
    }
}

pub fn calculate_cmf(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(point(candle, Value::Undefined));
            continue;
        }

        let window = &candles[i + 1 - period..=i];
        let flow: f64 = window.iter().map(money_flow_volume).sum();
        let volume: f64 = window.iter().map(|c| c.volume).sum();
        values.push(point(candle, Value::from_f64(flow / volume)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Cmf(period as i64),
        values,
    }
}
