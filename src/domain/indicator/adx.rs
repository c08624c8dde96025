//! ADX (Average Directional Index) indicator.
//!
//! +DM = up move if it beats the down move and is positive, else 0 (and vice
//! versa for -DM). TR, +DM and -DM are Wilder-smoothed from bar 1; DX =
//! 100 * |+DI - -DI| / (+DI + -DI) is defined from bar n and ADX is the
//! Wilder mean of DX.
//! Warmup: first (2n-1) bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

struct Wilder {
    period: usize,
    seen: usize,
    avg: f64,
}

impl Wilder {
    fn new(period: usize) -> Self {
        Self {
            period,
            seen: 0,
            avg: 0.0,
        }
    }

    /// Returns the smoothed value once `period` inputs have been seen.
    fn update(&mut self, x: f64) -> Option<f64> {
        self.seen += 1;
        let n = self.period as f64;
        if self.seen < self.period {
            self.avg += x;
            None
        } else if self.seen == self.period {
            self.avg = (self.avg + x) / n;
            Some(self.avg)
        } else {
            self.avg = (self.avg * (n - 1.0) + x) / n;
            Some(self.avg)
        }
    }
}

fn directional_index(plus_dm: f64, minus_dm: f64, tr: f64) -> f64 {
    if tr == 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * plus_dm / tr;
    let minus_di = 100.0 * minus_dm / tr;
    let total = plus_di + minus_di;
    if total == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / total
    }
}

pub fn calculate_adx(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());

    if period == 0 {
        values.extend(candles.iter().map(|c| point(c, Value::Undefined)));
        return IndicatorSeries {
            indicator_type: IndicatorType::Adx(0),
            values,
        };
    }

    let mut tr_avg = Wilder::new(period);
    let mut plus_avg = Wilder::new(period);
    let mut minus_avg = Wilder::new(period);
    let mut adx_avg = Wilder::new(period);

    for (i, candle) in candles.iter().enumerate() {
        if i == 0 {
            values.push(point(candle, Value::Undefined));
            continue;
        }
        let prev = &candles[i - 1];

        let up = candle.high - prev.high;
        let down = prev.low - candle.low;
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
        let tr = candle.true_range(prev.close);

        let smoothed = (
            tr_avg.update(tr),
            plus_avg.update(plus_dm),
            minus_avg.update(minus_dm),
        );

        let adx = match smoothed {
            (Some(tr), Some(plus), Some(minus)) => {
                adx_avg.update(directional_index(plus, minus, tr))
            }
            _ => None,
        };

        values.push(point(candle, adx.map_or(Value::Undefined, Value::from_f64)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Adx(period as i64),
        values,
    }
}
