//! Hawkes-style self-exciting exponential decay.
//!
//! With alpha = exp(-kappa):
//! - y[0] is undefined
//! - y[i] = x[i] when y[i-1] is undefined (re-anchor on the raw input)
//! - y[i] = y[i-1] * alpha + x[i] otherwise
//!
//! A table column whose indicator warmup was trimmed starts from an
//! undefined predecessor, so its first defined point is y = x.
//!
//! The reported series is kappa * y, so the kernel integrates to 1. Single
//! pass, strictly sequential.

use crate::domain::error::CandlelabError;
use crate::domain::feature_table::{Column, FeatureTable, HawkesColumn};
use crate::domain::series::{Series, SeriesPoint, Value};
use std::iter;
use tracing::debug;

/// Decay rate; always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParameter(f64);

impl DecayParameter {
    pub fn new(kappa: f64) -> Result<Self, CandlelabError> {
        if kappa.is_finite() && kappa > 0.0 {
            Ok(Self(kappa))
        } else {
            Err(CandlelabError::InvalidParameter {
                name: "kappa".into(),
                reason: format!("must be finite and greater than 0, got {kappa}"),
            })
        }
    }

    pub fn kappa(&self) -> f64 {
        self.0
    }

    pub fn alpha(&self) -> f64 {
        (-self.0).exp()
    }
}

/// Applies the decay recursion to `series`.
///
/// Fails with `InvalidParameter` for `kappa <= 0` before reading the input,
/// and with `MalformedInput` if any input point is undefined or non-finite.
/// The output has exactly the input's timestamps.
pub fn hawkes(series: &Series, kappa: f64) -> Result<Series, CandlelabError> {
    decay(series, DecayParameter::new(kappa)?, false)
}

/// With `anchored`, the first point's predecessor is known to be undefined
/// (trimmed warmup), so it re-seeds on its raw input instead of staying
/// undefined.
fn decay(series: &Series, parameter: DecayParameter, anchored: bool) -> Result<Series, CandlelabError> {
    let inputs = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| match p.value {
            Value::Defined(x) if x.is_finite() => Ok(x),
            _ => Err(CandlelabError::MalformedInput {
                reason: format!("hawkes input at index {i} ({}) is not a finite value", p.timestamp),
            }),
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let kappa = parameter.kappa();
    let alpha = parameter.alpha();
    let mut points = Vec::with_capacity(inputs.len());
    let mut prev = Value::Undefined;

    for (i, (p, x)) in series.points.iter().zip(&inputs).enumerate() {
        let current = if i == 0 && !anchored {
            Value::Undefined
        } else {
            match prev {
                Value::Undefined => Value::Defined(*x),
                Value::Defined(y) => Value::Defined(y * alpha + x),
            }
        };
        prev = current;

        points.push(SeriesPoint {
            timestamp: p.timestamp,
            value: match current {
                Value::Defined(y) => Value::Defined(kappa * y),
                Value::Undefined => Value::Undefined,
            },
        });
    }

    debug!(len = points.len(), kappa, alpha, anchored, "applied hawkes decay");
    Ok(Series::new(points))
}

/// Runs [`hawkes`] on a table column and stores the result on the table.
///
/// Leading undefined points (indicator warmup) stay undefined in the stored
/// column. The first defined point after them re-seeds on its raw value, as
/// any point with an undefined predecessor does.
pub fn apply_hawkes<'a>(
    table: &'a mut FeatureTable,
    source: Column,
    kappa: f64,
) -> Result<&'a HawkesColumn, CandlelabError> {
    let parameter = DecayParameter::new(kappa)?;

    let series = table
        .series(&source)
        .ok_or_else(|| CandlelabError::UnknownColumn {
            column: source.to_string(),
        })?;
    let trimmed = series.skip_leading_undefined();
    let warmup = series.len() - trimmed.len();

    let decayed = decay(&trimmed, parameter, warmup > 0)?;
    let values: Vec<Value> = iter::repeat(Value::Undefined)
        .take(warmup)
        .chain(decayed.values())
        .collect();

    table.insert_hawkes(HawkesColumn {
        source,
        kappa,
        values,
    });
    table
        .hawkes
        .iter()
        .find(|h| h.source == source && h.kappa == kappa)
        .ok_or_else(|| CandlelabError::UnknownColumn {
            column: source.to_string(),
        })
}
