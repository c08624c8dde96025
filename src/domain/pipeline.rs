//! Indicator pipeline.
//!
//! Resolves every indicator's length, asks the indicator library for each
//! series and appends them to the table. Columns are keyed by
//! `IndicatorType`, so runs with different lengths coexist.

use crate::domain::error::CandlelabError;
use crate::domain::feature_table::FeatureTable;
use crate::domain::length::{indicator_plan, LengthOverrides};
use crate::ports::indicator_port::IndicatorLibrary;
use tracing::{debug, trace};

/// Augments `table` in place with the full indicator set and returns it for
/// chaining.
///
/// Append-only: existing columns with other keys are never touched. The
/// table is left unchanged when the library rejects any indicator; that
/// error is returned as-is.
pub fn add_indicators<'a>(
    table: &'a mut FeatureTable,
    default_length: i64,
    overrides: &LengthOverrides,
    library: &dyn IndicatorLibrary,
) -> Result<&'a mut FeatureTable, CandlelabError> {
    let plan = indicator_plan(default_length, overrides);

    let computed = plan
        .iter()
        .map(|indicator| {
            trace!(%indicator, "computing indicator");
            library.compute(*indicator, table.candles())
        })
        .collect::<Result<Vec<_>, _>>()?;

    for series in computed {
        table.insert_indicator(series);
    }

    debug!(
        rows = table.len(),
        columns = table.indicators.len(),
        default_length,
        "added indicators"
    );
    Ok(table)
}
