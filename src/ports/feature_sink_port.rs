//! Feature table output port trait.

use crate::domain::error::CandlelabError;
use crate::domain::feature_table::FeatureTable;
use std::path::Path;

pub trait FeatureSinkPort {
    fn write(&self, table: &FeatureTable, output_path: &Path) -> Result<(), CandlelabError>;
}
