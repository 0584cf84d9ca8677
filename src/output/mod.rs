pub mod formatter;

pub use formatter::Formatter;

use crate::analyze::MemberAnalysis;
use crate::api::types::RegionTree;
use crate::cli::OutputFormat;
use crate::error::Result;
use std::collections::BTreeMap;

/// Format a collected region tree summary
pub fn format_region_summary(tree: &RegionTree, format: OutputFormat) -> Result<String> {
    let formatter = Formatter::new(format);
    formatter.format_region_summary(tree)
}

/// Format an analysis file summary
pub fn format_analysis_summary(
    analyzed: &BTreeMap<String, MemberAnalysis>,
    format: OutputFormat,
) -> Result<String> {
    let formatter = Formatter::new(format);
    formatter.format_analysis_summary(analyzed)
}
