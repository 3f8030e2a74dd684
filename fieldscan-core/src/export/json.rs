use crate::AnalysisReport;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write the report as indented JSON
pub fn write_report(report: &AnalysisReport<'_>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
