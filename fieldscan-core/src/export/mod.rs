//! Writing analysis results to disk

mod json;
mod xlsx;

pub use json::write_report;
pub use xlsx::{write_detailed_analysis, write_field_matrix};

use crate::Analysis;
use crate::error::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const FIELD_MATRIX_FILE: &str = "field_matrix.xlsx";
pub const ANALYSIS_REPORT_FILE: &str = "analysis_report.json";
pub const DETAILED_ANALYSIS_FILE: &str = "detailed_analysis.xlsx";

/// Default output directory name, created next to the input workbook
pub const DEFAULT_OUTPUT_DIR: &str = "excel_analysis_results";

/// Paths of the files written by [`save_results`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub field_matrix: PathBuf,
    pub analysis_report: PathBuf,
    pub detailed_analysis: PathBuf,
}

impl SavedFiles {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            ("field_matrix", self.field_matrix.as_path()),
            ("analysis_report", self.analysis_report.as_path()),
            ("detailed_analysis", self.detailed_analysis.as_path()),
        ]
        .into_iter()
    }
}

/// `<input parent>/excel_analysis_results`
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIR)
}

/// Write the matrix workbook, the JSON report and the detailed workbook into
/// `output_dir`, creating it if needed
pub fn save_results(analysis: &Analysis, output_dir: &Path) -> Result<SavedFiles> {
    fs::create_dir_all(output_dir)?;

    let saved = SavedFiles {
        field_matrix: output_dir.join(FIELD_MATRIX_FILE),
        analysis_report: output_dir.join(ANALYSIS_REPORT_FILE),
        detailed_analysis: output_dir.join(DETAILED_ANALYSIS_FILE),
    };

    write_field_matrix(&analysis.matrix, &saved.field_matrix)?;
    write_report(&analysis.report(), &saved.analysis_report)?;
    write_detailed_analysis(&analysis.matrix, &analysis.summary, &saved.detailed_analysis)?;

    info!("Saved analysis results to {}", output_dir.display());
    Ok(saved)
}
