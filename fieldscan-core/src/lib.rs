//! fieldscan-core: header inference and field matrices for spreadsheet workbooks
//!
//! Every worksheet of a workbook gets its column headers inferred (real
//! headers often sit a few rows below the nominal header row), and the
//! resulting field names are cross-tabulated into a sheet × field presence
//! matrix with summary statistics.

pub mod classifier;
pub mod config;
pub mod error;
pub mod export;
pub mod matrix;
pub mod quality;
pub mod reader;
pub mod summary;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub use classifier::{
    ClassifierSettings, HeaderClassifier, HeaderSource, HeaderStrategy, InferredHeader,
};
pub use config::AnalyzerConfig;
pub use error::{FieldScanError, Result};
pub use export::{SavedFiles, save_results};
pub use matrix::{FieldMatrix, SheetFields, build_matrix};
pub use quality::{QualityMetric, assess_quality};
pub use reader::{SheetWarning, Workbook, Worksheet, read_workbook};
pub use summary::{FieldCategory, SummaryReport, UsageLevel, summarize};

/// Headers and field list of one analyzed worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetAnalysis {
    pub sheet: String,
    pub row_count: usize,
    /// Nominal column labels, in column order
    pub columns: Vec<String>,
    /// Non-empty data cells per column
    pub non_empty: Vec<usize>,
    pub headers: Vec<InferredHeader>,
    /// Fields the worksheet contributes to the matrix
    pub fields: Vec<String>,
}

/// Result of analyzing one workbook
#[derive(Debug, Clone)]
pub struct Analysis {
    pub path: PathBuf,
    pub sheets: Vec<SheetAnalysis>,
    pub warnings: Vec<SheetWarning>,
    pub matrix: FieldMatrix,
    pub summary: SummaryReport,
    pub analysis_date: DateTime<Local>,
}

/// The JSON analysis report
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub file_path: String,
    pub analysis_date: String,
    #[serde(flatten)]
    pub summary: &'a SummaryReport,
}

impl Analysis {
    pub fn report(&self) -> AnalysisReport<'_> {
        AnalysisReport {
            file_path: self.path.display().to_string(),
            analysis_date: self
                .analysis_date
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            summary: &self.summary,
        }
    }

    pub fn get_sheet(&self, name: &str) -> Option<&SheetAnalysis> {
        self.sheets.iter().find(|s| s.sheet == name)
    }
}

/// Main analyzer interface
#[derive(Debug, Clone)]
pub struct FieldAnalyzer {
    config: AnalyzerConfig,
    classifier: HeaderClassifier,
}

impl FieldAnalyzer {
    /// Create a new analyzer with default configuration
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create a new analyzer with custom configuration
    pub fn with_config(config: AnalyzerConfig) -> Self {
        let classifier = HeaderClassifier::with_settings(config.global);
        Self { config, classifier }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Read a workbook and analyze every loaded worksheet
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<Analysis> {
        let workbook = read_workbook(path)?;
        Ok(self.analyze_workbook(&workbook))
    }

    /// Analyze an already loaded workbook
    pub fn analyze_workbook(&self, workbook: &Workbook) -> Analysis {
        let names = workbook.sheet_names();
        for unknown in self.config.unknown_sheets(&names) {
            warn!("Configured sheet '{}' not found in workbook", unknown);
        }

        let sheets: Vec<SheetAnalysis> = workbook
            .sheets
            .par_iter()
            .filter(|sheet| {
                let excluded = self.config.is_sheet_excluded(&sheet.name);
                if excluded {
                    debug!("Skipping excluded sheet '{}'", sheet.name);
                }
                !excluded
            })
            .map(|sheet| self.analyze_sheet(sheet))
            .collect();

        let per_sheet: Vec<SheetFields> = sheets
            .iter()
            .map(|s| SheetFields::new(s.sheet.clone(), s.fields.clone()))
            .collect();
        let matrix = build_matrix(&per_sheet);
        let summary = summarize(&matrix);

        info!(
            "Analyzed {} worksheets: {} unique fields",
            summary.total_sheets, summary.total_unique_fields
        );

        Analysis {
            path: workbook.path.clone(),
            sheets,
            warnings: workbook.warnings.clone(),
            matrix,
            summary,
            analysis_date: Local::now(),
        }
    }

    fn analyze_sheet(&self, sheet: &Worksheet) -> SheetAnalysis {
        let headers = self.classifier.infer_headers(sheet);
        let fields = self.classifier.sheet_fields(sheet, &headers);
        debug!("Sheet '{}': {} fields", sheet.name, fields.len());

        SheetAnalysis {
            sheet: sheet.name.clone(),
            row_count: sheet.row_count(),
            columns: sheet.columns.iter().map(|c| c.label.clone()).collect(),
            non_empty: sheet
                .columns
                .iter()
                .map(|c| sheet.column_values(c.index).filter(|v| !v.is_empty()).count())
                .collect(),
            headers,
            fields,
        }
    }
}

impl Default for FieldAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use crate::reader::CellValue;

    fn worksheet(name: &str, labels: &[&str], rows: &[&[&str]]) -> Worksheet {
        let cell = |v: &&str| {
            if v.is_empty() {
                CellValue::Empty
            } else {
                CellValue::from(*v)
            }
        };
        Worksheet::from_grid(
            name,
            labels.iter().map(cell).collect(),
            rows.iter().map(|r| r.iter().map(cell).collect()).collect(),
        )
    }

    fn workbook() -> Workbook {
        Workbook {
            path: PathBuf::from("schedule.xlsx"),
            sheets: vec![
                worksheet(
                    "Week 1",
                    &["Week 1", ""],
                    &[&["Purchase Order", "Due Date"], &["PO1001", "2024-01-05"]],
                ),
                worksheet("Week 2", &["Purchase Order", "Customer"], &[&["PO2001", "acme"]]),
                worksheet("Notes", &["Text"], &[&["call back"]]),
            ],
            warnings: vec![SheetWarning {
                sheet: "Broken".to_string(),
                message: "unsupported".to_string(),
            }],
        }
    }

    #[test]
    fn test_analyze_workbook() {
        let analysis = FieldAnalyzer::new().analyze_workbook(&workbook());

        assert_eq!(analysis.matrix.sheets(), &["Week 1", "Week 2", "Notes"]);
        let week1 = analysis.get_sheet("Week 1").unwrap();
        assert_eq!(week1.columns, vec!["Week 1", "Unnamed: 1"]);
        assert_eq!(week1.fields, vec!["Purchase Order", "Due Date"]);
        assert_eq!(week1.row_count, 2);
        assert_eq!(week1.non_empty, vec![2, 2]);
        assert_eq!(
            analysis.matrix.presence("Week 2", "Purchase Order"),
            Some(1)
        );
        assert_eq!(analysis.summary.total_sheets, 3);
        assert!(analysis.summary.common_fields.contains_key("Purchase Order"));
        assert_eq!(analysis.warnings.len(), 1);
    }

    #[test]
    fn test_excluded_sheets_are_skipped() {
        let mut config = AnalyzerConfig::default();
        config
            .sheets
            .insert("Notes".to_string(), SheetConfig { exclude: true });
        config
            .sheets
            .insert("Missing".to_string(), SheetConfig { exclude: true });

        let analyzer = FieldAnalyzer::with_config(config);
        assert!(analyzer.config().is_sheet_excluded("Notes"));
        assert!(!analyzer.config().is_sheet_excluded("Week 1"));

        let analysis = analyzer.analyze_workbook(&workbook());
        assert_eq!(analysis.summary.sheet_names, vec!["Week 1", "Week 2"]);
        assert!(analysis.get_sheet("Notes").is_none());
        assert!(!analysis.summary.all_field_names.contains(&"Text".to_string()));
    }

    #[test]
    fn test_empty_workbook() {
        let workbook = Workbook {
            path: PathBuf::from("empty.xlsx"),
            sheets: Vec::new(),
            warnings: Vec::new(),
        };

        let analysis = FieldAnalyzer::new().analyze_workbook(&workbook);
        assert!(analysis.matrix.is_empty());
        assert_eq!(analysis.summary.total_unique_fields, 0);
    }

    #[test]
    fn test_report_keys() {
        let analysis = FieldAnalyzer::new().analyze_workbook(&workbook());
        let json = serde_json::to_value(analysis.report()).unwrap();
        let object = json.as_object().unwrap();

        for key in [
            "file_path",
            "analysis_date",
            "total_sheets",
            "total_unique_fields",
            "fields_per_sheet",
            "sheets_per_field",
            "common_fields",
            "unique_fields",
            "universal_fields",
            "sheet_names",
            "all_field_names",
            "field_categories",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(json["file_path"], "schedule.xlsx");
        assert_eq!(json["total_sheets"], 3);
    }
}
