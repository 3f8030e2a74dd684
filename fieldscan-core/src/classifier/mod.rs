//! Header inference for worksheet columns
//!
//! The nominal header row of a worksheet is not authoritative: real headers
//! often sit a few rows down, under a blank or generic title row. For every
//! column the classifier scans the first [`SCAN_ROWS`] data cells and promotes
//! the first one that reads like a header; otherwise it keeps the nominal
//! label, or generates `Column_<n>` when that label is only a placeholder.

pub mod patterns;

use crate::reader::{Column, Worksheet};
use log::debug;
use patterns::Vocabulary;
use serde::{Deserialize, Serialize};

/// Number of leading data rows searched for an embedded header
pub const SCAN_ROWS: usize = 5;

/// A header-shaped value occurring in more cells than this is treated as data
pub const HEADER_REPEAT_LIMIT: usize = 3;

/// A keyword value occurring in more than this share of a column is treated as data
pub const COMMON_VALUE_RATIO: f64 = 0.1;

/// Prefix of names generated for placeholder columns
pub const GENERATED_PREFIX: &str = "Column_";

/// How column headers are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStrategy {
    /// Search the first data rows for an embedded header
    #[default]
    Inferred,
    /// Take the nominal labels as they are
    Nominal,
}

/// Where an inferred header came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderSource {
    /// Promoted from this 0-based data row
    Promoted { row: usize },
    /// The column's nominal label
    Nominal,
    /// Generated for a placeholder label
    Generated,
}

/// The resolved field name of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferredHeader {
    pub column: usize,
    pub name: String,
    pub source: HeaderSource,
}

/// Tunable classifier parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierSettings {
    pub strategy: HeaderStrategy,
    /// Keep generated/placeholder columns in the sheet's field list
    pub include_unnamed_columns: bool,
    pub header_repeat_limit: usize,
    pub common_value_ratio: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            strategy: HeaderStrategy::default(),
            include_unnamed_columns: true,
            header_repeat_limit: HEADER_REPEAT_LIMIT,
            common_value_ratio: COMMON_VALUE_RATIO,
        }
    }
}

/// Decides the header of every column of a worksheet
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    settings: ClassifierSettings,
    vocabulary: &'static Vocabulary,
}

impl HeaderClassifier {
    /// Create a classifier with default settings
    pub fn new() -> Self {
        Self::with_settings(ClassifierSettings::default())
    }

    pub fn with_settings(settings: ClassifierSettings) -> Self {
        Self {
            settings,
            vocabulary: Vocabulary::standard(),
        }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Resolve one header per column, in column order
    pub fn infer_headers(&self, sheet: &Worksheet) -> Vec<InferredHeader> {
        sheet
            .columns
            .iter()
            .map(|column| match self.settings.strategy {
                HeaderStrategy::Inferred => self.infer_column(sheet, column),
                HeaderStrategy::Nominal => InferredHeader {
                    column: column.index,
                    name: column.label.clone(),
                    source: HeaderSource::Nominal,
                },
            })
            .collect()
    }

    /// The field names a worksheet contributes, in column order.
    ///
    /// With `include_unnamed_columns` off, generated headers (inferred
    /// strategy) or placeholder and date-like labels (nominal strategy) are
    /// left out.
    pub fn sheet_fields(&self, sheet: &Worksheet, headers: &[InferredHeader]) -> Vec<String> {
        headers
            .iter()
            .filter(|header| self.settings.include_unnamed_columns || self.is_named(sheet, header))
            .map(|header| header.name.clone())
            .collect()
    }

    fn is_named(&self, sheet: &Worksheet, header: &InferredHeader) -> bool {
        match header.source {
            HeaderSource::Promoted { .. } => true,
            HeaderSource::Generated => false,
            HeaderSource::Nominal => match self.settings.strategy {
                HeaderStrategy::Inferred => true,
                HeaderStrategy::Nominal => sheet
                    .columns
                    .get(header.column)
                    .is_some_and(|c| {
                        !c.is_placeholder() && !self.vocabulary.looks_like_datetime_label(&c.label)
                    }),
            },
        }
    }

    fn infer_column(&self, sheet: &Worksheet, column: &Column) -> InferredHeader {
        // First candidate that passes wins.
        for row in 0..sheet.row_count().min(SCAN_ROWS) {
            let Some(cell) = sheet.cell(row, column.index) else {
                continue;
            };
            let text = cell.to_string();
            let value = text.trim();
            if self.is_likely_header(value, sheet, column.index) {
                debug!(
                    "Sheet '{}' column {}: promoted '{}' from row {}",
                    sheet.name,
                    column.index + 1,
                    value,
                    row
                );
                return InferredHeader {
                    column: column.index,
                    name: value.to_string(),
                    source: HeaderSource::Promoted { row },
                };
            }
        }

        if column.is_placeholder() {
            InferredHeader {
                column: column.index,
                name: format!("{GENERATED_PREFIX}{}", column.index + 1),
                source: HeaderSource::Generated,
            }
        } else {
            InferredHeader {
                column: column.index,
                name: column.label.clone(),
                source: HeaderSource::Nominal,
            }
        }
    }

    /// Whether a (trimmed) cell value reads like a header for this column
    pub fn is_likely_header(&self, value: &str, sheet: &Worksheet, column: usize) -> bool {
        if value.is_empty() || Vocabulary::is_missing_marker(value) {
            return false;
        }

        if self.vocabulary.matches_header_shape(value)
            && occurrences(sheet, column, value) <= self.settings.header_repeat_limit
        {
            return true;
        }

        self.vocabulary.matching_keyword(value).is_some()
            && !self.is_common_data_value(value, sheet, column)
    }

    /// Whether a value is ordinary column data: frequent in the column, or
    /// shaped like a number, date or code
    pub fn is_common_data_value(&self, value: &str, sheet: &Worksheet, column: usize) -> bool {
        let threshold = sheet.row_count() as f64 * self.settings.common_value_ratio;
        if occurrences(sheet, column, value) as f64 > threshold {
            return true;
        }

        self.vocabulary.matches_data_shape(value)
    }
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of cells in the column whose text contains `value`
fn occurrences(sheet: &Worksheet, column: usize, value: &str) -> usize {
    sheet
        .column_values(column)
        .filter(|cell| cell.to_string().contains(value))
        .count()
}
