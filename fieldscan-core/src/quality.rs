//! Scores describing how consistent a workbook's fields are

use crate::classifier::GENERATED_PREFIX;
use crate::reader::PLACEHOLDER_PREFIX;
use crate::summary::SummaryReport;
use serde::Serialize;

/// Field count per worksheet that scores full coverage
pub const OPTIMAL_FIELDS_PER_SHEET: f64 = 20.0;

const CONSISTENCY_TARGET: f64 = 50.0;
const STANDARDIZATION_TARGET: f64 = 70.0;
const COVERAGE_TARGET: f64 = 60.0;

/// One scored quality check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityMetric {
    pub metric: &'static str,
    /// Percentage in `0..=100`
    pub score: f64,
    pub description: String,
    /// Whether the score reaches the metric's target
    pub good: bool,
}

impl QualityMetric {
    fn new(metric: &'static str, score: f64, target: f64, description: String) -> Self {
        Self {
            metric,
            score,
            description,
            good: score >= target,
        }
    }

    pub fn quality_level(&self) -> &'static str {
        if self.good { "Good" } else { "Needs Improvement" }
    }
}

/// Field consistency, name standardization and sheet coverage, in that order
pub fn assess_quality(summary: &SummaryReport) -> Vec<QualityMetric> {
    let total = summary.total_unique_fields;
    let common = summary.common_fields.len();
    let named = summary
        .all_field_names
        .iter()
        .filter(|field| {
            !field.starts_with(GENERATED_PREFIX) && !field.starts_with(PLACEHOLDER_PREFIX)
        })
        .count();
    let average = summary.mean_fields_per_sheet();

    vec![
        QualityMetric::new(
            "Field Consistency",
            summary.field_percentage(common),
            CONSISTENCY_TARGET,
            format!("{common} out of {total} fields used across multiple sheets"),
        ),
        QualityMetric::new(
            "Field Standardization",
            summary.field_percentage(named),
            STANDARDIZATION_TARGET,
            format!("{named} out of {total} fields have meaningful names"),
        ),
        QualityMetric::new(
            "Sheet Coverage",
            (average / OPTIMAL_FIELDS_PER_SHEET * 100.0).min(100.0),
            COVERAGE_TARGET,
            format!("Average {average:.1} fields per sheet"),
        ),
    ]
}
