//! Aggregate statistics over a field matrix

use crate::matrix::FieldMatrix;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Report grouping for fields, tested in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldCategory {
    OrderInformation,
    ProductionDetails,
    Timing,
    ProductInformation,
    BuildInformation,
    DespatchInformation,
    CapacityAndPlanning,
    Other,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 8] = [
        FieldCategory::OrderInformation,
        FieldCategory::ProductionDetails,
        FieldCategory::Timing,
        FieldCategory::ProductInformation,
        FieldCategory::BuildInformation,
        FieldCategory::DespatchInformation,
        FieldCategory::CapacityAndPlanning,
        FieldCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::OrderInformation => "Order Information",
            FieldCategory::ProductionDetails => "Production Details",
            FieldCategory::Timing => "Timing",
            FieldCategory::ProductInformation => "Product Information",
            FieldCategory::BuildInformation => "Build Information",
            FieldCategory::DespatchInformation => "Despatch Information",
            FieldCategory::CapacityAndPlanning => "Capacity & Planning",
            FieldCategory::Other => "Other",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            FieldCategory::OrderInformation => &["order", "purchase", "assigned"],
            FieldCategory::ProductionDetails => &["production", "build", "cut", "man", "mins"],
            FieldCategory::Timing => &["date", "due", "time"],
            FieldCategory::ProductInformation => &["product", "description"],
            FieldCategory::BuildInformation => &["build information", "built by"],
            FieldCategory::DespatchInformation => {
                &["despatch", "shipping", "pallet", "apc", "dx", "van", "label"]
            }
            FieldCategory::CapacityAndPlanning => &["capacity", "planning", "wc"],
            FieldCategory::Other => &[],
        }
    }

    /// The first category whose keywords occur in the lowercased field name
    pub fn classify(field: &str) -> FieldCategory {
        let lower = field.to_lowercase();
        FieldCategory::ALL
            .into_iter()
            .find(|c| c.keywords().iter().any(|kw| lower.contains(kw)))
            .unwrap_or(FieldCategory::Other)
    }

    /// Worksheet-safe name: spaces become underscores, at most 31 characters
    pub fn sheet_name(&self) -> String {
        self.as_str().replace(' ', "_").chars().take(31).collect()
    }
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How widely a field is used across worksheets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    /// In at least 70% of the worksheets
    High,
    /// In at least 40% of the worksheets
    Medium,
    Low,
}

impl UsageLevel {
    /// Level for a share of worksheets given in percent
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 70.0 {
            UsageLevel::High
        } else if percentage >= 40.0 {
            UsageLevel::Medium
        } else {
            UsageLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageLevel::High => "High",
            UsageLevel::Medium => "Medium",
            UsageLevel::Low => "Low",
        }
    }
}

/// Every category with its (sorted) fields, in category order
pub fn categorize_fields<S: AsRef<str>>(fields: &[S]) -> Vec<(FieldCategory, Vec<String>)> {
    let mut groups: BTreeMap<FieldCategory, Vec<String>> =
        FieldCategory::ALL.into_iter().map(|c| (c, Vec::new())).collect();

    for field in fields {
        let field = field.as_ref();
        groups
            .entry(FieldCategory::classify(field))
            .or_default()
            .push(field.to_string());
    }

    groups
        .into_iter()
        .map(|(category, mut fields)| {
            fields.sort();
            (category, fields)
        })
        .collect()
}

/// Field statistics derived from a [`FieldMatrix`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_sheets: usize,
    pub total_unique_fields: usize,
    /// Field count per worksheet, in worksheet order
    #[serde(serialize_with = "ordered_map")]
    pub fields_per_sheet: Vec<(String, usize)>,
    pub sheets_per_field: BTreeMap<String, usize>,
    /// Fields present in more than one worksheet
    pub common_fields: BTreeMap<String, usize>,
    /// Fields present in exactly one worksheet
    pub unique_fields: BTreeMap<String, usize>,
    /// Fields present in every worksheet
    pub universal_fields: BTreeMap<String, usize>,
    pub sheet_names: Vec<String>,
    pub all_field_names: Vec<String>,
    #[serde(serialize_with = "ordered_categories")]
    pub field_categories: Vec<(FieldCategory, Vec<String>)>,
}

/// Compute per-sheet and per-field counts, field classes and categories
pub fn summarize(matrix: &FieldMatrix) -> SummaryReport {
    let (total_sheets, total_fields) = matrix.shape();

    let fields_per_sheet = matrix
        .sheets()
        .iter()
        .enumerate()
        .map(|(row, sheet)| (sheet.clone(), matrix.fields_in_sheet(row)))
        .collect();

    let sheets_per_field: BTreeMap<String, usize> = matrix
        .fields()
        .iter()
        .enumerate()
        .map(|(col, field)| (field.clone(), matrix.sheets_with_field(col)))
        .collect();

    let select = |keep: &dyn Fn(usize) -> bool| -> BTreeMap<String, usize> {
        sheets_per_field
            .iter()
            .filter(|(_, count)| keep(**count))
            .map(|(field, count)| (field.clone(), *count))
            .collect()
    };
    let common_fields = select(&|count: usize| count > 1);
    let unique_fields = select(&|count: usize| count == 1);
    let universal_fields = select(&|count: usize| count == total_sheets);

    SummaryReport {
        total_sheets,
        total_unique_fields: total_fields,
        fields_per_sheet,
        common_fields,
        unique_fields,
        universal_fields,
        sheet_names: matrix.sheets().to_vec(),
        all_field_names: matrix.fields().to_vec(),
        field_categories: categorize_fields(matrix.fields()),
        sheets_per_field,
    }
}

impl SummaryReport {
    /// Field count of a worksheet
    pub fn fields_in(&self, sheet: &str) -> Option<usize> {
        self.fields_per_sheet
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, count)| *count)
    }

    /// Share of worksheets, in percent, that `count` sheets represent
    pub fn sheet_percentage(&self, count: usize) -> f64 {
        if self.total_sheets == 0 {
            0.0
        } else {
            count as f64 / self.total_sheets as f64 * 100.0
        }
    }

    /// Share of all unique fields, in percent, that `count` fields represent
    pub fn field_percentage(&self, count: usize) -> f64 {
        if self.total_unique_fields == 0 {
            0.0
        } else {
            count as f64 / self.total_unique_fields as f64 * 100.0
        }
    }

    pub fn usage_level(&self, count: usize) -> UsageLevel {
        UsageLevel::from_percentage(self.sheet_percentage(count))
    }

    /// The field present in the most worksheets; ties go to the first by name
    pub fn most_used_field(&self) -> Option<&str> {
        self.fields_by_usage().first().map(|(field, _)| *field)
    }

    /// Mean field count per worksheet, 0 without worksheets
    pub fn mean_fields_per_sheet(&self) -> f64 {
        if self.fields_per_sheet.is_empty() {
            return 0.0;
        }
        let total: usize = self.fields_per_sheet.iter().map(|(_, count)| count).sum();
        total as f64 / self.fields_per_sheet.len() as f64
    }

    /// Population standard deviation of the field count per worksheet
    pub fn fields_per_sheet_std_dev(&self) -> f64 {
        if self.fields_per_sheet.is_empty() {
            return 0.0;
        }
        let mean = self.mean_fields_per_sheet();
        let variance = self
            .fields_per_sheet
            .iter()
            .map(|(_, count)| (*count as f64 - mean).powi(2))
            .sum::<f64>()
            / self.fields_per_sheet.len() as f64;
        variance.sqrt()
    }

    /// Worksheets with their field counts, largest first (ties keep worksheet order)
    pub fn sheets_by_field_count(&self) -> Vec<(&str, usize)> {
        let mut sheets: Vec<_> = self
            .fields_per_sheet
            .iter()
            .map(|(sheet, count)| (sheet.as_str(), *count))
            .collect();
        sheets.sort_by(|a, b| b.1.cmp(&a.1));
        sheets
    }

    /// Fields with their sheet counts, most widely used first (ties by name)
    pub fn fields_by_usage(&self) -> Vec<(&str, usize)> {
        let mut fields: Vec<_> = self
            .sheets_per_field
            .iter()
            .map(|(field, count)| (field.as_str(), *count))
            .collect();
        fields.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        fields
    }
}

fn ordered_map<S: Serializer>(pairs: &[(String, usize)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

fn ordered_categories<S: Serializer>(
    groups: &[(FieldCategory, Vec<String>)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(groups.len()))?;
    for (category, fields) in groups {
        map.serialize_entry(category.as_str(), fields)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{SheetFields, build_matrix};

    fn matrix(sheets: &[(&str, &[&str])]) -> FieldMatrix {
        let per_sheet: Vec<_> = sheets
            .iter()
            .map(|(name, fields)| {
                SheetFields::new(*name, fields.iter().map(|f| f.to_string()).collect())
            })
            .collect();
        build_matrix(&per_sheet)
    }

    #[test]
    fn test_classify_fields() {
        assert_eq!(FieldCategory::classify("Purchase Order"), FieldCategory::OrderInformation);
        assert_eq!(FieldCategory::classify("Man Mins"), FieldCategory::ProductionDetails);
        assert_eq!(FieldCategory::classify("Due Date"), FieldCategory::Timing);
        assert_eq!(FieldCategory::classify("Description"), FieldCategory::ProductInformation);
        assert_eq!(FieldCategory::classify("Built By"), FieldCategory::BuildInformation);
        assert_eq!(FieldCategory::classify("APC"), FieldCategory::DespatchInformation);
        assert_eq!(FieldCategory::classify("Capacity"), FieldCategory::CapacityAndPlanning);
        assert_eq!(FieldCategory::classify("Customer"), FieldCategory::Other);
    }

    #[test]
    fn test_first_matching_category_wins() {
        // "build" is a production keyword, checked before the build bucket
        assert_eq!(
            FieldCategory::classify("Build Information"),
            FieldCategory::ProductionDetails
        );
        // "product" also matches "production", which comes first
        assert_eq!(
            FieldCategory::classify("Production Date"),
            FieldCategory::ProductionDetails
        );
    }

    #[test]
    fn test_category_sheet_names() {
        assert_eq!(FieldCategory::CapacityAndPlanning.sheet_name(), "Capacity_&_Planning");
        assert_eq!(FieldCategory::Other.sheet_name(), "Other");
    }

    #[test]
    fn test_categorize_keeps_every_bucket() {
        let groups = categorize_fields(&["Van", "Customer", "APC"]);
        assert_eq!(groups.len(), FieldCategory::ALL.len());
        assert_eq!(groups[0].0, FieldCategory::OrderInformation);
        assert!(groups[0].1.is_empty());
        assert_eq!(
            groups[5],
            (
                FieldCategory::DespatchInformation,
                vec!["APC".to_string(), "Van".to_string()]
            )
        );
        assert_eq!(groups[7], (FieldCategory::Other, vec!["Customer".to_string()]));
    }

    #[test]
    fn test_summarize() {
        let report = summarize(&matrix(&[
            ("Orders", &["Purchase Order", "Due Date", "Customer"]),
            ("Production", &["Purchase Order", "Build Time"]),
            ("Shipping", &["Purchase Order", "Due Date"]),
        ]));

        assert_eq!(report.total_sheets, 3);
        assert_eq!(report.total_unique_fields, 4);
        assert_eq!(report.fields_in("Orders"), Some(3));
        assert_eq!(report.fields_in("Production"), Some(2));
        assert_eq!(report.sheets_per_field["Purchase Order"], 3);
        assert_eq!(report.sheets_per_field["Due Date"], 2);

        assert_eq!(report.universal_fields.keys().collect::<Vec<_>>(), vec!["Purchase Order"]);
        assert_eq!(
            report.common_fields.keys().collect::<Vec<_>>(),
            vec!["Due Date", "Purchase Order"]
        );
        assert_eq!(
            report.unique_fields.keys().collect::<Vec<_>>(),
            vec!["Build Time", "Customer"]
        );
        assert_eq!(report.sheet_names, vec!["Orders", "Production", "Shipping"]);
        assert_eq!(
            report.fields_by_usage()[0],
            ("Purchase Order", 3)
        );
    }

    #[test]
    fn test_universal_fields_are_common() {
        let sheets: Vec<(String, Vec<&str>)> = (1..=9)
            .map(|i| (format!("Week {i}"), vec!["Purchase Order", "Notes"]))
            .collect();
        let per_sheet: Vec<_> = sheets
            .iter()
            .map(|(name, fields)| {
                SheetFields::new(name.as_str(), fields.iter().map(|f| f.to_string()).collect())
            })
            .collect();
        let report = summarize(&build_matrix(&per_sheet));

        assert_eq!(report.total_sheets, 9);
        assert_eq!(report.sheets_per_field["Purchase Order"], 9);
        assert!(report.universal_fields.contains_key("Purchase Order"));
        assert!(report.common_fields.contains_key("Purchase Order"));
        for field in report.universal_fields.keys() {
            assert!(report.common_fields.contains_key(field));
        }
    }

    #[test]
    fn test_single_sheet_fields_are_unique_and_universal() {
        let report = summarize(&matrix(&[("Only", &["Notes"])]));
        assert!(report.unique_fields.contains_key("Notes"));
        assert!(report.universal_fields.contains_key("Notes"));
        assert!(report.common_fields.is_empty());
    }

    #[test]
    fn test_sum_identities() {
        let m = matrix(&[
            ("A", &["x", "y"]),
            ("B", &["y", "z", "w"]),
            ("C", &["x"]),
        ]);
        let report = summarize(&m);

        let per_sheet: usize = report.fields_per_sheet.iter().map(|(_, c)| c).sum();
        let per_field: usize = report.sheets_per_field.values().sum();
        assert_eq!(per_sheet, m.ones());
        assert_eq!(per_field, m.ones());
    }

    #[test]
    fn test_empty_matrix() {
        let report = summarize(&FieldMatrix::default());
        assert_eq!(report.total_sheets, 0);
        assert_eq!(report.total_unique_fields, 0);
        assert!(report.universal_fields.is_empty());
        assert_eq!(report.sheet_percentage(0), 0.0);
        assert_eq!(report.field_categories.len(), FieldCategory::ALL.len());
    }

    #[test]
    fn test_sheet_statistics() {
        let report = summarize(&matrix(&[
            ("Orders", &["Purchase Order", "Due Date", "Customer", "Van"]),
            ("Production", &["Purchase Order", "Build Time"]),
            ("Shipping", &["Due Date", "Van", "Purchase Order"]),
            ("Notes", &["Text"]),
        ]));

        assert_eq!(report.most_used_field(), Some("Purchase Order"));
        // counts 4, 2, 3, 1
        assert_eq!(report.mean_fields_per_sheet(), 2.5);
        assert!((report.fields_per_sheet_std_dev() - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(
            report.sheets_by_field_count(),
            vec![("Orders", 4), ("Shipping", 3), ("Production", 2), ("Notes", 1)]
        );
        assert_eq!(report.total_unique_fields, 6);
        assert!((report.field_percentage(3) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_used_field_ties_go_to_first_name() {
        let report = summarize(&matrix(&[
            ("A", &["Van", "Customer"]),
            ("B", &["Van", "Customer"]),
        ]));
        assert_eq!(report.most_used_field(), Some("Customer"));
    }

    #[test]
    fn test_usage_levels() {
        let report = summarize(&matrix(&[
            ("A", &["x"]),
            ("B", &["x"]),
            ("C", &["x"]),
            ("D", &["y"]),
            ("E", &["y"]),
        ]));

        assert_eq!(report.usage_level(4), UsageLevel::High);
        assert_eq!(report.usage_level(3), UsageLevel::Medium);
        assert_eq!(report.usage_level(2), UsageLevel::Medium);
        assert_eq!(report.usage_level(1), UsageLevel::Low);
        assert_eq!(UsageLevel::from_percentage(70.0), UsageLevel::High);
        assert_eq!(UsageLevel::from_percentage(39.9), UsageLevel::Low);
        assert_eq!(UsageLevel::Medium.as_str(), "Medium");
    }

    #[test]
    fn test_statistics_without_sheets() {
        let report = summarize(&FieldMatrix::default());
        assert_eq!(report.most_used_field(), None);
        assert_eq!(report.mean_fields_per_sheet(), 0.0);
        assert_eq!(report.fields_per_sheet_std_dev(), 0.0);
        assert_eq!(report.field_percentage(0), 0.0);
        assert!(report.sheets_by_field_count().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let report = summarize(&matrix(&[("Zeta", &["Notes"]), ("Alpha", &["Van"])]));
        let json = serde_json::to_string(&report).unwrap();

        // worksheet order survives serialization
        assert!(json.contains(r#""fields_per_sheet":{"Zeta":1,"Alpha":1}"#));
        assert!(json.contains(r#""field_categories":{"Order Information":[]"#));
        assert!(json.contains(r#""Despatch Information":["Van"]"#));
        assert!(report.sheet_percentage(1) == 50.0);
    }
}
