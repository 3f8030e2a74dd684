//! Fixed vocabularies used to tell header text from data text

use regex::Regex;
use std::sync::OnceLock;

/// Capitalization shapes typical of header phrases
pub const HEADER_SHAPES: [&str; 4] = [
    r"^[A-Z][a-z\s]+$",
    r"^[A-Z\s]+$",
    r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*$",
    r"^[A-Z][a-z]+\s+[A-Z][a-z]+$",
];

/// Shapes of values that are data, never headers: plain numbers, ISO dates,
/// postcodes, purchase order numbers and product codes, tried in this order
pub const DATA_SHAPES: [&str; 5] = [
    r"^\d+$",
    r"^\d{4}-\d{2}-\d{2}",
    r"^[A-Z]{2}\d+\s+[A-Z0-9]",
    r"^PO\d+",
    r"^[A-Z]{2}\d+",
];

/// Domain words that mark a value as a header candidate
pub const HEADER_KEYWORDS: [&str; 30] = [
    "order",
    "details",
    "assigned",
    "due",
    "production",
    "date",
    "purchase",
    "shipping",
    "product",
    "description",
    "cut",
    "build",
    "time",
    "man",
    "mins",
    "quantity",
    "total",
    "information",
    "built",
    "by",
    "despatch",
    "pallet",
    "apc",
    "dx",
    "label",
    "printed",
    "van",
    "notes",
    "invoiced",
    "capacity",
];

/// Text that stands for a missing cell
pub const MISSING_MARKERS: [&str; 2] = ["nan", "None"];

/// Fragments that make a nominal label look like a misread date or time
const DATETIME_LABEL_SHAPES: [&str; 5] = [
    r"\d{4}-\d{2}-\d{2}",
    r"\d{2}/\d{2}/\d{4}",
    r"\d{2}-\d{2}-\d{4}",
    r"\d{2}:\d{2}:\d{2}",
    r"\d{2}:\d{2}",
];

/// Compiled header/data vocabularies
#[derive(Debug)]
pub struct Vocabulary {
    header_shapes: Vec<Regex>,
    data_shapes: Vec<Regex>,
    datetime_labels: Vec<Regex>,
    keywords: &'static [&'static str],
}

impl Vocabulary {
    /// The built-in vocabulary, compiled once per process
    pub fn standard() -> &'static Vocabulary {
        static STANDARD: OnceLock<Vocabulary> = OnceLock::new();
        STANDARD.get_or_init(|| Vocabulary {
            header_shapes: compile(&HEADER_SHAPES),
            data_shapes: compile(&DATA_SHAPES),
            datetime_labels: compile(&DATETIME_LABEL_SHAPES),
            keywords: &HEADER_KEYWORDS,
        })
    }

    pub fn is_missing_marker(value: &str) -> bool {
        MISSING_MARKERS.contains(&value)
    }

    pub fn matches_header_shape(&self, value: &str) -> bool {
        self.header_shapes.iter().any(|re| re.is_match(value))
    }

    pub fn matches_data_shape(&self, value: &str) -> bool {
        self.data_shapes.iter().any(|re| re.is_match(value))
    }

    /// First keyword contained in the lowercased value
    pub fn matching_keyword(&self, value: &str) -> Option<&'static str> {
        let lower = value.to_lowercase();
        self.keywords.iter().copied().find(|kw| lower.contains(kw))
    }

    /// Labels that are numbers or carry a date/time fragment
    pub fn looks_like_datetime_label(&self, label: &str) -> bool {
        label.trim().parse::<f64>().is_ok()
            || self.datetime_labels.iter().any(|re| re.is_match(label))
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}
