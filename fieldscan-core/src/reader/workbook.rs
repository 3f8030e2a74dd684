//! Workbook data structures

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Label prefix a loader assigns to a column whose header cell was blank
pub const PLACEHOLDER_PREFIX: &str = "Unnamed:";

/// A loaded workbook: every worksheet that parsed, plus the ones that did not
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Worksheet>,
    /// Worksheets skipped because they could not be read
    pub warnings: Vec<SheetWarning>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A worksheet that failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetWarning {
    pub sheet: String,
    pub message: String,
}

/// Represents a worksheet as a header row of nominal labels over a grid of data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    pub name: String,
    pub columns: Vec<Column>,
    /// Data rows (header row excluded), each exactly `columns.len()` wide
    pub rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    /// Create a worksheet from already-labelled columns.
    ///
    /// Short rows are padded with empty cells and long rows truncated so the
    /// grid stays rectangular.
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Create a worksheet from a raw header row and data rows, labelling the
    /// columns the way dataframe loaders do: blank header cells become
    /// `Unnamed: <index>` and repeated labels get `.1`, `.2`, ... suffixes.
    pub fn from_grid(
        name: impl Into<String>,
        header: Vec<CellValue>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let mut seen: HashMap<String, usize> = HashMap::new();
        let columns = (0..width)
            .map(|index| {
                let raw = match header.get(index) {
                    Some(cell) if !cell.is_empty() => cell.to_string(),
                    _ => format!("{PLACEHOLDER_PREFIX} {index}"),
                };
                Column::new(index, dedupe_label(raw, &mut seen))
            })
            .collect();

        Self::new(name, columns, rows)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get a cell at the given data row and column
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get the cells of a column, top to bottom
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(col))
    }
}

// Later duplicates of a label take the first free `label.N` suffix.
fn dedupe_label(label: String, seen: &mut HashMap<String, usize>) -> String {
    let mut candidate = label.clone();
    let mut count = seen.get(&candidate).copied().unwrap_or(0);
    while count > 0 {
        seen.insert(candidate.clone(), count + 1);
        candidate = format!("{label}.{count}");
        count = seen.get(&candidate).copied().unwrap_or(0);
    }
    seen.insert(candidate.clone(), count + 1);
    candidate
}

/// A column's position and nominal label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// 0-based position within the worksheet
    pub index: usize,
    pub label: String,
}

impl Column {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    /// Whether the label is the synthetic blank-header placeholder
    pub fn is_placeholder(&self) -> bool {
        self.label.starts_with(PLACEHOLDER_PREFIX)
    }
}

/// Cell value types
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Integer(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Renders cells the way a dataframe stringifies them, so missing cells read `nan`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "nan"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Number(n) => write!(f, "{n:?}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Boolean(true) => write!(f, "True"),
            CellValue::Boolean(false) => write!(f, "False"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(e) => write!(f, "{e}"),
        }
    }
}
