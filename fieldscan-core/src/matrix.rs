//! Sheet × field presence matrix

use std::collections::{BTreeSet, HashSet};

/// The field list one worksheet contributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetFields {
    pub sheet: String,
    pub fields: Vec<String>,
}

impl SheetFields {
    pub fn new(sheet: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            sheet: sheet.into(),
            fields,
        }
    }
}

/// Presence flags with worksheets as rows (input order) and fields as
/// columns (sorted)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMatrix {
    sheets: Vec<String>,
    fields: Vec<String>,
    cells: Vec<Vec<u8>>,
}

/// Build the presence matrix over the union of every sheet's fields
pub fn build_matrix(per_sheet: &[SheetFields]) -> FieldMatrix {
    let universe: BTreeSet<&str> = per_sheet
        .iter()
        .flat_map(|s| s.fields.iter().map(String::as_str))
        .collect();
    let fields: Vec<String> = universe.into_iter().map(str::to_string).collect();

    let cells = per_sheet
        .iter()
        .map(|s| {
            let present: HashSet<&str> = s.fields.iter().map(String::as_str).collect();
            fields
                .iter()
                .map(|f| u8::from(present.contains(f.as_str())))
                .collect()
        })
        .collect();

    FieldMatrix {
        sheets: per_sheet.iter().map(|s| s.sheet.clone()).collect(),
        fields,
        cells,
    }
}

impl FieldMatrix {
    /// Worksheet names, one per row
    pub fn sheets(&self) -> &[String] {
        &self.sheets
    }

    /// Field names, one per column
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.sheets.len(), self.fields.len())
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Presence flags of the worksheet at `row`
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    /// Presence flag for a (sheet, field) pair, `None` if either is unknown
    pub fn presence(&self, sheet: &str, field: &str) -> Option<u8> {
        let row = self.sheets.iter().position(|s| s == sheet)?;
        let col = self.fields.binary_search_by(|f| f.as_str().cmp(field)).ok()?;
        Some(self.cells[row][col])
    }

    /// Number of fields present in the worksheet at `row`
    pub fn fields_in_sheet(&self, row: usize) -> usize {
        self.row(row)
            .map(|r| r.iter().map(|&v| usize::from(v)).sum())
            .unwrap_or(0)
    }

    /// Number of worksheets containing the field at `col`
    pub fn sheets_with_field(&self, col: usize) -> usize {
        self.cells
            .iter()
            .filter_map(|r| r.get(col))
            .map(|&v| usize::from(v))
            .sum()
    }

    /// Total number of 1-cells
    pub fn ones(&self) -> usize {
        self.cells.iter().flatten().map(|&v| usize::from(v)).sum()
    }
}
