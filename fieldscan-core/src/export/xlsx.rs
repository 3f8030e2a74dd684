//! XLSX output using rust_xlsxwriter

use crate::error::{FieldScanError, Result};
use crate::matrix::FieldMatrix;
use crate::quality::assess_quality;
use crate::summary::SummaryReport;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};
use std::path::Path;

/// Excel's column limit
const MAX_COLUMNS: usize = 16_384;

/// Excel's row limit
const MAX_ROWS: usize = 1_048_576;

/// Write the presence matrix as a single-sheet workbook
pub fn write_field_matrix(matrix: &FieldMatrix, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_matrix_sheet(worksheet, matrix)?;
    workbook.save(path)?;
    Ok(())
}

/// Write the matrix, summary sheets, quality scores and one sheet per
/// non-empty category
pub fn write_detailed_analysis(
    matrix: &FieldMatrix,
    summary: &SummaryReport,
    path: &Path,
) -> Result<()> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet().set_name("Field_Matrix")?;
    write_matrix_sheet(worksheet, matrix)?;

    let worksheet = workbook.add_worksheet().set_name("Summary")?;
    worksheet.write_string_with_format(0, 0, "Metric", &header)?;
    worksheet.write_string_with_format(0, 1, "Count", &header)?;
    let metrics = [
        ("Total Sheets", summary.total_sheets),
        ("Total Unique Fields", summary.total_unique_fields),
        ("Common Fields", summary.common_fields.len()),
        ("Unique Fields", summary.unique_fields.len()),
        ("Universal Fields", summary.universal_fields.len()),
    ];
    for (row, (metric, count)) in (1..).zip(metrics) {
        worksheet.write_string(row, 0, metric)?;
        worksheet.write_number(row, 1, count as f64)?;
    }

    let worksheet = workbook.add_worksheet().set_name("Field_Details")?;
    write_field_rows(worksheet, summary, summary.fields_by_usage(), &header)?;

    let worksheet = workbook.add_worksheet().set_name("Statistics")?;
    worksheet.write_string_with_format(0, 0, "Metric", &header)?;
    worksheet.write_string_with_format(0, 1, "Value", &header)?;
    let statistics = [
        ("Most Used Field", summary.most_used_field().unwrap_or_default().to_string()),
        ("Average Fields per Sheet", format!("{:.1}", summary.mean_fields_per_sheet())),
        (
            "Field Usage Standard Deviation",
            format!("{:.1}", summary.fields_per_sheet_std_dev()),
        ),
    ];
    for (row, (metric, value)) in (1..).zip(statistics) {
        worksheet.write_string(row, 0, metric)?;
        worksheet.write_string(row, 1, value)?;
    }

    let worksheet = workbook.add_worksheet().set_name("Sheet_Analysis")?;
    for (col, title) in (0..).zip(["Sheet_Name", "Field_Count", "Percentage_of_Total_Fields"]) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }
    for (i, (sheet, count)) in summary.sheets_by_field_count().into_iter().enumerate() {
        let row = row(i + 1)?;
        worksheet.write_string(row, 0, sheet)?;
        worksheet.write_number(row, 1, count as f64)?;
        worksheet.write_string(row, 2, format!("{:.1}%", summary.field_percentage(count)))?;
    }

    let worksheet = workbook.add_worksheet().set_name("Data_Quality")?;
    for (col, title) in (0..).zip(["Metric", "Score", "Description", "Quality_Level"]) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }
    for (row, metric) in (1..).zip(assess_quality(summary)) {
        worksheet.write_string(row, 0, metric.metric)?;
        worksheet.write_string(row, 1, format!("{:.1}%", metric.score))?;
        worksheet.write_string(row, 2, &metric.description)?;
        worksheet.write_string(row, 3, metric.quality_level())?;
    }

    for (category, fields) in &summary.field_categories {
        if fields.is_empty() {
            continue;
        }
        let mut rows: Vec<(&str, usize)> = fields
            .iter()
            .map(|f| {
                let count = summary.sheets_per_field.get(f).copied().unwrap_or(0);
                (f.as_str(), count)
            })
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let worksheet = workbook.add_worksheet().set_name(category.sheet_name())?;
        write_field_rows(worksheet, summary, rows, &header)?;
    }

    workbook.save(path)?;
    Ok(())
}

// Sheet names down column A, one 0/1 column per field.
fn write_matrix_sheet(worksheet: &mut Worksheet, matrix: &FieldMatrix) -> Result<()> {
    let header = Format::new().set_bold();

    for (i, field) in matrix.fields().iter().enumerate() {
        worksheet.write_string_with_format(0, column(i + 1)?, field, &header)?;
    }

    for (i, sheet) in matrix.sheets().iter().enumerate() {
        let row = row(i + 1)?;
        worksheet.write_string_with_format(row, 0, sheet, &header)?;
        if let Some(flags) = matrix.row(i) {
            for (j, flag) in flags.iter().enumerate() {
                worksheet.write_number(row, column(j + 1)?, *flag)?;
            }
        }
    }

    worksheet.set_freeze_panes(1, 1)?;
    Ok(())
}

fn write_field_rows(
    worksheet: &mut Worksheet,
    summary: &SummaryReport,
    fields: Vec<(&str, usize)>,
    header: &Format,
) -> Result<()> {
    worksheet.write_string_with_format(0, 0, "Field_Name", header)?;
    worksheet.write_string_with_format(0, 1, "Sheets_Present", header)?;
    worksheet.write_string_with_format(0, 2, "Percentage_of_Sheets", header)?;
    worksheet.write_string_with_format(0, 3, "Usage_Level", header)?;

    for (i, (field, count)) in fields.into_iter().enumerate() {
        let row = row(i + 1)?;
        worksheet.write_string(row, 0, field)?;
        worksheet.write_number(row, 1, count as f64)?;
        worksheet.write_string(row, 2, format!("{:.1}%", summary.sheet_percentage(count)))?;
        worksheet.write_string(row, 3, summary.usage_level(count).as_str())?;
    }
    Ok(())
}

fn column(index: usize) -> Result<ColNum> {
    if index >= MAX_COLUMNS {
        return Err(FieldScanError::Export(format!(
            "{} columns exceed the worksheet limit of {}",
            index + 1,
            MAX_COLUMNS
        )));
    }
    ColNum::try_from(index).map_err(|e| FieldScanError::Export(e.to_string()))
}

fn row(index: usize) -> Result<RowNum> {
    if index >= MAX_ROWS {
        return Err(FieldScanError::Export(format!(
            "{} rows exceed the worksheet limit of {}",
            index + 1,
            MAX_ROWS
        )));
    }
    RowNum::try_from(index).map_err(|e| FieldScanError::Export(e.to_string()))
}
