use anyhow::Result;
use fieldscan_core::HeaderClassifier;
use fieldscan_core::classifier::SCAN_ROWS;
use fieldscan_core::reader::read_workbook;
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.xlsx|file.ods> [sheet_name]", args[0]);
        std::process::exit(1);
    }

    let file_path = &args[1];
    let target_sheet = args.get(2).map(|s| s.as_str());

    println!("Reading workbook: {}", file_path);
    let workbook = read_workbook(file_path)?;
    let classifier = HeaderClassifier::new();

    for sheet in &workbook.sheets {
        if let Some(target) = target_sheet {
            if sheet.name != target {
                continue;
            }
        }

        println!("\n=== Sheet: {} ===", sheet.name);

        for column in &sheet.columns {
            println!("  {} '{}'", num_to_col(column.index), column.label);
            for row in 0..sheet.row_count().min(SCAN_ROWS) {
                let Some(cell) = sheet.cell(row, column.index) else {
                    continue;
                };
                let text = cell.to_string();
                let value = text.trim();
                let verdict = if classifier.is_likely_header(value, sheet, column.index) {
                    "header"
                } else if classifier.is_common_data_value(value, sheet, column.index) {
                    "data"
                } else {
                    "-"
                };
                println!("    row {}: {:<30} {}", row + 2, format!("'{}'", value), verdict);
            }
        }
    }

    for warning in &workbook.warnings {
        println!("\nSkipped sheet '{}': {}", warning.sheet, warning.message);
    }

    Ok(())
}

fn num_to_col(mut num: usize) -> String {
    let mut result = String::new();
    while num >= 26 {
        result.push((b'A' + (num % 26) as u8) as char);
        num = num / 26 - 1;
    }
    result.push((b'A' + num as u8) as char);
    result.chars().rev().collect()
}
