//! Console output for analysis results

use anyhow::Result;
use colored::*;
use fieldscan_core::{Analysis, HeaderSource, SavedFiles, assess_quality};
use std::path::Path;

/// Fields printed under "Most common fields"
const TOP_COMMON_FIELDS: usize = 20;

/// Print the analysis summary with colors
pub fn print_human(analysis: &Analysis) {
    let summary = &analysis.summary;
    let report = analysis.report();

    println!("{}", "Field Analysis Summary".bold().underline());
    println!("  {} {}", "File:".bold(), file_name(&analysis.path));
    println!("  {} {}", "Analysis Date:".bold(), report.analysis_date);
    println!("  {} {}", "Total Sheets:".bold(), summary.total_sheets);
    println!(
        "  {} {}",
        "Total Unique Fields:".bold(),
        summary.total_unique_fields
    );
    println!(
        "  {} {}",
        "Common Fields (multiple sheets):".bold(),
        summary.common_fields.len()
    );
    println!(
        "  {} {}",
        "Unique Fields (single sheet):".bold(),
        summary.unique_fields.len()
    );
    println!(
        "  {} {}",
        "Universal Fields (all sheets):".bold(),
        summary.universal_fields.len()
    );
    if let Some(field) = summary.most_used_field() {
        println!("  {} {}", "Most Used Field:".bold(), field);
    }
    println!(
        "  {} {:.1} (std dev {:.1})",
        "Average Fields per Sheet:".bold(),
        summary.mean_fields_per_sheet(),
        summary.fields_per_sheet_std_dev()
    );
    println!();

    println!("{}", "Worksheets:".bold().underline());
    for (i, (sheet, count)) in summary.fields_per_sheet.iter().enumerate() {
        println!("  {:2}. {} ({} fields)", i + 1, sheet.cyan(), count);
    }
    println!();

    if !summary.universal_fields.is_empty() {
        println!("{}", "Universal fields (present in all sheets):".bold().underline());
        for field in summary.universal_fields.keys() {
            println!("  {} {}", "•".green(), field);
        }
        println!();
    }

    if !summary.common_fields.is_empty() {
        println!("{}", "Most common fields:".bold().underline());
        for (field, count) in summary
            .fields_by_usage()
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .take(TOP_COMMON_FIELDS)
        {
            println!(
                "  {} {} {}",
                "•".green(),
                field,
                format!(
                    "({} sheets, {:.1}%)",
                    count,
                    summary.sheet_percentage(count)
                )
                .bright_black()
            );
        }
        println!();
    }

    println!("{}", "Field categories:".bold().underline());
    for (category, fields) in &summary.field_categories {
        if fields.is_empty() {
            continue;
        }
        println!("  {} ({})", category.as_str().yellow().bold(), fields.len());
        for field in fields {
            let count = summary.sheets_per_field.get(field).copied().unwrap_or(0);
            println!("    {} {}", field, format!("({} sheets)", count).bright_black());
        }
    }

    println!();
    println!("{}", "Data quality:".bold().underline());
    for metric in assess_quality(summary) {
        let level = if metric.good {
            metric.quality_level().green()
        } else {
            metric.quality_level().yellow()
        };
        println!(
            "  {} {:.1}% [{}] {}",
            format!("{}:", metric.metric).bold(),
            metric.score,
            level,
            metric.description.bright_black()
        );
    }

    print_warnings(analysis);
}

/// Print each worksheet's nominal labels next to the inferred headers
pub fn print_columns(analysis: &Analysis) {
    println!("{}", "Column analysis:".bold().underline());
    for sheet in &analysis.sheets {
        println!();
        println!("{} {}", "Sheet:".bold(), sheet.sheet.cyan().bold());
        println!(
            "  {} columns, {} rows",
            sheet.columns.len(),
            sheet.row_count
        );

        for header in &sheet.headers {
            let label = sheet
                .columns
                .get(header.column)
                .map(String::as_str)
                .unwrap_or_default();
            let non_empty = sheet.non_empty.get(header.column).copied().unwrap_or(0);
            let source = match header.source {
                HeaderSource::Promoted { row } => {
                    format!("promoted from data row {}", row + 1).green()
                }
                HeaderSource::Nominal => "nominal".normal(),
                HeaderSource::Generated => "generated".yellow(),
            };
            println!(
                "  {:2}. '{}' → '{}' [{}] {}",
                header.column + 1,
                label,
                header.name.bold(),
                source,
                format!("{} non-empty", non_empty).bright_black()
            );
        }
    }
    println!();
}

/// Print the paths of written files
pub fn print_saved(output_dir: &Path, saved: &SavedFiles) {
    println!();
    println!(
        "{} {}",
        "✓ Results saved to".green().bold(),
        output_dir.display()
    );
    for (kind, path) in saved.iter() {
        println!("  {} {}", format!("{kind}:").bold(), path.display());
    }
}

/// Print the JSON report to stdout
pub fn print_json(analysis: &Analysis) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&analysis.report())?);
    Ok(())
}

fn print_warnings(analysis: &Analysis) {
    if analysis.warnings.is_empty() {
        return;
    }

    println!();
    println!("{}", "Skipped worksheets:".bold().underline());
    for warning in &analysis.warnings {
        println!(
            "  {} '{}': {}",
            "WARN".yellow().bold(),
            warning.sheet,
            warning.message
        );
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
