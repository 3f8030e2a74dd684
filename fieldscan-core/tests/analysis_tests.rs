use calamine::{Data, Reader, Xlsx, open_workbook};
use fieldscan_core::config::SheetConfig;
use fieldscan_core::{
    AnalyzerConfig, FieldAnalyzer, FieldScanError, HeaderSource, HeaderStrategy, save_results,
};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

// Three weekly schedules with their real headers under a title row, plus a
// notes sheet with a plain header row.
fn create_schedule(path: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();

    for (week, extra) in [("Week 1", "Van"), ("Week 2", "Pallet"), ("Week 3", "Van")] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(week)?;
        sheet.write_string(0, 0, format!("Production schedule {week}"))?;
        sheet.write_string(2, 0, "Purchase Order")?;
        sheet.write_string(2, 1, "Due Date")?;
        sheet.write_string(2, 2, extra)?;
        for row in 3..15u32 {
            sheet.write_string(row, 0, format!("PO{}", 1000 + row))?;
            sheet.write_string(row, 1, "2024-02-01")?;
            sheet.write_number(row, 2, f64::from(row))?;
        }
    }

    let notes = workbook.add_worksheet();
    notes.set_name("Notes")?;
    notes.write_string(0, 0, "Comment")?;
    notes.write_string(1, 0, "check stock levels")?;

    workbook.save(path)?;
    Ok(())
}

fn fixture() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schedule.xlsx");
    create_schedule(&path).unwrap();
    (dir, path)
}

#[test]
fn test_analyze_file_promotes_embedded_headers() {
    let (_dir, path) = fixture();
    let analysis = FieldAnalyzer::new().analyze_file(&path).unwrap();

    assert_eq!(
        analysis.summary.sheet_names,
        vec!["Week 1", "Week 2", "Week 3", "Notes"]
    );

    let week1 = analysis.get_sheet("Week 1").unwrap();
    assert_eq!(week1.columns[1], "Unnamed: 1");
    assert_eq!(week1.fields, vec!["Purchase Order", "Due Date", "Van"]);
    assert_eq!(week1.headers[0].source, HeaderSource::Promoted { row: 1 });

    let notes = analysis.get_sheet("Notes").unwrap();
    assert_eq!(notes.fields, vec!["Comment"]);
    assert_eq!(notes.headers[0].source, HeaderSource::Nominal);
}

#[test]
fn test_summary_statistics() {
    let (_dir, path) = fixture();
    let analysis = FieldAnalyzer::new().analyze_file(&path).unwrap();
    let summary = &analysis.summary;

    assert_eq!(summary.total_sheets, 4);
    assert_eq!(
        summary.all_field_names,
        vec!["Comment", "Due Date", "Pallet", "Purchase Order", "Van"]
    );
    assert_eq!(summary.sheets_per_field["Purchase Order"], 3);
    assert_eq!(summary.sheets_per_field["Van"], 2);
    assert!(summary.universal_fields.is_empty());
    assert_eq!(
        summary.unique_fields.keys().collect::<Vec<_>>(),
        vec!["Comment", "Pallet"]
    );
    assert_eq!(analysis.matrix.presence("Week 2", "Van"), Some(0));
    assert_eq!(analysis.matrix.presence("Week 2", "Pallet"), Some(1));
}

#[test]
fn test_nominal_strategy_reads_title_rows() {
    let (_dir, path) = fixture();
    let mut config = AnalyzerConfig::default();
    config.global.strategy = HeaderStrategy::Nominal;
    config.global.include_unnamed_columns = false;

    let analysis = FieldAnalyzer::with_config(config).analyze_file(&path).unwrap();
    let week1 = analysis.get_sheet("Week 1").unwrap();
    assert_eq!(week1.fields, vec!["Production schedule Week 1"]);
}

#[test]
fn test_excluded_sheet() {
    let (_dir, path) = fixture();
    let mut config = AnalyzerConfig::default();
    config
        .sheets
        .insert("Notes".to_string(), SheetConfig { exclude: true });

    let analysis = FieldAnalyzer::with_config(config).analyze_file(&path).unwrap();
    assert_eq!(analysis.summary.total_sheets, 3);
    assert!(analysis.summary.universal_fields.contains_key("Purchase Order"));
    assert!(analysis.summary.universal_fields.contains_key("Due Date"));
}

#[test]
fn test_missing_input() {
    let err = FieldAnalyzer::new()
        .analyze_file("no/such/workbook.xlsx")
        .unwrap_err();
    assert!(matches!(err, FieldScanError::InputMissing(_)));
}

#[test]
fn test_save_results() {
    let (dir, path) = fixture();
    let analysis = FieldAnalyzer::new().analyze_file(&path).unwrap();
    let output = dir.path().join("results");

    let saved = save_results(&analysis, &output).unwrap();
    for (_, file) in saved.iter() {
        assert!(file.exists(), "{} not written", file.display());
    }

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved.analysis_report).unwrap()).unwrap();
    assert_eq!(report["total_sheets"], 4);
    assert_eq!(report["fields_per_sheet"]["Week 1"], 3);
    assert_eq!(report["sheets_per_field"]["Purchase Order"], 3);
    assert_eq!(report["field_categories"]["Timing"][0], "Due Date");
    assert!(report["analysis_date"].as_str().unwrap().contains('T'));
    let sheet_order: Vec<_> = report["fields_per_sheet"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(sheet_order.len(), 4);

    let mut matrix: Xlsx<_> = open_workbook(&saved.field_matrix).unwrap();
    let range = matrix.worksheet_range_at(0).unwrap().unwrap();
    assert_eq!(range.get_size(), (5, 6));
    assert_eq!(
        range.get_value((4, 0)),
        Some(&Data::String("Notes".into()))
    );

    let mut detailed: Xlsx<_> = open_workbook(&saved.detailed_analysis).unwrap();
    let names = detailed.sheet_names();
    assert_eq!(&names[..3], &["Field_Matrix", "Summary", "Field_Details"]);
    assert!(names.contains(&"Despatch_Information".to_string()));
    assert!(names.contains(&"Data_Quality".to_string()));
    assert!(!names.contains(&"Capacity_&_Planning".to_string()));
}
