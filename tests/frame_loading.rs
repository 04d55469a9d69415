mod common;

use chrono::NaiveDate;
use common::path_str;
use common::row;
use common::rows;
use common::Cell;
use common::XlsxBuilder;
use pretty_assertions::assert_eq;
use rusty_report::detect_sheet_header;
use rusty_report::load_sheet;
use rusty_report::preview_sheet;
use rusty_report::spreadsheet::criteria::Criteria;
use rusty_report::spreadsheet::open_spreadsheet;
use rusty_report::visible_sheet_names;
use rusty_report::ReportConfig;
use rusty_report::Value;

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
}

#[test]
fn lists_visible_sheets_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .sheet("2026", rows(&[&["Bank", "Address"]]))
        .sheet_with_state("Archive", "hidden", rows(&[&["Bank", "Address"]]))
        .sheet_with_state("Lookups", "veryHidden", Vec::new())
        .sheet_with_state("2025", "visible", rows(&[&["Bank", "Address"]]))
        .write(dir.path(), "banks.xlsx");

    assert_eq!(visible_sheet_names(path_str(&path)).unwrap(), vec!["2026", "2025"]);
    let spreadsheet = open_spreadsheet(path_str(&path)).unwrap();
    assert_eq!(spreadsheet.sheet_names(), vec!["2026", "Archive", "Lookups", "2025"]);
}

#[test]
fn detects_header_below_title_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .sheet(
            "Request",
            rows(&[
                &["Requests 2026"],
                &[],
                &["Priority", "Status", "Assigned To", ""],
                &["High", "Open", "Ann", ""],
                &["Low", "Closed", "", ""],
            ]),
        )
        .write(dir.path(), "tickets.xlsx");
    let path = path_str(&path);

    assert_eq!(detect_sheet_header(path, "Request", 80).unwrap(), 2);
    let preview = preview_sheet(path, "Request", 2).unwrap();
    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0][0], Value::from("Requests 2026"));

    let frame = load_sheet(path, "Request", &ReportConfig::default()).unwrap();
    assert_eq!(frame.columns, vec!["Priority", "Status", "Assigned To"]);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame.rows[1], vec![Value::from("Low"), Value::from("Closed"), Value::Empty]);
}

#[test]
fn normalizes_typed_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .sheet(
            "Work Orders",
            vec![
                row(&["WO", "Date of the Work", "", "Cost", "Done", "Note"]),
                vec![
                    Cell::Number(1001.0),
                    Cell::Date(45306.0),
                    Cell::Empty,
                    Cell::Number(12.5),
                    Cell::Bool(true),
                    Cell::Inline("  Bank & Co ".to_owned()),
                ],
                vec![
                    Cell::Number(1002.0),
                    Cell::DateTime(45325.5),
                    Cell::Text("extra".to_owned()),
                    Cell::Error("#DIV/0!".to_owned()),
                    Cell::Bool(false),
                    Cell::Empty,
                ],
                vec![],
            ],
        )
        .write(dir.path(), "orders.xlsm");

    let frame = load_sheet(path_str(&path), "Work Orders", &ReportConfig::default()).unwrap();
    assert_eq!(frame.columns, vec!["WO", "Date of the Work", "Unnamed: 2", "Cost", "Done", "Note"]);
    assert_eq!(
        frame.rows,
        vec![
            vec![
                Value::Number(1001.0),
                date(2024, 1, 15),
                Value::Empty,
                Value::Number(12.5),
                Value::Bool(true),
                Value::from("  Bank & Co "),
            ],
            vec![
                Value::Number(1002.0),
                Value::Date(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap().and_hms_opt(12, 0, 0).unwrap()),
                Value::from("extra"),
                Value::Empty,
                Value::Bool(false),
                Value::Empty,
            ],
        ]
    );
}

#[test]
fn error_cells_fail_strict_reads() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .sheet("Sheet1", vec![vec![Cell::Text("Total".to_owned()), Cell::Error("#N/A".to_owned())]])
        .write(dir.path(), "errors.xlsx");

    let mut spreadsheet = open_spreadsheet(path_str(&path)).unwrap();
    let error = spreadsheet.read_sheet("Sheet1", &Criteria::default()).unwrap_err();
    assert!(error.to_string().contains("B1"), "{error}");
    assert!(error.to_string().contains("#N/A"), "{error}");

    let lenient = Criteria {
        error_as_null: true,
        ..Criteria::default()
    };
    let sheet = spreadsheet.read_sheet("Sheet1", &lenient).unwrap();
    assert_eq!(sheet.rows(), vec![vec![Value::from("Total")]]);
}

#[test]
fn reads_1904_workbooks() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .date1904()
        .sheet("Dates", vec![row(&["When", "What"]), vec![Cell::Date(43844.0), Cell::Text("visit".to_owned())]])
        .write(dir.path(), "mac.xlsx");

    let frame = load_sheet(path_str(&path), "Dates", &ReportConfig::default()).unwrap();
    assert_eq!(frame.rows[0][0], date(2024, 1, 15));
}

#[test]
fn missing_sheet_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .sheet("Request", rows(&[&["Priority", "Status"]]))
        .write(dir.path(), "tickets.xlsx");

    let error = load_sheet(path_str(&path), "Complaints", &ReportConfig::default()).unwrap_err();
    assert!(error.is_sheet_not_found());
}

#[test]
fn empty_sheet_is_an_empty_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = XlsxBuilder::new()
        .sheet("Blank", Vec::new())
        .sheet("Headers", rows(&[&["Bank", "Address"]]))
        .write(dir.path(), "empty.xlsx");
    let path = path_str(&path);

    let blank = load_sheet(path, "Blank", &ReportConfig::default()).unwrap();
    assert!(blank.is_empty());
    assert!(blank.columns.is_empty());
    assert!(load_sheet(path, "Headers", &ReportConfig::default()).unwrap().is_empty());
}

#[test]
fn header_scan_window_comes_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut grid = vec![row(&["Report"]); 5];
    grid.push(row(&["Priority", "Status"]));
    grid.push(row(&["High", "Open"]));
    let path = XlsxBuilder::new().sheet("Request", grid).write(dir.path(), "deep.xlsx");
    let path = path_str(&path);

    let deep = load_sheet(path, "Request", &ReportConfig::default()).unwrap();
    assert_eq!(deep.columns, vec!["Priority", "Status"]);

    let config = ReportConfig::from_lookup(|name| (name == "REPORT_HEADER_SCAN_ROWS").then(|| "3".to_owned())).unwrap();
    let shallow = load_sheet(path, "Request", &config).unwrap();
    assert_eq!(shallow.columns, vec!["Report", "Unnamed: 1"]);
}
