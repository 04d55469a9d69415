//! Workbook-to-frame loading: visible sheets, raw previews and header detection on disk.
use crate::config::ReportConfig;
use crate::error::RustyReportError;
use crate::frame::header::detect_header_row;
use crate::frame::Frame;
use crate::frame::Value;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::open_spreadsheet;

/// Names of the sheets not hidden in the workbook, in workbook order
pub fn visible_sheet_names(path: &str) -> Result<Vec<String>, RustyReportError> {
    Ok(open_spreadsheet(path)?.visible_sheet_names())
}

/// The first `rows` rows of a sheet as a headerless grid anchored at A1
pub fn preview_sheet(path: &str, sheet_name: &str, rows: usize) -> Result<Vec<Vec<Value>>, RustyReportError> {
    read_grid(path, sheet_name, Some(rows))
}

/// Index of the header row among the first `scan_rows` rows of a sheet
pub fn detect_sheet_header(path: &str, sheet_name: &str, scan_rows: usize) -> Result<usize, RustyReportError> {
    Ok(detect_header_row(&preview_sheet(path, sheet_name, scan_rows)?, scan_rows))
}

/// Loads a sheet as a normalized frame.
///
/// The workbook is read once; header detection scans the first `header_scan_rows` rows of that
/// same snapshot. Error cells read as empty.
pub fn load_sheet(path: &str, sheet_name: &str, config: &ReportConfig) -> Result<Frame, RustyReportError> {
    let grid = read_grid(path, sheet_name, None)?;
    let header_index = detect_header_row(&grid, config.header_scan_rows);
    log::debug!("Sheet '{sheet_name}': header detected at row {}", header_index + 1);
    let frame = Frame::from_rows(sheet_name, grid, header_index);
    log::debug!(
        "Sheet '{sheet_name}': {} columns, {} rows after normalization",
        frame.columns.len(),
        frame.len()
    );
    Ok(frame)
}

fn read_grid(path: &str, sheet_name: &str, rows_limit: Option<usize>) -> Result<Vec<Vec<Value>>, RustyReportError> {
    let mut spreadsheet = open_spreadsheet(path)?;
    let criteria = Criteria {
        rows_limit,
        error_as_null: true,
        ..Criteria::default()
    };
    Ok(spreadsheet.read_sheet(sheet_name, &criteria)?.rows())
}
