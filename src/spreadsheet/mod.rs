//! # Spreadsheet reading
//!
//! Reads Office Open XML workbooks (.xlsx, .xlsm, .xlam) into typed cell values.
//! It lists sheets with their visibility and reads the cells of one sheet at a time,
//! optionally bounded to the first rows.
pub(crate) mod cell;
pub mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub mod sheet;
pub(crate) mod xlsx;

use crate::error::RustyReportError;
use crate::error::ResultMessage;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub(crate) type FileReader = BufReader<File>;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Read file '{0}' failed")]
    FileError(String),

    #[error("Spreadsheet '{0}' has no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Sheet '{1}' not found in '{0}'")]
    SheetNotFoundError(String, String),

    #[error("Invalid cell value at {0}!{1}!{2}: {3}")]
    CellValueError(String, String, String, String),

    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormatError(String),
}

/// A workbook opened for reading
pub trait Spreadsheet {
    /// File name the workbook was opened from
    fn name(&self) -> String;

    /// All sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Sheet names whose state is neither `hidden` nor `veryHidden`, in workbook order
    fn visible_sheet_names(&self) -> Vec<String>;

    /// Reads the cells of one sheet
    fn read_sheet(&mut self, sheet_name: &str, criteria: &Criteria) -> Result<Sheet, RustyReportError>;
}

/// Opens a workbook, choosing the reader from the file extension
pub fn open_spreadsheet(file_name: &str) -> Result<Box<dyn Spreadsheet>, RustyReportError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xlam" => {
            let spreadsheet = XlsxSpreadsheet::open(file_name).with_prefix(file_name)?;
            Ok(Box::new(spreadsheet))
        }
        _ => Err(SpreadsheetError::UnsupportedFormatError(file_name.to_owned()))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_formats() {
        for file_name in ["report.xls", "report.ods", "report.csv", "report"] {
            let error = open_spreadsheet(file_name).err().unwrap();
            assert!(matches!(
                error,
                RustyReportError::SpreadsheetError(SpreadsheetError::UnsupportedFormatError(_))
            ));
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let error = open_spreadsheet("/nonexistent/report.xlsx").err().unwrap();
        assert!(error.to_string().starts_with("/nonexistent/report.xlsx: "));
    }
}
