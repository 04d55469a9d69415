use thiserror::Error;

/// Main error type for the report pipeline.
/// Aggregates errors from the standard library, dependencies and the crate's own modules.
#[derive(Error, Debug)]
pub enum RustyReportError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Pipeline module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    FrameError(#[from] crate::frame::FrameError),

    #[error("{0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

impl RustyReportError {
    /// True when the error means a required column could not be resolved.
    pub fn is_missing_column(&self) -> bool {
        matches!(
            self,
            RustyReportError::FrameError(crate::frame::FrameError::MissingColumnError { .. })
        )
    }

    /// True when the requested sheet does not exist in the workbook.
    pub fn is_sheet_not_found(&self) -> bool {
        matches!(
            self,
            RustyReportError::SpreadsheetError(crate::spreadsheet::SpreadsheetError::SheetNotFoundError(..))
        )
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RustyReportError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RustyReportError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameError;

    #[test]
    fn prefix_is_prepended_to_message() {
        let result: Result<(), RustyReportError> = Err(FrameError::MissingColumnError {
            sheet: "Request".to_owned(),
            column: "Status".to_owned(),
        }
        .into());
        let message = result.with_prefix("tickets.xlsx").unwrap_err().to_string();
        assert_eq!(message, "tickets.xlsx: Column 'Status' not found in sheet 'Request'");
    }

    #[test]
    fn missing_column_is_recognised() {
        let error: RustyReportError = FrameError::MissingColumnError {
            sheet: "Banks".to_owned(),
            column: "bank".to_owned(),
        }
        .into();
        assert!(error.is_missing_column());
        assert!(!error.is_sheet_not_found());
    }
}
