//! # Report configuration
//!
//! Every stage of the pipeline receives a [`ReportConfig`] explicitly. Defaults describe the
//! known workbook layouts; individual values can be overridden from the environment through
//! one [`EnvParam`] implementation per variable.
use crate::classify::completion_vocabulary;
use crate::classify::priority_vocabulary;
use crate::classify::ticket_status_vocabulary;
use crate::classify::Completion;
use crate::classify::Priority;
use crate::classify::TicketStatus;
use crate::classify::Vocabulary;
use crate::error::RustyReportError;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {message}")]
    InvalidValueError { name: String, message: String },
}

/// A ticket sheet shown on the dashboard
#[derive(Clone, Debug, PartialEq)]
pub struct TicketSheet {
    /// Name the views are keyed by
    pub label: String,
    /// Worksheet name in the workbook
    pub sheet: String,
    /// Column holding the ticket status
    pub status_column: String,
}

impl TicketSheet {
    pub fn new(label: &str, sheet: &str, status_column: &str) -> Self {
        TicketSheet {
            label: label.to_owned(),
            sheet: sheet.to_owned(),
            status_column: status_column.to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    /// Rows scanned when looking for the header row
    pub header_scan_rows: usize,
    /// Keywords locating the bank column of completion sheets
    pub bank_columns: Vec<String>,
    /// Keywords locating the address column of completion sheets
    pub address_columns: Vec<String>,
    pub ticket_sheets: Vec<TicketSheet>,
    pub priority_column: String,
    pub assigned_to_column: String,
    /// Date column the monthly trend is bucketed on
    pub trend_date_column: String,
    pub priority: Vocabulary<Priority>,
    pub ticket_status: Vocabulary<TicketStatus>,
    pub completion: Vocabulary<Completion>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            header_scan_rows: 80,
            bank_columns: to_strings(&["bank", "banco"]),
            address_columns: to_strings(&["address", "adresse", "direccion", "dirección", "addr"]),
            ticket_sheets: vec![
                TicketSheet::new("Work Orders", "Work Orders", "General Status"),
                TicketSheet::new("Request", "Request", "Status"),
                TicketSheet::new("Complaints", "Complaints", "Status"),
            ],
            priority_column: "Priority".to_owned(),
            assigned_to_column: "Assigned To".to_owned(),
            trend_date_column: "Date of the Work".to_owned(),
            priority: priority_vocabulary(),
            ticket_status: ticket_status_vocabulary(),
            completion: completion_vocabulary(),
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by the `REPORT_*` environment variables that are set
    pub fn from_env() -> Result<Self, RustyReportError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each parameter name
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RustyReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ReportConfig::default();
        if let Some(rows) = HeaderScanRowsParam::read(&lookup)? {
            config.header_scan_rows = rows;
        }
        if let Some(keywords) = BankColumnsParam::read(&lookup)? {
            config.bank_columns = keywords;
        }
        if let Some(keywords) = AddressColumnsParam::read(&lookup)? {
            config.address_columns = keywords;
        }
        if let Some(sheets) = TicketSheetsParam::read(&lookup)? {
            config.ticket_sheets = sheets;
        }
        if let Some(column) = TrendDateColumnParam::read(&lookup)? {
            config.trend_date_column = column;
        }
        Ok(config)
    }

    /// The ticket sheet with the given label
    pub fn ticket_sheet(&self, label: &str) -> Option<&TicketSheet> {
        self.ticket_sheets.iter().find(|sheet| sheet.label == label)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

// Environment parameters

/// A configuration value read from a named environment variable.
///
/// # Type Parameters
///
/// * `T` - The type of the parameter value
pub trait EnvParam<T> {
    /// Variable name
    fn name() -> &'static str;

    /// Parses a trimmed, non-empty raw value
    fn parse(value: &str) -> Result<T, ConfigError>;

    /// Reads the parameter; unset or blank variables are `None`
    fn read<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Option<T>, ConfigError> {
        match lookup(Self::name()) {
            Some(value) if !value.trim().is_empty() => Self::parse(value.trim()).map(Some),
            _ => Ok(None),
        }
    }

    fn invalid(message: String) -> ConfigError {
        ConfigError::InvalidValueError {
            name: Self::name().to_owned(),
            message,
        }
    }
}

struct HeaderScanRowsParam;

struct BankColumnsParam;

struct AddressColumnsParam;

struct TicketSheetsParam;

struct TrendDateColumnParam;

impl EnvParam<usize> for HeaderScanRowsParam {
    fn name() -> &'static str {
        "REPORT_HEADER_SCAN_ROWS"
    }

    fn parse(value: &str) -> Result<usize, ConfigError> {
        match value.parse::<usize>() {
            Ok(rows) if rows > 0 => Ok(rows),
            _ => Err(Self::invalid(format!("'{value}' is not a positive integer"))),
        }
    }
}

/// Comma-separated keywords, lower-cased
fn parse_keywords<P: EnvParam<Vec<String>>>(value: &str) -> Result<Vec<String>, ConfigError> {
    let keywords: Vec<String> = value
        .split(',')
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect();
    if keywords.is_empty() {
        Err(P::invalid(format!("'{value}' has no keywords")))
    } else {
        Ok(keywords)
    }
}

impl EnvParam<Vec<String>> for BankColumnsParam {
    fn name() -> &'static str {
        "REPORT_BANK_COLUMNS"
    }

    fn parse(value: &str) -> Result<Vec<String>, ConfigError> {
        parse_keywords::<Self>(value)
    }
}

impl EnvParam<Vec<String>> for AddressColumnsParam {
    fn name() -> &'static str {
        "REPORT_ADDRESS_COLUMNS"
    }

    fn parse(value: &str) -> Result<Vec<String>, ConfigError> {
        parse_keywords::<Self>(value)
    }
}

impl EnvParam<Vec<TicketSheet>> for TicketSheetsParam {
    fn name() -> &'static str {
        "REPORT_TICKET_SHEETS"
    }

    /// `Label=Sheet:Status Column;...`, where `Sheet:` may be left out when it equals the label.
    /// Sheet names cannot contain `:`, so the first colon separates sheet and column.
    fn parse(value: &str) -> Result<Vec<TicketSheet>, ConfigError> {
        let mut sheets = Vec::<TicketSheet>::new();
        let mut labels = HashSet::<String>::new();
        for entry in value.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (label, target) = entry
                .split_once('=')
                .ok_or_else(|| Self::invalid(format!("'{entry}' is not 'Label=Sheet:Status Column'")))?;
            let label = label.trim();
            let (sheet, status_column) = match target.split_once(':') {
                Some((sheet, status_column)) => (sheet.trim(), status_column.trim()),
                None => (label, target.trim()),
            };
            if label.is_empty() || sheet.is_empty() || status_column.is_empty() {
                Err(Self::invalid(format!("'{entry}' has an empty label, sheet or status column")))?
            }
            if !labels.insert(label.to_owned()) {
                Err(Self::invalid(format!("label '{label}' is repeated")))?
            }
            sheets.push(TicketSheet::new(label, sheet, status_column));
        }
        if sheets.is_empty() {
            Err(Self::invalid(format!("'{value}' has no sheets")))?
        }
        Ok(sheets)
    }
}

impl EnvParam<String> for TrendDateColumnParam {
    fn name() -> &'static str {
        "REPORT_TREND_DATE_COLUMN"
    }

    fn parse(value: &str) -> Result<String, ConfigError> {
        Ok(value.to_owned())
    }
}
