//! # Ticket views
//!
//! Ticket sheets (work orders, requests, complaints) carry a free-text Priority and Status per
//! row. Rows are classified, split into open and closed subsets and aggregated per sheet, per
//! assignee and per month.
use crate::aggregate::assignee_priority_counts;
use crate::aggregate::monthly_counts;
use crate::aggregate::priority_counts;
use crate::aggregate::priority_status_counts;
use crate::aggregate::AssigneeTable;
use crate::aggregate::MonthCount;
use crate::aggregate::PriorityCount;
use crate::aggregate::PriorityStatusCount;
use crate::classify::Priority;
use crate::classify::TicketStatus;
use crate::config::ReportConfig;
use crate::config::TicketSheet;
use crate::frame::loader::load_sheet;
use crate::frame::Frame;
use crate::frame::FrameError;
use anyhow::Context;
use serde::Serialize;

/// A classified ticket
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TicketRow {
    /// Position of the row in the frame
    pub row: usize,
    pub priority: Priority,
    pub status: TicketStatus,
    /// Trimmed assignee, `None` when blank or when the sheet has no assignee column
    pub assigned_to: Option<String>,
}

/// Rows of a frame split by status. Rows whose Priority or Status is unclassified are in neither
/// subset and only counted in `dropped`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatusSplit {
    /// Every status except Closed: Open, In Progress and Other
    pub open: Vec<TicketRow>,
    pub closed: Vec<TicketRow>,
    pub dropped: usize,
}

/// Which subset of a [`StatusSplit`] a view is built from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bucket {
    Open,
    Closed,
}

impl StatusSplit {
    pub fn rows(&self, bucket: Bucket) -> &[TicketRow] {
        match bucket {
            Bucket::Open => &self.open,
            Bucket::Closed => &self.closed,
        }
    }
}

/// Classifies the rows of a ticket frame and splits them into open and closed subsets.
///
/// A frame without `status_column` yields two empty subsets. The Priority column is looked up by
/// its configured name; without it no row classifies, and both subsets are empty as well.
pub fn split_by_status(frame: &Frame, status_column: &str, config: &ReportConfig) -> StatusSplit {
    let Some(status_index) = frame.column_index(status_column) else {
        return StatusSplit::default();
    };
    let priority_index = frame.column_index(&config.priority_column);
    let assigned_index = frame.column_index(&config.assigned_to_column);

    let mut split = StatusSplit::default();
    for row in 0..frame.len() {
        let priority = config.priority.classify(frame.cell(row, priority_index));
        let status = config.ticket_status.classify(frame.cell(row, Some(status_index)));
        let (Some(priority), Some(status)) = (priority, status) else {
            split.dropped += 1;
            continue;
        };
        let ticket = TicketRow {
            row,
            priority,
            status,
            assigned_to: frame.cell(row, assigned_index).to_trimmed(),
        };
        if status == TicketStatus::Closed {
            split.closed.push(ticket);
        } else {
            split.open.push(ticket);
        }
    }
    log::debug!(
        "Sheet '{}': {} open, {} closed, {} unclassified rows dropped",
        frame.sheet,
        split.open.len(),
        split.closed.len(),
        split.dropped
    );
    split
}

/// A ticket sheet that loaded, with its frame
#[derive(Clone, Debug)]
pub struct LoadedTicketSheet {
    pub sheet: TicketSheet,
    pub frame: Frame,
}

/// A view that could not be rendered, with the reason shown in its place
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notice {
    pub label: String,
    pub message: String,
}

/// Per-sheet chart input
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TicketSheetView {
    pub label: String,
    /// Priority × Status over the open subset
    pub open: Vec<PriorityStatusCount>,
    /// Priority over the closed subset
    pub closed: Vec<PriorityCount>,
    pub open_count: usize,
    pub closed_count: usize,
    /// Set when the status column is missing; both tables are then empty
    pub notice: Option<String>,
}

/// Monthly counts of one sheet
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub points: Vec<MonthCount>,
}

/// The ticket sheets of a workbook, loaded once per refresh
#[derive(Clone, Debug)]
pub struct TicketDashboard {
    config: ReportConfig,
    pub sheets: Vec<LoadedTicketSheet>,
    /// Sheets that failed to load
    pub notices: Vec<Notice>,
}

impl TicketDashboard {
    /// Loads every configured ticket sheet. A sheet that fails to load becomes a notice; the
    /// others still load.
    pub fn load(path: &str, config: &ReportConfig) -> TicketDashboard {
        let mut sheets = Vec::<LoadedTicketSheet>::new();
        let mut notices = Vec::<Notice>::new();
        for sheet in &config.ticket_sheets {
            let result = load_sheet(path, &sheet.sheet, config)
                .with_context(|| format!("Load ticket sheet '{}' failed", sheet.sheet));
            match result {
                Ok(frame) => sheets.push(LoadedTicketSheet {
                    sheet: sheet.to_owned(),
                    frame,
                }),
                Err(error) => {
                    log::warn!("{error:#}");
                    notices.push(Notice {
                        label: sheet.label.to_owned(),
                        message: format!("{error:#}"),
                    });
                }
            }
        }
        TicketDashboard::from_sheets(sheets, notices, config)
    }

    /// Builds a dashboard over frames that are already loaded
    pub fn from_sheets(sheets: Vec<LoadedTicketSheet>, notices: Vec<Notice>, config: &ReportConfig) -> TicketDashboard {
        TicketDashboard {
            config: config.to_owned(),
            sheets,
            notices,
        }
    }

    fn split(&self, loaded: &LoadedTicketSheet) -> StatusSplit {
        split_by_status(&loaded.frame, &loaded.sheet.status_column, &self.config)
    }

    /// Open and closed charts of every loaded sheet, in configuration order
    pub fn sheet_views(&self) -> Vec<TicketSheetView> {
        self.sheets
            .iter()
            .map(|loaded| {
                let notice = match loaded.frame.column_index(&loaded.sheet.status_column) {
                    Some(_) => None,
                    None => {
                        let error = FrameError::MissingColumnError {
                            sheet: loaded.sheet.sheet.to_owned(),
                            column: loaded.sheet.status_column.to_owned(),
                        };
                        log::warn!("{error}");
                        Some(error.to_string())
                    }
                };
                let split = self.split(loaded);
                TicketSheetView {
                    label: loaded.sheet.label.to_owned(),
                    open: priority_status_counts(split.open.iter().map(|row| (row.priority, row.status))),
                    closed: priority_counts(split.closed.iter().map(|row| row.priority)),
                    open_count: split.open.len(),
                    closed_count: split.closed.len(),
                    notice,
                }
            })
            .collect()
    }

    /// Assignee × Priority over one bucket of the selected sheets (`None` selects all).
    /// Sheets without an assignee column contribute nothing, nor do rows with a blank assignee.
    pub fn assignee_counts(&self, sources: Option<&[&str]>, bucket: Bucket) -> AssigneeTable {
        let mut pairs = Vec::<(String, Priority)>::new();
        for loaded in &self.sheets {
            let selected = sources
                .map(|labels| labels.contains(&loaded.sheet.label.as_str()))
                .unwrap_or(true);
            if !selected || loaded.frame.column_index(&self.config.assigned_to_column).is_none() {
                continue;
            }
            let split = self.split(loaded);
            pairs.extend(
                split
                    .rows(bucket)
                    .iter()
                    .filter_map(|row| Some((row.assigned_to.to_owned()?, row.priority))),
            );
        }
        assignee_priority_counts(pairs)
    }

    /// Tickets per month of the trend date column, over all rows of each sheet.
    /// Sheets without the column are left out.
    pub fn monthly_trend(&self) -> Vec<TrendSeries> {
        self.sheets
            .iter()
            .filter_map(|loaded| {
                let values = loaded.frame.values(&self.config.trend_date_column);
                if values.is_none() {
                    log::debug!(
                        "Sheet '{}' has no '{}' column, skipped in the trend",
                        loaded.sheet.sheet,
                        self.config.trend_date_column
                    );
                }
                Some(TrendSeries {
                    label: loaded.sheet.label.to_owned(),
                    points: monthly_counts(values?),
                })
            })
            .collect()
    }
}
