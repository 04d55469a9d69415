//! # Bank completion views
//!
//! Completion-tracking sheets list one site per row: a bank, an address, and any number of task
//! columns whose cells say whether the task is done, pending or not scheduled.
use crate::classify::Completion;
use crate::classify::Vocabulary;
use crate::config::ReportConfig;
use crate::error::RustyReportError;
use crate::frame::loader::load_sheet;
use crate::frame::Frame;
use crate::frame::Value;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashSet;

/// Column titles longer than this are shortened for chart captions
const TITLE_LIMIT: usize = 22;

/// Row positions of one task column, split by completion.
/// Rows whose cell is blank or unrecognised are in no subset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompletionSplit {
    pub done: Vec<usize>,
    pub pending: Vec<usize>,
    pub not_scheduled: Vec<usize>,
}

/// Splits the given rows of one column by completion state
pub fn split_by_completion(
    frame: &Frame,
    column: usize,
    rows: &[usize],
    vocabulary: &Vocabulary<Completion>,
) -> CompletionSplit {
    let mut split = CompletionSplit::default();
    for row in rows {
        match vocabulary.classify(frame.cell(*row, Some(column))) {
            Some(Completion::Done) => split.done.push(*row),
            Some(Completion::Pending) => split.pending.push(*row),
            Some(Completion::NotScheduled) => split.not_scheduled.push(*row),
            None => (),
        }
    }
    split
}

/// Done/pending counts of one task column (pie input)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionCount {
    pub column: String,
    /// Caption, shortened to the chart width
    pub title: String,
    pub done: usize,
    pub pending: usize,
    pub not_scheduled: usize,
}

impl CompletionCount {
    /// Nothing is done or pending; the chart shows "n/a"
    pub fn is_na(&self) -> bool {
        self.done + self.pending == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    /// Trimmed text, `None` when blank
    pub text: Option<String>,
    /// Completion state, for task columns only
    pub completion: Option<Completion>,
}

/// The filtered rows as display text
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompletionMatrix {
    pub columns: Vec<String>,
    pub bank_column: String,
    pub address_column: String,
    pub rows: Vec<Vec<MatrixCell>>,
}

/// Bank and address selection. An empty list selects every value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BankFilter {
    pub banks: Vec<String>,
    pub addresses: Vec<String>,
}

/// A completion sheet with its bank and address columns resolved
#[derive(Clone, Debug)]
pub struct BankSheet {
    frame: Frame,
    vocabulary: Vocabulary<Completion>,
    bank: usize,
    address: usize,
}

impl BankSheet {
    /// Loads a sheet. `None` when nothing remains after normalization, which is a valid
    /// "no data" state; a missing bank or address column is an error.
    pub fn load(path: &str, sheet_name: &str, config: &ReportConfig) -> Result<Option<BankSheet>, RustyReportError> {
        let frame = load_sheet(path, sheet_name, config)?;
        if frame.is_empty() {
            log::debug!("Sheet '{sheet_name}' has no data");
            return Ok(None);
        }
        Ok(Some(BankSheet::from_frame(frame, config)?))
    }

    /// Resolves the bank and address columns and trims their values, blank ones becoming empty
    pub fn from_frame(mut frame: Frame, config: &ReportConfig) -> Result<BankSheet, RustyReportError> {
        let bank_name = frame.require_column(&config.bank_columns, "bank")?.to_owned();
        let address_name = frame.require_column(&config.address_columns, "address")?.to_owned();
        let bank = frame.column_index(&bank_name).unwrap_or_default();
        let address = frame.column_index(&address_name).unwrap_or_default();
        for row in frame.rows.iter_mut() {
            for column in [bank, address] {
                if let Some(value) = row.get_mut(column) {
                    *value = Value::from(value.to_trimmed());
                }
            }
        }
        Ok(BankSheet {
            frame,
            vocabulary: config.completion.to_owned(),
            bank,
            address,
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn bank_column(&self) -> &str {
        &self.frame.columns[self.bank]
    }

    pub fn address_column(&self) -> &str {
        &self.frame.columns[self.address]
    }

    /// Sorted distinct non-blank banks
    pub fn bank_options(&self) -> Vec<String> {
        self.options(self.bank)
    }

    /// Sorted distinct non-blank addresses
    pub fn address_options(&self) -> Vec<String> {
        self.options(self.address)
    }

    fn options(&self, column: usize) -> Vec<String> {
        let values: BTreeSet<String> = (0..self.frame.len())
            .filter_map(|row| self.frame.cell(row, Some(column)).to_trimmed())
            .collect();
        values.into_iter().collect()
    }

    /// Positions of the rows whose bank and address are both selected.
    /// Rows with a blank bank or address never match.
    pub fn filter(&self, filter: &BankFilter) -> Vec<usize> {
        let banks = effective_selection(&filter.banks, self.bank_options());
        let addresses = effective_selection(&filter.addresses, self.address_options());
        (0..self.frame.len())
            .filter(|row| {
                let selected = |column: usize, values: &HashSet<String>| {
                    self.frame.cell(*row, Some(column)).to_trimmed().is_some_and(|value| values.contains(&value))
                };
                selected(self.bank, &banks) && selected(self.address, &addresses)
            })
            .collect()
    }

    /// Every column except bank and address, in sheet order
    pub fn task_columns(&self) -> Vec<(usize, &str)> {
        let excluded = [self.bank_column(), self.address_column()];
        self.frame
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !excluded.contains(&name.as_str()))
            .map(|(index, name)| (index, name.as_str()))
            .collect()
    }

    /// Completion counts of each task column over the given rows
    pub fn completion_pivot(&self, rows: &[usize]) -> Vec<CompletionCount> {
        self.task_columns()
            .into_iter()
            .map(|(index, name)| {
                let split = split_by_completion(&self.frame, index, rows, &self.vocabulary);
                CompletionCount {
                    column: name.to_owned(),
                    title: short_title(name),
                    done: split.done.len(),
                    pending: split.pending.len(),
                    not_scheduled: split.not_scheduled.len(),
                }
            })
            .collect()
    }

    /// The given rows as display text, task cells tagged with their completion state
    pub fn matrix(&self, rows: &[usize]) -> CompletionMatrix {
        let tasks: HashSet<usize> = self.task_columns().into_iter().map(|(index, _)| index).collect();
        CompletionMatrix {
            columns: self.frame.columns.to_owned(),
            bank_column: self.bank_column().to_owned(),
            address_column: self.address_column().to_owned(),
            rows: rows
                .iter()
                .map(|row| {
                    (0..self.frame.columns.len())
                        .map(|column| {
                            let value = self.frame.cell(*row, Some(column));
                            MatrixCell {
                                text: value.to_trimmed(),
                                completion: if tasks.contains(&column) {
                                    self.vocabulary.classify(value)
                                } else {
                                    None
                                },
                            }
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

fn effective_selection(selection: &[String], options: Vec<String>) -> HashSet<String> {
    if selection.is_empty() {
        options.into_iter().collect()
    } else {
        selection.iter().map(|value| value.trim().to_owned()).collect()
    }
}

fn short_title(name: &str) -> String {
    if name.chars().count() > TITLE_LIMIT {
        let mut title: String = name.chars().take(TITLE_LIMIT - 1).collect();
        title.push('…');
        title
    } else {
        name.to_owned()
    }
}
