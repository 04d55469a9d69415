//! # Normalized frames
//!
//! A [`Frame`] is one worksheet reduced to a rectangular table: a detected header row supplies
//! trimmed column names, and entirely blank columns and rows are removed.
pub mod header;
pub mod loader;
pub mod value;

pub use value::is_blank;
pub use value::Value;

use std::collections::BTreeSet;
use thiserror::Error;

const EMPTY: &Value = &Value::Empty;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumnError { sheet: String, column: String },
}

/// A worksheet table with string column names.
/// Duplicate column names are kept; lookups by name resolve to the leftmost one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub sheet: String,
    pub columns: Vec<String>,
    /// Data rows, as wide as `columns` when built by [`Frame::from_rows`]; lookups tolerate
    /// shorter rows
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Builds a frame from a raw grid, using row `header_index` as the header.
    /// Rows above the header are discarded.
    pub fn from_rows(sheet: &str, mut grid: Vec<Vec<Value>>, header_index: usize) -> Frame {
        if header_index >= grid.len() {
            return Frame {
                sheet: sheet.to_owned(),
                ..Frame::default()
            };
        }
        let data = grid.split_off(header_index + 1);
        let header = grid.pop().unwrap_or_default();

        // Only populated cells are visited; rows may be ragged
        let kept: Vec<usize> = data
            .iter()
            .flat_map(|row| row.iter().enumerate().filter(|(_, value)| !value.is_blank()).map(|(col, _)| col))
            .collect::<BTreeSet<usize>>()
            .into_iter()
            .collect();
        let columns = kept
            .iter()
            .map(|col| match header.get(*col) {
                Some(name) if !name.is_blank() => name.to_string().trim().to_owned(),
                _ => format!("Unnamed: {col}"),
            })
            .collect();
        let rows = data
            .into_iter()
            .filter(|row| row.iter().any(|value| !value.is_blank()))
            .map(|row| {
                kept.iter()
                    .map(|col| row.get(*col).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Frame {
            sheet: sheet.to_owned(),
            columns,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column named exactly `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// First column, left to right, whose lower-cased trimmed name contains any of the keywords
    pub fn find_column<S: AsRef<str>>(&self, keywords: &[S]) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| {
                let name = column.trim().to_lowercase();
                keywords
                    .iter()
                    .any(|keyword| name.contains(&keyword.as_ref().to_lowercase()))
            })
            .map(String::as_str)
    }

    /// Like [`Frame::find_column`], but a missing column is an error named after `label`
    pub fn require_column<S: AsRef<str>>(&self, keywords: &[S], label: &str) -> Result<&str, FrameError> {
        self.find_column(keywords).ok_or_else(|| FrameError::MissingColumnError {
            sheet: self.sheet.to_owned(),
            column: label.to_owned(),
        })
    }

    /// Values of the column named `name`, top to bottom
    pub fn values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(index).unwrap_or(EMPTY)))
    }

    /// Value at (`row`, `column`), `Empty` when the column does not exist
    pub(crate) fn cell(&self, row: usize, column: Option<usize>) -> &Value {
        match column {
            Some(column) => self.rows.get(row).and_then(|values| values.get(column)).unwrap_or(EMPTY),
            None => EMPTY,
        }
    }
}
