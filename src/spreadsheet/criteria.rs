/// Bounds on how much of a sheet is read, and how error cells are treated.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Maximum number of rows to read, counted from the first row of the sheet.
    pub rows_limit: Option<usize>,

    /// Read error cells (`#N/A`, `#DIV/0!`...) as empty instead of failing.
    pub error_as_null: bool,
}

impl Criteria {
    /// Whether a 0-based row lies beyond the rows limit.
    pub(crate) fn exceeds_rows_limit(&self, row: usize) -> bool {
        self.rows_limit.map(|limit| row >= limit).unwrap_or(false)
    }
}
