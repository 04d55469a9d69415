use crate::frame::Value;

/// Non-empty values of one worksheet, in the order they were read, with the last row holding one.
#[derive(Clone, Debug)]
pub struct Sheet {
    /// Source file name
    pub file_name: String,
    /// Sheet name
    pub name: String,
    /// (row, column, value) of every non-empty cell
    pub(crate) entries: Vec<(usize, usize, Value)>,
    /// Last row holding a value (0-based)
    pub(crate) row_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            entries: Vec::new(),
            row_upper_bound: None,
        }
    }

    /// Returns true if the sheet holds no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a value, extending the row bound.
    pub(crate) fn push(&mut self, row: usize, col: usize, value: Value) {
        if matches!(value, Value::Empty) {
            return;
        }
        self.row_upper_bound = Some(self.row_upper_bound.map_or(row, |bound| bound.max(row)));
        self.entries.push((row, col, value));
    }

    /// Lays the values out as rows anchored at A1.
    /// Each row is as wide as its last value; rows without values are empty.
    pub fn rows(&self) -> Vec<Vec<Value>> {
        let Some(row_upper) = self.row_upper_bound else {
            return Vec::new();
        };
        let mut grid = vec![Vec::<Value>::new(); row_upper + 1];
        for (row, col, value) in &self.entries {
            let cells = &mut grid[*row];
            if cells.len() <= *col {
                cells.resize(*col + 1, Value::Empty);
            }
            cells[*col] = value.to_owned();
        }
        grid
    }
}
