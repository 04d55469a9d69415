use crate::frame::Value;
use std::collections::HashSet;

/// Picks the row most likely to hold column labels among the first `scan_limit` rows.
///
/// Rows with fewer than two non-blank cells never qualify. The others are scored by
/// [`header_score`]; the strictly highest score wins, so ties keep the earliest row.
/// Without any qualifying row the header is row 0.
pub fn detect_header_row(rows: &[Vec<Value>], scan_limit: usize) -> usize {
    let mut best_index = 0usize;
    let mut best_score = -1f64;
    for (index, row) in rows.iter().take(scan_limit).enumerate() {
        if let Some(score) = header_score(row) {
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }
    }
    best_index
}

/// `1.5 × non-blank + 2 × text cells + 3 × distinct ratio`, or `None` below two non-blank cells.
///
/// Label rows are wide, textual and free of repeats, which sets them apart from data rows and
/// from one-cell section titles.
pub(crate) fn header_score(row: &[Value]) -> Option<f64> {
    let non_blank: Vec<&Value> = row.iter().filter(|value| !value.is_blank()).collect();
    if non_blank.len() < 2 {
        return None;
    }
    let text_count = non_blank.iter().filter(|value| value.is_text()).count();
    let distinct: HashSet<String> = non_blank
        .iter()
        .map(|value| value.to_string().trim().to_owned())
        .collect();
    let count = non_blank.len() as f64;
    Some(1.5 * count + 2.0 * text_count as f64 + 3.0 * (distinct.len() as f64 / count))
}
