use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Display;

/// Date layouts accepted for text cells, tried in order
const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%d %b %Y", "%b %d, %Y"];
const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M:%S"];

/// A scalar read from a spreadsheet cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing cell
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

/// Blank test used everywhere a cell must be checked for emptiness: missing, NaN, or text that
/// trims to "", "nan" or "none" (case-insensitive).
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Empty => true,
        Value::Number(number) => number.is_nan(),
        Value::Text(text) => {
            let text = text.trim();
            text.is_empty() || text.eq_ignore_ascii_case("nan") || text.eq_ignore_ascii_case("none")
        }
        Value::Bool(_) | Value::Date(_) => false,
    }
}

impl Value {
    pub fn is_blank(&self) -> bool {
        is_blank(self)
    }

    /// True for text-typed cells, whatever their content.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Trimmed string form, `None` when blank.
    pub fn to_trimmed(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string().trim().to_owned())
        }
    }

    /// Trimmed, lower-cased string form used for keyword matching.
    pub fn to_normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }

    /// Calendar date of the cell: native dates, or text in one of the accepted layouts.
    /// Numbers are not treated as dates unless the workbook formatted them as such.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(datetime) => Some(datetime.date()),
            Value::Text(text) => {
                let text = text.trim();
                DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                    .or_else(|| {
                        DATETIME_FORMATS
                            .iter()
                            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                            .map(|datetime| datetime.date())
                    })
            }
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(value) => write!(f, "{}", if *value { "TRUE" } else { "FALSE" }),
            Value::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => write!(f, "{}", *value as i64),
            Value::Number(value) => write!(f, "{}", value),
            Value::Text(value) => write!(f, "{}", value),
            Value::Date(value) if value.time() == chrono::NaiveTime::MIN => write!(f, "{}", value.format("%Y-%m-%d")),
            Value::Date(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Empty)
    }
}
