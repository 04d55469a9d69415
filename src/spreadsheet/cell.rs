use crate::frame::Value;
use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Plain numeric values
    Number,
    /// Date/time values stored as serial numbers from the 1900 epoch
    NumberDateTime1900,
    /// Date values stored as serial numbers from the 1900 epoch
    NumberDate1900,
    /// Time values stored as day fractions (1900 workbooks)
    NumberTime1900,
    /// Date/time values stored as serial numbers from the 1904 epoch
    NumberDateTime1904,
    /// Date values stored as serial numbers from the 1904 epoch
    NumberDate1904,
    /// Time values stored as day fractions (1904 workbooks)
    NumberTime1904,
    /// ISO 8601 date/time strings (`t="d"`)
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    /// Maps built-in Excel number format ids to date/time cell types.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Classifies a custom number format code by the date and time tokens it uses.
    /// Quoted literals, escaped characters and bracketed sections (colors, locales) are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    fn is_1904(&self) -> bool {
        matches!(self, Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904)
    }
}

/// A single cell as read from a worksheet part.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw cell content; for shared strings, the index into the shared string table
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    fn to_double(&self) -> Result<f64, String> {
        self.value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    /// Converts a serial date number to a timestamp.
    /// The 1900 system carries the Lotus 1-2-3 leap year bug: serial 60 is the nonexistent
    /// 1900-02-29, so serials below it are shifted by one day.
    fn to_datetime(&self) -> Result<NaiveDateTime, String> {
        let out_of_range = || format!("serial '{}' is out of range", self.value);
        let serial = self.to_double()?;
        if !serial.is_finite() {
            return Err(out_of_range());
        }
        let days = serial.trunc() as i64;
        let offset = if self.kind.is_1904() {
            1_462
        } else if days < 60 {
            1
        } else {
            0
        };
        let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| "invalid epoch".to_owned())?;
        days.checked_add(offset)
            .and_then(Duration::try_days)
            .and_then(|days| epoch.checked_add_signed(days))
            .zip(Duration::try_milliseconds(milliseconds))
            .and_then(|(datetime, milliseconds)| datetime.checked_add_signed(milliseconds))
            .ok_or_else(out_of_range)
    }

    /// Serial dates beyond the calendar stay numbers.
    fn to_date_value(&self) -> Result<Value, String> {
        match self.to_datetime() {
            Ok(datetime) => Ok(Value::Date(datetime)),
            Err(_) => Ok(Value::Number(self.to_double()?)),
        }
    }

    /// Formats a day fraction as `HH:MM:SS`.
    fn to_time_string(&self) -> Result<String, String> {
        let mut seconds = (self.to_double()?.fract() * 86_400f64).round() as i64;
        let hours = seconds / 3_600;
        seconds %= 3_600;
        Ok(format!("{hours:02}:{:02}:{:02}", seconds / 60, seconds % 60))
    }

    fn parse_iso_datetime(&self) -> Option<NaiveDateTime> {
        let value = self.value.trim();
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Converts the raw cell into a typed [`Value`], resolving shared strings.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Result<Value, String> {
        let value = match self.kind {
            CellType::Empty | CellType::Error => Value::Empty,
            CellType::Boolean => Value::Bool(self.value.trim() == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => Value::Number(self.to_double()?),
            CellType::NumberDateTime1900
            | CellType::NumberDateTime1904
            | CellType::NumberDate1900
            | CellType::NumberDate1904 => self.to_date_value()?,
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                // Time with a date part is a full timestamp in disguise
                if self.to_double()? >= 1.0 {
                    self.to_date_value()?
                } else {
                    Value::Text(self.to_time_string()?)
                }
            }
            CellType::IsoDateTime => match self.parse_iso_datetime() {
                Some(datetime) => Value::Date(datetime),
                None => Value::Text(self.value.to_owned()),
            },
            CellType::InlineString => Value::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self
                    .value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid shared string index '{}'", self.value))?;
                let text = shared_strings
                    .get(index)
                    .ok_or_else(|| format!("shared string {index} does not exist"))?;
                Value::Text(text.to_owned())
            }
        };
        Ok(value)
    }
}
