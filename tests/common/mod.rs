#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

// Style indexes written to styles.xml: general, built-in date (14), custom date-time (164)
const STYLE_DATE: usize = 1;
const STYLE_DATETIME: usize = 2;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A cell written by [`XlsxBuilder`]
#[derive(Clone, Debug)]
pub enum Cell {
    Empty,
    /// Shared string
    Text(String),
    Inline(String),
    Number(f64),
    Bool(bool),
    /// Serial date with a date-only number format
    Date(f64),
    /// Serial date with a date-time number format
    DateTime(f64),
    /// Error value such as `#N/A`
    Error(String),
}

/// Text cells from string literals; "" is an empty cell
pub fn row(values: &[&str]) -> Vec<Cell> {
    values
        .iter()
        .map(|value| if value.is_empty() { Cell::Empty } else { Cell::Text(value.to_string()) })
        .collect()
}

pub fn rows(values: &[&[&str]]) -> Vec<Vec<Cell>> {
    values.iter().map(|values| row(values)).collect()
}

struct SheetFixture {
    name: String,
    state: Option<String>,
    rows: Vec<Vec<Cell>>,
}

/// Writes minimal but well-formed xlsx packages
#[derive(Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetFixture>,
    date1904: bool,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push(SheetFixture {
            name: name.to_owned(),
            state: None,
            rows,
        });
        self
    }

    /// A sheet with a `state` attribute (`hidden`, `veryHidden`)
    pub fn sheet_with_state(mut self, name: &str, state: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push(SheetFixture {
            name: name.to_owned(),
            state: Some(state.to_owned()),
            rows,
        });
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Writes the workbook into `dir` and returns its path
    pub fn write(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        let mut shared_strings = Vec::<String>::new();
        let worksheets: Vec<String> = self
            .sheets
            .iter()
            .map(|sheet| worksheet_xml(&sheet.rows, &mut shared_strings))
            .collect();

        let mut put = |name: &str, content: String| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };
        put("[Content_Types].xml", self.content_types_xml());
        put(
            "_rels/.rels",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PACKAGE_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            ),
        );
        put("xl/workbook.xml", self.workbook_xml());
        put("xl/_rels/workbook.xml.rels", self.workbook_rels_xml());
        put("xl/styles.xml", styles_xml());
        put("xl/sharedStrings.xml", shared_strings_xml(&shared_strings));
        for (index, worksheet) in worksheets.into_iter().enumerate() {
            put(&format!("xl/worksheets/sheet{}.xml", index + 1), worksheet);
        }
        zip.finish().unwrap();
        path
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        for index in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{index}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#);
        if self.date1904 {
            xml.push_str(r#"<workbookPr date1904="1"/>"#);
        }
        xml.push_str("<sheets>");
        for (index, sheet) in self.sheets.iter().enumerate() {
            let state = sheet
                .state
                .as_ref()
                .map(|state| format!(r#" state="{state}""#))
                .unwrap_or_default();
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}"{state} r:id="rId{}"/>"#,
                escape(&sheet.name),
                index + 1,
                index + 1
            ));
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels_xml(&self) -> String {
        let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PACKAGE_REL_NS}">"#);
        for index in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{index}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{index}.xml"/>"#
            ));
        }
        let count = self.sheets.len();
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/><Relationship Id="rId{}" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#,
            count + 1,
            count + 2
        ));
        xml
    }
}

fn worksheet_xml(rows: &[Vec<Cell>], shared_strings: &mut Vec<String>) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{MAIN_NS}"><sheetData>"#);
    for (row_index, cells) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
        for (col_index, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letters(col_index), row_index + 1);
            let content = match cell {
                Cell::Empty => continue,
                Cell::Text(text) => {
                    let index = match shared_strings.iter().position(|it| it == text) {
                        Some(index) => index,
                        None => {
                            shared_strings.push(text.to_owned());
                            shared_strings.len() - 1
                        }
                    };
                    format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#)
                }
                Cell::Inline(text) => {
                    format!(r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#, escape(text))
                }
                Cell::Number(number) => format!(r#"<c r="{reference}"><v>{number}</v></c>"#),
                Cell::Bool(value) => format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*value)),
                Cell::Date(serial) => format!(r#"<c r="{reference}" s="{STYLE_DATE}"><v>{serial}</v></c>"#),
                Cell::DateTime(serial) => {
                    format!(r#"<c r="{reference}" s="{STYLE_DATETIME}"><v>{serial}</v></c>"#)
                }
                Cell::Error(value) => format!(r#"<c r="{reference}" t="e"><v>{}</v></c>"#, escape(value)),
            };
            xml.push_str(&content);
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="{MAIN_NS}"><numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd hh:mm"/></numFmts><cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" xfId="0"/><xf numFmtId="14" xfId="0" applyNumberFormat="1"/><xf numFmtId="164" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#
    )
}

fn shared_strings_xml(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{MAIN_NS}" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    );
    for string in strings {
        xml.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(string)));
    }
    xml.push_str("</sst>");
    xml
}

fn column_letters(index: usize) -> String {
    let mut letters = Vec::<u8>::new();
    let mut column = index + 1;
    while column > 0 {
        column -= 1;
        letters.push(b'A' + (column % 26) as u8);
        column /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Path of a workbook as the `&str` the library takes
pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
