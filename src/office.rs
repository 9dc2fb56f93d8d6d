//! Spreadsheet containers: OOXML workbooks (`.xlsx`, zip-based `.xls`),
//! OpenDocument spreadsheets (`.ods`) and the best-effort `.numbers` fallback.
//!
//! All of them are zip archives holding XML, so reading is `zip` + `quick-xml`
//! event loops. Errors are plain strings; the loader wraps them into
//! `ParseFailure` together with the path.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};
use zip::ZipArchive;

use crate::table::{Cell, Table};

type Rows = Vec<Vec<Option<Cell>>>;

/// OLE2 compound document signature used by BIFF `.xls` files.
const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

pub fn read_xlsx(p: &Path) -> Result<Table, String> {
    let file = File::open(p).map_err(|e| format!("Open .xlsx failed: {e}"))?;
    let mut zip = ZipArchive::new(file).map_err(|e| format!("Open .xlsx zip failed: {e}"))?;
    read_ooxml_workbook(&mut zip)
}

/// `.xls` exports are frequently OOXML workbooks with the old extension.
/// Genuine BIFF binaries are rejected with a clear message.
pub fn read_xls(p: &Path) -> Result<Table, String> {
    let mut file = File::open(p).map_err(|e| format!("Open .xls failed: {e}"))?;
    let mut magic = [0u8; 8];
    let read = file
        .read(&mut magic)
        .map_err(|e| format!("Read .xls failed: {e}"))?;
    if read == magic.len() && magic == OLE2_MAGIC {
        return Err(
            "legacy binary (BIFF) .xls workbooks are not supported; re-save as .xlsx or .csv"
                .to_string(),
        );
    }
    file.rewind()
        .map_err(|e| format!("Read .xls failed: {e}"))?;
    let mut zip = ZipArchive::new(file).map_err(|e| format!("Open .xls zip failed: {e}"))?;
    read_ooxml_workbook(&mut zip)
}

pub fn read_ods(p: &Path) -> Result<Table, String> {
    let file = File::open(p).map_err(|e| format!("Open .ods failed: {e}"))?;
    let mut zip = ZipArchive::new(file).map_err(|e| format!("Open .ods zip failed: {e}"))?;
    let xml = read_entry(&mut zip, "content.xml")?.ok_or("Missing content.xml")?;
    rows_to_table(parse_ods_xml(&xml)?)
}

/// Best effort only: a `.numbers` package is tried as an OOXML workbook and
/// then as an OpenDocument spreadsheet. When both attempts fail the error
/// lists each of them.
pub fn read_numbers(p: &Path) -> Result<Table, String> {
    let file = File::open(p).map_err(|e| format!("Open .numbers failed: {e}"))?;
    let mut zip =
        ZipArchive::new(file).map_err(|e| format!("Open .numbers container failed: {e}"))?;

    let mut attempts = Vec::new();
    match read_ooxml_workbook(&mut zip) {
        Ok(table) => return Ok(table),
        Err(e) => attempts.push(format!("workbook reader: {e}")),
    }
    match read_entry(&mut zip, "content.xml") {
        Ok(Some(xml)) => match parse_ods_xml(&xml).and_then(rows_to_table) {
            Ok(table) => return Ok(table),
            Err(e) => attempts.push(format!("OpenDocument reader: {e}")),
        },
        Ok(None) => attempts.push("OpenDocument reader: Missing content.xml".to_string()),
        Err(e) => attempts.push(format!("OpenDocument reader: {e}")),
    }
    Err(format!(
        "no readable table in .numbers container ({})",
        attempts.join("; ")
    ))
}

/// Converts a spreadsheet serial date (1900 date system) to a timestamp.
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    // Serials below 60 predate the fictitious 1900-02-29.
    let serial = if serial < 60.0 { serial + 1.0 } else { serial };
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_days(days)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

// ---- OOXML ----

fn read_ooxml_workbook<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Table, String> {
    let workbook = read_entry(zip, "xl/workbook.xml")?.ok_or("Missing xl/workbook.xml")?;
    let sheet_path = match first_sheet_rel_id(&workbook)? {
        Some(rel_id) => match read_entry(zip, "xl/_rels/workbook.xml.rels")? {
            Some(rels) => relationship_target(&rels, &rel_id)?,
            None => None,
        },
        None => None,
    }
    .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());

    let shared = match read_entry(zip, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let date_styles = match read_entry(zip, "xl/styles.xml")? {
        Some(xml) => parse_date_styles(&xml)?,
        None => Vec::new(),
    };
    let sheet = read_entry(zip, &sheet_path)?.ok_or_else(|| format!("Missing {sheet_path}"))?;
    rows_to_table(parse_sheet_xml(&sheet, &shared, &date_styles)?)
}

fn first_sheet_rel_id(xml: &str) -> Result<Option<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if local_name(e.name().as_ref()) == b"sheet" => {
                return attr_value(&e, b"id");
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(format!("Parse workbook.xml failed: {e}")),
            _ => {}
        }
        buf.clear();
    }
}

fn relationship_target(xml: &str, rel_id: &str) -> Result<Option<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                if attr_value(&e, b"Id")?.as_deref() == Some(rel_id) {
                    return Ok(attr_value(&e, b"Target")?.map(|target| {
                        match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{target}"),
                        }
                    }));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(format!("Parse workbook rels failed: {e}")),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"si" => current.clear(),
                b"rPh" => in_phonetic = true,
                b"t" => in_text = !in_phonetic,
                _ => {}
            },
            Ok(Event::Empty(e)) if local_name(e.name().as_ref()) == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => push_text(&mut current, &t)?,
            Ok(Event::GeneralRef(r)) if in_text => push_entity(&mut current, &r)?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("Parse sharedStrings.xml failed: {e}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// One flag per `cellXfs` entry: does that style render numbers as dates?
fn parse_date_styles(xml: &str) -> Result<Vec<bool>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut custom: HashMap<u32, bool> = HashMap::new();
    let mut formats: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        let (e, is_empty) = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => (e, false),
            Ok(Event::Empty(e)) => (e, true),
            Ok(Event::End(e)) => {
                if local_name(e.name().as_ref()) == b"cellXfs" {
                    in_cell_xfs = false;
                }
                buf.clear();
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("Parse styles.xml failed: {e}")),
            _ => {
                buf.clear();
                continue;
            }
        };
        match local_name(e.name().as_ref()) {
            b"numFmt" => {
                let id = attr_value(&e, b"numFmtId")?.and_then(|v| v.parse().ok());
                let code = attr_value(&e, b"formatCode")?;
                if let (Some(id), Some(code)) = (id, code) {
                    custom.insert(id, is_date_format(&code));
                }
            }
            b"cellXfs" if !is_empty => in_cell_xfs = true,
            b"xf" if in_cell_xfs => {
                let id = attr_value(&e, b"numFmtId")?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                formats.push(id);
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(formats
        .into_iter()
        .map(|id| {
            custom
                .get(&id)
                .copied()
                .unwrap_or(matches!(id, 14..=22 | 27..=36 | 45..=47 | 50..=58))
        })
        .collect())
}

fn is_date_format(code: &str) -> bool {
    let mut plain = String::with_capacity(code.len());
    let mut in_quotes = false;
    let mut in_brackets = false;
    for ch in code.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            _ if !in_quotes && !in_brackets => plain.push(ch.to_ascii_lowercase()),
            _ => {}
        }
    }
    plain != "general" && plain.chars().any(|c| matches!(c, 'y' | 'm' | 'd' | 'h' | 's'))
}

#[derive(Default)]
struct PendingCell {
    column: usize,
    kind: String,
    style: usize,
    value: String,
}

fn parse_sheet_xml(xml: &str, shared: &[String], date_styles: &[bool]) -> Result<Rows, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rows: Rows = Vec::new();
    let mut row: Vec<Option<Cell>> = Vec::new();
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"row" => row.clear(),
                b"c" => {
                    let column = match attr_value(&e, b"r")? {
                        Some(r) => column_index(&r)?.unwrap_or(row.len()),
                        None => row.len(),
                    };
                    cell = Some(PendingCell {
                        column,
                        kind: attr_value(&e, b"t")?.unwrap_or_default(),
                        style: attr_value(&e, b"s")?
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(0),
                        value: String::new(),
                    });
                }
                b"rPh" => in_phonetic = true,
                b"v" | b"t" => in_value = cell.is_some() && !in_phonetic,
                _ => {}
            },
            Ok(Event::Empty(e)) if local_name(e.name().as_ref()) == b"row" => {
                rows.push(Vec::new());
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"row" => rows.push(std::mem::take(&mut row)),
                b"c" => {
                    if let Some(done) = cell.take() {
                        let value = convert_ooxml_cell(&done, shared, date_styles)?;
                        if row.len() <= done.column {
                            row.resize(done.column + 1, None);
                        }
                        row[done.column] = value;
                    }
                }
                b"rPh" => in_phonetic = false,
                b"v" | b"t" => in_value = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_value => {
                if let Some(c) = cell.as_mut() {
                    push_text(&mut c.value, &t)?;
                }
            }
            Ok(Event::GeneralRef(r)) if in_value => {
                if let Some(c) = cell.as_mut() {
                    push_entity(&mut c.value, &r)?;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("Parse worksheet XML failed: {e}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

fn convert_ooxml_cell(
    cell: &PendingCell,
    shared: &[String],
    date_styles: &[bool],
) -> Result<Option<Cell>, String> {
    let value = cell.value.as_str();
    Ok(match cell.kind.as_str() {
        "s" => {
            let index: usize = value
                .trim()
                .parse()
                .map_err(|_| format!("Bad shared string index '{value}'"))?;
            let text = shared
                .get(index)
                .ok_or_else(|| format!("Shared string {index} out of range"))?;
            Cell::from_text(text)
        }
        "b" => Some(Cell::Bool(value.trim() == "1")),
        "e" => None,
        "inlineStr" | "str" | "d" => Cell::from_text(value),
        _ if value.trim().is_empty() => None,
        _ => match value.trim().parse::<f64>() {
            Ok(n) if date_styles.get(cell.style).copied().unwrap_or(false) => Some(
                excel_serial_to_datetime(n).map_or(Cell::Number(n), Cell::DateTime),
            ),
            Ok(n) => Some(Cell::Number(n)),
            Err(_) => Cell::from_text(value),
        },
    })
}

/// Columns in a worksheet, `A` through `XFD`.
const MAX_COLUMNS: usize = 16_384;

/// `"AB12"` -> 27. `None` when the reference has no column letters.
fn column_index(cell_ref: &str) -> Result<Option<usize>, String> {
    let letters: Vec<u8> = cell_ref
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return Ok(None);
    }
    let number = letters.iter().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?
            .checked_add(usize::from(b - b'A' + 1))
            .filter(|n| *n <= MAX_COLUMNS)
    });
    match number {
        Some(n) => Ok(Some(n - 1)),
        None => Err(format!("Cell reference {cell_ref} is past column XFD")),
    }
}

// ---- OpenDocument ----

#[derive(Default)]
struct OdsCell {
    value_type: Option<String>,
    value: Option<String>,
    date_value: Option<String>,
    boolean_value: Option<String>,
    repeat: usize,
    text: String,
    paragraphs: usize,
}

fn ods_cell_start(e: &BytesStart) -> Result<OdsCell, String> {
    Ok(OdsCell {
        value_type: attr_value(e, b"value-type")?,
        value: attr_value(e, b"value")?,
        date_value: attr_value(e, b"date-value")?,
        boolean_value: attr_value(e, b"boolean-value")?,
        repeat: repeat_count(e, b"number-columns-repeated")?,
        ..OdsCell::default()
    })
}

fn repeat_count(e: &BytesStart, key: &[u8]) -> Result<usize, String> {
    Ok(attr_value(e, key)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
        .max(1))
}

fn convert_ods_cell(cell: &OdsCell) -> Option<Cell> {
    match cell.value_type.as_deref() {
        Some("float" | "percentage" | "currency") => cell
            .value
            .as_deref()
            .and_then(|v| v.parse().ok())
            .map(Cell::Number)
            .or_else(|| Cell::from_text(&cell.text)),
        Some("date") => cell
            .date_value
            .as_deref()
            .and_then(parse_ods_date)
            .map(Cell::DateTime)
            .or_else(|| Cell::from_text(&cell.text)),
        Some("boolean") => cell
            .boolean_value
            .as_deref()
            .map(|v| Cell::Bool(v == "true")),
        _ => Cell::from_text(&cell.text),
    }
}

fn parse_ods_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_ods_xml(xml: &str) -> Result<Rows, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rows: Rows = Vec::new();
    let mut row: Vec<Option<Cell>> = Vec::new();
    let mut row_repeat = 1;
    let mut pending_empty = 0usize;
    let mut cell: Option<OdsCell> = None;
    let mut in_table = false;
    let mut in_paragraph = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("Parse .ods XML failed: {e}"))?;
        match event {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"table" => in_table = true,
                b"table-row" if in_table => {
                    row.clear();
                    pending_empty = 0;
                    row_repeat = repeat_count(&e, b"number-rows-repeated")?;
                }
                b"table-cell" | b"covered-table-cell" if in_table => {
                    cell = Some(ods_cell_start(&e)?);
                }
                b"p" => {
                    if let Some(c) = cell.as_mut() {
                        if c.paragraphs > 0 {
                            c.text.push('\n');
                        }
                        c.paragraphs += 1;
                        in_paragraph = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"table-cell" | b"covered-table-cell" if in_table => {
                    let empty = ods_cell_start(&e)?;
                    push_ods_cell(&mut row, &mut pending_empty, convert_ods_cell(&empty), empty.repeat);
                }
                b"s" if in_paragraph => {
                    if let Some(c) = cell.as_mut() {
                        let count = repeat_count(&e, b"c")?;
                        c.text.extend(std::iter::repeat_n(' ', count));
                    }
                }
                b"tab" if in_paragraph => {
                    if let Some(c) = cell.as_mut() {
                        c.text.push('\t');
                    }
                }
                b"line-break" if in_paragraph => {
                    if let Some(c) = cell.as_mut() {
                        c.text.push('\n');
                    }
                }
                _ => {}
            },
            Event::End(e) => match local_name(e.name().as_ref()) {
                // Only the first sheet is read.
                b"table" if in_table => break,
                b"table-row" if in_table => {
                    if row.is_empty() {
                        rows.push(Vec::new());
                    } else {
                        for _ in 0..row_repeat {
                            rows.push(row.clone());
                        }
                    }
                }
                b"table-cell" | b"covered-table-cell" => {
                    if let Some(done) = cell.take() {
                        push_ods_cell(&mut row, &mut pending_empty, convert_ods_cell(&done), done.repeat);
                    }
                }
                b"p" => in_paragraph = false,
                _ => {}
            },
            Event::Text(t) if in_paragraph => {
                if let Some(c) = cell.as_mut() {
                    push_text(&mut c.text, &t)?;
                }
            }
            Event::GeneralRef(r) if in_paragraph => {
                if let Some(c) = cell.as_mut() {
                    push_entity(&mut c.text, &r)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if rows.is_empty() && !in_table {
        return Err("No table:table element in content.xml".to_string());
    }
    Ok(rows)
}

/// Empty cells are only materialised once a value follows them, so trailing
/// `number-columns-repeated="1024"` padding never allocates.
fn push_ods_cell(
    row: &mut Vec<Option<Cell>>,
    pending_empty: &mut usize,
    value: Option<Cell>,
    repeat: usize,
) {
    match value {
        None => *pending_empty += repeat,
        Some(v) => {
            row.extend(std::iter::repeat_n(None, std::mem::take(pending_empty)));
            row.extend(std::iter::repeat_n(Some(v), repeat));
        }
    }
}

// ---- Internal helpers ----

fn rows_to_table(mut rows: Rows) -> Result<Table, String> {
    // Leading blank rows come before the header.
    let start = rows
        .iter()
        .position(|r| r.iter().any(Option::is_some))
        .ok_or("Sheet contains no data")?;
    let mut data = rows.split_off(start);
    let header_row = data.remove(0);
    // Sheets have no record separator; rows without any cell are padding.
    data.retain(|r| r.iter().any(Option::is_some));
    let header = header_row
        .into_iter()
        .map(|c| c.map(|c| c.to_string()).unwrap_or_default())
        .collect();
    Ok(Table::from_rows(header, data))
}

fn read_entry<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Result<Option<String>, String> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(format!("Open {name} failed: {e}")),
    };
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("Read {name} failed: {e}"))?;
    Ok(Some(xml))
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if local_name(attr.key.as_ref()) == key {
            let raw = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
            return Ok(Some(unescape(raw).map_err(|e| e.to_string())?.into_owned()));
        }
    }
    Ok(None)
}

fn push_text(out: &mut String, t: &BytesText) -> Result<(), String> {
    let raw = std::str::from_utf8(t).map_err(|e| e.to_string())?;
    out.push_str(&unescape(raw).map_err(|e| e.to_string())?);
    Ok(())
}

fn push_entity(out: &mut String, r: &BytesRef) -> Result<(), String> {
    if let Some(ch) = r.resolve_char_ref().map_err(|e| e.to_string())? {
        out.push(ch);
        return Ok(());
    }
    let name = std::str::from_utf8(r).map_err(|e| e.to_string())?;
    match resolve_predefined_entity(name) {
        Some(resolved) => out.push_str(resolved),
        None => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        }
    }
    Ok(())
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_index("A1"), Ok(Some(0)));
        assert_eq!(column_index("Z9"), Ok(Some(25)));
        assert_eq!(column_index("AB12"), Ok(Some(27)));
        assert_eq!(column_index("XFD1"), Ok(Some(16_383)));
        assert_eq!(column_index("12"), Ok(None));
    }

    #[test]
    fn column_letters_past_the_sheet_edge_are_rejected() {
        assert!(column_index("XFE1").is_err());
        let err = column_index("AAAAAAAAAAAAAAA1").unwrap_err();
        assert!(err.contains("past column XFD"));
    }

    #[test]
    fn serial_dates() {
        let dt = excel_serial_to_datetime(45352.5).unwrap();
        assert_eq!(dt.to_string(), "2024-03-01 12:00:00");
        assert!(excel_serial_to_datetime(-1.0).is_none());
    }

    #[test]
    fn date_format_detection() {
        assert!(is_date_format("yyyy-mm-dd"));
        assert!(is_date_format("[$-409]d-mmm-yy;@"));
        assert!(!is_date_format("0.00"));
        assert!(!is_date_format("\"day\" 0"));
        assert!(!is_date_format("General"));
    }

    #[test]
    fn sheet_with_gaps_and_types() {
        let xml = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="inlineStr"><is><t>Priority</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="b"><v>1</v></c><c r="C2"><v>2</v></c></row>
</sheetData></worksheet>"#;
        let shared = vec!["Subject".to_string(), "Tom & Jerry".to_string()];
        let rows = parse_sheet_xml(xml, &shared, &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], None);
        assert_eq!(rows[1][0], Some(Cell::Text("Tom & Jerry".to_string())));
        assert_eq!(rows[1][1], Some(Cell::Bool(true)));
        assert_eq!(rows[1][2], Some(Cell::Number(2.0)));
    }

    #[test]
    fn shared_strings_skip_phonetic_runs() {
        let xml = r#"<sst><si><t>Tom &amp; Jerry</t></si><si><r><t>Rich </t></r><r><t>text</t></r><rPh><t>x</t></rPh></si><si/></sst>"#;
        assert_eq!(
            parse_shared_strings(xml).unwrap(),
            vec!["Tom & Jerry".to_string(), "Rich text".to_string(), String::new()]
        );
    }

    #[test]
    fn styles_mark_date_xfs() {
        let xml = r#"<styleSheet>
<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy/mm/dd"/></numFmts>
<cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs>
<cellXfs count="4"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="164"/><xf numFmtId="2"/></cellXfs>
</styleSheet>"#;
        assert_eq!(
            parse_date_styles(xml).unwrap(),
            vec![false, true, true, false]
        );
    }

    #[test]
    fn ods_repeated_cells() {
        let xml = r#"<office:document-content
  xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
  xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
  xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
<office:body><office:spreadsheet><table:table table:name="Sheet1">
<table:table-row><table:table-cell office:value-type="string"><text:p>Status</text:p></table:table-cell><table:table-cell table:number-columns-repeated="1020"/></table:table-row>
<table:table-row table:number-rows-repeated="2"><table:table-cell office:value-type="string"><text:p>open</text:p></table:table-cell></table:table-row>
<table:table-row table:number-rows-repeated="1048570"><table:table-cell table:number-columns-repeated="1024"/></table:table-row>
</table:table></office:spreadsheet></office:body></office:document-content>"#;
        let rows = parse_ods_xml(xml).unwrap();
        let table = rows_to_table(rows).unwrap();
        assert_eq!(table.column_names(), vec!["Status"]);
        assert_eq!(table.row_count(), 2);
    }
}
