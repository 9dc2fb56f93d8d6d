//! In-memory ticket table and the loader that fills it.
//!
//! Every supported format ends up in the same shape: ordered, named columns
//! of optional [`Cell`]s. Delimited text is read here with the `csv` crate,
//! spreadsheet containers are delegated to [`crate::office`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use log::info;

use crate::error::{InsightsError, Result};
use crate::office;

/// File extensions the loader knows how to dispatch.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "xlsx", "xls", "ods", "numbers"];

/// Cell contents that are read as "no value".
const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Builds a text cell, mapping null markers to `None`.
    pub fn from_text(raw: &str) -> Option<Cell> {
        if NULL_MARKERS.contains(&raw.trim()) {
            None
        } else {
            Some(Cell::Text(raw.to_string()))
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<Cell>>,
}

impl Column {
    /// Cells that carry a value, in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &Cell> {
        self.values.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Assembles a table from a header row and data rows.
    ///
    /// Short rows are padded with nulls, rows wider than the header get
    /// `Unnamed: <index>` columns, blank header names are named the same way
    /// and duplicate names are suffixed `.1`, `.2`, ... Every row is kept,
    /// including rows where all cells are null.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<Option<Cell>>>) -> Table {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let names = normalize_header(header, width);
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        let row_count = rows.len();
        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().flatten());
            }
        }

        Table {
            columns,
            rows: row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Display strings of the non-null cells of `name`.
    pub fn text_values(&self, name: &str) -> Option<Vec<String>> {
        self.column(name)
            .map(|c| c.non_null().map(Cell::to_string).collect())
    }
}

fn normalize_header(header: Vec<String>, width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(width);
    let mut raw = header.into_iter();

    for index in 0..width {
        let base = match raw.next() {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("Unnamed: {index}"),
        };
        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{base}.{count}");
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }
    names
}

/// Loads a ticket export, dispatching on the file extension.
pub fn load_table(path: &Path) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => read_delimited(path, b',')?,
        "tsv" => read_delimited(path, b'\t')?,
        "xlsx" => office::read_xlsx(path).map_err(|e| InsightsError::parse(path, e))?,
        "xls" => office::read_xls(path).map_err(|e| InsightsError::parse(path, e))?,
        "ods" => office::read_ods(path).map_err(|e| InsightsError::parse(path, e))?,
        "numbers" => office::read_numbers(path).map_err(|e| InsightsError::parse(path, e))?,
        _ => {
            return Err(InsightsError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            });
        }
    };

    info!(
        "Loaded {} tickets from {} (columns: {})",
        table.row_count(),
        path.display(),
        table.column_names().join(", ")
    );
    Ok(table)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| InsightsError::parse(path, e.to_string()))?;

    let mut records = reader.byte_records();
    let header: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| InsightsError::parse(path, e.to_string()))?
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let name = String::from_utf8_lossy(field);
                if i == 0 {
                    name.trim_start_matches('\u{feff}').to_string()
                } else {
                    name.into_owned()
                }
            })
            .collect(),
        None => return Err(InsightsError::parse(path, "no columns to parse from file")),
    };

    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record.map_err(|e| InsightsError::parse(path, e.to_string()))?;
        if record.len() > header.len() {
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2);
            return Err(InsightsError::parse(
                path,
                format!(
                    "line {line}: expected {} fields, saw {}",
                    header.len(),
                    record.len()
                ),
            ));
        }
        rows.push(
            record
                .iter()
                .map(|field| Cell::from_text(&String::from_utf8_lossy(field)))
                .collect(),
        );
    }

    Ok(Table::from_rows(header, rows))
}
