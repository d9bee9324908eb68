//! Reading and writing `Factor`s as delimited tables.
//!
//! A table is a header row of column names followed by one record per row. The last column is
//! always the weight column; every other column is a variable of the `Factor`'s scope. No index
//! column is written.

use crate::util::{Result, SumoutError};

use log::debug;

use std::fs::File;
use std::io;
use std::path::Path;

/// The conventional name of the weight column
pub const DEFAULT_WEIGHT_COLUMN: &str = "Value";

/// The number of rows shown by a preview unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 5;


/// How tables are read and written
#[derive(Clone, Debug, PartialEq)]
pub struct TableFormat {
    /// Field delimiter
    delimiter: u8,

    /// Name of the reserved weight column. Loading fails if the last column has another name.
    weight_column: String,

    /// Number of rows shown by `Factor::head_with`
    preview_rows: usize
}

impl Default for TableFormat {

    fn default() -> Self {
        TableFormat {
            delimiter: b',',
            weight_column: String::from(DEFAULT_WEIGHT_COLUMN),
            preview_rows: DEFAULT_PREVIEW_ROWS
        }
    }

}

impl TableFormat {

    pub fn new() -> Self {
        TableFormat::default()
    }

    /// Tab-separated tables
    pub fn tsv() -> Self {
        TableFormat::default().with_delimiter(b'\t')
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_weight_column(mut self, name: &str) -> Self {
        self.weight_column = String::from(name);
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn weight_column(&self) -> &str {
        &self.weight_column
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

}


/// Raw tabular data: named columns and string records. The last column holds the weights.
#[derive(Clone, Debug, PartialEq)]
pub struct TabularData {
    /// Column names, weight column last
    pub columns: Vec<String>,

    /// One record per row, each with one field per column
    pub records: Vec<Vec<String>>
}

impl TabularData {

    pub fn new(columns: Vec<String>, records: Vec<Vec<String>>) -> Self {
        TabularData { columns, records }
    }

    /// The first `n` records
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        head_preview(&self.records, n)
    }

}


/// Read a table from `reader`.
///
/// # Errors
/// * `SumoutError::Io` if the reader fails
/// * `SumoutError::Format` if the table has no header, a record has the wrong number of fields,
///   or the last column is not the configured weight column
pub fn load<R: io::Read>(reader: R, format: &TableFormat) -> Result<TabularData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    match columns.last() {
        None => {
            return Err(SumoutError::Format(String::from("table has no header row")));
        },
        Some(last) if *last != format.weight_column => {
            return Err(
                SumoutError::Format(
                    format!("last column is '{}', expected weight column '{}'", last, format.weight_column)
                )
            );
        },
        _ => ()
    }

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(String::from).collect());
    }

    debug!("loaded table with {} columns and {} records", columns.len(), records.len());
    Ok(TabularData { columns, records })
}


/// Read a table from the file at `path`
pub fn load_path<P: AsRef<Path>>(path: P, format: &TableFormat) -> Result<TabularData> {
    let file = File::open(path.as_ref())?;
    load(file, format)
}


/// Write `data` to `writer`, header first. The exact inverse of `load`.
pub fn save<W: io::Write>(data: &TabularData, writer: W, format: &TableFormat) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter)
        .from_writer(writer);

    writer.write_record(&data.columns)?;
    for record in data.records.iter() {
        writer.write_record(record)?;
    }
    writer.flush()?;

    debug!("saved table with {} columns and {} records", data.columns.len(), data.records.len());
    Ok(())
}


/// Write `data` to the file at `path`, replacing it if it exists
pub fn save_path<P: AsRef<Path>>(data: &TabularData, path: P, format: &TableFormat) -> Result<()> {
    let file = File::create(path.as_ref())?;
    save(data, file, format)
}


/// The first `n` of `rows`, for display
pub fn head_preview<T>(rows: &[T], n: usize) -> &[T] {
    &rows[..n.min(rows.len())]
}
