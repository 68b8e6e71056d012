//! Spreadsheet loading: CSV via the `csv` crate with `encoding_rs`
//! decoding, Excel workbooks via `calamine`.
//!
//! The loader owns the validation gate: only `.csv`, `.xlsx`, and `.xls`
//! inputs are accepted, and the extension decides the parser. Both paths
//! produce the same [`Dataset`] of field-keyed rows:
//!
//! - CSV cells are always present; an empty cell is the empty text value.
//!   Cells are type-inferred unless `raw_text` is set.
//! - Excel cells arrive typed from the workbook; an empty cell is *absent*
//!   from the row, so it later tabulates under the missing-value category.

use std::{fs::File, io::BufReader, path::Path};

use calamine::{Data, Reader as _, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{error::TallyError, value::Value};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    /// Maps a file extension onto a parser. The accepted extensions are
    /// the crate's one bit-exact external contract.
    pub fn from_path(path: &Path) -> Result<Self, TallyError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(SheetFormat::Csv),
            Some("xlsx") | Some("xls") => Ok(SheetFormat::Workbook),
            _ => Err(TallyError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// One record of the input, as ordered field/value pairs. Lookup is
/// linear; row widths are small enough that a map per row is not worth
/// the allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(field, value)| (field.into(), value))
                .collect(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.cells.push((field.into(), value));
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Header names as declared by the file, independent of any field
    /// policy applied during tabulation.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// CSV delimiter override; defaults to a comma.
    pub delimiter: Option<u8>,
    /// Encoding label for CSV input; defaults to UTF-8.
    pub encoding: Option<String>,
    /// Keep CSV cells as text instead of inferring numeric types.
    pub raw_text: bool,
    /// Stop reading after this many data rows.
    pub row_limit: Option<usize>,
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset, TallyError> {
    match SheetFormat::from_path(path)? {
        SheetFormat::Csv => load_csv(path, options),
        SheetFormat::Workbook => load_workbook(path, options),
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, TallyError> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| TallyError::UnknownEncoding(value.to_string())),
        None => Ok(UTF_8),
    }
}

fn load_csv(path: &Path, options: &LoadOptions) -> Result<Dataset, TallyError> {
    let delimiter = options.delimiter.unwrap_or(DEFAULT_CSV_DELIMITER);
    let encoding = resolve_encoding(options.encoding.as_deref())?;
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = decode_record(&reader.byte_headers()?.clone(), encoding)?;
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        if let Some(limit) = options.row_limit
            && row_idx >= limit
        {
            break;
        }
        let record = record?;
        let decoded = decode_record(&record, encoding)?;
        let mut row = Row::default();
        // A short record leaves the trailing fields absent; surplus cells
        // beyond the header width have no field name and are dropped.
        for (field, raw) in headers.iter().zip(decoded.iter()) {
            let value = if options.raw_text {
                Value::Text(raw.clone())
            } else {
                Value::infer(raw)
            };
            row.push(field.clone(), value);
        }
        rows.push(row);
    }
    debug!("Loaded {} row(s) from CSV {path:?}", rows.len());
    Ok(Dataset::new(headers, rows))
}

fn load_workbook(path: &Path, options: &LoadOptions) -> Result<Dataset, TallyError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(TallyError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|cells| cells.iter().map(cell_label).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for (row_idx, sheet_row) in sheet_rows.enumerate() {
        if let Some(limit) = options.row_limit
            && row_idx >= limit
        {
            break;
        }
        let mut row = Row::default();
        for (field, cell) in headers.iter().zip(sheet_row.iter()) {
            if let Some(value) = cell_value(cell) {
                row.push(field.clone(), value);
            }
        }
        rows.push(row);
    }
    debug!(
        "Loaded {} row(s) from sheet '{sheet}' in {path:?}",
        rows.len()
    );
    Ok(Dataset::new(headers, rows))
}

fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>, TallyError> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                Err(TallyError::Decode(encoding.name()))
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}

fn cell_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => cell_value(other)
            .map(|value| value.to_string())
            .unwrap_or_default(),
    }
}

/// Converts a workbook cell into a typed value; `None` for empty cells,
/// which are treated as absent fields rather than empty text.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) => Some(float_value(*f)),
        Data::Bool(b) => Some(Value::Boolean(*b)),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(Value::DateTime)
                .unwrap_or(Value::Float(dt.as_f64())),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::Text(s.clone())),
        Data::Error(e) => Some(Value::Text(format!("{e:?}"))),
    }
}

/// Workbooks store integers as floats; narrow them back so a spreadsheet
/// `1` and a CSV `1` land on the same histogram key.
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Value::Integer(f as i64)
    } else {
        Value::Float(f)
    }
}
