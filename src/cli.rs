use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{aggregate::FieldPolicy, chart::ChartKind};

#[derive(Debug, Parser)]
#[command(author, version, about = "Tabulate per-column value frequencies from spreadsheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tabulate value frequencies for every column and print them as a table
    Analyze(AnalyzeArgs),
    /// Emit a JSON chart feed (labels and parallel counts per column) for an external renderer
    Charts(ChartsArgs),
    /// List the column names a spreadsheet's charts would be built from
    Columns(ColumnsArgs),
    /// Preview the first few rows of a spreadsheet in a formatted table
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input spreadsheet (.csv, .xlsx, or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Columns to tabulate (defaults to all)
    #[arg(short = 'C', long = "columns", action = clap::ArgAction::Append)]
    pub columns: Vec<String>,
    /// How the column set is derived from the rows
    #[arg(long = "fields", value_enum, default_value = "first-row")]
    pub fields: FieldPolicy,
    /// Maximum distinct values to display per column (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,
    /// Maximum rows to read (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Treat every CSV cell as text instead of inferring numeric types
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    /// Input spreadsheet (.csv, .xlsx, or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Chart kind applied uniformly to every series
    #[arg(long, value_enum, default_value = "bar")]
    pub kind: ChartKind,
    /// Narrow the feed to exactly one column's chart
    #[arg(long)]
    pub only: Option<String>,
    /// How the column set is derived from the rows
    #[arg(long = "fields", value_enum, default_value = "first-row")]
    pub fields: FieldPolicy,
    /// Maximum rows to read (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Treat every CSV cell as text instead of inferring numeric types
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input spreadsheet (.csv, .xlsx, or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// How the column set is derived from the rows
    #[arg(long = "fields", value_enum, default_value = "first-row")]
    pub fields: FieldPolicy,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input spreadsheet (.csv, .xlsx, or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
