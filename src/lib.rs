pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod error;
pub mod loader;
pub mod session;
pub mod table;
pub mod value;

use std::{collections::HashSet, env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    chart::ChartFeed,
    cli::{AnalyzeArgs, ChartsArgs, Cli, ColumnsArgs, Commands, PreviewArgs},
    error::TallyError,
    loader::LoadOptions,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_tally", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => handle_analyze(&args),
        Commands::Charts(args) => handle_charts(&args),
        Commands::Columns(args) => handle_columns(&args),
        Commands::Preview(args) => handle_preview(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
        raw_text: args.raw,
        row_limit: (args.limit > 0).then_some(args.limit),
    };
    let dataset = loader::load_dataset(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let report = aggregate::tabulate(&dataset, args.fields)
        .with_context(|| format!("Tabulating {:?}", args.input))?;

    let columns = resolve_columns(report.fields(), &args.columns)?;
    let mut rows = Vec::new();
    for column in &columns {
        rows.extend(report.render_rows(column, args.top));
    }
    let headers = vec![
        "column".to_string(),
        "value".to_string(),
        "count".to_string(),
        "percent".to_string(),
    ];
    table::print_table(&headers, &rows);
    info!(
        "Tabulated {} column(s) across {} row(s) from {:?}",
        columns.len(),
        report.row_count(),
        args.input
    );
    Ok(())
}

fn handle_charts(args: &ChartsArgs) -> Result<()> {
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
        raw_text: args.raw,
        row_limit: (args.limit > 0).then_some(args.limit),
    };
    let dataset = loader::load_dataset(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let report = aggregate::tabulate(&dataset, args.fields)
        .with_context(|| format!("Tabulating {:?}", args.input))?;

    let mut feed = ChartFeed::from_report(&report, args.kind);
    if let Some(only) = &args.only {
        feed = feed.only(only)?;
    }
    let json = feed.to_json().context("Serializing chart feed")?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Writing chart feed to {path:?}"))?;
            info!(
                "Wrote {} chart(s) across {} column(s) to {:?}",
                feed.charts.len(),
                feed.fields.len(),
                path
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_columns(args: &ColumnsArgs) -> Result<()> {
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
        ..LoadOptions::default()
    };
    let dataset = loader::load_dataset(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let fields = aggregate::field_names(&dataset, args.fields)
        .with_context(|| format!("Deriving columns from {:?}", args.input))?;

    let rows = fields
        .iter()
        .enumerate()
        .map(|(idx, name)| vec![(idx + 1).to_string(), name.clone()])
        .collect::<Vec<_>>();
    let headers = vec!["#".to_string(), "column".to_string()];
    table::print_table(&headers, &rows);
    info!("Listed {} column(s) from {:?}", fields.len(), args.input);
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
        row_limit: Some(args.rows),
        ..LoadOptions::default()
    };
    let dataset = loader::load_dataset(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;

    let headers = dataset.headers().to_vec();
    let rows = dataset
        .rows()
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|field| {
                    row.get(field)
                        .map(|value| value.to_string())
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!("Displayed {} row(s) from {:?}", rows.len(), args.input);
    Ok(())
}

fn resolve_columns(available: &[String], specified: &[String]) -> Result<Vec<String>, TallyError> {
    if specified.is_empty() {
        return Ok(available.to_vec());
    }
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for name in specified {
        if !available.iter().any(|field| field == name) {
            return Err(TallyError::UnknownColumn(name.clone()));
        }
        if seen.insert(name.clone()) {
            columns.push(name.clone());
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_columns_defaults_to_all_and_rejects_unknown_names() {
        let available = vec!["a".to_string(), "b".to_string()];
        assert_eq!(resolve_columns(&available, &[]).unwrap(), available);
        assert_eq!(
            resolve_columns(&available, &["b".to_string()]).unwrap(),
            ["b"]
        );
        assert_eq!(
            resolve_columns(&available, &["b".to_string(), "b".to_string()]).unwrap(),
            ["b"]
        );
        assert!(matches!(
            resolve_columns(&available, &["c".to_string()]),
            Err(TallyError::UnknownColumn(name)) if name == "c"
        ));
    }
}
