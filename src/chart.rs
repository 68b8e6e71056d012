//! JSON chart feed for an external renderer.
//!
//! Each field becomes one series: the distinct value labels in
//! first-encounter order and the parallel counts. The chart kind is a
//! uniform tag across all series; swapping it re-tags the feed without
//! recomputing the aggregation. The full field list rides along even when
//! the feed is narrowed to a single chart, so a filter control can still
//! be populated from it.

use clap::ValueEnum;
use serde::Serialize;

use crate::{aggregate::FrequencyReport, error::TallyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub field: String,
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFeed {
    pub kind: ChartKind,
    pub fields: Vec<String>,
    pub charts: Vec<ChartSeries>,
}

impl ChartFeed {
    pub fn from_report(report: &FrequencyReport, kind: ChartKind) -> Self {
        let charts = report
            .fields()
            .iter()
            .filter_map(|field| {
                report.histogram(field).map(|histogram| {
                    let (labels, counts): (Vec<String>, Vec<u64>) = histogram
                        .iter()
                        .map(|(value, count)| (value.to_string(), count))
                        .unzip();
                    ChartSeries {
                        field: field.clone(),
                        labels,
                        counts,
                    }
                })
            })
            .collect();
        Self {
            kind,
            fields: report.fields().to_vec(),
            charts,
        }
    }

    /// Re-tags the feed with a different chart kind. The series data is
    /// reused as-is; no aggregation happens here.
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Narrows the feed to exactly one field's chart, keeping the full
    /// field list for filter controls.
    pub fn only(mut self, field: &str) -> Result<Self, TallyError> {
        if !self.fields.iter().any(|name| name == field) {
            return Err(TallyError::UnknownColumn(field.to_string()));
        }
        self.charts.retain(|series| series.field == field);
        Ok(self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
