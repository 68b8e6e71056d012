//! Column-wise frequency tabulation.
//!
//! [`tabulate()`] is a pure function from a non-empty [`Dataset`] to a
//! [`FrequencyReport`]: one [`ColumnHistogram`] per field, where each
//! histogram maps every observed value to its occurrence count. Counts
//! are commutative, so a single pass over the rows accumulates all field
//! histograms simultaneously.
//!
//! Invariants upheld here:
//!
//! - every field in the report has exactly one histogram;
//! - each histogram's counts sum to the dataset row count (a field absent
//!   from a row is counted under [`Value::Missing`], never skipped);
//! - counter initialization uses key-presence testing, so zero and
//!   empty-string values are real keys, not "unseen".

use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use itertools::Itertools;

use crate::{error::TallyError, loader::Dataset, value::Value};

/// How the field set is derived from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum FieldPolicy {
    /// Fields are the keys of the first row; later-only fields are
    /// silently ignored (the compatibility default).
    #[default]
    FirstRow,
    /// Fields are the union of keys across all rows, in first-appearance
    /// order.
    Union,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnHistogram {
    order: Vec<Value>,
    counts: HashMap<Value, u64>,
}

impl ColumnHistogram {
    pub fn observe(&mut self, value: Value) {
        // Key-presence test, not truthiness on the stored count: a zero
        // or empty-string key must not look "unseen".
        if !self.counts.contains_key(&value) {
            self.order.push(value.clone());
        }
        *self.counts.entry(value).or_insert(0) += 1;
    }

    pub fn count(&self, value: &Value) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Entries in first-encounter order; this order drives chart labels.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, u64)> {
        self.order
            .iter()
            .map(|value| (value, self.count(value)))
    }
}

/// The analysis result: the ordered field list plus one histogram per
/// field. Field order drives rendering order only; it has no effect on
/// the counts.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyReport {
    fields: Vec<String>,
    histograms: HashMap<String, ColumnHistogram>,
    row_count: usize,
}

impl FrequencyReport {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn histogram(&self, field: &str) -> Option<&ColumnHistogram> {
        self.histograms.get(field)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Table rows (`value`, `count`, `percent`) for one field, sorted by
    /// descending count then ascending label, truncated to `top` entries
    /// when `top` is non-zero.
    pub fn render_rows(&self, field: &str, top: usize) -> Vec<Vec<String>> {
        let Some(histogram) = self.histogram(field) else {
            return Vec::new();
        };
        let total = histogram.total();
        if total == 0 {
            return Vec::new();
        }
        let mut entries = histogram
            .iter()
            .map(|(value, count)| (value.to_string(), count))
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .collect::<Vec<_>>();
        if top > 0 && entries.len() > top {
            entries.truncate(top);
        }
        entries
            .into_iter()
            .map(|(label, count)| {
                let percent = (count as f64 / total as f64) * 100.0;
                vec![
                    field.to_string(),
                    label,
                    count.to_string(),
                    format!("{percent:.2}%"),
                ]
            })
            .collect()
    }
}

/// Derives the ordered field list for a dataset under the given policy.
/// An empty dataset has no first row to take fields from and is a defined
/// error, not a panic.
pub fn field_names(dataset: &Dataset, policy: FieldPolicy) -> Result<Vec<String>, TallyError> {
    let first = dataset.rows().first().ok_or(TallyError::EmptyDataset)?;
    match policy {
        FieldPolicy::FirstRow => {
            // A duplicated header must yield one field, not one histogram
            // pass per duplicate, or the totals no longer match the row
            // count.
            let mut seen = HashSet::new();
            Ok(first
                .fields()
                .filter(|field| seen.insert(field.to_string()))
                .map(str::to_string)
                .collect())
        }
        FieldPolicy::Union => {
            let mut seen = HashSet::new();
            let mut fields = Vec::new();
            for row in dataset.rows() {
                for field in row.fields() {
                    if seen.insert(field.to_string()) {
                        fields.push(field.to_string());
                    }
                }
            }
            Ok(fields)
        }
    }
}

pub fn tabulate(dataset: &Dataset, policy: FieldPolicy) -> Result<FrequencyReport, TallyError> {
    let fields = field_names(dataset, policy)?;
    let mut histograms: HashMap<String, ColumnHistogram> = fields
        .iter()
        .map(|field| (field.clone(), ColumnHistogram::default()))
        .collect();

    for row in dataset.rows() {
        for field in &fields {
            let value = row.get(field).cloned().unwrap_or(Value::Missing);
            histograms
                .get_mut(field)
                .expect("Field should exist in histogram map")
                .observe(value);
        }
    }

    Ok(FrequencyReport {
        fields,
        histograms,
        row_count: dataset.len(),
    })
}
