//! Rendering of audit results and threshold checks

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};
use thiserror::Error;

use crate::audit::PackageDelta;

/// Aggregated audit results
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Packages with a non-zero delta, most stale first
    pub rows: Vec<PackageDelta>,
    pub max_delta: i64,
    sum_delta: i64,
}

/// A configured limit the audit exceeded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdViolation {
    #[error("max delta {actual} exceeds limit {limit}")]
    Max { limit: i64, actual: i64 },

    #[error("average delta {actual:.2} exceeds limit {limit}")]
    Average { limit: i64, actual: f64 },
}

impl Report {
    pub fn new(deltas: Vec<PackageDelta>) -> Self {
        let max_delta = deltas.iter().map(|d| d.days).max().unwrap_or(0);
        let sum_delta = deltas.iter().map(|d| d.days).sum();

        let mut rows: Vec<PackageDelta> = deltas.into_iter().filter(|d| d.days > 0).collect();
        rows.sort_by(|a, b| b.days.cmp(&a.days));

        Self {
            rows,
            max_delta,
            sum_delta,
        }
    }

    /// Average delta over the listed packages, `None` when nothing is stale
    pub fn average(&self) -> Option<f64> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.sum_delta as f64 / self.rows.len() as f64)
        }
    }

    /// Limits of 0 are disabled
    pub fn check(&self, fail_on_max: i64, fail_on_avg: i64) -> Vec<ThresholdViolation> {
        let mut violations = Vec::new();

        if fail_on_max > 0 && self.max_delta > fail_on_max {
            violations.push(ThresholdViolation::Max {
                limit: fail_on_max,
                actual: self.max_delta,
            });
        }
        if let Some(average) = self.average()
            && fail_on_avg > 0
            && average > fail_on_avg as f64
        {
            violations.push(ThresholdViolation::Average {
                limit: fail_on_avg,
                actual: average,
            });
        }

        violations
    }

    pub fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Package", "Version", "Delta (days)"]);

        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.name),
                Cell::new(&row.version),
                Cell::new(row.days),
            ]);
        }

        let average = match self.average() {
            Some(average) => format!("{:.2}", average),
            None => "0".to_string(),
        };

        format!(
            "{}\nMax delta: {}\nAverage delta: {}\n",
            table, self.max_delta, average
        )
    }
}
