//! Aggregate statistics returned by `GET /dashboard/{days}`.

use std::collections::BTreeMap;

use crate::Series;

/// Dashboard aggregates for one reporting window.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DashboardData {
    /// All requests in the window.
    pub total_count: u64,

    /// Requests answered with a block.
    pub reject_count: u64,

    /// Request counts over time, one series per verdict
    /// ("Failed", "Rejected", "Approved", "Passed").
    pub dns_data: Vec<Series>,

    /// Average response time (ms) over time, one series per verdict.
    pub latency_data: Vec<Series>,

    /// Request count per record type.
    pub queries: BTreeMap<String, u64>,

    /// Most requested names that an approve rule let through.
    pub top_approved: BTreeMap<String, u64>,

    /// Most requested names that were blocked.
    pub top_rejected: BTreeMap<String, u64>,
}

impl DashboardData {
    /// Share of requests that were blocked, as a percentage.
    ///
    /// Returns `None` for an empty window.
    pub fn blocked_percent(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(100.0 * self.reject_count as f64 / self.total_count as f64)
        }
    }

    /// Approved names, most requested first.
    pub fn ranked_approved(&self) -> Vec<(&str, u64)> {
        rank(&self.top_approved)
    }

    /// Blocked names, most requested first.
    pub fn ranked_rejected(&self) -> Vec<(&str, u64)> {
        rank(&self.top_rejected)
    }

    /// Record types, most frequent first.
    pub fn ranked_types(&self) -> Vec<(&str, u64)> {
        rank(&self.queries)
    }

    /// Total request volume per time bucket across all verdict series.
    ///
    /// Buckets are returned in ascending time order.
    pub fn volume_by_time(&self) -> Vec<(i64, f64)> {
        let mut buckets: BTreeMap<i64, f64> = BTreeMap::new();
        for series in &self.dns_data {
            for &(time, value) in &series.data {
                *buckets.entry(time).or_default() += value;
            }
        }
        buckets.into_iter().collect()
    }
}

/// Sort a name -> count table by descending count, then by name.
fn rank(table: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}
