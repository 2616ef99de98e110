//! Named time series as emitted by the server.

/// One `[time, value]` sample. Time is a Unix timestamp in milliseconds.
pub type Point = (i64, f64);

/// A named time series, serialized as `{"name": ..., "data": [[t, v], ...]}`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    /// Display name chosen by the server (e.g. "Memory Usage").
    pub name: String,

    /// Samples in ascending time order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: Vec<Point>,
}

impl Series {
    /// Create an empty series with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// Create a series from existing points.
    pub fn with_points(name: impl Into<String>, data: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Append a sample.
    pub fn push(&mut self, time: i64, value: f64) {
        self.data.push((time, value));
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<Point> {
        self.data.last().copied()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|(_, v)| v).sum()
    }
}
