//! System health samples and the three health series they feed.

use crate::Series;

/// The metrics tracked on the health page, in the order the server lists
/// their series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthMetric {
    CpuAverage,
    Memory,
    CpuTemperature,
}

impl HealthMetric {
    /// All metrics in series order.
    pub const ALL: [HealthMetric; 3] = [
        HealthMetric::CpuAverage,
        HealthMetric::Memory,
        HealthMetric::CpuTemperature,
    ];

    /// Number of health series a populated health state holds.
    pub const SERIES_COUNT: usize = 3;

    /// Position of this metric's series in the server's response.
    pub fn position(self) -> usize {
        match self {
            HealthMetric::CpuAverage => 0,
            HealthMetric::Memory => 1,
            HealthMetric::CpuTemperature => 2,
        }
    }

    /// Whether a series name refers to this metric.
    ///
    /// Matches the names the server uses ("CPU Average (Per Minute)",
    /// "Memory Usage", "CPU Temperature (C)") case-insensitively.
    pub fn matches_name(self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self {
            HealthMetric::CpuAverage => {
                name.contains("cpu") && (name.contains("avg") || name.contains("average"))
            }
            HealthMetric::Memory => name.contains("memory"),
            HealthMetric::CpuTemperature => {
                name.contains("cpu") && (name.contains("temp") || name.contains("°c"))
            }
        }
    }

    /// Find the series this metric belongs to. See [`HealthMetric::resolve`].
    pub fn locate(self, series: &[Series]) -> Option<usize> {
        Self::resolve(series).map(|slots| slots[self.position()])
    }

    /// Map every metric to a series index, indexed by [`HealthMetric::position`].
    ///
    /// Names are used only when they pick out three distinct series;
    /// otherwise every metric takes its fixed server position, so two
    /// metrics never share a series. Returns `None` unless exactly three
    /// series are present.
    pub fn resolve(series: &[Series]) -> Option<[usize; 3]> {
        if series.len() != Self::SERIES_COUNT {
            return None;
        }
        let by_name = Self::ALL.map(|metric| series.iter().position(|s| metric.matches_name(&s.name)));
        let fixed = Self::ALL.map(Self::position);
        match by_name {
            [Some(a), Some(b), Some(c)] if a != b && b != c && a != c => Some([a, b, c]),
            _ => Some(fixed),
        }
    }
}

/// A live health reading pushed on the websocket as `{"health": {...}}`.
///
/// Never stored as-is: each present metric is appended to its series.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthSample {
    /// Sample time, Unix milliseconds.
    pub time: i64,

    /// CPU load average over the last minute.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cpu_avg: Option<f64>,

    /// CPU temperature in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cpu_temp: Option<f64>,

    /// Memory usage percentage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub memory: Option<f64>,
}

impl HealthSample {
    /// Value recorded for one metric, if present.
    pub fn value(&self, metric: HealthMetric) -> Option<f64> {
        match metric {
            HealthMetric::CpuAverage => self.cpu_avg,
            HealthMetric::Memory => self.memory,
            HealthMetric::CpuTemperature => self.cpu_temp,
        }
    }

    /// Present metrics in series order.
    pub fn metrics(&self) -> impl Iterator<Item = (HealthMetric, f64)> + '_ {
        HealthMetric::ALL
            .into_iter()
            .filter_map(move |m| self.value(m).map(|v| (m, v)))
    }
}
