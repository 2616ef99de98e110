//! Reporting windows and query-log sizes accepted by the server.

use std::fmt;
use std::str::FromStr;

/// Reporting window selectable on the dashboard and health pages.
///
/// The server addresses windows by their day count in the URL path
/// (`/dashboard/7`), and the same identifier is used in serialized state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ReportWindow {
    #[default]
    OneDay,
    ThreeDays,
    SevenDays,
    FourteenDays,
}

impl ReportWindow {
    /// All windows in display order.
    pub const ALL: [ReportWindow; 4] = [
        ReportWindow::OneDay,
        ReportWindow::ThreeDays,
        ReportWindow::SevenDays,
        ReportWindow::FourteenDays,
    ];

    /// Number of days covered.
    pub fn days(self) -> u32 {
        match self {
            ReportWindow::OneDay => 1,
            ReportWindow::ThreeDays => 3,
            ReportWindow::SevenDays => 7,
            ReportWindow::FourteenDays => 14,
        }
    }

    /// Human-readable label ("1 Day", "7 Days").
    pub fn label(self) -> &'static str {
        match self {
            ReportWindow::OneDay => "1 Day",
            ReportWindow::ThreeDays => "3 Days",
            ReportWindow::SevenDays => "7 Days",
            ReportWindow::FourteenDays => "14 Days",
        }
    }

    /// Cycle to the next wider window, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ReportWindow::OneDay => ReportWindow::ThreeDays,
            ReportWindow::ThreeDays => ReportWindow::SevenDays,
            ReportWindow::SevenDays => ReportWindow::FourteenDays,
            ReportWindow::FourteenDays => ReportWindow::OneDay,
        }
    }

    /// Cycle to the previous narrower window, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            ReportWindow::OneDay => ReportWindow::FourteenDays,
            ReportWindow::ThreeDays => ReportWindow::OneDay,
            ReportWindow::SevenDays => ReportWindow::ThreeDays,
            ReportWindow::FourteenDays => ReportWindow::SevenDays,
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Error returned when parsing an unsupported window or query size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidChoice {
    kind: &'static str,
    value: String,
}

impl fmt::Display for InvalidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for InvalidChoice {}

impl FromStr for ReportWindow {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(ReportWindow::OneDay),
            "3" => Ok(ReportWindow::ThreeDays),
            "7" => Ok(ReportWindow::SevenDays),
            "14" => Ok(ReportWindow::FourteenDays),
            other => Err(InvalidChoice {
                kind: "report window",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ReportWindow {
    type Error = InvalidChoice;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReportWindow> for String {
    fn from(window: ReportWindow) -> Self {
        window.to_string()
    }
}

/// Requested length of the query log. Only a fixed set of sizes is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct QuerySize(u32);

impl QuerySize {
    /// Sizes the server is asked for, smallest first.
    pub const ALLOWED: [u32; 5] = [100, 200, 300, 400, 500];

    /// The default size used at startup.
    pub const DEFAULT: QuerySize = QuerySize(100);

    /// The bound as a number of entries.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The bound as a `usize`, for slicing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Next larger size, saturating at the largest.
    pub fn larger(self) -> Self {
        Self::ALLOWED
            .iter()
            .copied()
            .find(|&s| s > self.0)
            .map(QuerySize)
            .unwrap_or(self)
    }

    /// Next smaller size, saturating at the smallest.
    pub fn smaller(self) -> Self {
        Self::ALLOWED
            .iter()
            .rev()
            .copied()
            .find(|&s| s < self.0)
            .map(QuerySize)
            .unwrap_or(self)
    }
}

impl Default for QuerySize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for QuerySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for QuerySize {
    type Error = InvalidChoice;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(QuerySize(value))
        } else {
            Err(InvalidChoice {
                kind: "query size",
                value: value.to_string(),
            })
        }
    }
}

impl From<QuerySize> for u32 {
    fn from(size: QuerySize) -> Self {
        size.0
    }
}

impl FromStr for QuerySize {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s.trim().parse().map_err(|_| InvalidChoice {
            kind: "query size",
            value: s.to_string(),
        })?;
        QuerySize::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_parse_and_display() {
        for window in ReportWindow::ALL {
            let parsed: ReportWindow = window.to_string().parse().unwrap();
            assert_eq!(parsed, window);
        }
        assert!("2".parse::<ReportWindow>().is_err());
        assert_eq!(ReportWindow::SevenDays.label(), "7 Days");
    }

    #[test]
    fn test_window_cycle() {
        assert_eq!(ReportWindow::OneDay.next(), ReportWindow::ThreeDays);
        assert_eq!(ReportWindow::FourteenDays.next(), ReportWindow::OneDay);
        assert_eq!(ReportWindow::OneDay.prev(), ReportWindow::FourteenDays);
    }

    #[test]
    fn test_query_size_bounds() {
        assert!(QuerySize::try_from(150).is_err());
        let size = QuerySize::try_from(200).unwrap();
        assert_eq!(size.larger().get(), 300);
        assert_eq!(size.smaller().get(), 100);
        assert_eq!(QuerySize::DEFAULT.smaller(), QuerySize::DEFAULT);
        assert_eq!(QuerySize::try_from(500).unwrap().larger().get(), 500);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_server_identifiers() {
        assert_eq!(serde_json::to_string(&ReportWindow::FourteenDays).unwrap(), r#""14""#);
        let window: ReportWindow = serde_json::from_str(r#""3""#).unwrap();
        assert_eq!(window, ReportWindow::ThreeDays);

        let size: QuerySize = serde_json::from_str("400").unwrap();
        assert_eq!(size.get(), 400);
        assert!(serde_json::from_str::<QuerySize>("401").is_err());
    }
}
