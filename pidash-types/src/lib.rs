//! # pidash-types
//!
//! Wire types for the pidash DNS-filter dashboard. These mirror the JSON the
//! filtering server emits on its HTTP endpoints and on the `/websocket` push
//! channel, so that any consumer can decode them without pulling in the
//! client runtime.
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization via serde, using the server's field names
//!
//! ## Example
//!
//! ```rust
//! use pidash_types::{HealthMetric, HealthSample, QuerySize, ReportWindow};
//!
//! let window: ReportWindow = "7".parse().unwrap();
//! assert_eq!(window.days(), 7);
//!
//! let size = QuerySize::try_from(300).unwrap();
//! assert_eq!(size.get(), 300);
//!
//! let sample = HealthSample {
//!     time: 1_700_000_000_000,
//!     cpu_avg: None,
//!     cpu_temp: Some(41.0),
//!     memory: None,
//! };
//! let present: Vec<_> = sample.metrics().collect();
//! assert_eq!(present, vec![(HealthMetric::CpuTemperature, 41.0)]);
//! ```

mod dashboard;
mod health;
mod query;
mod rules;
mod series;
mod window;

pub use dashboard::*;
pub use health::*;
pub use query::*;
pub use rules::*;
pub use series::*;
pub use window::*;
