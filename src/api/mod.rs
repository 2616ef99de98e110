//! HTTP side of the dashboard: the typed endpoint client, the guarded
//! fetch-then-dispatch flows the views use, and the config page's local
//! state.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pidash::api::{ApiClient, Loader, LoadStatus};
//! use pidash::state::StateStore;
//! use pidash_types::ReportWindow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = StateStore::default();
//!     let api = ApiClient::builder().endpoint("http://127.0.0.1:8080").build()?;
//!     let loader = Loader::new(api, store.dispatcher());
//!
//!     if loader.load_dashboard(ReportWindow::SevenDays).await == LoadStatus::Updated {
//!         store.pump();
//!         println!("{:?}", store.state().dashboard_data);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod config_page;
mod loader;

#[cfg(test)]
pub(crate) mod stub;

pub use client::{ApiClient, ApiClientBuilder};
pub use config_page::{ConfigPage, PageStatus, RuleList};
pub use loader::{LoadStatus, Loader};
