//! # pidash
//!
//! Client core and terminal dashboard for a DNS-filtering server.
//!
//! The server exposes aggregate statistics, a query log, system health and
//! the filter rules over HTTP, and pushes every new query and health sample
//! on a websocket. This crate keeps one shared view of all of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                                                               │
//! │  ┌─────────┐  Action   ┌────────────┐  AppState   ┌────────┐  │
//! │  │   api   │──────────▶│   state    │────────────▶│   ui   │  │
//! │  │ (HTTP)  │           │ (reducer)  │             │        │  │
//! │  └────▲────┘           └─────▲──────┘             └────────┘  │
//! │       │ guard                │ Action                         │
//! │  ┌────┴────┐           ┌─────┴──────┐                         │
//! │  │   app   │           │   stream   │◀── ws://host/websocket  │
//! │  └─────────┘           └────────────┘                         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`state`]**: the action vocabulary, the pure [`reduce`](state::reduce)
//!   function and the [`StateStore`](state::StateStore) that applies actions
//!   in arrival order
//! - **[`guard`]**: per-resource stale-request cancellation
//! - **[`api`]**: the typed HTTP client and the loaders that turn responses
//!   into actions
//! - **[`stream`]**: the websocket push channel with fixed-delay reconnect
//! - **[`settings`]**, **[`logging`]**, **[`export`]**: the ambient plumbing
//!   of the binary
//!
//! ## Features
//!
//! - `tui` (default): the ratatui front end ([`app`], [`events`], [`ui`])
//!
//! ## Example
//!
//! ```
//! use std::time::SystemTime;
//!
//! use pidash::state::{reduce, Action, AppState};
//! use pidash_types::ReportWindow;
//!
//! let state = reduce(
//!     AppState::default(),
//!     Action::ClickedDays { clicked_days: ReportWindow::SevenDays },
//!     SystemTime::now(),
//! );
//! assert_eq!(state.clicked_days, ReportWindow::SevenDays);
//! assert_eq!(state.days, ReportWindow::OneDay);
//! ```

pub mod api;
pub mod duration;
pub mod error;
pub mod export;
pub mod guard;
pub mod logging;
pub mod settings;
pub mod state;
pub mod stream;

#[cfg(feature = "tui")]
pub mod app;
#[cfg(feature = "tui")]
pub mod events;
#[cfg(feature = "tui")]
pub mod ui;

pub use error::{ApiError, StreamError};
