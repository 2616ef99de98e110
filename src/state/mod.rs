//! Application state: the closed action set, the pure reducer, and the
//! store that owns the single `AppState` instance.
//!
//! ## Data Flow
//!
//! ```text
//! Loader (HTTP) ──┐
//!                 ├──▶ Dispatcher ──▶ StateStore inbox ──▶ reduce() ──▶ watch::Sender<AppState>
//! StreamClient ───┘                        ▲                                  │
//!                                          │                                  ▼
//! UI (direct dispatch) ────────────────────┘                        views / subscribers
//! ```
//!
//! The reducer is the only code that produces a new `AppState`. Producers on
//! other tasks never touch state; they send actions through a [`Dispatcher`]
//! and the owner of the [`StateStore`] applies them in arrival order.

mod action;
mod reducer;
mod store;

pub use action::Action;
pub use reducer::{reduce, AppState, Status};
pub use store::{Dispatcher, StateStore};
