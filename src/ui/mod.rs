//! Terminal rendering with ratatui: one module per view plus the shared
//! header, tabs, status bar and theme.

pub mod common;
pub mod config;
pub mod dashboard;
pub mod health;
pub mod queries;
pub mod theme;

pub use theme::Theme;
