//! The closed set of state transitions.

use pidash_types::{DashboardData, DnsQuery, HealthSample, QuerySize, ReportWindow, Series};
use serde::{Deserialize, Serialize};

/// Everything that can change [`AppState`](super::AppState).
///
/// Actions serialize as `{"type": "NEW_QUERY", "newQuery": {...}}`. A `type`
/// this build does not know decodes to [`Action::Unknown`], which the
/// reducer logs and otherwise ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// A fetch has started.
    SetLoading,

    /// The user picked a reporting window. Does not fetch by itself.
    ClickedDays { clicked_days: ReportWindow },

    /// A fetch failed.
    SetError { error_msg: String },

    /// Dashboard aggregates arrived for `days`.
    UpdateDashboard {
        days: ReportWindow,
        dashboard_data: DashboardData,
    },

    /// A fresh query log arrived.
    UpdateQueries {
        query_size: QuerySize,
        queries: Vec<DnsQuery>,
    },

    /// A live query was pushed by the server.
    NewQuery { new_query: DnsQuery },

    /// Health series arrived for `days`.
    UpdateHealth { days: ReportWindow, health: Vec<Series> },

    /// A live health sample was pushed by the server.
    NewHealth { new_health: HealthSample },

    /// Forward-compatibility fallback for unrecognized action types.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Wire name of the action, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetLoading => "SET_LOADING",
            Action::ClickedDays { .. } => "CLICKED_DAYS",
            Action::SetError { .. } => "SET_ERROR",
            Action::UpdateDashboard { .. } => "UPDATE_DASHBOARD",
            Action::UpdateQueries { .. } => "UPDATE_QUERIES",
            Action::NewQuery { .. } => "NEW_QUERY",
            Action::UpdateHealth { .. } => "UPDATE_HEALTH",
            Action::NewHealth { .. } => "NEW_HEALTH",
            Action::Unknown => "UNKNOWN",
        }
    }
}
