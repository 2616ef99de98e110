use std::time::{Duration, SystemTime};

use pidash_types::{DashboardData, DnsQuery, HealthMetric, HealthSample, QuerySize, ReportWindow, Series};
use serde::Serialize;
use tracing::{debug, warn};

use super::Action;

/// Fetch status shown by every page.
///
/// The error message lives inside `Error`, so a message exists exactly when
/// the status is `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "errorMsg", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Loading,
    Done,
    Error(String),
}

impl Status {
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }

    pub fn error_msg(&self) -> Option<&str> {
        match self {
            Status::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// The single application state instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(flatten)]
    pub status: Status,
    pub days: ReportWindow,
    pub clicked_days: ReportWindow,
    pub dashboard_data: Option<DashboardData>,
    pub dash_last_updated: Option<SystemTime>,
    pub query_size: QuerySize,
    /// Newest first, never longer than `query_size`.
    pub queries: Option<Vec<DnsQuery>>,
    pub health: Option<Vec<Series>>,
}

impl AppState {
    /// Whether the dashboard should be fetched again: never loaded, or the
    /// last successful load is at least `max_age` old.
    pub fn dashboard_is_stale(&self, max_age: Duration, now: SystemTime) -> bool {
        match self.dash_last_updated {
            None => true,
            Some(at) => now
                .duration_since(at)
                .map(|age| age >= max_age)
                .unwrap_or(false),
        }
    }
}

/// Apply one action to the state.
///
/// Total and deterministic: `now` is only used to stamp dashboard loads.
pub fn reduce(state: AppState, action: Action, now: SystemTime) -> AppState {
    match action {
        Action::SetLoading => AppState {
            status: Status::Loading,
            ..state
        },
        Action::ClickedDays { clicked_days } => AppState {
            clicked_days,
            ..state
        },
        Action::SetError { error_msg } => AppState {
            status: Status::Error(error_msg),
            ..state
        },
        Action::UpdateDashboard {
            days,
            dashboard_data,
        } => AppState {
            status: Status::Done,
            days,
            dash_last_updated: Some(now),
            dashboard_data: Some(dashboard_data),
            ..state
        },
        Action::UpdateQueries {
            query_size,
            mut queries,
        } => {
            let bound = query_size.as_usize();
            if queries.len() > bound {
                warn!(
                    received = queries.len(),
                    bound, "Query log longer than requested, truncating"
                );
                queries.truncate(bound);
            }
            AppState {
                status: Status::Done,
                query_size,
                queries: Some(queries),
                ..state
            }
        }
        Action::NewQuery { new_query } => push_query(state, new_query),
        Action::UpdateHealth { days, health } => {
            if health.len() != HealthMetric::SERIES_COUNT {
                warn!(
                    series = health.len(),
                    "Health response does not have the expected series; live samples will be ignored"
                );
            }
            AppState {
                status: Status::Done,
                days,
                health: Some(health),
                ..state
            }
        }
        Action::NewHealth { new_health } => merge_health(state, &new_health),
        Action::Unknown => {
            warn!("Ignoring unrecognized action");
            state
        }
    }
}

fn push_query(mut state: AppState, query: DnsQuery) -> AppState {
    let bound = state.query_size.as_usize();
    let Some(queries) = state.queries.as_mut() else {
        debug!(id = query.id, "Query log not loaded yet, dropping live query");
        return state;
    };

    if queries.len() > bound {
        warn!(
            len = queries.len(),
            bound, "Query log exceeded its bound before insert"
        );
    }
    queries.insert(0, query);
    queries.truncate(bound);
    state
}

fn merge_health(mut state: AppState, sample: &HealthSample) -> AppState {
    let Some(series) = state.health.as_mut() else {
        debug!(time = sample.time, "Health not loaded yet, dropping sample");
        return state;
    };
    let Some(slots) = HealthMetric::resolve(series) else {
        debug!(series = series.len(), "Unexpected health shape, dropping sample");
        return state;
    };
    for (metric, value) in sample.metrics() {
        series[slots[metric.position()]].push(sample.time, value);
    }
    state
}
