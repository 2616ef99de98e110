use std::future::Future;

use tracing::{debug, info, warn};

use pidash_types::{ConfigRules, ConfigUpdate, QuerySize, ReportWindow};

use super::ApiClient;
use crate::guard::{Outcome, RequestGuard};
use crate::state::{Action, Dispatcher};
use crate::ApiError;

/// What a guarded load ended up doing to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The fetched data was dispatched.
    Updated,
    /// The fetch failed and `SetError` was dispatched.
    Failed,
    /// A newer load of the same kind was issued; nothing was dispatched.
    Superseded,
}

/// Fetch-then-dispatch flows used by the views.
///
/// Each resource class has its own [`RequestGuard`], so a queries reload
/// never cancels a dashboard load, but two dashboard loads in flight only
/// ever let the later one through.
///
/// The `load_*` methods do their synchronous part (dispatching `SetLoading`
/// and taking a guard ticket) before returning, and hand back a `'static`
/// future that can be awaited in place or spawned.
#[derive(Debug, Clone)]
pub struct Loader {
    api: ApiClient,
    dispatcher: Dispatcher,
    dashboard: RequestGuard,
    queries: RequestGuard,
    health: RequestGuard,
}

impl Loader {
    pub fn new(api: ApiClient, dispatcher: Dispatcher) -> Self {
        Self {
            api,
            dispatcher,
            dashboard: RequestGuard::new("dashboard"),
            queries: RequestGuard::new("queries"),
            health: RequestGuard::new("health"),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn load_dashboard(&self, days: ReportWindow) -> impl Future<Output = LoadStatus> + Send + 'static {
        let api = self.api.clone();
        self.guarded(
            &self.dashboard,
            async move { api.fetch_dashboard(days).await },
            move |dashboard_data| Action::UpdateDashboard {
                days,
                dashboard_data,
            },
        )
    }

    pub fn load_queries(&self, query_size: QuerySize) -> impl Future<Output = LoadStatus> + Send + 'static {
        let api = self.api.clone();
        self.guarded(
            &self.queries,
            async move { api.fetch_queries(query_size).await },
            move |queries| Action::UpdateQueries {
                query_size,
                queries,
            },
        )
    }

    pub fn load_health(&self, days: ReportWindow) -> impl Future<Output = LoadStatus> + Send + 'static {
        let api = self.api.clone();
        self.guarded(
            &self.health,
            async move { api.fetch_health(days).await },
            move |health| Action::UpdateHealth { days, health },
        )
    }

    /// Fetch the filter configuration. The config page keeps its own state,
    /// so nothing is dispatched.
    pub fn load_config(&self) -> impl Future<Output = Result<ConfigRules, ApiError>> + Send + 'static {
        let api = self.api.clone();
        async move {
            let rules = api.fetch_config().await;
            if let Err(err) = &rules {
                warn!(error = %err, "Fetching config failed");
            }
            rules
        }
    }

    /// Submit a config update. Resolves to `true` only on a 200 response;
    /// every failure is logged and reported as `false`.
    pub fn save_config(&self, update: ConfigUpdate) -> impl Future<Output = bool> + Send + 'static {
        let api = self.api.clone();
        async move {
            match api.update_config(&update).await {
                Ok(()) => {
                    info!("Config updated");
                    true
                }
                Err(err) => {
                    warn!(error = %err, "Failed to update config");
                    false
                }
            }
        }
    }

    fn guarded<T, F, A>(
        &self,
        guard: &RequestGuard,
        fetch: F,
        into_action: A,
    ) -> impl Future<Output = LoadStatus> + Send + 'static
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
        A: FnOnce(T) -> Action + Send + 'static,
    {
        self.dispatcher.dispatch(Action::SetLoading);
        let pending = guard.load(fetch);
        let dispatcher = self.dispatcher.clone();
        let resource = guard.name();

        async move {
            match pending.await {
                Ok(Outcome::Current(data)) => {
                    dispatcher.dispatch(into_action(data));
                    LoadStatus::Updated
                }
                Ok(Outcome::Cancelled) => {
                    debug!(resource, "Load superseded");
                    LoadStatus::Superseded
                }
                Err(err) => {
                    warn!(resource, error = %err, "Load failed");
                    dispatcher.dispatch(Action::SetError {
                        error_msg: err.to_string(),
                    });
                    LoadStatus::Failed
                }
            }
        }
    }
}
