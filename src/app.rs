//! Application state and navigation logic for the terminal front end.

use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use pidash_types::{ConfigRules, ReportWindow};

use crate::api::{ConfigPage, LoadStatus, Loader, PageStatus};
use crate::state::{Action, AppState, StateStore};
use crate::stream::{ConnectionState, StreamClient};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Counts, blocked share, top tables and request volume.
    Dashboard,
    /// Live query log.
    Queries,
    /// CPU, memory and temperature series.
    Health,
    /// Approve and reject rules.
    Config,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Queries, View::Health, View::Config];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Queries,
            View::Queries => View::Health,
            View::Health => View::Config,
            View::Config => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Dashboard => View::Config,
            View::Queries => View::Dashboard,
            View::Health => View::Queries,
            View::Config => View::Health,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Queries => "Queries",
            View::Health => "Health",
            View::Config => "Config",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Dashboard => 0,
            View::Queries => 1,
            View::Health => 2,
            View::Config => 3,
        }
    }
}

/// Results of background requests, delivered back to the UI loop.
#[derive(Debug)]
enum Completion {
    ConfigLoaded(Option<ConfigRules>),
    ConfigSaved(bool),
    HealthLoaded(ReportWindow, LoadStatus),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    store: StateStore,
    loader: Loader,
    stream: StreamClient,
    runtime: Handle,
    refresh_interval: Duration,

    // What has been requested, so `tick` does not refetch every frame
    last_dashboard_request: Option<Instant>,
    queries_requested: bool,
    health_requested: Option<ReportWindow>,
    config_requested: bool,

    pub config_page: ConfigPage,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,

    /// First visible row of the query log.
    pub query_offset: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app. Background work is spawned on `runtime`.
    pub fn new(
        store: StateStore,
        loader: Loader,
        stream: StreamClient,
        runtime: Handle,
        refresh_interval: Duration,
        theme: Theme,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            store,
            loader,
            stream,
            runtime,
            refresh_interval,
            last_dashboard_request: None,
            queries_requested: false,
            health_requested: None,
            config_requested: false,
            config_page: ConfigPage::default(),
            completion_tx,
            completion_rx,
            query_offset: 0,
            theme,
            status_message: None,
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.stream.state()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Apply everything that arrived since the last frame and start any
    /// fetch the current view needs.
    pub fn tick(&mut self) {
        // A completion is sent after its actions, so drain before pumping.
        self.drain_completions();
        let applied = self.store.pump();
        if applied > 0 {
            self.clamp_query_offset();
        }
        self.ensure_view_data();
    }

    fn ensure_view_data(&mut self) {
        match self.current_view {
            View::Dashboard => {
                let stale = self
                    .state()
                    .dashboard_is_stale(self.refresh_interval, SystemTime::now());
                let cooled_down = self
                    .last_dashboard_request
                    .is_none_or(|at| at.elapsed() >= self.refresh_interval);
                if stale && cooled_down {
                    self.load_dashboard(self.state().days);
                }
            }
            View::Queries => {
                if self.state().queries.is_none() && !self.queries_requested {
                    self.load_queries();
                }
            }
            View::Health => {
                let state = self.state();
                let wanted = state.clicked_days;
                let missing = state.health.is_none() || wanted != state.days;
                if missing && self.health_requested != Some(wanted) {
                    self.load_health(wanted);
                }
            }
            View::Config => {
                if !self.config_requested {
                    self.load_config();
                }
            }
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(task);
    }

    fn load_dashboard(&mut self, days: ReportWindow) {
        self.last_dashboard_request = Some(Instant::now());
        let load = self.loader.load_dashboard(days);
        self.spawn(async move {
            let status = load.await;
            debug!(?status, %days, "Dashboard load finished");
        });
    }

    fn load_queries(&mut self) {
        self.queries_requested = true;
        let load = self.loader.load_queries(self.state().query_size);
        self.spawn(async move {
            load.await;
        });
    }

    fn load_health(&mut self, days: ReportWindow) {
        self.health_requested = Some(days);
        let load = self.loader.load_health(days);
        let tx = self.completion_tx.clone();
        self.spawn(async move {
            let _ = tx.send(Completion::HealthLoaded(days, load.await));
        });
    }

    fn load_config(&mut self) {
        self.config_requested = true;
        self.config_page = ConfigPage::default();
        let load = self.loader.load_config();
        let tx = self.completion_tx.clone();
        self.spawn(async move {
            let _ = tx.send(Completion::ConfigLoaded(load.await.ok()));
        });
    }

    fn drain_completions(&mut self) {
        while let Ok(event) = self.completion_rx.try_recv() {
            match event {
                Completion::ConfigLoaded(Some(rules)) => self.config_page.loaded(rules),
                Completion::ConfigLoaded(None) => self.config_page.failed(),
                Completion::ConfigSaved(updated) => {
                    self.config_page.finish_update(updated);
                    let msg = if updated {
                        "Config updated"
                    } else {
                        "Config update failed"
                    };
                    self.set_status_message(msg.to_string());
                }
                // A failed load keeps its marker until the user reloads.
                Completion::HealthLoaded(days, LoadStatus::Updated) => {
                    if self.health_requested == Some(days) {
                        self.health_requested = None;
                    }
                }
                Completion::HealthLoaded(..) => {}
            }
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view, fetching its data if it has none.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.ensure_view_data();
    }

    /// Reload whatever the current view shows.
    pub fn reload(&mut self) {
        match self.current_view {
            View::Dashboard => self.load_dashboard(self.state().days),
            View::Queries => self.load_queries(),
            View::Health => self.load_health(self.state().clicked_days),
            View::Config => self.load_config(),
        }
    }

    /// Move the report window forward (`wider`) or back.
    ///
    /// The dashboard fetches the new window directly. The health view only
    /// records the choice; `tick` notices the mismatch and fetches.
    pub fn cycle_window(&mut self, wider: bool) {
        match self.current_view {
            View::Dashboard => {
                let days = step(self.state().days, wider);
                self.load_dashboard(days);
            }
            View::Health => {
                let clicked_days = step(self.state().clicked_days, wider);
                self.store.dispatch(Action::ClickedDays { clicked_days });
                self.ensure_view_data();
            }
            View::Queries | View::Config => {}
        }
    }

    /// Ask the server for a longer or shorter query log.
    pub fn change_query_size(&mut self, larger: bool) {
        if self.current_view != View::Queries {
            return;
        }
        let current = self.state().query_size;
        let size = if larger { current.larger() } else { current.smaller() };
        if size == current {
            return;
        }
        self.queries_requested = true;
        let load = self.loader.load_queries(size);
        self.spawn(async move {
            load.await;
        });
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        match self.current_view {
            View::Queries => {
                self.query_offset += 1;
                self.clamp_query_offset();
            }
            View::Config => self.config_page.select_next(),
            _ => {}
        }
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        match self.current_view {
            View::Queries => self.query_offset = self.query_offset.saturating_sub(1),
            View::Config => self.config_page.select_prev(),
            _ => {}
        }
    }

    fn clamp_query_offset(&mut self) {
        let len = self.state().queries.as_ref().map_or(0, Vec::len);
        self.query_offset = self.query_offset.min(len.saturating_sub(1));
    }

    /// Toggle the `#` prefix of the selected rule.
    pub fn toggle_rule(&mut self) {
        if self.current_view == View::Config {
            self.config_page.toggle_selected();
        }
    }

    /// Submit the edited rules.
    pub fn save_config(&mut self) {
        if self.current_view != View::Config || self.config_page.status != PageStatus::Done {
            return;
        }
        let Some(update) = self.config_page.begin_update() else {
            self.set_status_message("Update already in progress".to_string());
            return;
        };
        let save = self.loader.save_config(update);
        let tx = self.completion_tx.clone();
        self.spawn(async move {
            let _ = tx.send(Completion::ConfigSaved(save.await));
        });
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> anyhow::Result<()> {
        crate::export::write_state(self.state(), path)
    }
}

fn step(window: ReportWindow, wider: bool) -> ReportWindow {
    if wider {
        window.next()
    } else {
        window.prev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{Route, StubServer};
    use crate::api::ApiClient;
    use crate::state::Status;
    use crate::stream::{Connection, Connector};
    use crate::StreamError;
    use async_trait::async_trait;

    const HEALTH: &str = r#"[{"name":"CPU Average (Per Minute)","data":[]},
        {"name":"Memory Usage","data":[]},{"name":"CPU Temperature (C)","data":[]}]"#;

    struct Offline;

    #[async_trait]
    impl Connector for Offline {
        fn target(&self) -> &str {
            "offline"
        }

        async fn connect(&self) -> Result<Box<dyn Connection>, StreamError> {
            Err(StreamError::Closed)
        }
    }

    fn app_for(server: &StubServer) -> App {
        let store = StateStore::default();
        let api = ApiClient::builder()
            .endpoint(&server.base)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let loader = Loader::new(api, store.dispatcher());
        let stream = StreamClient::new(Offline, Duration::from_secs(5));
        App::new(
            store,
            loader,
            stream,
            Handle::current(),
            Duration::from_secs(60),
            Theme::dark(),
        )
    }

    /// Tick until `done` holds or a second has passed.
    async fn settle(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..100 {
            app.tick();
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("app did not settle");
    }

    #[test]
    fn test_view_cycle() {
        let mut view = View::Dashboard;
        for expected in [View::Queries, View::Health, View::Config, View::Dashboard] {
            view = view.next();
            assert_eq!(view, expected);
        }
        assert_eq!(View::Dashboard.prev(), View::Config);
        assert_eq!(View::ALL.map(View::index), [0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_first_tick_loads_dashboard() {
        let server =
            StubServer::start(vec![Route::get("/dashboard/1", 200, r#"{"total_count":3}"#)]).await;
        let mut app = app_for(&server);

        settle(&mut app, |app| app.state().dashboard_data.is_some()).await;
        assert_eq!(app.state().status, Status::Done);

        // Fresh data: further ticks do not refetch.
        app.tick();
        app.tick();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_switching_view_loads_missing_data() {
        let server = StubServer::start(vec![
            Route::get("/dashboard/1", 200, "{}"),
            Route::get("/queries/100", 200, "[]"),
        ])
        .await;
        let mut app = app_for(&server);

        app.set_view(View::Queries);
        settle(&mut app, |app| app.state().queries.is_some()).await;
        assert!(server.requests().iter().any(|r| r.starts_with("GET /queries/100")));
    }

    #[tokio::test]
    async fn test_health_window_click_triggers_fetch() {
        let server = StubServer::start(vec![
            Route::get("/health/1", 200, HEALTH),
            Route::get("/health/3", 200, HEALTH),
        ])
        .await;
        let mut app = app_for(&server);

        app.set_view(View::Health);
        settle(&mut app, |app| app.state().health.is_some()).await;

        app.cycle_window(true);
        assert_eq!(app.state().clicked_days, ReportWindow::ThreeDays);
        settle(&mut app, |app| app.state().days == ReportWindow::ThreeDays).await;

        let health_requests = server
            .requests()
            .into_iter()
            .filter(|r| r.starts_with("GET /health/"))
            .count();
        assert_eq!(health_requests, 2);
    }

    #[tokio::test]
    async fn test_health_refetches_after_dashboard_moves_window() {
        let server = StubServer::start(vec![
            Route::get("/health/1", 200, HEALTH),
            Route::get("/dashboard/1", 200, "{}"),
            Route::get("/dashboard/3", 200, r#"{"total_count":9}"#),
        ])
        .await;
        let mut app = app_for(&server);

        app.set_view(View::Health);
        settle(&mut app, |app| app.state().health.is_some()).await;

        app.set_view(View::Dashboard);
        app.cycle_window(true);
        settle(&mut app, |app| {
            app.state().days == ReportWindow::ThreeDays && app.state().dashboard_data.is_some()
        })
        .await;
        app.tick();

        app.set_view(View::Health);
        assert_eq!(app.state().clicked_days, ReportWindow::OneDay);
        settle(&mut app, |app| app.state().days == ReportWindow::OneDay).await;

        let health_requests = server
            .requests()
            .into_iter()
            .filter(|r| r.starts_with("GET /health/1"))
            .count();
        assert_eq!(health_requests, 2);
    }

    #[tokio::test]
    async fn test_config_save_reports_result() {
        let server = StubServer::start(vec![
            Route::get("/dashboard/1", 200, "{}"),
            Route::get("/config", 200, r##"{"approve_rules":["# ok.example"],"reject_rules":[]}"##),
            Route::post("/config", 500, ""),
        ])
        .await;
        let mut app = app_for(&server);

        app.set_view(View::Config);
        settle(&mut app, |app| app.config_page.status == PageStatus::Done).await;

        app.toggle_rule();
        assert_eq!(app.config_page.rules.approve_rules[0], "ok.example");

        app.save_config();
        assert!(!app.config_page.update_enabled);
        settle(&mut app, |app| app.config_page.updated.is_some()).await;
        assert_eq!(app.config_page.updated, Some(false));
        assert!(app.config_page.update_enabled);
        assert_eq!(app.get_status_message(), Some("Config update failed"));
    }
}
