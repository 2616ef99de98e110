//! JSON export of the application state.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use pidash_types::{QuerySize, ReportWindow};

use crate::api::{LoadStatus, Loader};
use crate::state::{AppState, StateStore};

#[derive(Serialize)]
struct Export<'a> {
    exported_at: String,
    state: &'a AppState,
}

/// Write `state` to `path` as pretty JSON, wrapped with an export timestamp.
pub fn write_state(state: &AppState, path: &Path) -> Result<()> {
    let export = Export {
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        state,
    };
    let json = serde_json::to_string_pretty(&export)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    info!(path = %path.display(), "Exported state");
    Ok(())
}

/// Load dashboard, queries and health once and apply the results.
///
/// Returns how each load ended, in that order.
pub async fn load_all(
    loader: &Loader,
    store: &mut StateStore,
    days: ReportWindow,
    query_size: QuerySize,
) -> [LoadStatus; 3] {
    let (dashboard, queries, health) = tokio::join!(
        loader.load_dashboard(days),
        loader.load_queries(query_size),
        loader.load_health(days),
    );
    store.pump();
    [dashboard, queries, health]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::stub::{Route, StubServer};
    use crate::api::ApiClient;

    #[tokio::test]
    async fn test_load_all_then_write() {
        let server = StubServer::start(vec![
            Route::get("/dashboard/3", 200, r#"{"total_count":4,"reject_count":1}"#),
            Route::get("/queries/100", 200, "[]"),
            Route::get(
                "/health/3",
                200,
                r#"[{"name":"CPU Average (Per Minute)","data":[]},
                    {"name":"Memory Usage","data":[]},
                    {"name":"CPU Temperature (C)","data":[[5,40.0]]}]"#,
            ),
        ])
        .await;
        let mut store = StateStore::default();
        let api = ApiClient::builder()
            .endpoint(&server.base)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let loader = Loader::new(api, store.dispatcher());

        let statuses = load_all(&loader, &mut store, ReportWindow::ThreeDays, QuerySize::DEFAULT).await;
        assert_eq!(statuses, [LoadStatus::Updated; 3]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        write_state(store.state(), &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["exported_at"].is_string());
        assert_eq!(written["state"]["status"], "DONE");
        assert_eq!(written["state"]["days"], "3");
        assert_eq!(written["state"]["dashboardData"]["total_count"], 4);
        assert_eq!(written["state"]["health"][2]["data"][0][1], 40.0);
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("state.json");
        assert!(write_state(&AppState::default(), &path).is_err());
    }
}
