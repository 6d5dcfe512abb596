//! Browser surface: one page selecting "pull" or "view" via `?action=`.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::DocumentError;
use crate::error_log::ErrorLog;
use crate::fetch::{CatalogClient, PullSummary};
use crate::render::page::render_error_page;
use crate::render::{RecoveryAction, render_document, render_document_error};
use crate::store::DocumentStore;

pub const PULL_HREF: &str = "/?action=pull";

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub error_log: ErrorLog,
    /// `None` when credentials are not configured; viewing still works.
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Pull,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    action: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(|| async { "ok\n" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let action = match query.action.as_deref() {
        None | Some("") | Some("view") => Action::View,
        Some("pull") => Action::Pull,
        Some(other) => {
            tracing::debug!(action = other, "unknown action");
            let html = render_error_page(
                "Unknown action",
                &format!("Unsupported action: {other}"),
                &RecoveryAction::Link {
                    href: "/".to_owned(),
                    label: "View catalog".to_owned(),
                },
            );
            return (StatusCode::BAD_REQUEST, Html(html)).into_response();
        }
    };

    match action {
        Action::View => view(state, None).await,
        Action::Pull => pull(state).await,
    }
}

async fn view(state: AppState, notice: Option<String>) -> Response {
    let store = state.store.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        store
            .load()
            .map(|document| render_document(&document, notice.as_deref()))
    })
    .await;

    match rendered {
        Ok(Ok(html)) => (StatusCode::OK, Html(html)).into_response(),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "catalog document unavailable");
            let status = match err {
                DocumentError::NotFound { .. } => StatusCode::NOT_FOUND,
                DocumentError::Parse { .. } | DocumentError::Io { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, Html(render_document_error(&err, &pull_link()))).into_response()
        }
        Err(err) => internal_error(&state, &format!("render task failed: {err}")),
    }
}

async fn pull(state: AppState) -> Response {
    let Some(config) = state.api.clone() else {
        let message = "catalog API credentials are not configured";
        state.error_log.record(&format!("configuration: {message}"));
        let html = render_error_page("Fetch unavailable", message, &pull_link());
        return (StatusCode::SERVICE_UNAVAILABLE, Html(html)).into_response();
    };

    let store = state.store.clone();
    let error_log = state.error_log.clone();
    let pulled = tokio::task::spawn_blocking(move || -> anyhow::Result<PullSummary> {
        let client = CatalogClient::new(config, error_log)?;
        Ok(crate::fetch::pull(&client, &store)?)
    })
    .await;

    match pulled {
        Ok(Ok(summary)) => {
            let notice = format!(
                "Catalog fetched: {} products in {} groups",
                summary.total_products, summary.product_groups
            );
            view(state, Some(notice)).await
        }
        Ok(Err(err)) => {
            let html = render_error_page(
                "Failed to retrieve product catalog",
                &format!("{err:#}"),
                &RecoveryAction::Link {
                    href: PULL_HREF.to_owned(),
                    label: "Try again".to_owned(),
                },
            );
            (StatusCode::BAD_GATEWAY, Html(html)).into_response()
        }
        Err(err) => internal_error(&state, &format!("pull task failed: {err}")),
    }
}

fn pull_link() -> RecoveryAction {
    RecoveryAction::Link {
        href: PULL_HREF.to_owned(),
        label: "Fetch catalog from API".to_owned(),
    }
}

fn internal_error(state: &AppState, message: &str) -> Response {
    tracing::error!(message, "request failed");
    state.error_log.record(message);
    let html = render_error_page("Internal error", message, &pull_link());
    (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt as _;
    use tower::ServiceExt as _;

    use super::*;

    fn state(dir: &std::path::Path) -> AppState {
        AppState {
            store: DocumentStore::new(dir.join("catalog.json")),
            error_log: ErrorLog::new(dir.join("errors.log")),
            api: None,
        }
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_document_offers_a_pull() {
        let temp = tempfile::TempDir::new().unwrap();
        let (status, body) = get(state(temp.path()), "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Catalog file not found"));
        assert!(body.contains("href=\"/?action=pull\""));
    }

    #[tokio::test]
    async fn view_renders_persisted_document() {
        let temp = tempfile::TempDir::new().unwrap();
        let state = state(temp.path());
        state
            .store
            .write_raw(br#"{"Categories": [{"Name": "A", "ProductList": [{"Name": "p"}]}]}"#)
            .unwrap();

        let (status, body) = get(state, "/?action=view").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("JSON Structure"));
        assert!(body.contains("1 products in 1 groups"));
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let (status, body) = get(state(temp.path()), "/?action=%3Cdrop%3E").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Unsupported action: &lt;drop&gt;"));
    }

    #[tokio::test]
    async fn pull_without_credentials_is_logged() {
        let temp = tempfile::TempDir::new().unwrap();
        let state = state(temp.path());
        let log_path = state.error_log.path().to_path_buf();

        let (status, _) = get(state, "/?action=pull").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let log = std::fs::read_to_string(log_path).unwrap();
        assert!(log.contains("credentials are not configured"));
    }

    #[tokio::test]
    async fn healthz_responds() {
        let temp = tempfile::TempDir::new().unwrap();
        let (status, body) = get(state(temp.path()), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok\n");
    }
}
