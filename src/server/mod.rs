//! Web front end: a search form backed by openFDA, per-session recent
//! searches, and read-only catalog and quote pages.
//!
//! Routes:
//! - `GET /` and `POST /` (form field `medicine_name`): lookup page
//! - `POST /search`: standalone result page
//! - `GET /catalog?q=`: local medicine catalog
//! - `GET /quotes`: health quotes
//! - `GET /health`: liveness
//! - `GET /static/{*path}`: embedded stylesheet

mod assets;
pub mod config;
mod error;
mod handler;
mod session;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::entities::catalog::StaticData;
use crate::entities::medicine::LabelSource;
use crate::sources::openfda::OpenFdaClient;

pub use config::ServerConfig;
use session::SessionStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) labels: Arc<dyn LabelSource>,
    pub(crate) data: Arc<StaticData>,
    pub(crate) sessions: SessionStore,
}

impl AppState {
    pub(crate) fn new(labels: Arc<dyn LabelSource>, data: StaticData) -> Self {
        Self {
            labels,
            data: Arc::new(data),
            sessions: SessionStore::new(),
        }
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::index).post(handler::index_search))
        .route("/search", post(handler::search))
        .route("/catalog", get(handler::catalog))
        .route("/quotes", get(handler::quotes))
        .route("/health", get(handler::health_check))
        .route("/static/{*path}", get(assets::static_asset))
        .fallback(handler::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads the static datasets and serves the web app until Ctrl-C.
///
/// # Errors
///
/// Returns an error when a data file is missing or malformed, the HTTP
/// client cannot be built, or the listener cannot bind.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let data = StaticData::load_dir(&config.data_dir).await?;
    let labels: Arc<dyn LabelSource> = Arc::new(OpenFdaClient::new()?);
    let app = router(AppState::new(labels, data));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {addr}: {e}"))?;
    tracing::info!("medlookup listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down…");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::entities::catalog::{Quote, QuoteSet, StaticCatalog};
    use crate::entities::medicine::test_utils::StubLabelSource;
    use crate::sources::openfda::LabelSearchField;

    fn static_data() -> StaticData {
        StaticData {
            catalog: StaticCatalog::from_entries(vec![
                serde_json::from_value(serde_json::json!({
                    "name": "Ibuprofen", "category": "NSAID", "dosage": "200 mg"
                }))
                .unwrap(),
                serde_json::from_value(serde_json::json!({
                    "name": "Loratadine", "category": "Antihistamine"
                }))
                .unwrap(),
            ]),
            quotes: QuoteSet::from_quotes(vec![Quote {
                text: "The greatest wealth is health.".into(),
                author: Some("Virgil".into()),
            }]),
        }
    }

    fn create_test_app(source: Arc<StubLabelSource>) -> Router {
        router(AppState::new(source, static_data()))
    }

    fn labelled_source() -> Arc<StubLabelSource> {
        Arc::new(StubLabelSource::new(
            Some(vec![serde_json::json!({
                "indications_and_usage": ["Temporarily relieves minor aches"],
                "warnings": ["Stomach bleeding warning"]
            })]),
            Some(Vec::new()),
        ))
    }

    fn form_post(uri: &str, name: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = format!("medicine_name={}", crate::utils::query::encode_component(name));
        builder.body(Body::from(body)).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    /// `name=value` pair from the response's session cookie.
    fn session_cookie(response: &axum::response::Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(session::SESSION_COOKIE_NAME))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let sut = create_test_app(labelled_source());

        let response = sut.oneshot(get("/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn index_issues_session_cookie() {
        let sut = create_test_app(labelled_source());

        let response = sut.oneshot(get("/", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_some());
        assert!(body_text(response).await.contains("name=\"medicine_name\""));
    }

    #[tokio::test]
    async fn posting_a_name_renders_label_data_and_history() {
        let source = labelled_source();
        let sut = create_test_app(source.clone());

        let response = sut
            .clone()
            .oneshot(form_post("/", "  ibuprofen  ", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response).expect("session cookie");
        let body = body_text(response).await;
        assert!(body.contains("Temporarily relieves minor aches"));
        assert!(body.contains("Stomach bleeding warning"));
        assert!(body.contains("Recent searches"));
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![LabelSearchField::GenericName]
        );

        let response = sut.oneshot(get("/", Some(&cookie))).await.unwrap();
        assert!(session_cookie(&response).is_none());
        let body = body_text(response).await;
        assert!(body.contains("value=\"ibuprofen\""));
    }

    #[tokio::test]
    async fn blank_submission_skips_lookup_and_history() {
        let source = labelled_source();
        let sut = create_test_app(source.clone());

        let response = sut.oneshot(form_post("/", "   ", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(!body.contains("Recent searches"));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_labels_render_placeholders() {
        let sut = create_test_app(Arc::new(StubLabelSource::empty()));

        let response = sut
            .oneshot(form_post("/", "notarealdrug", None))
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains("Data not found"));
        assert!(body.contains("notarealdrug%20medicine"));
    }

    #[tokio::test]
    async fn upstream_failure_still_renders_a_page() {
        let sut = create_test_app(Arc::new(StubLabelSource::new(None, None)));

        let response = sut.oneshot(form_post("/", "aspirin", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Data not found"));
    }

    #[tokio::test]
    async fn history_keeps_five_most_recent_distinct_terms() {
        let sut = create_test_app(Arc::new(StubLabelSource::empty()));

        let response = sut
            .clone()
            .oneshot(form_post("/", "A1", None))
            .await
            .unwrap();
        let cookie = session_cookie(&response).expect("session cookie");
        for term in ["B2", "C3", "A1", "D4", "E5", "F6"] {
            let response = sut
                .clone()
                .oneshot(form_post("/", term, Some(&cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let body = body_text(sut.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
        for kept in ["F6", "E5", "D4", "C3", "B2"] {
            assert!(body.contains(&format!("value=\"{kept}\"")), "missing {kept}");
        }
        assert!(!body.contains("value=\"A1\""));
    }

    #[tokio::test]
    async fn search_renders_result_page() {
        let sut = create_test_app(labelled_source());

        let response = sut
            .oneshot(form_post("/search", "ibuprofen", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("ibuprofen | Medicine Lookup"));
        assert!(body.contains("Temporarily relieves minor aches"));
    }

    #[tokio::test]
    async fn blank_search_redirects_home() {
        let sut = create_test_app(labelled_source());

        let response = sut.oneshot(form_post("/search", "", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn catalog_lists_and_filters_entries() {
        let sut = create_test_app(labelled_source());

        let body = body_text(sut.clone().oneshot(get("/catalog", None)).await.unwrap()).await;
        assert!(body.contains("Ibuprofen"));
        assert!(body.contains("Loratadine"));

        let body = body_text(sut.oneshot(get("/catalog?q=nsaid", None)).await.unwrap()).await;
        assert!(body.contains("Ibuprofen"));
        assert!(!body.contains("Loratadine"));
    }

    #[tokio::test]
    async fn quotes_page_lists_quotes() {
        let sut = create_test_app(labelled_source());

        let response = sut.oneshot(get("/quotes", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("The greatest wealth is health."));
        assert!(body.contains("Virgil"));
    }

    #[tokio::test]
    async fn static_stylesheet_is_served() {
        let sut = create_test_app(labelled_source());

        let response = sut
            .clone()
            .oneshot(get("/static/style.css", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );

        let response = sut.oneshot(get("/static/missing.css", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_routes_render_not_found_page() {
        let sut = create_test_app(labelled_source());

        let response = sut.oneshot(get("/nope", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found"));
    }
}
