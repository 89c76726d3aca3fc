//! Route handlers.

use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::entities::history::SearchHistory;
use crate::entities::medicine::{self, MedicineInfo};
use crate::render;
use crate::server::AppState;
use crate::server::error::WebError;
use crate::server::session;

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub medicine_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
}

struct Lookup {
    term: String,
    info: MedicineInfo,
    history: SearchHistory,
}

/// Resolves a submitted name and records it in the session history.
///
/// Blank submissions perform no lookup and leave the history untouched.
async fn lookup_and_record(state: &AppState, session_id: Uuid, raw: &str) -> Option<Lookup> {
    let term = raw.trim();
    if term.is_empty() {
        return None;
    }

    let outcome = medicine::lookup_with(state.labels.as_ref(), term).await;
    info!(term, status = outcome.status(), "Medicine lookup");
    let info = outcome.into_info(term);
    let history = state.sessions.record(session_id, term).await;

    Some(Lookup {
        term: term.to_string(),
        info,
        history,
    })
}

pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), WebError> {
    let (jar, session_id) = session::session_id(jar);
    let history = state.sessions.history(session_id).await;
    let body = render::html::index_page(None, None, &history)?;
    Ok((jar, Html(body)))
}

pub async fn index_search(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LookupForm>,
) -> Result<(CookieJar, Html<String>), WebError> {
    let (jar, session_id) = session::session_id(jar);
    let body = match lookup_and_record(&state, session_id, &form.medicine_name).await {
        Some(lookup) => {
            render::html::index_page(Some(&lookup.term), Some(&lookup.info), &lookup.history)?
        }
        None => {
            let history = state.sessions.history(session_id).await;
            render::html::index_page(None, None, &history)?
        }
    };
    Ok((jar, Html(body)))
}

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LookupForm>,
) -> Result<Response, WebError> {
    let (jar, session_id) = session::session_id(jar);
    let Some(lookup) = lookup_and_record(&state, session_id, &form.medicine_name).await else {
        return Ok((jar, Redirect::to("/")).into_response());
    };
    let body = render::html::result_page(&lookup.term, &lookup.info, &lookup.history)?;
    Ok((jar, Html(body)).into_response())
}

pub async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, WebError> {
    let filter = query.q.unwrap_or_default();
    let entries = state.data.catalog.filter(&filter);
    Ok(Html(render::html::catalog_page(&entries, filter.trim())?))
}

pub async fn quotes(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    Ok(Html(render::html::quotes_page(state.data.quotes.quotes())?))
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn fallback() -> WebError {
    WebError::NotFound
}
