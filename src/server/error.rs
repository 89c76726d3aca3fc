//! Web-layer errors and their HTML responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::error::MedLookupError;
use crate::render;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Page not found")]
    NotFound,

    #[error("Page rendering failed: {0}")]
    Render(#[from] MedLookupError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title) = match &self {
            WebError::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
            WebError::Render(err) => {
                // Details stay in the log.
                tracing::error!(error = %err, "Page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            }
        };

        match render::html::error_page(status.as_u16(), title) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Error page rendering failed");
                (status, title).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = WebError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn render_failures_map_to_500() {
        let err = WebError::from(MedLookupError::InvalidArgument("boom".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
