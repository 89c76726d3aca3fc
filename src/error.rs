use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum MedLookupError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API JSON error from {api}: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to load data file {}: {reason}", path.display())]
    DataFile { path: PathBuf, reason: String },

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::MedLookupError;

    #[test]
    fn api_error_display_includes_api_name() {
        let err = MedLookupError::Api {
            api: "openfda".to_string(),
            message: "HTTP 500".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("openfda"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn data_file_display_includes_path_and_reason() {
        let err = MedLookupError::DataFile {
            path: "data/medicines.json".into(),
            reason: "expected value at line 1 column 1".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("data/medicines.json"));
        assert!(msg.contains("expected value"));
    }
}
