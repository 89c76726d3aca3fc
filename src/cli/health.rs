use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::entities::catalog::StaticData;
use crate::error::MedLookupError;
use crate::sources::openfda::OpenFdaClient;

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthRow {
    pub check: String,
    pub status: String,
    pub detail: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthReport {
    pub healthy: usize,
    pub total: usize,
    pub rows: Vec<HealthRow>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.healthy == self.total
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Medicine Lookup Health Check\n\n");
        out.push_str("| Check | Status | Detail |\n");
        out.push_str("|-------|--------|--------|\n");
        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                row.check, row.status, row.detail
            ));
        }
        out.push_str(&format!(
            "\nStatus: {}/{} checks healthy\n",
            self.healthy, self.total
        ));
        out
    }
}

async fn check_openfda(client: reqwest::Client, url: &str) -> HealthRow {
    let start = Instant::now();
    let resp = client
        .get(url)
        .query(&[("limit", "1")])
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await;

    let check = "openFDA drug labels".to_string();
    match resp {
        Ok(resp) => {
            let status = resp.status();
            let elapsed = start.elapsed().as_millis();
            if status.is_success() {
                HealthRow {
                    check,
                    status: "ok".into(),
                    detail: format!("{elapsed}ms"),
                }
            } else {
                HealthRow {
                    check,
                    status: "error".into(),
                    detail: format!("{elapsed}ms (HTTP {})", status.as_u16()),
                }
            }
        }
        Err(err) => {
            let reason = if err.is_timeout() {
                "timeout"
            } else if err.is_connect() {
                "connect"
            } else {
                "error"
            };
            HealthRow {
                check,
                status: "error".into(),
                detail: reason.into(),
            }
        }
    }
}

fn health_http_client() -> Result<reqwest::Client, MedLookupError> {
    static HEALTH_HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

    if let Some(client) = HEALTH_HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = reqwest::Client::builder()
        // Health checks report a slow upstream instead of waiting on it.
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .user_agent(concat!("medlookup/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(MedLookupError::HttpClientInit)?;

    match HEALTH_HTTP_CLIENT.set(client.clone()) {
        Ok(()) => Ok(client),
        Err(_) => HEALTH_HTTP_CLIENT
            .get()
            .cloned()
            .ok_or_else(|| MedLookupError::Api {
                api: "health".into(),
                message: "Health HTTP client initialization race".into(),
            }),
    }
}

async fn check_data_dir(dir: &Path) -> HealthRow {
    let check = format!("Data dir ({})", dir.display());
    match StaticData::load_dir(dir).await {
        Ok(data) => HealthRow {
            check,
            status: "ok".into(),
            detail: format!(
                "{} medicines, {} quotes",
                data.catalog.entries().len(),
                data.quotes.quotes().len()
            ),
        },
        Err(err) => HealthRow {
            check,
            status: "error".into(),
            detail: err.to_string(),
        },
    }
}

/// Probes the openFDA label endpoint and, when given, the local data directory.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be created.
pub async fn check(data_dir: Option<&Path>) -> Result<HealthReport, MedLookupError> {
    let client = health_http_client()?;
    let endpoint = OpenFdaClient::new()?.label_endpoint();

    let mut rows = vec![check_openfda(client, &endpoint).await];
    if let Some(dir) = data_dir {
        rows.push(check_data_dir(dir).await);
    }
    let healthy = rows.iter().filter(|r| r.status == "ok").count();
    Ok(HealthReport {
        healthy,
        total: rows.len(),
        rows,
    })
}
