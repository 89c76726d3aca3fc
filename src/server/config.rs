//! Web server settings.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::MedLookupError;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    pub port: u16,
    /// Directory holding `medicines.json` and `quotes.json`.
    pub data_dir: PathBuf,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, MedLookupError> {
        let host = self.host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let ip: std::net::IpAddr = host.parse().map_err(|e| {
            MedLookupError::InvalidArgument(format!("Invalid host address '{host}': {e}"))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
