//! Command-line interface: run the web server, look a medicine up from the
//! terminal, or probe upstream health.

pub mod health;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::entities::medicine::{self, MedicineInfo};
use crate::error::MedLookupError;
use crate::server::ServerConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "medlookup", version)]
#[command(about = "Medicine lookup backed by openFDA drug labels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web app
    Serve {
        /// Bind address
        #[arg(long, env = "MEDLOOKUP_HOST", default_value = DEFAULT_HOST)]
        host: String,
        /// Listen port
        #[arg(long, env = "MEDLOOKUP_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Directory holding medicines.json and quotes.json
        #[arg(long, env = "MEDLOOKUP_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Resolve a medicine name against openFDA and print the result
    Lookup {
        /// Generic or brand name, e.g. ibuprofen or Advil
        name: String,
        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Check openFDA connectivity and the local data files
    Health {
        /// Also validate this data directory
        #[arg(long, env = "MEDLOOKUP_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Server settings, when this is the `serve` command.
    pub fn server_config(&self) -> Option<ServerConfig> {
        match self {
            Self::Serve {
                host,
                port,
                data_dir,
            } => Some(ServerConfig {
                host: host.clone(),
                port: *port,
                data_dir: data_dir.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct LookupOutput<'a> {
    name: &'a str,
    status: &'static str,
    #[serde(flatten)]
    info: MedicineInfo,
}

/// Runs a one-shot command and returns its printable output.
///
/// # Errors
///
/// Returns an error for invalid arguments, rendering failures, or an
/// unhealthy health check.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    match cli.command {
        Commands::Serve { .. } => Err(MedLookupError::InvalidArgument(
            "serve runs the web server; start it from the binary entry point".into(),
        )
        .into()),
        Commands::Lookup { name, json } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(MedLookupError::InvalidArgument(
                    "Medicine name is required. Example: medlookup lookup ibuprofen".into(),
                )
                .into());
            }

            let outcome = medicine::lookup(name).await;
            let status = outcome.status();
            let info = outcome.into_info(name);
            if json {
                Ok(crate::render::json::to_pretty(&LookupOutput { name, status, info })?)
            } else {
                Ok(crate::render::markdown::medicine_markdown(
                    name, status, &info,
                )?)
            }
        }
        Commands::Health { data_dir } => {
            let report = health::check(data_dir.as_deref()).await?;
            let output = report.to_markdown();
            if report.all_healthy() {
                Ok(output)
            } else {
                anyhow::bail!("{output}")
            }
        }
    }
}
