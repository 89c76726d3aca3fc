use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn report_error(err: &anyhow::Error) {
    if let Some(lookup_err) = err.downcast_ref::<medlookup::error::MedLookupError>() {
        eprintln!("Error: {lookup_err}");
    } else {
        eprintln!("Error: {err}");
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = medlookup::cli::Cli::parse();

    match cli.command.server_config() {
        Some(config) => {
            init_tracing("info,tower_http=debug");
            match medlookup::server::run(config).await {
                Ok(()) => std::process::ExitCode::SUCCESS,
                Err(err) => {
                    report_error(&err);
                    std::process::ExitCode::from(1)
                }
            }
        }
        None => {
            init_tracing("warn");
            match medlookup::cli::run(cli).await {
                Ok(output) => {
                    println!("{output}");
                    std::process::ExitCode::SUCCESS
                }
                Err(err) => {
                    report_error(&err);
                    std::process::ExitCode::from(1)
                }
            }
        }
    }
}
