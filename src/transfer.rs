use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oge_admin::config::ServerArgs;
use oge_admin::libpanel::transfer::{self, TransferDocument};
use oge_admin::ApiClient;

#[derive(Parser, Debug)]
#[command(name = "oge-transfer")]
#[command(version, about = "Bulk import/export of tests, news and content", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    server: ServerArgs,
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create everything in the file on the server.
    Import { json: PathBuf },
    /// Write everything on the server to the file.
    Export { json: PathBuf },
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let config = match args.server.into_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", format!("Bad configuration: {e}").red());
            std::process::exit(1);
        }
    };
    let api = match ApiClient::connect(&config) {
        Ok(api) => api,
        Err(e) => {
            error!("{}{}", "Unable to set up the HTTP client: ".red(), e);
            std::process::exit(1);
        }
    };
    info!("{}", format!("[Transfer] Server at {}", config.base_url).cyan());

    match args.command {
        Commands::Import { json } => {
            let text = match std::fs::read_to_string(&json) {
                Ok(t) => t,
                Err(e) => {
                    error!("{}", format!("Cannot read {:?}: {}", json, e).red());
                    std::process::exit(1);
                }
            };
            let document: TransferDocument = match serde_json::from_str(&text) {
                Ok(d) => d,
                Err(e) => {
                    error!("{}", format!("Malformed JSON: {}!", e).red());
                    std::process::exit(1);
                }
            };
            info!(
                "{}",
                format!(
                    "Importing data... ({} tests, {} news items)",
                    document.tests.len(),
                    document.news.len()
                )
                .blue()
            );
            let report = transfer::import(&api, &document);
            info!(
                "{}",
                format!(
                    "Done: {} created, {} skipped, {} failed",
                    report.created, report.skipped, report.failed
                )
                .cyan()
            );
            if report.failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Export { json } => {
            let document = match transfer::export(&api) {
                Ok(d) => d,
                Err(e) => {
                    error!("{}", format!("Export failed: {}", e).red());
                    std::process::exit(1);
                }
            };
            let written = serde_json::to_string_pretty(&document)
                .map_err(oge_admin::Error::from)
                .and_then(|text| std::fs::write(&json, text).map_err(oge_admin::Error::from));
            if let Err(e) = written {
                error!("{}", format!("Cannot write {:?}: {}", json, e).red());
                std::process::exit(1);
            }
            info!("{}", format!("Exported to {:?}", json).green());
        }
    }
}
