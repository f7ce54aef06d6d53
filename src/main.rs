use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, error};
use oge_admin::cli::{cli_loop, TerminalPrompter};
use oge_admin::config::ServerArgs;
use oge_admin::{AdminPanel, ApiClient};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "oge-admin")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    server: ServerArgs,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error("cannot set up the client: {0}")]
    Setup(#[from] oge_admin::Error),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let config = args.server.into_config().inspect_err(|e| {
        error!("{}", format!("Bad configuration: {e}").red());
    })?;
    debug!("[Setup] Using backend at {}", config.base_url);
    println!(
        "{}",
        format!("==========> OGE admin @ {} <==========", config.base_url).cyan()
    );

    let api = ApiClient::connect(&config)?;
    let mut panel = AdminPanel::new(api);
    cli_loop(&mut panel, &mut TerminalPrompter);
    Ok(())
}
