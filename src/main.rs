// Entrypoint for the CLI application.
// - Sets up logging and configuration, then either runs one request from
//   the flags or hands over to the interactive menu.

use clap::Parser;
use superduck3::{api::ImageClient, cli, config::Config, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = Config::from_env();
    let store = config.credential_store();
    let api = ImageClient::new(config.api_url.as_str(), config.output_dir.as_path())?;

    match args.request() {
        Some(req) => {
            let outcome = cli::run_once(&args, &req, &api, &store)?;
            if outcome.is_failure() {
                std::process::exit(1);
            }
        }
        None => {
            if let Some(key) = &args.api_key {
                store.set(key)?;
            }
            main_menu(&api, &store)?;
        }
    }
    Ok(())
}
