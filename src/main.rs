// Entrypoint for the CLI application.
// - Keeps `main` small: parse the command line, build a resolver and hand
//   it to the UI.
// - Logs go to stderr so stdout carries only results.

use clap::Parser;
use std::process::ExitCode;
use taxa_lookup::{api::ApiClient, config::Config, resolver::Resolver, ui};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();
    let logs = ui::LogSink::default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(logs.clone())
        .with_target(false)
        .init();

    let client = ApiClient::http(&config.base_url, config.retry_policy())?;
    let mut resolver = Resolver::new(client, config.cache_capacity);

    if config.interactive() {
        ui::print_banner();
        ui::search_loop(&mut resolver, &config, &logs)?;
        return Ok(ExitCode::SUCCESS);
    }

    let misses = ui::run_once(&mut resolver, &config, &logs)?;
    Ok(if misses == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
