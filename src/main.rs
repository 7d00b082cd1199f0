// CLI binary entry point for opus-headers

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Config;

fn init_logging(config: &Config) {
    // RUST_LOG wins; otherwise only log when asked to
    let filter = match (std::env::var("RUST_LOG").ok(), config.log_level()) {
        (Some(env), _) => EnvFilter::new(env),
        (None, Some(level)) => EnvFilter::new(level),
        (None, None) => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config);

    cli::run(&config).context("opus-headers failed")
}
