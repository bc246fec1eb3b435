use std::{env, io};

use clap::Parser;
use dotenv::dotenv;
use token_scripts::{
    cli::{Cli, LoggingFormat},
    config::NetworkConfig,
    errors::ScriptError,
    output_writer::OutputLayout,
};
use tracing_subscriber::EnvFilter;

const LOG_CONFIGURATION_ENVVAR: &str = "RUST_LOG";

fn init_logging(format: LoggingFormat) -> Result<(), ScriptError> {
    // Quiet the dependency crates by default
    let filter = EnvFilter::new(
        env::var(LOG_CONFIGURATION_ENVVAR)
            .as_deref()
            .unwrap_or("warn,token_scripts=info"),
    );

    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter);

    match format {
        LoggingFormat::Json => subscriber.json().try_init(),
        LoggingFormat::Text => subscriber.try_init(),
    }
    .map_err(|e| ScriptError::Configuration(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let Cli {
        network,
        rpc_url,
        workdir,
        log_format,
        command,
    } = Cli::parse();

    init_logging(log_format)?;

    let config = NetworkConfig::from_env(network, rpc_url);
    let layout = OutputLayout::new(workdir);

    command.run(config, layout).await
}
