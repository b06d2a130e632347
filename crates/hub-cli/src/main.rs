use clap::Parser;
use hub_config::{ContextConfig, LogLevel};

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("hubctx error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    // `decode` needs neither config nor a portal.
    if let cli::Commands::Decode(args) = &cli.command {
        init_tracing(flags.quiet, flags.verbose, LogLevel::default())?;
        return commands::decode::handle(args, &flags);
    }

    let config = ContextConfig::load_with_dotenv()?;
    init_tracing(flags.quiet, flags.verbose, config.logging.level)?;
    tracing::debug!(portal_url = %config.portal.url, "configuration loaded");

    match &cli.command {
        cli::Commands::Inspect(args) => commands::inspect::handle(args, &flags, &config).await,
        cli::Commands::Serialize(args) => commands::serialize::handle(args, &flags, &config).await,
        cli::Commands::Decode(args) => commands::decode::handle(args, &flags),
    }
}

fn init_tracing(quiet: bool, verbose: bool, configured: LogLevel) -> anyhow::Result<()> {
    let level = if quiet {
        LogLevel::Error
    } else if verbose {
        LogLevel::Debug
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HUBCTX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
