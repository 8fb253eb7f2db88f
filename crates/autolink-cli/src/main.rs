mod cli;
mod config;
mod surface;

use clap::Parser;
use cli::{Cli, Commands};
use config::AutolinkFileConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries annotated text.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(ref cmd) => cli::config_cmd::run(cmd, &cli).await,
        Commands::Annotate(ref args) => {
            let config = AutolinkFileConfig::resolve(&cli)?;
            cli::annotate::run(args, config).await
        }
        Commands::Undo(ref args) => cli::undo::run(args).await,
        Commands::Names(ref args) => {
            let config = AutolinkFileConfig::resolve(&cli)?;
            cli::names::run(args, config).await
        }
    }
}
