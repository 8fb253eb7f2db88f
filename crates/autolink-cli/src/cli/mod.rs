pub mod annotate;
pub mod config_cmd;
pub mod names;
pub mod undo;

use crate::config::AutolinkFileConfig;
use anyhow::Context;
use autolink_client::MediaWikiClient;
use autolink_core::{ListProvider, NameInventoryProvider};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "autolink")]
#[command(version, about = "Link known wiki titles in wikitext")]
pub struct Cli {
    /// Path to autolink.toml
    #[arg(
        long,
        global = true,
        env = "AUTOLINK_CONFIG",
        default_value = "autolink.toml"
    )]
    pub config: PathBuf,

    /// MediaWiki api.php URL (overrides config file)
    #[arg(long, global = true, env = "AUTOLINK_API_URL")]
    pub api_url: Option<String>,

    /// Namespace to list titles from (overrides config file)
    #[arg(long, global = true, env = "AUTOLINK_NAMESPACE")]
    pub namespace: Option<i32>,

    /// Cap on inventory page requests (overrides config file)
    #[arg(long, global = true, env = "AUTOLINK_MAX_PAGES")]
    pub max_pages: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wrap known titles in [[...]] links
    Annotate(AnnotateArgs),
    /// Restore a file to its state before the last in-place annotate
    Undo(UndoArgs),
    /// List the name inventory
    Names(NamesArgs),
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Validate,
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where the names come from. Without `--names-file` the wiki API is used.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Read names from a file, one per line (`#` starts a comment)
    #[arg(long)]
    pub names_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Wikitext file; stdin when omitted
    pub file: Option<PathBuf>,

    /// Rewrite FILE and keep a backup for `autolink undo`
    #[arg(long, requires = "file")]
    pub in_place: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct UndoArgs {
    /// File previously annotated with --in-place
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct NamesArgs {
    /// Print only the number of names
    #[arg(long)]
    pub count: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Build the name inventory provider selected by flags and config.
pub fn provider(
    source: &SourceArgs,
    config: &AutolinkFileConfig,
) -> anyhow::Result<Arc<dyn NameInventoryProvider>> {
    if let Some(path) = &source.names_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Arc::new(ListProvider::from_lines(&text)));
    }

    if config.wiki.api_url.is_empty() {
        anyhow::bail!(
            "No name source: pass --names-file, --api-url, or set [wiki] api_url in the config file"
        );
    }
    Ok(Arc::new(MediaWikiClient::new(config.wiki.clone())?))
}
