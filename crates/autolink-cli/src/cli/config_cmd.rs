use crate::cli::{Cli, ConfigCommands};
use crate::config::AutolinkFileConfig;
use anyhow::Result;

pub async fn run(cmd: &ConfigCommands, cli: &Cli) -> Result<()> {
    match cmd {
        ConfigCommands::Validate => validate(cli),
        ConfigCommands::Show => show(cli),
    }
}

fn validate(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;
    let mut config = if config_path.exists() {
        match AutolinkFileConfig::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Failed to parse {}: {}", config_path.display(), e);
                std::process::exit(1);
            }
        }
    } else {
        println!("No {} found, checking defaults.", config_path.display());
        AutolinkFileConfig::default()
    };
    config.apply_overrides(cli);

    let errors = config.validate();
    if errors.is_empty() {
        println!("✅ {} is valid.", config_path.display());
    } else {
        println!("❌ Validation errors in {}:", config_path.display());
        for e in &errors {
            println!("  - {}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}

/// Print the effective config: file values with flag and env overrides applied.
fn show(cli: &Cli) -> Result<()> {
    let mut config = AutolinkFileConfig::load_or_default(&cli.config);
    config.apply_overrides(cli);
    match toml::to_string_pretty(&config) {
        Ok(s) => println!("{}", s),
        Err(e) => anyhow::bail!("Failed to serialize config: {}", e),
    }
    Ok(())
}
