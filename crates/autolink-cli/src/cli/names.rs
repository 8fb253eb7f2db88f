use crate::cli::{NamesArgs, OutputFormat};
use crate::config::AutolinkFileConfig;
use anyhow::Result;
use autolink_core::{fetch_all, TermIndex};

pub async fn run(args: &NamesArgs, config: AutolinkFileConfig) -> Result<()> {
    let provider = super::provider(&args.source, &config)?;
    let max_pages = config.autolink_config().max_pages;

    let names = fetch_all(provider.as_ref(), max_pages).await;
    let terms = TermIndex::from_names(&names);
    tracing::info!(
        "{}: {} names, {} linkable",
        provider.name(),
        names.len(),
        terms.len()
    );

    match (args.count, args.format) {
        (true, OutputFormat::Json) => println!(
            "{}",
            serde_json::json!({ "names": names.len(), "linkable": terms.len() })
        ),
        (true, OutputFormat::Text) => println!("{}", names.len()),
        (false, OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&names)?),
        (false, OutputFormat::Text) => {
            for name in &names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
