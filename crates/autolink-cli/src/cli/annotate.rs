use crate::cli::{AnnotateArgs, OutputFormat};
use crate::config::AutolinkFileConfig;
use crate::surface::FileSurface;
use anyhow::{Context, Result};
use autolink_core::{AnnotationResult, AutolinkSession, MemorySurface, RunOutcome};
use std::io::Read;

pub async fn run(args: &AnnotateArgs, config: AutolinkFileConfig) -> Result<()> {
    let provider = super::provider(&args.source, &config)?;
    let session = AutolinkSession::new(provider, config.autolink_config())?;

    if args.in_place {
        // clap enforces FILE with --in-place
        let Some(path) = &args.file else {
            anyhow::bail!("--in-place needs a FILE");
        };
        // The backup is written before the file is replaced.
        let surface = FileSurface::open(path)?.with_backup();
        let result = annotated(session.run(&surface).await?)?;

        match args.format {
            OutputFormat::Json => print_json(&result)?,
            OutputFormat::Text => {
                println!(
                    "✅ {}: {} links added, {} regions protected",
                    path.display(),
                    result.inserted,
                    result.protected
                );
                println!("   Undo with: autolink undo {}", path.display());
            }
        }
        return Ok(());
    }

    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let surface = MemorySurface::new(input);
    let result = annotated(session.run(&surface).await?)?;

    match args.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            print!("{}", result.text);
            eprintln!(
                "{} links added, {} regions protected",
                result.inserted, result.protected
            );
        }
    }
    Ok(())
}

fn annotated(outcome: RunOutcome) -> Result<AnnotationResult> {
    match outcome {
        RunOutcome::Annotated(result) => Ok(result),
        RunOutcome::Busy => anyhow::bail!("An auto-link run is already in progress"),
    }
}

fn print_json(result: &AnnotationResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{SourceArgs, UndoArgs};
    use tempfile::TempDir;

    fn in_place_args(file: &std::path::Path, names: &std::path::Path) -> AnnotateArgs {
        AnnotateArgs {
            file: Some(file.to_path_buf()),
            in_place: true,
            format: OutputFormat::Json,
            source: SourceArgs {
                names_file: Some(names.to_path_buf()),
            },
        }
    }

    #[tokio::test]
    async fn test_in_place_then_undo() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.wiki");
        let names = dir.path().join("names.txt");
        let original = "Visit [[Paris]] and Lyon today.";
        std::fs::write(&page, original).unwrap();
        std::fs::write(&names, "Paris\nLyon\n").unwrap();

        run(&in_place_args(&page, &names), AutolinkFileConfig::default())
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&page).unwrap(),
            "Visit [[Paris]] and [[Lyon]] today."
        );
        let backup = dir.path().join("page.wiki.autolink.bak");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);

        let undo = UndoArgs { file: page.clone() };
        crate::cli::undo::run(&undo).await.unwrap();
        assert_eq!(std::fs::read_to_string(&page).unwrap(), original);
        assert!(!backup.exists());

        // Second undo has nothing to restore and leaves the file alone.
        crate::cli::undo::run(&undo).await.unwrap();
        assert_eq!(std::fs::read_to_string(&page).unwrap(), original);
    }

    #[tokio::test]
    async fn test_unwritable_backup_keeps_original() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.wiki");
        let names = dir.path().join("names.txt");
        std::fs::write(&page, "Lyon today").unwrap();
        std::fs::write(&names, "Lyon\n").unwrap();
        std::fs::create_dir(dir.path().join("page.wiki.autolink.bak")).unwrap();

        let err = run(&in_place_args(&page, &names), AutolinkFileConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("backup"));
        assert_eq!(std::fs::read_to_string(&page).unwrap(), "Lyon today");
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let names = dir.path().join("names.txt");
        std::fs::write(&names, "Paris\n").unwrap();

        let args = in_place_args(&dir.path().join("missing.wiki"), &names);
        let err = run(&args, AutolinkFileConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("missing.wiki"));
    }
}
