use crate::cli::UndoArgs;
use crate::surface::FileSurface;
use anyhow::Result;
use autolink_core::{AutolinkConfig, AutolinkSession, ListProvider, UndoOutcome};
use std::sync::Arc;

pub async fn run(args: &UndoArgs) -> Result<()> {
    let surface = FileSurface::open(&args.file)?;
    let backup_path = surface.backup_path();

    // Undo never loads names; the provider is a placeholder.
    let session = AutolinkSession::new(
        Arc::new(ListProvider::new(Vec::<String>::new())),
        AutolinkConfig::default(),
    )?;

    if backup_path.exists() {
        session.set_snapshot(Some(std::fs::read_to_string(&backup_path)?));
    }

    match session.undo(&surface)? {
        UndoOutcome::Restored => {
            std::fs::remove_file(&backup_path)?;
            println!("✅ Restored {}", args.file.display());
        }
        UndoOutcome::NothingToUndo => {
            eprintln!(
                "Nothing to undo for {} (no {} found)",
                args.file.display(),
                backup_path.display()
            );
        }
    }
    Ok(())
}
