use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// The text buffer being annotated.
///
/// `write` is responsible for whatever change notification the host needs
/// so downstream observers (form state, previews) see the new text.
pub trait EditorSurface: Send + Sync {
    /// Fail with `NoEditableSurface` if there is nothing to edit right now.
    fn check_editable(&self) -> Result<()> {
        Ok(())
    }

    fn read(&self) -> Result<String>;

    fn write(&self, text: &str) -> Result<()>;
}

/// In-memory buffer. Every write bumps a revision counter observers can poll.
#[derive(Debug, Default)]
pub struct MemorySurface {
    text: RwLock<String>,
    revision: AtomicU64,
}

impl MemorySurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            revision: AtomicU64::new(0),
        }
    }

    pub fn text(&self) -> String {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of writes so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl EditorSurface for MemorySurface {
    fn read(&self) -> Result<String> {
        Ok(self.text())
    }

    fn write(&self, text: &str) -> Result<()> {
        *self.text.write().unwrap_or_else(PoisonError::into_inner) = text.to_string();
        self.revision.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
