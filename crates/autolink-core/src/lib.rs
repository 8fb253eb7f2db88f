//! Wiki auto-linking: wrap every occurrence of a known name in `[[…]]`
//! without touching markup that is already there.
//!
//! The pipeline is [`SyntaxMasker`] → [`MatchScheduler`] → restore, driven by
//! [`Annotator`]. [`AutolinkSession`] adds the editing workflow around it:
//! lazy name loading, a single undo snapshot and an in-flight guard.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod inventory;
pub mod mask;
pub mod schedule;
pub mod session;
pub mod surface;
pub mod types;

pub use config::AutolinkConfig;
pub use engine::Annotator;
pub use error::{AutolinkError, Result};
pub use index::TermIndex;
pub use inventory::{fetch_all, ListProvider, NameInventoryProvider, NamePage};
pub use mask::{Masked, SyntaxMasker};
pub use schedule::{ClaimedSpans, MatchScheduler, Schedule};
pub use session::{AutolinkSession, RunOutcome, UndoOutcome};
pub use surface::{EditorSurface, MemorySurface};
pub use types::*;
