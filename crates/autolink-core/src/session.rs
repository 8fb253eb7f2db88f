//! Per-editing-session state: the cached name universe, the undo snapshot
//! and the in-flight guard.

use crate::config::AutolinkConfig;
use crate::engine::Annotator;
use crate::error::Result;
use crate::index::TermIndex;
use crate::inventory::{fetch_all, NameInventoryProvider};
use crate::surface::EditorSurface;
use crate::types::AnnotationResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Result of [`AutolinkSession::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Annotated(AnnotationResult),
    /// Another run was in flight; nothing was read or written.
    Busy,
}

/// Result of [`AutolinkSession::undo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    NothingToUndo,
}

/// Releases the in-flight flag on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One editing session against a name inventory.
///
/// Names are fetched on the first run and cached until [`reload_names`]
/// (an empty fetch is not cached, so the next run retries). Undo keeps a
/// single snapshot: the buffer as it was before the last run.
///
/// [`reload_names`]: AutolinkSession::reload_names
pub struct AutolinkSession<P: NameInventoryProvider + ?Sized> {
    provider: Arc<P>,
    annotator: Annotator,
    config: AutolinkConfig,
    terms: RwLock<Option<Arc<TermIndex>>>,
    snapshot: Mutex<Option<String>>,
    in_flight: AtomicBool,
}

impl<P: NameInventoryProvider + ?Sized> AutolinkSession<P> {
    pub fn new(provider: Arc<P>, config: AutolinkConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            annotator: Annotator::new()?,
            config,
            terms: RwLock::new(None),
            snapshot: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Annotate the surface in place.
    ///
    /// Rejected with [`RunOutcome::Busy`] while another run is active.
    pub async fn run<S: EditorSurface + ?Sized>(&self, surface: &S) -> Result<RunOutcome> {
        surface.check_editable()?;

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::warn!("auto-link already running, request rejected");
            return Ok(RunOutcome::Busy);
        };

        let original = surface.read()?;
        self.set_snapshot(Some(original.clone()));

        let terms = self.terms().await;
        let result = self.annotator.annotate(&original, &terms);
        surface.write(&result.text)?;

        log::info!(
            "auto-link complete: {} links added, {} regions protected",
            result.inserted,
            result.protected
        );
        Ok(RunOutcome::Annotated(result))
    }

    /// Write the pre-run snapshot back over the surface.
    pub fn undo<S: EditorSurface + ?Sized>(&self, surface: &S) -> Result<UndoOutcome> {
        surface.check_editable()?;

        let Some(original) = self.take_snapshot() else {
            log::warn!("nothing to undo");
            return Ok(UndoOutcome::NothingToUndo);
        };

        if let Err(e) = surface.write(&original) {
            self.set_snapshot(Some(original));
            return Err(e);
        }
        log::info!("auto-link undone");
        Ok(UndoOutcome::Restored)
    }

    /// The cached term index, loading it from the provider if needed.
    pub async fn terms(&self) -> Arc<TermIndex> {
        if let Some(terms) = self.cached_terms() {
            return terms;
        }

        log::info!("loading name inventory from {}", self.provider.name());
        let names = fetch_all(self.provider.as_ref(), self.config.max_pages).await;
        let terms = Arc::new(TermIndex::from_names(&names));
        log::info!(
            "{} names loaded, {} linkable",
            names.len(),
            terms.len()
        );

        if !names.is_empty() {
            *self.terms.write().unwrap_or_else(PoisonError::into_inner) = Some(terms.clone());
        }
        terms
    }

    /// Drop the cached names; the next run fetches them again.
    pub fn reload_names(&self) {
        *self.terms.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The text the next undo would restore.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the undo snapshot, e.g. with one persisted by a previous process.
    pub fn set_snapshot(&self, text: Option<String>) {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = text;
    }

    fn take_snapshot(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn cached_terms(&self) -> Option<Arc<TermIndex>> {
        self.terms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutolinkError;
    use crate::inventory::{ListProvider, NamePage};
    use crate::surface::MemorySurface;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    fn session(names: &[&str]) -> AutolinkSession<ListProvider> {
        let provider = Arc::new(ListProvider::new(names.iter().copied()));
        AutolinkSession::new(provider, AutolinkConfig::default()).unwrap()
    }

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NameInventoryProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch_page(&self, _cursor: Option<&str>) -> Result<NamePage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NamePage {
                names: vec!["Lyon".into()],
                next_cursor: None,
            })
        }
    }

    struct ReadOnlySurface;

    impl EditorSurface for ReadOnlySurface {
        fn check_editable(&self) -> Result<()> {
            Err(AutolinkError::NoEditableSurface("read-only buffer".into()))
        }

        fn read(&self) -> Result<String> {
            Ok(String::new())
        }

        fn write(&self, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_then_undo_round_trip() {
        let session = session(&["Paris", "Lyon"]);
        let surface = MemorySurface::new("Visit [[Paris]] and Lyon today.");

        let outcome = session.run(&surface).await.unwrap();
        match outcome {
            RunOutcome::Annotated(result) => assert_eq!(result.inserted, 1),
            RunOutcome::Busy => panic!("session should be idle"),
        }
        assert_eq!(surface.text(), "Visit [[Paris]] and [[Lyon]] today.");

        assert_eq!(session.undo(&surface).unwrap(), UndoOutcome::Restored);
        assert_eq!(surface.text(), "Visit [[Paris]] and Lyon today.");
    }

    #[tokio::test]
    async fn test_undo_after_zero_insertions() {
        let session = session(&["Marseille"]);
        let surface = MemorySurface::new("No known names here.");

        session.run(&surface).await.unwrap();
        assert_eq!(session.undo(&surface).unwrap(), UndoOutcome::Restored);
        assert_eq!(surface.text(), "No known names here.");
        assert_eq!(surface.revision(), 2);
    }

    #[test]
    fn test_undo_without_snapshot() {
        let session = session(&["Paris"]);
        let surface = MemorySurface::new("untouched");
        assert_eq!(session.undo(&surface).unwrap(), UndoOutcome::NothingToUndo);
        assert_eq!(surface.revision(), 0);
    }

    #[tokio::test]
    async fn test_second_undo_is_noop() {
        let session = session(&["Paris"]);
        let surface = MemorySurface::new("Paris");
        session.run(&surface).await.unwrap();
        session.undo(&surface).unwrap();
        assert_eq!(session.undo(&surface).unwrap(), UndoOutcome::NothingToUndo);
    }

    #[tokio::test]
    async fn test_busy_session_rejects_run() {
        let session = session(&["Paris"]);
        let surface = MemorySurface::new("Paris");

        let guard = InFlight::acquire(&session.in_flight).unwrap();
        assert!(session.is_busy());
        assert_eq!(session.run(&surface).await.unwrap(), RunOutcome::Busy);
        assert_eq!(surface.text(), "Paris");
        drop(guard);

        assert!(!session.is_busy());
        assert!(matches!(
            session.run(&surface).await.unwrap(),
            RunOutcome::Annotated(_)
        ));
    }

    #[tokio::test]
    async fn test_names_cached_until_reload() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let session = AutolinkSession::new(provider.clone(), AutolinkConfig::default()).unwrap();
        let surface = MemorySurface::new("Lyon");

        session.run(&surface).await.unwrap();
        session.run(&surface).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        session.reload_names();
        session.terms().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_inventory_not_cached() {
        let session = session(&[]);
        assert!(session.terms().await.is_empty());
        assert!(session.cached_terms().is_none());
    }

    #[tokio::test]
    async fn test_no_editable_surface() {
        let session = session(&["Paris"]);
        let err = session.run(&ReadOnlySurface).await.unwrap_err();
        assert!(matches!(err, AutolinkError::NoEditableSurface(_)));
        assert!(session.snapshot().is_none());
        assert!(matches!(
            session.undo(&ReadOnlySurface),
            Err(AutolinkError::NoEditableSurface(_))
        ));
    }
}
