use crate::error::Result;
use crate::index::TermIndex;
use crate::mask::SyntaxMasker;
use crate::schedule::MatchScheduler;
use crate::types::{AnnotationResult, NameSet};

/// Protect, schedule, restore.
///
/// Holds only compiled detectors, so one instance can be shared across
/// threads and reused for any number of texts. Running it over its own
/// output adds nothing: links it inserted are protected on the next pass.
///
/// # Example
/// ```rust
/// use autolink_core::{Annotator, TermIndex};
///
/// let annotator = Annotator::new().unwrap();
/// let terms = TermIndex::new(["Paris", "Lyon"]);
/// let result = annotator.annotate("Visit [[Paris]] and Lyon today.", &terms);
/// assert_eq!(result.text, "Visit [[Paris]] and [[Lyon]] today.");
/// assert_eq!(result.inserted, 1);
/// ```
pub struct Annotator {
    masker: SyntaxMasker,
    scheduler: MatchScheduler,
}

impl Annotator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            masker: SyntaxMasker::new()?,
            scheduler: MatchScheduler,
        })
    }

    pub fn annotate(&self, text: &str, terms: &TermIndex) -> AnnotationResult {
        let masked = self.masker.protect(text);
        let schedule = self.scheduler.schedule(&masked, terms);
        let text = self
            .masker
            .restore(&schedule.text, &schedule.slots, &masked.regions);

        AnnotationResult {
            text,
            inserted: schedule.inserted,
            protected: masked.protected_count(),
        }
    }

    pub fn annotate_names(&self, text: &str, names: &NameSet) -> AnnotationResult {
        self.annotate(text, &TermIndex::from_names(names))
    }
}
