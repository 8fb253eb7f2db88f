use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// Separator that marks a title as belonging to a non-default namespace.
pub const NAMESPACE_SEPARATOR: char = ':';

pub const LINK_OPEN: &str = "[[";
pub const LINK_CLOSE: &str = "]]";

/// The universe of known names. Ordered so that every pass over it is reproducible.
pub type NameSet = BTreeSet<String>;

/// True if `name` may take part in matching: non-empty and in the default namespace.
pub fn is_linkable(name: &str) -> bool {
    !name.is_empty() && !name.contains(NAMESPACE_SEPARATOR)
}

/// Structural syntax shielded from matching, in the order the sweeps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// `[[Target]]` or `[[Target|label]]`
    Link,
    /// `{{Template|...}}`
    Template,
    /// `<ref>...</ref>` and friends, body included
    PairedTag,
    /// `<br/>`, `<references />`
    SelfClosingTag,
    /// Bare `http://` or `https://` URL
    ExternalUrl,
    /// Behaviour switches such as `__NOTOC__`
    MagicWord,
}

impl RegionKind {
    pub const ALL: [RegionKind; 6] = [
        RegionKind::Link,
        RegionKind::Template,
        RegionKind::PairedTag,
        RegionKind::SelfClosingTag,
        RegionKind::ExternalUrl,
        RegionKind::MagicWord,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            RegionKind::Link => r"(?s)\[\[.*?\]\]",
            RegionKind::Template => r"(?s)\{\{.*?\}\}",
            RegionKind::PairedTag => r"(?s)<.*?>.*?</.*?>",
            RegionKind::SelfClosingTag => r"<.*?/>",
            RegionKind::ExternalUrl => r"https?://[^\s]+",
            RegionKind::MagicWord => r"__[A-Z]+__",
        }
    }
}

/// A verbatim piece of the input that must survive annotation untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRegion {
    /// Sequential index, also encoded in the region's placeholder token.
    pub index: usize,
    pub kind: RegionKind,
    /// Original text, with any nested regions already expanded.
    pub original: String,
}

/// Position of a placeholder token inside a masked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub range: Range<usize>,
    pub region: usize,
}

/// Half-open byte interval `[start, end)` in the masked text plus the name it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub name: String,
}

impl Span {
    pub fn new(start: usize, name: &str) -> Self {
        Self {
            start,
            end: start + name.len(),
            name: name.to_string(),
        }
    }

    /// Half-open overlap: disjoint iff one ends at or before the other begins.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        !(self.end <= start || end <= self.start)
    }
}

/// Outcome of one `annotate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub text: String,
    /// Links inserted by this pass.
    pub inserted: usize,
    /// Regions shielded from matching.
    pub protected: usize,
}
