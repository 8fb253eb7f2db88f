//! Greedy interval scheduling of name occurrences.
//!
//! Names are tried longest first. Every occurrence that does not intersect a
//! span already claimed (by a protected placeholder or an earlier accepted
//! link) is accepted and claimed in turn. First claim wins; this is not a
//! maximum-coverage solver.
//!
//! Nothing is linked at or past an unpaired `[[`: the next pass would pair it
//! with the first inserted `]]` and swallow whatever lies in between.

use crate::index::TermIndex;
use crate::mask::Masked;
use crate::types::{Slot, Span, LINK_CLOSE, LINK_OPEN};
use std::collections::BTreeMap;

/// Disjoint half-open intervals, keyed by start.
#[derive(Debug, Clone, Default)]
pub struct ClaimedSpans {
    spans: BTreeMap<usize, usize>,
}

impl ClaimedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `[start, end)` intersects nothing claimed so far.
    pub fn is_free(&self, start: usize, end: usize) -> bool {
        // The claimed span starting last before `end` also ends last.
        match self.spans.range(..end).next_back() {
            Some((_, &claimed_end)) => claimed_end <= start,
            None => true,
        }
    }

    /// Record `[start, end)`. Callers check `is_free` first.
    pub fn claim(&mut self, start: usize, end: usize) {
        debug_assert!(self.is_free(start, end));
        self.spans.insert(start, end);
    }
}

/// Annotated masked text plus what was accepted to produce it.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub text: String,
    /// Placeholder positions in `text`, shifted past the inserted brackets.
    pub slots: Vec<Slot>,
    /// Accepted spans in masked-input coordinates, ascending.
    pub spans: Vec<Span>,
    pub inserted: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScheduler;

impl MatchScheduler {
    pub fn schedule(&self, masked: &Masked, terms: &TermIndex) -> Schedule {
        let text = masked.text.as_str();
        let mut claimed = ClaimedSpans::new();
        for slot in &masked.slots {
            claimed.claim(slot.range.start, slot.range.end);
        }

        let searchable = match masked.unclosed_link {
            Some(limit) => {
                log::debug!("unpaired [[ at byte {}, nothing linked past it", limit);
                &text[..limit]
            }
            None => text,
        };

        let mut accepted = Vec::new();
        for (name, starts) in terms.iter().zip(terms.occurrences(searchable)) {
            if starts.is_empty() {
                continue;
            }
            let found = select(&starts, name.len(), &claimed);
            for &start in found.iter().rev() {
                let span = Span::new(start, name);
                if claimed.is_free(span.start, span.end) {
                    claimed.claim(span.start, span.end);
                    accepted.push(span);
                }
            }
        }
        accepted.sort_by_key(|s| s.start);

        log::debug!(
            "scheduled {} links from {} names over {} bytes",
            accepted.len(),
            terms.len(),
            text.len()
        );

        let (rendered, slots) = render(text, &accepted, &masked.slots);
        Schedule {
            text: rendered,
            slots,
            inserted: accepted.len(),
            spans: accepted,
        }
    }
}

/// Leftmost non-overlapping picks from `starts` (ascending, overlaps allowed)
/// whose `len`-byte span avoids claimed spans.
///
/// A blocked occurrence is passed over on its own, so an occurrence
/// overlapping it but starting past the claimed span is still picked.
fn select(starts: &[usize], len: usize, claimed: &ClaimedSpans) -> Vec<usize> {
    let mut found = Vec::new();
    let mut from = 0;
    for &start in starts {
        if start >= from && claimed.is_free(start, start + len) {
            found.push(start);
            from = start + len;
        }
    }
    found
}

/// Copy `text` with every span wrapped in link brackets, in one ascending pass.
fn render(text: &str, spans: &[Span], slots: &[Slot]) -> (String, Vec<Slot>) {
    let wrap = LINK_OPEN.len() + LINK_CLOSE.len();
    let mut out = String::with_capacity(text.len() + spans.len() * wrap);
    let mut at = 0;
    for span in spans {
        out.push_str(&text[at..span.start]);
        out.push_str(LINK_OPEN);
        out.push_str(&span.name);
        out.push_str(LINK_CLOSE);
        at = span.end;
    }
    out.push_str(&text[at..]);

    let mut before = 0;
    let shifted = slots
        .iter()
        .map(|slot| {
            while before < spans.len() && spans[before].start < slot.range.start {
                before += 1;
            }
            let shift = before * wrap;
            Slot {
                range: slot.range.start + shift..slot.range.end + shift,
                region: slot.region,
            }
        })
        .collect();

    (out, shifted)
}
