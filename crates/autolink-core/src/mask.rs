//! Reversible masking of wiki syntax that must never be linked into.
//!
//! Six detectors run as independent sweeps, each over the output of the one
//! before it. Every match is replaced by an inert placeholder token and its
//! original text is kept in a region table. Token positions are tracked in a
//! slot table, so restoration is positional and never searches for token
//! text.

use crate::error::{AutolinkError, Result};
use crate::types::{ProtectedRegion, RegionKind, Slot, LINK_OPEN};
use regex::Regex;
use std::ops::Range;

const SENTINEL_OPEN: char = '\u{E000}';
const SENTINEL_CLOSE: char = '\u{E001}';

/// Placeholder text for region `index`.
pub fn placeholder(index: usize) -> String {
    format!("{SENTINEL_OPEN}__PROTECTED_{index}__{SENTINEL_CLOSE}")
}

/// Text with its protected regions swapped out for placeholder tokens.
#[derive(Debug, Clone, Default)]
pub struct Masked {
    pub text: String,
    /// Placeholder positions in `text`, ascending and disjoint.
    pub slots: Vec<Slot>,
    /// Every region captured, indexed by `ProtectedRegion::index`.
    pub regions: Vec<ProtectedRegion>,
    /// Offset in `text` of the first `[[` the link sweep left unpaired, or of
    /// the placeholder that later swallowed it. Nothing at or past it may be
    /// linked: a later pass would pair it with the first inserted `]]`.
    pub unclosed_link: Option<usize>,
}

impl Masked {
    /// Number of regions still standing in the text (nested ones excluded).
    pub fn protected_count(&self) -> usize {
        self.slots.len()
    }
}

struct Detector {
    kind: RegionKind,
    pattern: Regex,
}

pub struct SyntaxMasker {
    detectors: Vec<Detector>,
}

impl SyntaxMasker {
    /// Compile the detectors and check that placeholders are inert to all of them.
    pub fn new() -> Result<Self> {
        let detectors = RegionKind::ALL
            .iter()
            .map(|&kind| -> Result<Detector> {
                Ok(Detector {
                    kind,
                    pattern: Regex::new(kind.pattern())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let masker = Self { detectors };
        masker.check_placeholders()?;
        Ok(masker)
    }

    fn check_placeholders(&self) -> Result<()> {
        let sample = format!("{} {}", placeholder(0), placeholder(usize::MAX));
        for detector in &self.detectors {
            if detector.pattern.is_match(&sample) {
                return Err(AutolinkError::Validation(format!(
                    "placeholder tokens collide with the {:?} detector",
                    detector.kind
                )));
            }
        }
        Ok(())
    }

    /// Replace every protected region in `text` with a placeholder.
    pub fn protect(&self, text: &str) -> Masked {
        let mut masked = Masked {
            text: text.to_string(),
            ..Masked::default()
        };
        for detector in &self.detectors {
            masked = sweep(detector, masked);
            if detector.kind == RegionKind::Link {
                masked.unclosed_link = masked.text.find(LINK_OPEN);
            }
        }
        log::debug!(
            "protected {} regions ({} captured in total)",
            masked.slots.len(),
            masked.regions.len()
        );
        masked
    }

    /// Put the original text of every slot back in place.
    pub fn restore(&self, text: &str, slots: &[Slot], regions: &[ProtectedRegion]) -> String {
        expand(text, 0..text.len(), slots, regions)
    }
}

fn sweep(detector: &Detector, masked: Masked) -> Masked {
    let Masked {
        text,
        slots,
        mut regions,
        unclosed_link,
    } = masked;

    let mut out = String::with_capacity(text.len());
    let mut out_slots = Vec::with_capacity(slots.len());
    let mut cursor = 0;
    let mut next_slot = 0;
    let mut moved = None;

    for m in detector.pattern.find_iter(&text) {
        let range = m.range();
        let first = slots.partition_point(|s| s.range.end <= range.start);
        let last = first
            + slots[first..]
                .iter()
                .take_while(|s| s.range.start < range.end)
                .count();
        let inner = &slots[first..last];

        if inner
            .iter()
            .any(|s| s.range.start < range.start || s.range.end > range.end)
        {
            log::debug!(
                "{:?} match at {:?} cuts through a placeholder, left as is",
                detector.kind,
                range
            );
            continue;
        }

        let base = out.len();
        copy_gap(
            &text,
            cursor..range.start,
            &slots[next_slot..first],
            &mut out,
            &mut out_slots,
        );
        moved = moved.or(relocate(unclosed_link, cursor..range.start, base, true));

        let index = regions.len();
        let original = expand(&text, range.clone(), inner, &regions);
        let start = out.len();
        moved = moved.or(relocate(unclosed_link, range.clone(), start, false));
        out.push_str(&placeholder(index));
        out_slots.push(Slot {
            range: start..out.len(),
            region: index,
        });
        regions.push(ProtectedRegion {
            index,
            kind: detector.kind,
            original,
        });

        cursor = range.end;
        next_slot = last;
    }

    let base = out.len();
    copy_gap(
        &text,
        cursor..text.len(),
        &slots[next_slot..],
        &mut out,
        &mut out_slots,
    );
    moved = moved.or(relocate(unclosed_link, cursor..text.len(), base, true));

    Masked {
        text: out,
        slots: out_slots,
        regions,
        unclosed_link: moved,
    }
}

/// Where `pos` lands if it lies in `old`, which now starts at `new_start`
/// either copied as is or collapsed into a placeholder.
fn relocate(
    pos: Option<usize>,
    old: Range<usize>,
    new_start: usize,
    verbatim: bool,
) -> Option<usize> {
    let pos = pos.filter(|p| old.contains(p))?;
    Some(if verbatim {
        new_start + pos - old.start
    } else {
        new_start
    })
}

/// Append `text[gap]` to `out`, carrying the slots inside it along.
fn copy_gap(
    text: &str,
    gap: Range<usize>,
    slots: &[Slot],
    out: &mut String,
    out_slots: &mut Vec<Slot>,
) {
    let base = out.len();
    out.push_str(&text[gap.clone()]);
    out_slots.extend(slots.iter().map(|s| Slot {
        range: base + s.range.start - gap.start..base + s.range.end - gap.start,
        region: s.region,
    }));
}

/// `text[range]` with every slot inside it replaced by its region's original text.
fn expand(
    text: &str,
    range: Range<usize>,
    slots: &[Slot],
    regions: &[ProtectedRegion],
) -> String {
    let mut original = String::with_capacity(range.len());
    let mut at = range.start;
    for slot in slots {
        original.push_str(&text[at..slot.range.start]);
        original.push_str(&regions[slot.region].original);
        at = slot.range.end;
    }
    original.push_str(&text[at..range.end]);
    original
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masker() -> SyntaxMasker {
        SyntaxMasker::new().unwrap()
    }

    fn kinds(masked: &Masked) -> Vec<RegionKind> {
        masked.slots.iter().map(|s| masked.regions[s.region].kind).collect()
    }

    #[test]
    fn test_protect_each_kind() {
        let text = "[[Paris]] {{Infobox}} <ref>Lyon</ref> <br/> https://example.org/x __NOTOC__";
        let masked = masker().protect(text);

        assert_eq!(
            kinds(&masked),
            vec![
                RegionKind::Link,
                RegionKind::Template,
                RegionKind::PairedTag,
                RegionKind::SelfClosingTag,
                RegionKind::ExternalUrl,
                RegionKind::MagicWord,
            ]
        );
        assert!(!masked.text.contains("Paris"));
        assert!(!masked.text.contains("Lyon"));
        assert!(masked.text.contains(&placeholder(0)));
    }

    #[test]
    fn test_restore_round_trip() {
        let m = masker();
        let text = "See [[Paris|the city]] and {{cite\n|title=Lyon}} at http://a.b/c.";
        let masked = m.protect(text);
        assert_eq!(masked.protected_count(), 3);
        assert_eq!(m.restore(&masked.text, &masked.slots, &masked.regions), text);
    }

    #[test]
    fn test_no_syntax_is_identity() {
        let m = masker();
        let masked = m.protect("plain words only");
        assert_eq!(masked.text, "plain words only");
        assert!(masked.regions.is_empty());
        assert_eq!(m.restore(&masked.text, &masked.slots, &masked.regions), "plain words only");
    }

    #[test]
    fn test_multiline_template() {
        let masked = masker().protect("a {{Infobox\n| name = Paris\n}} b");
        assert_eq!(kinds(&masked), vec![RegionKind::Template]);
        assert!(masked.text.starts_with("a "));
        assert!(masked.text.ends_with(" b"));
    }

    #[test]
    fn test_later_region_swallows_earlier_placeholder() {
        let m = masker();
        let text = "x <b>[[Paris]] and Lyon</b> y";
        let masked = m.protect(text);

        assert_eq!(kinds(&masked), vec![RegionKind::PairedTag]);
        let region = &masked.regions[masked.slots[0].region];
        assert_eq!(region.original, "<b>[[Paris]] and Lyon</b>");
        assert_eq!(m.restore(&masked.text, &masked.slots, &masked.regions), text);
    }

    #[test]
    fn test_user_text_resembling_placeholder_survives() {
        let m = masker();
        let text = format!("{} and [[Paris]]", placeholder(0));
        let masked = m.protect(&text);
        assert_eq!(masked.protected_count(), 1);
        assert_eq!(m.restore(&masked.text, &masked.slots, &masked.regions), text);
    }

    #[test]
    fn test_magic_word_not_merged_with_placeholder() {
        let m = masker();
        let text = "__FOO[[Paris]]__";
        let masked = m.protect(text);
        assert_eq!(kinds(&masked), vec![RegionKind::Link]);
        assert_eq!(m.restore(&masked.text, &masked.slots, &masked.regions), text);
    }

    #[test]
    fn test_unclosed_link_tracked_through_sweeps() {
        let m = masker();
        assert_eq!(m.protect("[[Paris]] Lyon").unclosed_link, None);

        let masked = m.protect("[[Paris]] Lyon [[Nice");
        let at = masked.unclosed_link.unwrap();
        assert_eq!(&masked.text[at..], "[[Nice");

        // Swallowed by a template: the offset moves to its placeholder.
        let masked = m.protect("a {{Lyon[[}} b");
        assert_eq!(masked.unclosed_link, Some(masked.slots[0].range.start));
    }

    #[test]
    fn test_placeholders_are_inert() {
        assert!(SyntaxMasker::new().is_ok());
        let masked = masker().protect(&placeholder(3));
        assert!(masked.regions.is_empty());
    }
}
