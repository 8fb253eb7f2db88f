use crate::types::{is_linkable, NameSet};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashSet;

/// Linkable names in matching priority order: longest first.
///
/// Length is counted in `char`s. Ties keep the iteration order of the source
/// set, which for a [`NameSet`] is lexicographic, so the order is fully
/// reproducible. Namespaced and empty names never make it in.
///
/// The index also holds an automaton over all terms, so locating every
/// occurrence of every term takes one pass over the text.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    terms: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl TermIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms: Vec<String> = names
            .into_iter()
            .filter(|n| is_linkable(n.as_ref()))
            .map(|n| n.as_ref().to_string())
            .filter(|n| seen.insert(n.clone()))
            .collect();
        terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

        let automaton = if terms.is_empty() {
            None
        } else {
            // Standard match kind: overlapping search needs it.
            match AhoCorasickBuilder::new()
                .match_kind(MatchKind::Standard)
                .build(&terms)
            {
                Ok(automaton) => Some(automaton),
                Err(e) => {
                    log::warn!("term automaton not built, scanning per term: {}", e);
                    None
                }
            }
        };

        Self { terms, automaton }
    }

    pub fn from_names(names: &NameSet) -> Self {
        Self::new(names)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Start offset of every occurrence of every term in `haystack`,
    /// overlapping ones included. One ascending list per term, in `iter()` order.
    pub fn occurrences(&self, haystack: &str) -> Vec<Vec<usize>> {
        let mut found = vec![Vec::new(); self.terms.len()];
        match &self.automaton {
            Some(automaton) => {
                // Same-pattern matches come out in end order, which is start order.
                for m in automaton.find_overlapping_iter(haystack) {
                    found[m.pattern().as_usize()].push(m.start());
                }
            }
            None => {
                for (starts, term) in found.iter_mut().zip(&self.terms) {
                    *starts = all_starts(haystack, term);
                }
            }
        }
        found
    }
}

fn all_starts(haystack: &str, term: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(term) {
        let start = from + pos;
        starts.push(start);
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> NameSet {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_longest_first() {
        let index = TermIndex::from_names(&names(&["Paris", "Paris Commune", "Lyon"]));
        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec!["Paris Commune", "Paris", "Lyon"]);
    }

    #[test]
    fn test_ties_are_lexicographic() {
        let index = TermIndex::from_names(&names(&["Nice", "Lyon", "Metz"]));
        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec!["Lyon", "Metz", "Nice"]);
    }

    #[test]
    fn test_namespaced_and_empty_names_dropped() {
        let index = TermIndex::from_names(&names(&["Category:Cities", "", "Paris", "File:Map.png"]));
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["Paris"]);
    }

    #[test]
    fn test_occurrences_include_overlaps() {
        let index = TermIndex::new(["aa", "Lyon", "Nice"]);
        // Order: Lyon, Nice, aa.
        let found = index.occurrences("aaa Lyon, Lyon");
        assert_eq!(found, vec![vec![4, 10], vec![], vec![0, 1]]);
    }

    #[test]
    fn test_occurrences_without_automaton_agree() {
        let index = TermIndex::new(["aa", "Zürich", "rich"]);
        let text = "Zürich aaa Zürich";
        let mut plain = index.clone();
        plain.automaton = None;
        assert_eq!(index.occurrences(text), plain.occurrences(text));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let index = TermIndex::new(["Zürich", "Berlins"]);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["Berlins", "Zürich"]);
    }
}
