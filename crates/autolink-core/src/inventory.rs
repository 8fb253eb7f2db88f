//! Name inventory retrieval.
//!
//! The universe of linkable names lives behind a paginated source. The
//! loader walks the cursor chain sequentially, bounded by a page cap, and
//! degrades to whatever it has collected when a page fails.

use crate::error::{AutolinkError, Result};
use crate::types::NameSet;
use async_trait::async_trait;

/// One page of names plus the cursor for the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NamePage {
    pub names: Vec<String>,
    /// `None` once the inventory is exhausted.
    pub next_cursor: Option<String>,
}

/// A pluggable source of known names.
/// Implementations fetch a single page; the cursor loop lives in [`fetch_all`].
#[async_trait]
pub trait NameInventoryProvider: Send + Sync {
    /// Provider name (used in log lines).
    fn name(&self) -> &str;

    /// Fetch the page at `cursor`, or the first page when `cursor` is `None`.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<NamePage>;
}

/// Load the complete name universe from `provider`.
///
/// At most `max_pages` requests are made. A failing page ends the walk and
/// the names gathered so far are returned; the failure is logged, not raised.
pub async fn fetch_all<P>(provider: &P, max_pages: usize) -> NameSet
where
    P: NameInventoryProvider + ?Sized,
{
    let mut names = NameSet::new();
    let mut cursor: Option<String> = None;

    for page_no in 1..=max_pages {
        let page = match provider.fetch_page(cursor.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!(
                    "{}: page {} failed, keeping {} names loaded so far: {}",
                    provider.name(),
                    page_no,
                    names.len(),
                    e
                );
                return names;
            }
        };

        names.extend(page.names);

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                log::debug!("{}: {} names in {} pages", provider.name(), names.len(), page_no);
                return names;
            }
        }
    }

    log::warn!(
        "{}: stopped after {} pages with the cursor still open ({} names)",
        provider.name(),
        max_pages,
        names.len()
    );
    names
}

/// Serves a fixed list of names in pages of `page_size`, using the page
/// offset as the cursor.
#[derive(Debug, Clone)]
pub struct ListProvider {
    names: Vec<String>,
    page_size: usize,
}

impl ListProvider {
    pub const DEFAULT_PAGE_SIZE: usize = 500;

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    /// One name per line; blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[async_trait]
impl NameInventoryProvider for ListProvider {
    fn name(&self) -> &str {
        "list"
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<NamePage> {
        let offset = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| AutolinkError::Retrieval(format!("bad cursor: {c}")))?,
            None => 0,
        };
        let end = (offset + self.page_size).min(self.names.len());
        let names = self.names.get(offset..end).unwrap_or_default().to_vec();
        let next_cursor = (end < self.names.len()).then(|| end.to_string());
        Ok(NamePage { names, next_cursor })
    }
}
