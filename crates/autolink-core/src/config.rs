use crate::error::{AutolinkError, Result};

/// Default cap on inventory page requests per load.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Configuration for an auto-link session
#[derive(Debug, Clone)]
pub struct AutolinkConfig {
    /// Hard cap on page requests when loading the name inventory. Guarantees
    /// termination against a cursor that never runs out. Default: 100.
    pub max_pages: usize,
}

impl Default for AutolinkConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl AutolinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(AutolinkError::Validation("max_pages must be > 0".into()));
        }

        Ok(())
    }
}
