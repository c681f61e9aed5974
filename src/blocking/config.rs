//! Blocking configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BlockingError, Result};

/// Frontier cap per requested match when `queue_max` is unset.
pub const DEFAULT_QUEUE_FACTOR: usize = 20;

/// Parameters for approximate string blocking.
///
/// Deserializes leniently: unknown keys are ignored and missing keys take
/// their [`Default`] values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingConfig {
    /// Candidates emitted per left label (k). Must be at least 1.
    pub max_matches: usize,

    /// Frontier cap for each search. `None` means
    /// `max_matches * DEFAULT_QUEUE_FACTOR`.
    pub queue_max: Option<usize>,

    /// Lowercase labels and queries before matching.
    pub lowercase: bool,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            max_matches: 1,
            queue_max: None,
            lowercase: true,
        }
    }
}

impl BlockingConfig {
    pub fn new(max_matches: usize) -> Self {
        Self {
            max_matches,
            ..Self::default()
        }
    }

    pub fn with_queue_max(mut self, queue_max: usize) -> Self {
        self.queue_max = Some(queue_max);
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Parse a JSON object, e.g. `{"max_matches": 5, "lowercase": false}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Frontier cap after applying the default.
    pub fn effective_queue_max(&self) -> usize {
        self.queue_max
            .unwrap_or_else(|| self.max_matches.saturating_mul(DEFAULT_QUEUE_FACTOR))
    }

    /// Reject settings the search cannot honor.
    ///
    /// A frontier cap below `max_matches` is accepted with a warning: it is a
    /// legal (if lossy) configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_matches == 0 {
            return Err(BlockingError::InvalidParameter(
                "max_matches must be at least 1".to_string(),
            ));
        }
        if self.queue_max == Some(0) {
            return Err(BlockingError::InvalidParameter(
                "queue_max must be at least 1 (omit it for the default)".to_string(),
            ));
        }
        let cap = self.effective_queue_max();
        if cap < self.max_matches {
            warn!(
                queue_max = cap,
                max_matches = self.max_matches,
                "queue_max below max_matches; searches may return fewer candidates"
            );
        }
        Ok(())
    }
}
