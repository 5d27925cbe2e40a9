use serde::{Deserialize, Serialize};
use std::fmt;

/// How a [`SearchIndex`](super::SearchIndex) keeps its view of the corpus fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessPolicy {
    /// Load every line into a set once; later edits to the file are ignored
    #[default]
    Cached,
    /// Stream the file again on every query
    Reread,
}

impl FreshnessPolicy {
    pub fn from_reread_flag(reread_on_query: bool) -> Self {
        if reread_on_query {
            FreshnessPolicy::Reread
        } else {
            FreshnessPolicy::Cached
        }
    }
}

impl fmt::Display for FreshnessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessPolicy::Cached => write!(f, "cached"),
            FreshnessPolicy::Reread => write!(f, "reread"),
        }
    }
}
