//! Personnel directory domain
//!
//! The directory is loaded once per session from the warehouse into an
//! immutable [`Snapshot`]; all filtering is a pure derivation over it.

pub mod criteria;
pub mod engine;
pub mod export;
pub mod record;

pub use criteria::{Criteria, SearchMode};
pub use engine::{SearchOutcome, candidate_values, evaluate, normalize, search};
pub use record::{HierarchyField, Record};

use chrono::{DateTime, Utc};

/// A read-only snapshot of the directory table for one session.
///
/// Row order is the order the warehouse returned and is preserved by every
/// filtering pass.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub source: String,
    pub rows: Vec<Record>,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(source: impl Into<String>, rows: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            rows,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
