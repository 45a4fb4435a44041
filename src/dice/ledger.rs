//! Roll history ledger
//!
//! Bounded in-memory record of recent rolls, shared by every request.
//! Unlike an ever-growing list, the ledger evicts its oldest entry once
//! full, so memory stays constant no matter how long the process runs.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::roll::RollOutcome;

/// Default number of outcomes retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded, process-wide roll history
///
/// All access goes through one mutex, so concurrent rolls never lose an
/// append and `history` always sees a consistent snapshot.
pub struct RollLedger {
    capacity: usize,
    entries: Mutex<VecDeque<RollOutcome>>,
}

impl RollLedger {
    /// Create a ledger retaining at most `capacity` outcomes (min 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Record an outcome, evicting the oldest entry if full
    pub fn append(&self, outcome: RollOutcome) {
        let mut entries = self.entries.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(outcome);
    }

    /// The most recent rolls, newest first, at most `limit` of them
    pub fn history(&self, limit: usize) -> Vec<RollOutcome> {
        let entries = self.entries.lock();
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// Drop all recorded rolls
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of rolls currently recorded
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for RollLedger {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
