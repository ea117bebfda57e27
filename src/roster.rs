//! Roster — the recent names of one school, newest first.
//!
//! DESIGN
//! ======
//! The server keeps a bounded window of recent names; older names fall off
//! the end. Clients never patch their copy: every update carries the full
//! roster and the client diffs it against what it last rendered, so a missed
//! broadcast can never leave a display out of step.

use std::collections::{HashSet, VecDeque};

/// Names kept per school when no configuration says otherwise.
pub const DEFAULT_ROSTER_LIMIT: usize = 12;

/// Bounded, newest-first list of submitted names.
#[derive(Debug, Clone)]
pub struct Roster {
    names: VecDeque<String>,
    limit: usize,
    total: u64,
}

impl Roster {
    /// A zero limit is treated as one.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self { names: VecDeque::with_capacity(limit), limit, total: 0 }
    }

    /// Record a submission. Drops the oldest name once the window is full.
    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push_front(name.into());
        self.names.truncate(self.limit);
        self.total += 1;
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Current window, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Names ever submitted, including those no longer in the window and
    /// those removed by `clear`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER_LIMIT)
    }
}

/// Names in `current` that do not appear anywhere in `previous`.
///
/// Set semantics: a name already on screen does not count as added even if
/// it was submitted again.
#[must_use]
pub fn added<'a>(previous: &[String], current: &'a [String]) -> HashSet<&'a str> {
    let seen: HashSet<&str> = previous.iter().map(String::as_str).collect();
    current
        .iter()
        .map(String::as_str)
        .filter(|name| !seen.contains(name))
        .collect()
}

#[cfg(test)]
#[path = "roster_test.rs"]
mod tests;
