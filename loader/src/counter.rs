//! Shared table-creation counter.
//!
//! One [`TableCounter`] is shared (via [`Arc`](std::sync::Arc)) by every
//! loader of a run. Each table a loader materializes bumps a global count
//! and a per-format count; both live behind a single mutex so they always
//! move together.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct CounterState {
    global: usize,
    per_format: HashMap<String, usize>,
}

/// Counts materialized tables, globally and per loader format.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use simplesqlite_loader::TableCounter;
///
/// let counter = Arc::new(TableCounter::new());
/// counter.increment("json");
/// counter.increment("yaml");
/// assert_eq!(counter.increment("json"), 3);
///
/// assert_eq!(counter.global_count(), 3);
/// assert_eq!(counter.format_count("json"), 2);
/// assert_eq!(counter.format_count("csv"), 0);
/// ```
#[derive(Debug, Default)]
pub struct TableCounter {
    state: Mutex<CounterState>,
}

/// Point-in-time copy of a [`TableCounter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Tables materialized across all formats.
    pub global: usize,
    /// Tables materialized per format name, sorted by name.
    pub per_format: BTreeMap<String, usize>,
}

impl TableCounter {
    /// Creates a counter with every count at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one materialized table of `format_name`.
    ///
    /// Returns the global count including this table.
    pub fn increment(&self, format_name: &str) -> usize {
        let mut state = self.lock();
        state.global += 1;
        *state.per_format.entry(format_name.to_string()).or_insert(0) += 1;
        state.global
    }

    /// Records `tables` materialized tables of `format_name`, but only if
    /// `resolve` succeeds.
    ///
    /// `resolve` receives the global count the first of these tables would
    /// get; the others follow consecutively. The lock is held while it runs,
    /// so no other loader can claim the same counts. On error nothing is
    /// recorded.
    ///
    /// ```
    /// use simplesqlite_loader::TableCounter;
    ///
    /// let counter = TableCounter::new();
    /// let ids = counter
    ///     .increment_batch("json", 2, |first| Ok::<_, ()>(vec![first, first + 1]))
    ///     .unwrap();
    /// assert_eq!(ids, vec![1, 2]);
    ///
    /// assert!(counter.increment_batch("json", 1, |_| Err::<(), _>("rejected")).is_err());
    /// assert_eq!(counter.global_count(), 2);
    /// ```
    pub fn increment_batch<T, E>(
        &self,
        format_name: &str,
        tables: usize,
        resolve: impl FnOnce(usize) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut state = self.lock();
        let value = resolve(state.global + 1)?;
        state.global += tables;
        *state.per_format.entry(format_name.to_string()).or_insert(0) += tables;
        Ok(value)
    }

    /// Tables materialized across all formats.
    pub fn global_count(&self) -> usize {
        self.lock().global
    }

    /// Tables materialized by loaders of `format_name`.
    pub fn format_count(&self, format_name: &str) -> usize {
        self.lock().per_format.get(format_name).copied().unwrap_or(0)
    }

    /// Copies both counts under one lock acquisition.
    pub fn snapshot(&self) -> CounterSnapshot {
        let state = self.lock();
        CounterSnapshot {
            global: state.global,
            per_format: state
                .per_format
                .iter()
                .map(|(name, count)| (name.clone(), *count))
                .collect(),
        }
    }

    // A panic while holding the lock cannot leave the counts half-updated.
    fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
