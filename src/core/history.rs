//! Transition history of a runner.
//!
//! The worker records every executed transition. The history is bounded:
//! once `limit` records are held, the oldest is dropped.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single executed transition.
///
/// # Example
///
/// ```rust
/// use statewright::core::{StateId, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: StateId::new(1),
///     to: StateId::new(2),
///     label: Some("zero".to_string()),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, StateId::new(2));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// Label of the transition taken, if any
    pub label: Option<String>,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of executed transitions.
///
/// # Example
///
/// ```rust
/// use statewright::core::{StateHistory, StateId, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(TransitionRecord {
///     from: StateId::new(1),
///     to: StateId::new(2),
///     label: None,
///     timestamp: Utc::now(),
/// });
/// history.record(TransitionRecord {
///     from: StateId::new(2),
///     to: StateId::new(1),
///     label: None,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.path();
/// assert_eq!(path, vec![StateId::new(1), StateId::new(2), StateId::new(1)]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    records: VecDeque<TransitionRecord>,
    limit: usize,
}

impl StateHistory {
    /// Create an empty history holding at most `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States traversed, oldest first: the first record's `from`, then the
    /// `to` of every record.
    pub fn path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Time between the first and last retained record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }
}
