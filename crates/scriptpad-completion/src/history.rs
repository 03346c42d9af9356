/// Session usage history for frequency and recency ranking
use crate::config::DEFAULT_RECENCY_CAPACITY;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Point-in-time copy of the usage history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Accept count per name
    pub counts: HashMap<String, u64>,
    /// Recently accepted names, most recent first
    pub recent: Vec<String>,
}

impl UsageSnapshot {
    pub fn usage_count(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Position in the recency list, 0 being the most recent
    pub fn recency_rank(&self, name: &str) -> Option<usize> {
        self.recent.iter().position(|n| n == name)
    }
}

#[derive(Debug)]
struct UsageState {
    counts: HashMap<String, u64>,
    recent: VecDeque<String>,
    capacity: usize,
}

/// Usage tracker shared between the applier and the ranker
///
/// Cloning is cheap and clones share state. Nothing is persisted; history
/// lives for the editor session.
#[derive(Debug, Clone)]
pub struct UsageHistory {
    state: Arc<RwLock<UsageState>>,
}

impl UsageHistory {
    /// Create a tracker keeping at most `capacity` recent names
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(UsageState {
                counts: HashMap::new(),
                recent: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
            })),
        }
    }

    /// Record an accepted completion
    ///
    /// Bumps the count and moves the name to the front of the recency list,
    /// evicting the oldest entry when full.
    pub fn record_usage(&self, name: &str) -> CompletionResult<()> {
        let mut state = self.state.write().map_err(|_| {
            CompletionError::InternalError("Failed to acquire write lock on usage history".to_string())
        })?;

        *state.counts.entry(name.to_string()).or_insert(0) += 1;

        state.recent.retain(|n| n != name);
        state.recent.push_front(name.to_string());
        let capacity = state.capacity;
        state.recent.truncate(capacity);

        Ok(())
    }

    /// Number of times `name` was accepted this session
    pub fn usage_count(&self, name: &str) -> CompletionResult<u64> {
        let state = self.state.read().map_err(|_| {
            CompletionError::InternalError("Failed to acquire read lock on usage history".to_string())
        })?;
        Ok(state.counts.get(name).copied().unwrap_or(0))
    }

    /// Position of `name` in the recency list, 0 being the most recent
    pub fn recency_rank(&self, name: &str) -> CompletionResult<Option<usize>> {
        let state = self.state.read().map_err(|_| {
            CompletionError::InternalError("Failed to acquire read lock on usage history".to_string())
        })?;
        Ok(state.recent.iter().position(|n| n == name))
    }

    /// Copy of the current counts and recency list
    pub fn snapshot(&self) -> CompletionResult<UsageSnapshot> {
        let state = self.state.read().map_err(|_| {
            CompletionError::InternalError("Failed to acquire read lock on usage history".to_string())
        })?;
        Ok(UsageSnapshot {
            counts: state.counts.clone(),
            recent: state.recent.iter().cloned().collect(),
        })
    }
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_RECENCY_CAPACITY)
    }
}
