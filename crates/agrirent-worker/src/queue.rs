//! Per-key FIFO queues.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Pending items grouped by key.
///
/// A key is present while some consumer owns it. [`KeyedQueue::push`]
/// reports when a key was idle so the caller can start exactly one
/// consumer for it; that consumer drains the key with
/// [`KeyedQueue::next`] until it returns `None`, at which point the key is
/// released. Items for one key therefore come out in push order and are
/// never handled by two consumers at once.
#[derive(Debug)]
pub struct KeyedQueue<T> {
    pending: Arc<DashMap<String, VecDeque<T>>>,
}

impl<T> Clone for KeyedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T> Default for KeyedQueue<T> {
    fn default() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
        }
    }
}

impl<T> KeyedQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to `key`'s queue. Returns `true` when the key had no
    /// consumer and the caller must start one.
    pub fn push(&self, key: &str, item: T) -> bool {
        match self.pending.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().push_back(item);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(VecDeque::from([item]));
                true
            }
        }
    }

    /// Take the next item for `key`, releasing the key once it is empty.
    pub fn next(&self, key: &str) -> Option<T> {
        match self.pending.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let item = entry.get_mut().pop_front();
                if item.is_none() {
                    entry.remove();
                }
                item
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Keys that currently have a consumer.
    pub fn active_keys(&self) -> usize {
        self.pending.len()
    }

    /// Items waiting behind their key's consumer.
    pub fn backlog(&self) -> usize {
        self.pending.iter().map(|entry| entry.value().len()).sum()
    }
}
