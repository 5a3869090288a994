//! URL frontier
//!
//! FIFO queue of URLs waiting to be fetched, with two dedup sets:
//!
//! - every URL ever enqueued, keyed by its normalized form, so no URL is
//!   fetched twice in one crawl
//! - every item identifier already published, so no record is emitted twice
//!   even when the same app is reached through differently-shaped URLs
//!
//! The frontier is shared between the dispatcher and all page tasks. Check
//! and insert happen under one lock, so concurrent submissions of the same
//! URL enqueue it exactly once.

use crate::url::normalize_url;
use crate::UrlError;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct FrontierQueue {
    pending: VecDeque<String>,
    seen: HashSet<String>,
}

/// Shared crawl frontier
#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<FrontierQueue>,
    seen_ids: Mutex<HashSet<String>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the seed URL in the frontier
    ///
    /// Unlike [`try_enqueue`](Self::try_enqueue), an unusable seed is an
    /// error: a crawl that cannot start should say why.
    pub fn enqueue_seed(&self, url: &str) -> Result<String, UrlError> {
        let normalized = normalize_url(url)?.to_string();
        self.insert(normalized.clone());
        Ok(normalized)
    }

    /// Enqueues a URL unless it (in normalized form) was enqueued before
    ///
    /// Returns true if the URL was added. URLs that cannot be normalized are
    /// dropped.
    pub fn try_enqueue(&self, url: &str) -> bool {
        match normalize_url(url) {
            Ok(normalized) => self.insert(normalized.to_string()),
            Err(e) => {
                tracing::debug!("Dropping link {}: {}", url, e);
                false
            }
        }
    }

    fn insert(&self, normalized: String) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if !queue.seen.insert(normalized.clone()) {
            return false;
        }
        queue.pending.push_back(normalized);
        true
    }

    /// Takes the oldest pending URL, if any
    pub fn dequeue(&self) -> Option<String> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .pop_front()
    }

    /// Records an item identifier as published
    ///
    /// Returns true for the first caller only; the record of an identifier
    /// that was already marked must be discarded.
    pub fn mark_identifier_seen(&self, id: &str) -> bool {
        self.seen_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string())
    }

    pub fn is_identifier_seen(&self, id: &str) -> bool {
        self.seen_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Number of URLs waiting to be fetched
    pub fn pending_len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }

    /// Number of distinct URLs ever enqueued
    #[cfg(test)]
    fn seen_len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .seen
            .len()
    }
}
