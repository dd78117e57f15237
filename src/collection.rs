use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::error::ApiError;
use crate::models::{Page, PageItem};
use crate::session::Session;
use crate::settings::SETTINGS;
use crate::transport::ApiRequest;

/// Filter/sort parameters for a listing endpoint. Unset fields are omitted
/// from the query string; the 1-based `page` is appended per call by the
/// collection, never stored here.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub category: Option<String>,
    pub filter: Option<String>,
    pub query: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort key and direction, e.g. `("createdAt", "desc")`.
    pub fn sort(mut self, sort_by: &str, sort_type: &str) -> Self {
        self.sort_by = Some(sort_by.to_string());
        self.sort_type = Some(sort_type.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    /// Free-text search term.
    pub fn text(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    pub(crate) fn to_pairs(&self, page: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), page.to_string()),
            (
                "limit".to_string(),
                self.limit.unwrap_or(SETTINGS.default_page_size).to_string(),
            ),
        ];
        let optional = [
            ("sortBy", &self.sort_by),
            ("sortType", &self.sort_type),
            ("category", &self.category),
            ("filter", &self.filter),
            ("query", &self.query),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                if !value.is_empty() {
                    pairs.push((name.to_string(), value.clone()));
                }
            }
        }
        pairs
    }
}

struct PageState<T> {
    items: Vec<T>,
    // The next page number to request (1-based)
    cursor: u32,
    has_more: bool,
    total: Option<u64>,
    query: ListQuery,
}

/// Drives one list view's fetch/append/reset/mutate cycle against a listing
/// endpoint. One instance per view; clones share state, so a handle can be
/// held across suspension points while another part of the UI reads it.
///
/// Page loads are serialized by an in-flight gate, so only one outstanding
/// page request exists per collection and pages cannot land out of order.
/// A failed load leaves the existing sequence untouched.
pub struct PagedCollection<T> {
    path: String,
    state: Arc<RwLock<PageState<T>>>,
    loading: Arc<AtomicBool>,
    // Cleared by detach(); responses that land afterwards are dropped
    live: Arc<AtomicBool>,
}

impl<T> Clone for PagedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: self.state.clone(),
            loading: self.loading.clone(),
            live: self.live.clone(),
        }
    }
}

impl<T> PagedCollection<T>
where
    T: PageItem + DeserializeOwned + Clone,
{
    /// New empty collection for a listing path, e.g. [`crate::videos::VIDEOS_PATH`].
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            state: Arc::new(RwLock::new(PageState {
                items: Vec::new(),
                cursor: 1,
                has_more: true,
                total: None,
                query: ListQuery::default(),
            })),
            loading: Arc::new(AtomicBool::new(false)),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Reset the collection under a new query: fetch page 1, replace the
    /// sequence, set the cursor to 2. Returns `Ok(false)` without a network
    /// call if a load is already in flight, and drops the response if the
    /// collection was detached while waiting. On error the prior sequence
    /// and cursor are untouched.
    pub async fn load(&self, session: &Session, query: ListQuery) -> Result<bool, ApiError> {
        if self.loading.swap(true, Ordering::SeqCst) {
            debug!(path = %self.path, "Load skipped, request already in flight");
            return Ok(false);
        }
        // The gate stays held until the page is applied (or dropped), so no
        // other load can read or write the sequence mid-cycle.
        let page = match self.fetch_page(session, &query, 1).await {
            Ok(page) => page,
            Err(e) => {
                self.loading.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        if !self.live.load(Ordering::SeqCst) {
            trace!(path = %self.path, "Dropping page for detached collection");
            self.loading.store(false, Ordering::SeqCst);
            return Ok(false);
        }

        let mut state = self.state.write().await;
        debug!(path = %self.path, items = page.docs.len(), "Collection reset");
        state.items = page.docs;
        state.cursor = 2;
        state.has_more = page.has_next_page;
        state.total = page.total_docs;
        state.query = query;
        self.loading.store(false, Ordering::SeqCst);
        Ok(true)
    }

    /// Fetch the next page under the current query and append it, skipping
    /// items whose key is already present (guards against duplicate delivery
    /// on cursor races). `Ok(false)` and no network call when the listing is
    /// exhausted or a load is already in flight.
    pub async fn load_more(&self, session: &Session) -> Result<bool, ApiError> {
        if self.loading.swap(true, Ordering::SeqCst) {
            debug!(path = %self.path, "load_more skipped, request already in flight");
            return Ok(false);
        }
        // Cursor and query are read under the gate: a reset that won the gate
        // first has already applied its page, so the values seen here are
        // never stale.
        let (page_number, query) = {
            let state = self.state.read().await;
            if !state.has_more {
                trace!(path = %self.path, "No further pages available");
                self.loading.store(false, Ordering::SeqCst);
                return Ok(false);
            }
            (state.cursor, state.query.clone())
        };
        let page = match self.fetch_page(session, &query, page_number).await {
            Ok(page) => page,
            Err(e) => {
                self.loading.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        if !self.live.load(Ordering::SeqCst) {
            trace!(path = %self.path, "Dropping page for detached collection");
            self.loading.store(false, Ordering::SeqCst);
            return Ok(false);
        }

        let mut state = self.state.write().await;
        let existing: HashSet<String> = state.items.iter().map(|i| i.key().to_string()).collect();
        let mut appended = 0usize;
        for item in page.docs {
            if existing.contains(item.key()) {
                warn!(path = %self.path, key = %item.key(), "Skipping duplicate item in page");
                continue;
            }
            state.items.push(item);
            appended += 1;
        }
        state.cursor = page_number + 1;
        state.has_more = page.has_next_page;
        state.total = page.total_docs;
        debug!(path = %self.path, page = page_number, appended, "Page appended");
        self.loading.store(false, Ordering::SeqCst);
        Ok(true)
    }

    async fn fetch_page(
        &self,
        session: &Session,
        query: &ListQuery,
        page: u32,
    ) -> Result<Page<T>, ApiError> {
        let request = ApiRequest::get(&self.path).with_query(query.to_pairs(page));
        session.send::<Page<T>>(request).await
    }

    /// Remove an item by identity. Idempotent: removing an absent key is a
    /// no-op and returns false. The corresponding backend call is the
    /// caller's to make; if it fails, re-fetch with [`Self::load`] to
    /// reconcile.
    pub async fn remove(&self, key: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|item| item.key() != key);
        let removed = state.items.len() != before;
        if removed {
            if let Some(total) = state.total.as_mut() {
                *total = total.saturating_sub(1);
            }
            trace!(path = %self.path, key, "Item removed locally");
        }
        removed
    }

    /// Apply a speculative patch to the item with the given key for instant
    /// UI feedback, before the backend call resolves. Returns a
    /// [`PendingMutation`] holding the pre-mutation snapshot: call
    /// [`PendingMutation::confirm`] when the backend agrees, or
    /// [`PendingMutation::revert`] when it fails, so local state never
    /// permanently diverges from server truth.
    pub async fn begin_toggle<F>(&self, key: &str, patch: F) -> Option<PendingMutation<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.write().await;
        let index = state.items.iter().position(|item| item.key() == key)?;
        let snapshot = state.items[index].clone();
        patch(&mut state.items[index]);
        trace!(path = %self.path, key, "Optimistic patch applied");
        Some(PendingMutation {
            key: key.to_string(),
            index,
            snapshot,
        })
    }

    /// Drop this view's interest in in-flight responses. There is no request
    /// cancellation; a response arriving after detach is simply never
    /// applied.
    pub fn detach(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Snapshot of the current item sequence.
    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.key() == key)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    /// The next page number that will be requested.
    pub async fn cursor(&self) -> u32 {
        self.state.read().await.cursor
    }

    pub async fn has_more(&self) -> bool {
        self.state.read().await.has_more
    }

    /// Server-reported total item count, when the endpoint provides one.
    /// Display-only.
    pub async fn total(&self) -> Option<u64> {
        self.state.read().await.total
    }
}

/// Record of one unresolved optimistic mutation. Must be settled exactly one
/// way: confirmed (snapshot discarded) or reverted (snapshot reapplied).
#[must_use = "settle the mutation with confirm() or revert()"]
pub struct PendingMutation<T> {
    key: String,
    index: usize,
    snapshot: T,
}

impl<T> PendingMutation<T>
where
    T: PageItem + DeserializeOwned + Clone,
{
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backend confirmed the mutation; the speculative state is truth now.
    pub fn confirm(self) {}

    /// The backend rejected the mutation; restore the pre-mutation snapshot.
    /// If the item was removed in the meantime it is reinserted at its old
    /// position (clamped to the current length).
    pub async fn revert(self, collection: &PagedCollection<T>) {
        let mut state = collection.state.write().await;
        match state.items.iter_mut().find(|item| item.key() == self.key) {
            Some(item) => *item = self.snapshot,
            None => {
                let at = self.index.min(state.items.len());
                state.items.insert(at, self.snapshot);
            }
        }
        debug!(key = %self.key, "Optimistic patch reverted");
    }
}
