//! # atrium-state
//!
//! The list-detail view state engine every console screen follows.
//!
//! A [`ListView`] holds the full fetched collection for one entity type and
//! applies everything else client-side: substring filtering, selection
//! tracking, and sequential bulk mutation. No server-side pagination or
//! filtering is assumed — the view owns a complete snapshot and mutates it
//! in place on successful actions instead of refetching.

use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, warn};
use uuid::Uuid;

use atrium_core::{Listable, Result};

/// Load state of an entity list: `loading → loaded` on the happy path,
/// `loading → error` on fetch failure. Recovery from `Error` is only by
/// navigating back (a fresh `begin_load`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Error(String),
}

/// Extra filter predicate applied on top of the substring query
/// (status equality, owning-KB equality, and the like).
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Client-side state for one entity list screen.
pub struct ListView<T: Listable> {
    state: LoadState,
    items: Vec<T>,
    query: Option<String>,
    predicate: Option<Predicate<T>>,
    selection: HashSet<Uuid>,
}

impl<T: Listable + Clone> ListView<T> {
    /// A view that starts in `Loading`.
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            items: Vec::new(),
            query: None,
            predicate: None,
            selection: HashSet::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Transition (back) into `Loading`, clearing stale items and
    /// selection. Filters survive a reload.
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
        self.items.clear();
        self.selection.clear();
    }

    /// Complete a load with the fetch result.
    pub fn finish_load(&mut self, result: Result<Vec<T>>) {
        match result {
            Ok(items) => {
                debug!(result_count = items.len(), "list loaded");
                self.items = items;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(error = %e, "list load failed");
                self.state = LoadState::Error(e.to_string());
            }
        }
    }

    /// The full fetched collection, unfiltered.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    // ------------------------------------------------------------------
    // Filtering — a pure projection over the fetched collection. Setting
    // and then clearing the filter always restores the original view.
    // ------------------------------------------------------------------

    /// Set the substring query (case-insensitive match on the entity's
    /// haystack). An empty string clears the query.
    pub fn set_query(&mut self, query: &str) {
        let trimmed = query.trim();
        self.query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
    }

    /// Set an extra predicate (status equality, owning-KB equality).
    pub fn set_predicate(&mut self, predicate: Predicate<T>) {
        self.predicate = Some(predicate);
    }

    /// Drop the query and any predicate.
    pub fn clear_filters(&mut self) {
        self.query = None;
        self.predicate = None;
    }

    fn matches(&self, item: &T) -> bool {
        if let Some(query) = &self.query {
            if !item.haystack().to_lowercase().contains(query.as_str()) {
                return false;
            }
        }
        if let Some(predicate) = &self.predicate {
            if !predicate(item) {
                return false;
            }
        }
        true
    }

    /// The currently visible (filtered) items.
    pub fn visible(&self) -> Vec<&T> {
        self.items.iter().filter(|i| self.matches(i)).collect()
    }

    // ------------------------------------------------------------------
    // Selection — a set of entity ids over the filtered view.
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &HashSet<Uuid> {
        &self.selection
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selection.contains(&id)
    }

    /// Toggle one item's selection.
    pub fn toggle_select(&mut self, id: Uuid) {
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Toggle between empty and full selection of the currently filtered
    /// view: if every visible item is already selected, clear; otherwise
    /// select all visible.
    pub fn toggle_select_all(&mut self) {
        let visible: HashSet<Uuid> = self.visible().iter().map(|i| i.id()).collect();
        if !visible.is_empty() && visible.iter().all(|id| self.selection.contains(id)) {
            self.selection.clear();
        } else {
            self.selection = visible;
        }
    }

    // ------------------------------------------------------------------
    // Local mutation — applied without a refetch.
    // ------------------------------------------------------------------

    /// Prepend a newly created entity so it appears at the head of the
    /// list without a full reload.
    pub fn insert_head(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Replace the entity with the same id, if present.
    pub fn replace(&mut self, item: T) {
        if let Some(slot) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *slot = item;
        }
    }

    /// Remove an entity from the collection and from the selection set.
    pub fn remove(&mut self, id: Uuid) {
        self.items.retain(|i| i.id() != id);
        self.selection.remove(&id);
    }

    // ------------------------------------------------------------------
    // Bulk actions — dispatched individually per selected id in a
    // sequential loop. No batched endpoint, no partial-failure rollback:
    // the first failure aborts the loop and already-applied mutations
    // stay in place.
    // ------------------------------------------------------------------

    /// Run a removing action (delete, hard-archive) over the selection.
    /// Each success removes the item locally; returns how many were
    /// applied, or the first error after a partial run.
    pub async fn remove_selected<F, Fut>(&mut self, mut op: F) -> Result<usize>
    where
        F: FnMut(Uuid) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let targets = self.selected_in_order();
        let mut applied = 0usize;
        for id in targets {
            match op(id).await {
                Ok(()) => {
                    self.remove(id);
                    applied += 1;
                }
                Err(e) => {
                    warn!(applied_count = applied, error = %e, "bulk remove aborted");
                    return Err(e);
                }
            }
        }
        debug!(applied_count = applied, "bulk remove complete");
        Ok(applied)
    }

    /// Run an updating action (pause, resume, archive, trigger-sync) over
    /// the selection. Each success replaces the local entity with the
    /// returned one; the first failure aborts the loop.
    pub async fn update_selected<F, Fut>(&mut self, mut op: F) -> Result<usize>
    where
        F: FnMut(Uuid) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let targets = self.selected_in_order();
        let mut applied = 0usize;
        for id in targets {
            match op(id).await {
                Ok(updated) => {
                    self.replace(updated);
                    applied += 1;
                }
                Err(e) => {
                    warn!(applied_count = applied, error = %e, "bulk update aborted");
                    return Err(e);
                }
            }
        }
        debug!(applied_count = applied, "bulk update complete");
        Ok(applied)
    }

    // Selected ids in display order, so bulk loops are deterministic.
    fn selected_in_order(&self) -> Vec<Uuid> {
        self.items
            .iter()
            .map(|i| i.id())
            .filter(|id| self.selection.contains(id))
            .collect()
    }
}

impl<T: Listable + Clone> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}
