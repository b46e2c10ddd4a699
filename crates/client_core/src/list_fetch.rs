//! Owner of everything the sales-rep table shows.
//!
//! Every fetch is tagged with a [`Generation`]. A response only lands if its
//! generation is still the newest one issued; anything older is dropped, so
//! the visible list always belongs to the most recent request no matter in
//! which order the network delivers responses.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{FilterField, FilterSet, PageCursor, RecordId},
    error::{FailureKind, FetchError},
    protocol::{SalesRep, SalesRepPage},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    generation::{Generation, GenerationCounter},
    pagination::{self, PageControls},
    query::{build_query, ListQuery},
    transport::{with_timeout, SearchApi},
};

pub const EMPTY_LIST_MESSAGE: &str = "No sales representatives found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub items: Vec<SalesRep>,
    pub total_pages: u32,
    pub total_items: u64,
}

impl Default for ListResult {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
            total_items: 0,
        }
    }
}

impl From<SalesRepPage> for ListResult {
    fn from(page: SalesRepPage) -> Self {
        let total_pages = page.total_pages();
        let total_items = page.total_items();
        Self {
            items: page.data,
            total_pages,
            total_items,
        }
    }
}

impl ListResult {
    pub fn keys(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.items.iter().filter_map(SalesRep::key)
    }

    pub fn find(&self, key: RecordId) -> Option<&SalesRep> {
        self.items.iter().find(|rep| rep.key() == Some(key))
    }
}

#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub phase: ListPhase,
    pub generation: Generation,
    /// Filters as currently typed, not yet necessarily submitted.
    pub draft: FilterSet,
    /// Filters of the most recently issued request.
    pub filters: FilterSet,
    pub cursor: PageCursor,
    pub result: ListResult,
    pub last_failure: Option<FailureKind>,
}

impl ListSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn controls(&self) -> PageControls {
        PageControls::new(self.cursor.page, self.result.total_pages)
    }

    pub fn summary(&self) -> String {
        if self.result.items.is_empty() {
            return EMPTY_LIST_MESSAGE.to_string();
        }
        format!(
            "Showing {} of {} sales representatives",
            self.result.items.len(),
            self.result.total_items
        )
    }
}

/// A request that has been issued but whose response has not been applied.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub generation: Generation,
    pub cursor: PageCursor,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied(ListPhase),
    /// A newer request was issued before this response arrived.
    Discarded,
    /// The page move was not allowed by the current bounds; nothing was sent.
    Blocked,
}

struct ListState {
    generations: GenerationCounter,
    phase: ListPhase,
    draft: FilterSet,
    filters: FilterSet,
    cursor: PageCursor,
    result: ListResult,
    total_pages_known: Option<u32>,
    last_failure: Option<FailureKind>,
}

pub struct ListFetchController {
    api: Arc<dyn SearchApi>,
    request_timeout: Duration,
    inner: Mutex<ListState>,
}

impl ListFetchController {
    pub fn new(api: Arc<dyn SearchApi>, page_size: u32, request_timeout: Duration) -> Self {
        Self {
            api,
            request_timeout,
            inner: Mutex::new(ListState {
                generations: GenerationCounter::default(),
                phase: ListPhase::Idle,
                draft: FilterSet::default(),
                filters: FilterSet::default(),
                cursor: PageCursor::first(page_size),
                result: ListResult::default(),
                total_pages_known: None,
                last_failure: None,
            }),
        }
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.inner.lock().await;
        ListSnapshot {
            phase: state.phase,
            generation: state.generations.current(),
            draft: state.draft.clone(),
            filters: state.filters.clone(),
            cursor: state.cursor,
            result: state.result.clone(),
            last_failure: state.last_failure,
        }
    }

    /// Edits the draft filters. Does not fetch; see [`Self::submit_search`].
    pub async fn edit_filter(&self, field: FilterField, value: impl Into<String>) {
        self.inner.lock().await.draft.set(field, value);
    }

    /// Issues a fetch for `filters` at `cursor` and applies its response if it
    /// is still the newest request when it arrives.
    ///
    /// If the server reports fewer pages than the one requested, the last
    /// reported page is fetched once more so the rows match the cursor.
    pub async fn request_list(&self, filters: FilterSet, cursor: PageCursor) -> FetchOutcome {
        let (requested, outcome) = self.fetch_once(filters, cursor).await;
        if outcome != FetchOutcome::Applied(ListPhase::Success) {
            return outcome;
        }
        let Some((filters, cursor)) = self.pulled_back(&requested).await else {
            return outcome;
        };
        debug!(
            requested = requested.cursor.page,
            page = cursor.page,
            "list: requested page past the end; loading last page"
        );
        self.fetch_once(filters, cursor).await.1
    }

    async fn fetch_once(
        &self,
        filters: FilterSet,
        cursor: PageCursor,
    ) -> (PendingFetch, FetchOutcome) {
        let pending = self.begin_fetch(filters, cursor).await;
        let response = with_timeout(self.request_timeout, self.api.search(&pending.query)).await;
        let outcome = self.apply_response(pending.generation, response).await;
        (pending, outcome)
    }

    /// The request to re-issue when the response to `pending` landed and
    /// pulled the cursor back from a page past the reported end.
    async fn pulled_back(&self, pending: &PendingFetch) -> Option<(FilterSet, PageCursor)> {
        let state = self.inner.lock().await;
        let pulled_back = state.cursor.page < pending.cursor.page;
        (state.generations.is_current(pending.generation) && pulled_back)
            .then(|| (state.filters.clone(), state.cursor))
    }

    /// Applies the draft filters from page 1.
    pub async fn submit_search(&self) -> FetchOutcome {
        let (filters, cursor) = {
            let state = self.inner.lock().await;
            (state.draft.clone(), PageCursor::first(state.cursor.page_size))
        };
        self.request_list(filters, cursor).await
    }

    /// Resets the filters and page, then fetches. Repeated calls converge on
    /// the same filters and cursor.
    pub async fn clear(&self) -> FetchOutcome {
        let cursor = {
            let mut state = self.inner.lock().await;
            state.draft = FilterSet::default();
            PageCursor::first(state.cursor.page_size)
        };
        self.request_list(FilterSet::default(), cursor).await
    }

    pub async fn refresh(&self) -> FetchOutcome {
        let (filters, cursor) = self.current_request().await;
        self.request_list(filters, cursor).await
    }

    pub async fn go_to_page(&self, page: i64) -> FetchOutcome {
        let (filters, cursor) = {
            let state = self.inner.lock().await;
            let page = pagination::clamp_known(page, state.total_pages_known);
            (state.filters.clone(), state.cursor.with_page(page))
        };
        self.request_list(filters, cursor).await
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let (page, total_pages) = self.position().await;
        if !pagination::can_go_next(page, total_pages) {
            return FetchOutcome::Blocked;
        }
        self.go_to_page(i64::from(page) + 1).await
    }

    pub async fn prev_page(&self) -> FetchOutcome {
        let (page, _) = self.position().await;
        if !pagination::can_go_prev(page) {
            return FetchOutcome::Blocked;
        }
        self.go_to_page(i64::from(page) - 1).await
    }

    /// Changes the page size and fetches from page 1 with the active filters.
    pub async fn set_page_size(&self, page_size: u32) -> FetchOutcome {
        let filters = {
            let mut state = self.inner.lock().await;
            // Old bounds no longer describe the new page size.
            state.total_pages_known = None;
            state.filters.clone()
        };
        self.request_list(filters, PageCursor::first(page_size)).await
    }

    /// Transition into `Loading` for a new generation.
    pub async fn begin_fetch(&self, filters: FilterSet, cursor: PageCursor) -> PendingFetch {
        let mut state = self.inner.lock().await;
        let page = pagination::clamp_known(i64::from(cursor.page), state.total_pages_known);
        let cursor = cursor.with_page(page);
        let generation = state.generations.advance();
        let query = build_query(&filters, cursor);

        state.phase = ListPhase::Loading;
        state.filters = filters;
        state.cursor = cursor;

        debug!(
            generation = generation.0,
            page = cursor.page,
            page_size = cursor.page_size,
            "list: fetch issued"
        );
        PendingFetch {
            generation,
            cursor,
            query,
        }
    }

    /// Transition out of `Loading` for `generation`, or drop the response if a
    /// newer fetch has been issued since.
    pub async fn apply_response(
        &self,
        generation: Generation,
        response: Result<SalesRepPage, FetchError>,
    ) -> FetchOutcome {
        let mut state = self.inner.lock().await;
        if !state.generations.is_current(generation) {
            debug!(
                generation = generation.0,
                current = state.generations.current().0,
                "list: stale response discarded"
            );
            return FetchOutcome::Discarded;
        }

        match response {
            Ok(page) => {
                let result = ListResult::from(page);
                let total_pages = result.total_pages;
                if state.cursor.page > total_pages {
                    state.cursor = state.cursor.with_page(total_pages);
                }
                info!(
                    generation = generation.0,
                    page = state.cursor.page,
                    total_pages,
                    total_items = result.total_items,
                    "list: page loaded"
                );
                state.result = result;
                state.total_pages_known = Some(total_pages);
                state.last_failure = None;
                state.phase = ListPhase::Success;
            }
            Err(err) => {
                let kind = err.kind();
                warn!(
                    generation = generation.0,
                    kind = kind.as_str(),
                    error = %err,
                    "list: fetch failed; keeping last good page"
                );
                state.last_failure = Some(kind);
                state.phase = ListPhase::Error;
            }
        }
        FetchOutcome::Applied(state.phase)
    }

    async fn current_request(&self) -> (FilterSet, PageCursor) {
        let state = self.inner.lock().await;
        (state.filters.clone(), state.cursor)
    }

    async fn position(&self) -> (u32, u32) {
        let state = self.inner.lock().await;
        (state.cursor.page, state.result.total_pages)
    }
}

#[cfg(test)]
#[path = "tests/list_fetch_tests.rs"]
mod tests;
