//! Cursor pagination over the image service.
//!
//! The controller owns every fetched page and is only mutated through
//! [`PaginationController::fetch_first`], [`PaginationController::fetch_next`],
//! [`PaginationController::invalidate`] and [`PaginationController::apply`].
//! Each first-page fetch opens a new generation; results tagged with an older
//! generation are dropped so a slow response can never overwrite newer data.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::NetworkError;
use crate::model::{Cursor, ImageId, ImageRecord, Page};

/// Identifies one issued page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub generation: u64,
    pub cursor: Option<Cursor>,
}

impl PageRequest {
    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.cursor.is_none()
    }
}

/// What the gallery should show for the list as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Loading,
    Error,
    Ready,
    FetchingMore,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Loading,
    Failed(NetworkError),
    Ready,
}

/// Outcome of feeding a response back into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    FirstPage,
    NextPage,
    FirstPageFailed,
    NextPageFailed,
    Stale,
}

#[derive(Debug, Default)]
pub struct PaginationController {
    pages: Vec<Page>,
    phase: Phase,
    fetching_more: Option<Cursor>,
    load_more_error: Option<NetworkError>,
    generation: u64,
}

impl PaginationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts over from the first page, dropping everything fetched so far.
    pub fn fetch_first(&mut self) -> PageRequest {
        self.generation += 1;
        self.pages.clear();
        self.phase = Phase::Loading;
        self.fetching_more = None;
        self.load_more_error = None;
        debug!(generation = self.generation, "first page requested");

        PageRequest {
            generation: self.generation,
            cursor: None,
        }
    }

    /// Requests the page after the last one, unless there is none or one is already in flight.
    pub fn fetch_next(&mut self) -> Option<PageRequest> {
        if !self.can_fetch_next() {
            return None;
        }
        let cursor = self.next_cursor()?.clone();

        self.fetching_more = Some(cursor.clone());
        self.load_more_error = None;
        debug!(generation = self.generation, cursor = %cursor, "next page requested");

        Some(PageRequest {
            generation: self.generation,
            cursor: Some(cursor),
        })
    }

    /// Re-issues the next-page request that last failed. No-op when nothing failed.
    pub fn retry_next(&mut self) -> Option<PageRequest> {
        self.load_more_error.as_ref()?;
        self.fetch_next()
    }

    /// Same as [`Self::fetch_first`]; used after the collection changed server-side.
    pub fn invalidate(&mut self) -> PageRequest {
        info!(cached_pages = self.pages.len(), "feed invalidated");
        self.fetch_first()
    }

    pub fn apply(&mut self, request: &PageRequest, result: Result<Page, NetworkError>) -> Applied {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                "stale page response dropped"
            );
            return Applied::Stale;
        }

        match &request.cursor {
            None => {
                if self.phase != Phase::Loading {
                    return Applied::Stale;
                }
                match result {
                    Ok(page) => {
                        info!(items = page.items.len(), has_more = !page.is_last(), "first page loaded");
                        self.pages = vec![page];
                        self.phase = Phase::Ready;
                        Applied::FirstPage
                    }
                    Err(e) => {
                        warn!(error = %e, "first page failed");
                        self.pages.clear();
                        self.phase = Phase::Failed(e);
                        Applied::FirstPageFailed
                    }
                }
            }
            Some(cursor) => {
                if self.fetching_more.as_ref() != Some(cursor) {
                    return Applied::Stale;
                }
                self.fetching_more = None;
                match result {
                    Ok(page) => {
                        info!(
                            items = page.items.len(),
                            pages = self.pages.len() + 1,
                            has_more = !page.is_last(),
                            "next page loaded"
                        );
                        self.pages.push(page);
                        Applied::NextPage
                    }
                    Err(e) => {
                        // Already loaded pages stay visible.
                        warn!(error = %e, cursor = %cursor, "next page failed");
                        self.load_more_error = Some(e);
                        Applied::NextPageFailed
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> FeedStatus {
        match self.phase {
            Phase::Idle | Phase::Loading => FeedStatus::Loading,
            Phase::Failed(_) => FeedStatus::Error,
            Phase::Ready if self.fetching_more.is_some() => FeedStatus::FetchingMore,
            Phase::Ready => FeedStatus::Ready,
        }
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[must_use]
    pub fn error(&self) -> Option<&NetworkError> {
        match &self.phase {
            Phase::Failed(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn load_more_error(&self) -> Option<&NetworkError> {
        self.load_more_error.as_ref()
    }

    #[must_use]
    pub fn is_fetching_more(&self) -> bool {
        self.fetching_more.is_some()
    }

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next cursor of the last fetched page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.pages.last().and_then(Page::next_cursor)
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.phase == Phase::Ready && self.next_cursor().is_some()
    }

    #[must_use]
    pub fn can_fetch_next(&self) -> bool {
        self.has_next_page() && self.fetching_more.is_none()
    }

    /// All items in fetch order.
    pub fn items(&self) -> impl Iterator<Item = &ImageRecord> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    #[must_use]
    pub fn find(&self, id: &ImageId) -> Option<&ImageRecord> {
        self.items().find(|record| &record.id == id)
    }
}

/// Concatenates the items of `pages` in order. No reordering, no dedup.
#[must_use]
pub fn flatten(pages: &[Page]) -> Vec<ImageRecord> {
    pages.iter().flat_map(|page| page.items.iter().cloned()).collect()
}
