use std::fmt::Display;

use thiserror::Error;
use tracing::{error, info};

use crate::http::{SearchApi, Track};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub page: u32,
    pub page_size: u32,
}

impl SearchQuery {
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.page_size
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("Page {0} is before the first page")]
    BeforeFirstPage(u32),

    #[error("No results after page {0}")]
    NoMorePages(u32),

    #[error("Page {0} is still loading")]
    Loading(u32),
}

/// Search term, pagination and the current page of results.
///
/// `results` stays `None` until the first fetch succeeds so the UI can tell
/// "nothing searched yet" apart from "the search found nothing".
#[derive(Debug, Clone)]
pub struct ResultStore {
    term: String,
    page: u32,
    page_size: u32,
    loading: bool,
    results: Option<Vec<Track>>,
}

/// Clears the loading flag when dropped, including when the owning fetch
/// future is dropped mid-flight.
struct LoadingGuard<'a> {
    store: &'a mut ResultStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.loading = false;
    }
}

impl ResultStore {
    pub fn new(page_size: u32) -> Self {
        Self {
            term: String::new(),
            page: 1,
            page_size: page_size.max(1),
            loading: false,
            results: None,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn results(&self) -> Option<&[Track]> {
        self.results.as_deref()
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            term: self.term.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Tracks shown to the user: only those with a playable preview.
    pub fn filtered(&self) -> Option<Vec<&Track>> {
        self.results
            .as_ref()
            .map(|tracks| tracks.iter().filter(|t| t.is_playable()).collect())
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.results
            .as_ref()
            .is_some_and(|tracks| tracks.len() >= self.page_size as usize)
    }

    /// Pagination is pointless on a first page that did not fill up, and
    /// hidden while a page is loading.
    pub fn shows_pagination(&self) -> bool {
        !self.loading
            && self.results.is_some()
            && (self.has_previous_page() || self.has_next_page())
    }

    /// Forward moves are judged on the current page's own results, so they
    /// wait until that page has landed.
    pub fn check_page(&self, page: u32) -> Result<(), PageError> {
        if page < 1 {
            return Err(PageError::BeforeFirstPage(page));
        }
        if page > self.page && self.loading {
            return Err(PageError::Loading(self.page));
        }
        if page > self.page && !self.has_next_page() {
            return Err(PageError::NoMorePages(self.page));
        }
        Ok(())
    }

    /// Stores the term and rewinds to the first page.
    pub fn prepare_search(&mut self, term: impl Into<String>) {
        self.set_term(term);
        self.set_page(1);
    }

    pub fn prepare_page(&mut self, page: u32) -> Result<(), PageError> {
        self.check_page(page)?;
        self.set_page(page);
        Ok(())
    }

    /// Marks the store as loading and returns the query to send.
    pub fn begin_fetch(&mut self) -> SearchQuery {
        self.loading = true;
        self.query()
    }

    pub fn complete_fetch(&mut self, tracks: Vec<Track>) -> &[Track] {
        self.loading = false;
        info!(count = tracks.len(), page = self.page, "results_replaced");
        self.results.insert(tracks)
    }

    /// Logs the failure and keeps the previous results visible.
    pub fn fail_fetch(&mut self, err: impl Display) {
        self.loading = false;
        error!(term = self.term.as_str(), page = self.page, "fetch_failed: {err}");
    }

    pub async fn fetch_results<A>(&mut self, api: &A) -> Option<Vec<Track>>
    where
        A: SearchApi + ?Sized,
    {
        let query = self.begin_fetch();
        let guard = LoadingGuard { store: self };

        match api.search(&query).await {
            Ok(tracks) => Some(guard.store.complete_fetch(tracks).to_vec()),
            Err(e) => {
                guard.store.fail_fetch(e);
                None
            }
        }
    }

    pub async fn search<A>(&mut self, term: impl Into<String>, api: &A) -> Option<Vec<Track>>
    where
        A: SearchApi + ?Sized,
    {
        self.prepare_search(term);
        self.fetch_results(api).await
    }

    pub async fn change_page<A>(
        &mut self,
        page: u32,
        api: &A,
    ) -> Result<Option<Vec<Track>>, PageError>
    where
        A: SearchApi + ?Sized,
    {
        self.prepare_page(page)?;
        Ok(self.fetch_results(api).await)
    }
}
