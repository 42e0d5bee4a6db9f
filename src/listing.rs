//! Company listing state
//!
//! Holds the page of companies shown by the listing screen and the query that
//! produced it. Every fetch is split in two halves: `begin_*` records the
//! intent and returns the typed query plus a [`FetchTicket`]; [`CompanyListing::apply`]
//! takes the ticket back together with the backend result. Results carrying a
//! ticket older than the latest request are dropped, so a slow response can
//! never overwrite a newer one. The `async` helpers run both halves in one go
//! for callers that are happy to wait.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, CompanyApi};
use crate::i18n::keys;
use crate::models::{BlueTickStatus, Company, CompanyFilter, CompanyListQuery, CompanyPage, ROWS_PER_PAGE_OPTIONS};
use crate::presentation::Phrase;

#[derive(Error, Debug, PartialEq)]
pub enum ListingError {
    #[error("Page size {0} is not one of the offered sizes")]
    InvalidPageSize(u32),

    #[error("Page numbers start at 1")]
    InvalidPage,
}

/// Progress of the initial load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready,
}

/// What the listing screen should render
#[derive(Debug, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    Failed(&'a str),
    Empty,
    Table(&'a [Company]),
}

/// Which interaction started a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Search,
    Page,
    RowsPerPage,
    Filter,
}

impl FetchKind {
    fn replaces_count(&self) -> bool {
        matches!(self, FetchKind::Initial | FetchKind::Filter)
    }
}

/// Receipt for an in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub kind: FetchKind,
}

/// Entry of the filter menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOption {
    /// Set on the first option of a group
    pub group_title: Option<Phrase>,
    pub label: Phrase,
    pub filter: CompanyFilter,
    pub icon: &'static str,
}

static FILTER_OPTIONS: [FilterOption; 7] = [
    FilterOption {
        group_title: Some(&[keys::BLUE, keys::TICK, keys::STATUS]),
        label: &[keys::ACCEPTED],
        filter: CompanyFilter::Status(BlueTickStatus::Accepted),
        icon: "FiCheck",
    },
    FilterOption {
        group_title: None,
        label: &[keys::REJECTED],
        filter: CompanyFilter::Status(BlueTickStatus::Rejected),
        icon: "FiX",
    },
    FilterOption {
        group_title: None,
        label: &[keys::PENDING],
        filter: CompanyFilter::Status(BlueTickStatus::InProgress),
        icon: "FiLoader",
    },
    FilterOption {
        group_title: None,
        label: &[keys::CANCELED],
        filter: CompanyFilter::Status(BlueTickStatus::Canceled),
        icon: "FiAlertCircle",
    },
    FilterOption {
        group_title: None,
        label: &[keys::NO, keys::REQUEST],
        filter: CompanyFilter::Status(BlueTickStatus::NotRequested),
        icon: "FiMinus",
    },
    FilterOption {
        group_title: Some(&[keys::COMPANY, keys::STATUS]),
        label: &[keys::IS_LEADER],
        filter: CompanyFilter::Leader,
        icon: "FiAward",
    },
    FilterOption {
        group_title: None,
        label: &[keys::IS_STORE],
        filter: CompanyFilter::Store,
        icon: "FiShoppingBag",
    },
];

/// Filter menu in display order
pub fn filter_options() -> &'static [FilterOption] {
    &FILTER_OPTIONS
}

/// Local copy of the company list and the query behind it
#[derive(Debug)]
pub struct CompanyListing {
    rows: Vec<Company>,
    count: u64,
    query: CompanyListQuery,
    load_state: LoadState,
    busy: bool,
    inline_error: Option<String>,
    generation: u64,
}

impl Default for CompanyListing {
    fn default() -> Self {
        Self::new(ROWS_PER_PAGE_OPTIONS[0])
    }
}

impl CompanyListing {
    pub fn new(default_page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            count: 0,
            query: CompanyListQuery {
                size: default_page_size,
                ..Default::default()
            },
            load_state: LoadState::Loading,
            busy: false,
            inline_error: None,
            generation: 0,
        }
    }

    /// Listing whose first load uses `query` as is
    pub fn with_query(query: CompanyListQuery) -> Result<Self, ListingError> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&query.size) {
            return Err(ListingError::InvalidPageSize(query.size));
        }
        if query.page == 0 {
            return Err(ListingError::InvalidPage);
        }
        Ok(Self {
            query,
            ..Self::default()
        })
    }

    pub fn rows(&self) -> &[Company] {
        &self.rows
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn query(&self) -> &CompanyListQuery {
        &self.query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// A fetch started after the initial load is still running
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Error of the last failed search, page or filter fetch
    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.query.size.max(1));
        (self.count.div_ceil(size)).max(1) as u32
    }

    pub fn view(&self) -> ListingView<'_> {
        match &self.load_state {
            LoadState::Loading => ListingView::Loading,
            LoadState::Failed(message) => ListingView::Failed(message),
            LoadState::Ready if self.count == 0 => ListingView::Empty,
            LoadState::Ready => ListingView::Table(&self.rows),
        }
    }

    /// First fetch, also used by retry
    pub fn begin_load(&mut self) -> (FetchTicket, CompanyListQuery) {
        self.load_state = LoadState::Loading;
        self.issue(FetchKind::Initial)
    }

    pub fn begin_search(&mut self, text: &str) -> (FetchTicket, CompanyListQuery) {
        let text = text.trim();
        self.query.search = (!text.is_empty()).then(|| text.to_string());
        self.query.page = 1;
        self.issue(FetchKind::Search)
    }

    pub fn begin_change_page(&mut self, page: u32) -> Result<(FetchTicket, CompanyListQuery), ListingError> {
        if page == 0 {
            return Err(ListingError::InvalidPage);
        }
        self.query.page = page;
        Ok(self.issue(FetchKind::Page))
    }

    pub fn begin_change_rows_per_page(
        &mut self,
        size: u32,
        page: u32,
    ) -> Result<(FetchTicket, CompanyListQuery), ListingError> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&size) {
            return Err(ListingError::InvalidPageSize(size));
        }
        if page == 0 {
            return Err(ListingError::InvalidPage);
        }
        self.query.size = size;
        self.query.page = page;
        Ok(self.issue(FetchKind::RowsPerPage))
    }

    /// Apply or clear (`None`) a server-side filter
    pub fn begin_filter(&mut self, filter: Option<CompanyFilter>) -> (FetchTicket, CompanyListQuery) {
        self.query.filter = filter;
        self.query.page = 1;
        self.issue(FetchKind::Filter)
    }

    /// Forget every in-flight fetch, e.g. when the screen is left
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.busy = false;
    }

    fn issue(&mut self, kind: FetchKind) -> (FetchTicket, CompanyListQuery) {
        self.generation += 1;
        self.inline_error = None;
        self.busy = kind != FetchKind::Initial;
        debug!("Company fetch #{} ({:?}): {:?}", self.generation, kind, self.query);
        (
            FetchTicket {
                generation: self.generation,
                kind,
            },
            self.query.clone(),
        )
    }

    /// Apply a fetch result; returns `false` when the ticket is stale
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<CompanyPage, ApiError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale company fetch #{} (current #{})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.busy = false;

        match result {
            Ok(page) => {
                if ticket.kind.replaces_count() {
                    self.count = page.count;
                }
                self.rows = page.data;
                self.load_state = LoadState::Ready;
                info!("Loaded {} companies ({} total)", self.rows.len(), self.count);
            }
            Err(e) => {
                warn!("Company fetch ({:?}) failed: {}", ticket.kind, e);
                if ticket.kind == FetchKind::Initial {
                    self.load_state = LoadState::Failed(e.to_string());
                } else {
                    self.inline_error = Some(e.to_string());
                }
            }
        }
        true
    }

    async fn run(&mut self, api: &dyn CompanyApi, (ticket, query): (FetchTicket, CompanyListQuery)) {
        let result = api.list_companies(&query).await;
        self.apply(ticket, result);
    }

    pub async fn load(&mut self, api: &dyn CompanyApi) {
        let request = self.begin_load();
        self.run(api, request).await;
    }

    /// Repeat the initial fetch after a failure
    pub async fn retry(&mut self, api: &dyn CompanyApi) {
        self.load(api).await;
    }

    pub async fn search(&mut self, api: &dyn CompanyApi, text: &str) {
        let request = self.begin_search(text);
        self.run(api, request).await;
    }

    pub async fn change_page(&mut self, api: &dyn CompanyApi, page: u32) -> Result<(), ListingError> {
        let request = self.begin_change_page(page)?;
        self.run(api, request).await;
        Ok(())
    }

    pub async fn change_rows_per_page(
        &mut self,
        api: &dyn CompanyApi,
        size: u32,
        page: u32,
    ) -> Result<(), ListingError> {
        let request = self.begin_change_rows_per_page(size, page)?;
        self.run(api, request).await;
        Ok(())
    }

    pub async fn filter(&mut self, api: &dyn CompanyApi, filter: Option<CompanyFilter>) {
        let request = self.begin_filter(filter);
        self.run(api, request).await;
    }

    pub async fn clear_filter(&mut self, api: &dyn CompanyApi) {
        self.filter(api, None).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{page_of, FakeApi};

    #[tokio::test]
    async fn test_initial_load_sets_rows_and_count() {
        let api = FakeApi::new();
        api.push_page(page_of(3, 120));

        let mut listing = CompanyListing::default();
        assert_eq!(listing.view(), ListingView::Loading);

        listing.load(&api).await;
        assert_eq!(listing.rows().len(), 3);
        assert_eq!(listing.count(), 120);
        assert_eq!(listing.total_pages(), 3);
        assert!(matches!(listing.view(), ListingView::Table(rows) if rows.len() == 3));

        let calls = api.list_calls.lock().unwrap();
        assert_eq!(calls[0], CompanyListQuery::default());
    }

    #[tokio::test]
    async fn test_zero_count_renders_empty_state() {
        let api = FakeApi::new();
        api.push_page(page_of(0, 0));

        let mut listing = CompanyListing::default();
        listing.load(&api).await;
        assert_eq!(listing.view(), ListingView::Empty);
    }

    #[tokio::test]
    async fn test_failed_load_offers_retry() {
        let api = FakeApi::new();
        api.push_list_error(ApiError::MissingData("getCompanyList"));
        api.push_page(page_of(1, 1));

        let mut listing = CompanyListing::default();
        listing.load(&api).await;
        assert!(matches!(listing.view(), ListingView::Failed(msg) if msg.contains("getCompanyList")));

        listing.retry(&api).await;
        assert!(matches!(listing.view(), ListingView::Table(_)));
        assert_eq!(api.list_call_count(), 2);
    }

    #[tokio::test]
    async fn test_rows_per_page_change_fetches_once() {
        let api = FakeApi::new();
        api.push_page(page_of(50, 400));
        api.push_page(page_of(60, 999));

        let mut listing = CompanyListing::default();
        listing.load(&api).await;
        listing.change_rows_per_page(&api, 60, 3).await.unwrap();

        assert_eq!(api.list_call_count(), 2);
        let calls = api.list_calls.lock().unwrap();
        assert_eq!(calls[1].size, 60);
        assert_eq!(calls[1].page, 3);
        assert_eq!(listing.rows().len(), 60);
        // Page fetches replace rows only
        assert_eq!(listing.count(), 400);
    }

    #[tokio::test]
    async fn test_rejects_unknown_page_size() {
        let api = FakeApi::new();
        let mut listing = CompanyListing::default();
        let err = listing.change_rows_per_page(&api, 65, 1).await.unwrap_err();
        assert_eq!(err, ListingError::InvalidPageSize(65));
        assert_eq!(api.list_call_count(), 0);
    }

    #[tokio::test]
    async fn test_filter_replaces_rows_and_count() {
        let api = FakeApi::new();
        api.push_page(page_of(50, 400));
        api.push_page(page_of(2, 2));

        let mut listing = CompanyListing::default();
        listing.load(&api).await;
        listing.change_page(&api, 4).await.unwrap();
        api.push_page(page_of(2, 2));
        listing
            .filter(&api, Some(CompanyFilter::Status(BlueTickStatus::InProgress)))
            .await;

        assert_eq!(listing.count(), 2);
        assert_eq!(listing.rows().len(), 2);
        {
            let calls = api.list_calls.lock().unwrap();
            let last = calls.last().unwrap();
            assert_eq!(last.page, 1);
            assert_eq!(last.filter, Some(CompanyFilter::Status(BlueTickStatus::InProgress)));
        }

        api.push_page(page_of(50, 400));
        listing.clear_filter(&api).await;
        assert_eq!(listing.query().filter, None);
        assert_eq!(listing.count(), 400);
    }

    #[tokio::test]
    async fn test_search_keeps_count_and_filter() {
        let api = FakeApi::new();
        api.push_page(page_of(50, 400));
        api.push_page(page_of(4, 4));

        let mut listing = CompanyListing::default();
        listing.load(&api).await;
        listing.search(&api, "  acme ").await;

        assert_eq!(listing.rows().len(), 4);
        assert_eq!(listing.count(), 400);
        assert_eq!(listing.query().search.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_fetch_more_failure_keeps_rows() {
        let api = FakeApi::new();
        api.push_page(page_of(5, 5));
        api.push_list_error(ApiError::GraphQl(vec!["boom".to_string()]));

        let mut listing = CompanyListing::default();
        listing.load(&api).await;
        listing.search(&api, "x").await;

        assert_eq!(listing.rows().len(), 5);
        assert_eq!(listing.inline_error(), Some("GraphQL error: boom"));
        assert!(!listing.is_busy());
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut listing = CompanyListing::default();
        let (first, _) = listing.begin_load();
        let (second, _) = listing.begin_filter(Some(CompanyFilter::Store));

        assert!(listing.apply(second, Ok(page_of(1, 1))));
        assert!(!listing.apply(first, Ok(page_of(9, 9))));
        assert_eq!(listing.count(), 1);

        let (late, _) = listing.begin_search("y");
        listing.invalidate();
        assert!(!listing.apply(late, Ok(page_of(3, 3))));
        assert_eq!(listing.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_query_loads_in_one_fetch() {
        let api = FakeApi::new();
        let query = CompanyListQuery {
            search: Some("acme".to_string()),
            page: 2,
            size: 70,
            filter: Some(CompanyFilter::Leader),
        };
        assert_eq!(
            CompanyListing::with_query(CompanyListQuery { size: 10, ..query.clone() }).unwrap_err(),
            ListingError::InvalidPageSize(10)
        );

        let mut listing = CompanyListing::with_query(query.clone()).unwrap();
        listing.load(&api).await;
        assert_eq!(api.list_calls.lock().unwrap().as_slice(), &[query]);
    }

    #[test]
    fn test_filter_options_are_grouped() {
        let options = filter_options();
        let groups: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.group_title.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(groups, vec![0, 5]);
        assert_eq!(options[2].filter, CompanyFilter::Status(BlueTickStatus::InProgress));
        assert_eq!(options[6].icon, "FiShoppingBag");
    }
}
