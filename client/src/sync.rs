//! Query/result synchronization for an embedded search widget.
//!
//! `SearchQuerySync` owns the live query (page, size, sort, facet
//! selections) and keeps displayed results and facet counts consistent with
//! it: every query change triggers two concurrent fetches, one for results
//! and one for aggregations, each with its own loading/error domain.

use std::sync::Arc;

use common::search_query::{QueryParams, QueryValue, SearchQuery, merge_with_concatting_arrays};
use common::search_result::{Aggregations, SearchResults};
use tokio::sync::Mutex;
use tracing::warn;

use crate::api::{RawFacetsResponse, RawSearchResponse, get_json};


/// Caller-supplied contract for one record collection.
///
/// `base_query` is merged into every request; `base_facets_query` only into
/// the facets request. Neither is interpreted beyond merging/pass-through.
#[derive(Debug, Clone)]
pub struct SearchSource {
    pub base_url: String,
    pub pid_type: String,
    pub base_query: QueryParams,
    pub base_facets_query: QueryParams,
}

impl SearchSource {
    pub fn new(pid_type: impl Into<String>) -> Self {
        let base_url =
            std::env::var("SEARCH_API_URL").unwrap_or("http://127.0.0.1:8000/api".to_string());
        SearchSource {
            base_url,
            pid_type: pid_type.into(),
            base_query: QueryParams::default(),
            base_facets_query: QueryParams::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_base_query(mut self, base_query: QueryParams) -> Self {
        self.base_query = base_query;
        self
    }

    pub fn with_base_facets_query(mut self, base_facets_query: QueryParams) -> Self {
        self.base_facets_query = base_facets_query;
        self
    }
}


#[derive(Debug, Clone, Default)]
struct SyncState {
    query: SearchQuery,
    results: SearchResults,
    aggregations: Aggregations,
    loading_results: bool,
    loading_aggregations: bool,
    has_error: bool,
}

/// Rendering contract: a point-in-time copy of everything the surrounding
/// UI needs. Once `has_error` is set it stays set for the lifetime of the
/// instance; the UI replaces normal rendering with an error notice.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub query: SearchQuery,
    pub results: SearchResults,
    pub aggregations: Aggregations,
    pub number_of_results: u64,
    pub loading_results: bool,
    pub loading_aggregations: bool,
    pub has_error: bool,
}

pub struct SearchQuerySync {
    source: SearchSource,
    http: reqwest::Client,
    state: Arc<Mutex<SyncState>>,
}

impl SearchQuerySync {
    pub fn new(source: SearchSource) -> Self {
        SearchQuerySync {
            source,
            http: reqwest::Client::new(),
            state: Arc::new(Mutex::new(SyncState::default())),
        }
    }

    /// `page` is 1-based.
    pub async fn on_page_change(&self, page: u64) {
        {
            let mut state = self.state.lock().await;
            state.query.set_page(page);
        }
        self.synchronize().await;
    }

    pub async fn on_size_change(&self, size: u64) {
        {
            let mut state = self.state.lock().await;
            state.query.set_size(size);
        }
        self.synchronize().await;
    }

    /// `sort` must be a value understood by the backend, see
    /// [`common::search_const::SORT_OPTIONS`].
    pub async fn on_sort_change(&self, sort: impl Into<String>) {
        {
            let mut state = self.state.lock().await;
            state.query.set_sort(sort);
        }
        self.synchronize().await;
    }

    /// Replaces the whole selection under `aggregation_key`; a second call
    /// for the same key leaves only the newer selection in the query.
    pub async fn on_aggregation_change(
        &self,
        aggregation_key: impl Into<String>,
        selection: impl Into<QueryValue>,
    ) {
        {
            let mut state = self.state.lock().await;
            state.query.set_selection(aggregation_key, selection);
        }
        self.synchronize().await;
    }

    /// Re-fetches results and aggregations for the current query.
    ///
    /// The query is snapshotted under the lock before either fetch is
    /// issued, so both always see the fully merged query. The two fetches
    /// run concurrently and complete in no particular order; each writes
    /// only its own state fields. In-flight requests are never cancelled:
    /// a stale response landing after a newer query still overwrites state
    /// (last-response-wins).
    pub async fn synchronize(&self) {
        let merged = {
            let state = self.state.lock().await;
            merge_with_concatting_arrays(&self.source.base_query, &state.query.to_params())
        };
        futures::join!(
            self.fetch_search_results(&merged),
            self.fetch_aggregations(&merged),
        );
    }

    async fn fetch_search_results(&self, merged: &QueryParams) {
        let url = format!("{}/{}", self.source.base_url, self.source.pid_type);
        let pairs = merged.to_pairs();
        self.state.lock().await.loading_results = true;
        match get_json::<RawSearchResponse>(&self.http, url, &pairs).await {
            Ok(response) => {
                let mut state = self.state.lock().await;
                state.results = SearchResults {
                    records: response.hits.hits,
                    total: response.hits.total,
                };
                state.loading_results = false;
            }
            Err(error) => {
                warn!("results fetch failed: {:#}", error);
                let mut state = self.state.lock().await;
                state.has_error = true;
                state.loading_results = false;
            }
        }
    }

    async fn fetch_aggregations(&self, merged: &QueryParams) {
        // the facets call additionally carries the static facets-only
        // filters; this layer is a plain key-wise overwrite, the merged
        // query wins even when both sides hold a list
        let mut query = self.source.base_facets_query.clone();
        query.0.extend(merged.0.clone());
        let url = format!("{}/{}/facets", self.source.base_url, self.source.pid_type);
        let pairs = query.to_pairs();
        self.state.lock().await.loading_aggregations = true;
        match get_json::<RawFacetsResponse>(&self.http, url, &pairs).await {
            Ok(response) => {
                let mut state = self.state.lock().await;
                state.aggregations = Aggregations(response.aggregations);
                state.loading_aggregations = false;
            }
            Err(error) => {
                warn!("aggregations fetch failed: {:#}", error);
                let mut state = self.state.lock().await;
                state.has_error = true;
                state.loading_aggregations = false;
            }
        }
    }

    pub async fn query(&self) -> SearchQuery {
        self.state.lock().await.query.clone()
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.lock().await;
        SearchSnapshot {
            query: state.query.clone(),
            results: state.results.clone(),
            aggregations: state.aggregations.clone(),
            number_of_results: state.results.total,
            loading_results: state.loading_results,
            loading_aggregations: state.loading_aggregations,
            has_error: state.has_error,
        }
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
