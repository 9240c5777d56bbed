//! The search orchestrator: location, filters, and the derived result set.
//!
//! State lives in a single [`watch`] channel. Every mutation goes through
//! `send_modify`/`send_if_modified`, so subscribers only ever observe whole
//! snapshots and the result set is swapped atomically.
//!
//! Searches are tagged with a sequence number taken from `latest_issued` at
//! issue time. A response is applied only if its number is still the latest
//! when it lands; both the increment and the comparison happen under the
//! channel's write lock, so "latest" is by issue order, never arrival order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nearby_core::{
    Category, Coordinates, GeolocationProvider, NearbyError, NearbyQuery, PlaceRecord,
    PlacesProvider, SearchFilters,
};
use tokio::sync::watch;

use crate::categories::{is_known_category, load_categories};
use crate::debounce::Debouncer;
use crate::state::{ResultMeta, SearchResultSet, SearchStatus, Snapshot};

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub radius_meters: u32,
    /// Quiet period after the last filter change before a search is issued.
    pub debounce: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            radius_meters: nearby_core::types::DEFAULT_RADIUS_METERS,
            debounce: Duration::from_millis(500),
        }
    }
}

/// Per-call replacements for the current filters.
///
/// `Some` wins over the stored filter; a blank `Some("")` means "no
/// constraint" for that call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOverrides {
    pub category: Option<String>,
    pub keyword: Option<String>,
}

/// What happened to a search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No location yet, so nothing was fetched.
    Skipped,
    /// The response (results or failure) was applied.
    Applied,
    /// A newer search was issued while this one was in flight; its response
    /// was dropped.
    Superseded,
}

/// Owns search state and coordinates the places and geolocation providers.
///
/// Cheap to clone; clones share state. Filter setters are synchronous but
/// spawn the debounce timer, so they must run inside a Tokio runtime.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    places: Arc<dyn PlacesProvider>,
    geolocation: Arc<dyn GeolocationProvider>,
    config: OrchestratorConfig,
    state: watch::Sender<Snapshot>,
    latest_issued: AtomicU64,
    debouncer: Debouncer,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        geolocation: Arc<dyn GeolocationProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        let debouncer = Debouncer::new(config.debounce);
        Self {
            inner: Arc::new(Inner {
                places,
                geolocation,
                config,
                state,
                latest_issued: AtomicU64::new(0),
                debouncer,
            }),
        }
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.borrow().clone()
    }

    /// A receiver that is notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    /// Loads categories and locates the device concurrently, then runs the
    /// first search.
    ///
    /// Category failures fall back to the built-in list and never affect the
    /// outcome. A location failure leaves the orchestrator in
    /// `Failed` with no results and no search attempted.
    pub async fn initialize(&self) {
        self.set_status(SearchStatus::LocatingDevice);

        let categories = async {
            let categories = load_categories(self.inner.places.as_ref()).await;
            self.apply_categories(categories);
        };

        let first_search = async {
            match self.locate().await {
                Ok(location) => {
                    self.store_location(location);
                    self.search(SearchOverrides::default()).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "initial location fetch failed");
                    self.inner.state.send_modify(|s| {
                        s.status = SearchStatus::Failed(e);
                        s.results = Arc::default();
                    });
                }
            }
        };

        tokio::join!(categories, first_search);
    }

    /// Updates the free-text query immediately and schedules a debounced search.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_modify(|s| s.filters.query = text);
        self.schedule_search();
    }

    /// Selects (or, with `None`, clears) the category filter and schedules a
    /// debounced search.
    ///
    /// # Errors
    ///
    /// Returns [`NearbyError::InvalidRequest`] if `category` is not the type
    /// token of a loaded category. The filters are left untouched.
    pub fn set_category(&self, category: Option<&str>) -> Result<(), NearbyError> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);

        if let Some(kind) = &category {
            let known = is_known_category(&self.inner.state.borrow().categories, kind);
            if !known {
                return Err(NearbyError::InvalidRequest(format!(
                    "Unknown category '{kind}'"
                )));
            }
        }

        self.inner.state.send_modify(|s| s.filters.category = category);
        self.schedule_search();
        Ok(())
    }

    /// Selects `kind`, or clears the category if `kind` is already selected.
    ///
    /// # Errors
    ///
    /// Same as [`SearchOrchestrator::set_category`].
    pub fn toggle_category(&self, kind: &str) -> Result<(), NearbyError> {
        let selected = self.inner.state.borrow().filters.category() == Some(kind.trim());
        if selected {
            self.set_category(None)
        } else {
            self.set_category(Some(kind))
        }
    }

    /// Resets both filters and searches right away, dropping any pending
    /// debounced search.
    pub async fn clear_filters(&self) -> SearchOutcome {
        self.inner.debouncer.cancel();
        self.inner
            .state
            .send_modify(|s| s.filters = SearchFilters::default());
        self.search(SearchOverrides::default()).await
    }

    /// Re-reads the device location and, on success, searches immediately.
    ///
    /// On failure the last good location and results are kept; only the
    /// status changes.
    ///
    /// # Errors
    ///
    /// Returns the geolocation failure, which is also published as
    /// `SearchStatus::Failed`.
    pub async fn refresh_location(&self) -> Result<SearchOutcome, NearbyError> {
        self.set_status(SearchStatus::LocatingDevice);
        match self.locate().await {
            Ok(location) => {
                self.store_location(location);
                Ok(self.search(SearchOverrides::default()).await)
            }
            Err(e) => {
                tracing::warn!(error = %e, "location refresh failed; keeping last known state");
                self.set_status(SearchStatus::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Fetches places around the current location and replaces the result set.
    ///
    /// Previous results stay visible while the fetch is in flight. A failure
    /// clears them. A response that lands after a newer search was issued is
    /// discarded.
    pub async fn search(&self, overrides: SearchOverrides) -> SearchOutcome {
        let Some((seq, query, filters)) = self.begin_search(&overrides) else {
            tracing::debug!("search skipped: no location");
            return SearchOutcome::Skipped;
        };

        tracing::debug!(
            seq,
            category = query.category.as_deref().unwrap_or(""),
            keyword = query.keyword.as_deref().unwrap_or(""),
            "search issued"
        );
        let result = self.inner.places.search_nearby(&query).await;
        self.finish_search(seq, query, filters, result)
    }

    /// Full record for one place. Does not touch search state.
    ///
    /// # Errors
    ///
    /// [`NearbyError::InvalidRequest`] for a blank id, otherwise whatever the
    /// provider reports.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceRecord, NearbyError> {
        if place_id.trim().is_empty() {
            return Err(NearbyError::InvalidRequest("Missing placeId".to_string()));
        }
        self.inner.places.get_details(place_id).await
    }

    fn set_status(&self, status: SearchStatus) {
        self.inner.state.send_modify(|s| s.status = status);
    }

    async fn locate(&self) -> Result<Coordinates, NearbyError> {
        let location = self.inner.geolocation.current_location().await?;
        if location.is_valid() {
            Ok(location)
        } else {
            tracing::warn!(?location, "geolocation returned out-of-range coordinates");
            Err(NearbyError::location_unavailable())
        }
    }

    /// Replaces the location and re-derives distances of the shown results.
    fn store_location(&self, location: Coordinates) {
        self.inner.state.send_modify(|s| {
            s.location = Some(location);
            if !s.results.is_empty() {
                s.results = Arc::new(s.results.relocated(location));
            }
        });
    }

    fn apply_categories(&self, categories: Vec<Category>) {
        let mut cleared = false;
        self.inner.state.send_modify(|s| {
            if let Some(kind) = s.filters.category() {
                if !is_known_category(&categories, kind) {
                    tracing::debug!(
                        category = kind,
                        "selected category not in loaded list; clearing"
                    );
                    s.filters.category = None;
                    cleared = true;
                }
            }
            s.categories = Arc::new(categories);
        });
        if cleared {
            self.schedule_search();
        }
    }

    fn schedule_search(&self) {
        if self.inner.state.borrow().location.is_none() {
            tracing::debug!("filter change recorded; no location to search from yet");
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let orchestrator = SearchOrchestrator { inner };
            // Detached so a later reschedule cannot abort an in-flight fetch.
            tokio::spawn(async move {
                orchestrator.search(SearchOverrides::default()).await;
            });
        });
    }

    /// Issues a sequence number and flips to `Searching`, atomically.
    fn begin_search(
        &self,
        overrides: &SearchOverrides,
    ) -> Option<(u64, NearbyQuery, SearchFilters)> {
        let mut issued = None;
        self.inner.state.send_if_modified(|s| {
            let Some(origin) = s.location else {
                return false;
            };

            let category = resolve(overrides.category.as_deref(), s.filters.category());
            let keyword = resolve(overrides.keyword.as_deref(), s.filters.keyword());
            let seq = self.inner.latest_issued.fetch_add(1, Ordering::SeqCst) + 1;
            s.status = SearchStatus::Searching;

            let filters = SearchFilters {
                query: keyword.clone().unwrap_or_default(),
                category: category.clone(),
            };
            let query = NearbyQuery {
                origin,
                radius_meters: self.inner.config.radius_meters,
                category,
                keyword,
            };
            issued = Some((seq, query, filters));
            true
        });
        issued
    }

    fn finish_search(
        &self,
        seq: u64,
        query: NearbyQuery,
        filters: SearchFilters,
        result: Result<Vec<PlaceRecord>, NearbyError>,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::Superseded;
        self.inner.state.send_if_modified(|s| {
            if self.inner.latest_issued.load(Ordering::SeqCst) != seq {
                return false;
            }
            outcome = SearchOutcome::Applied;
            match result {
                Ok(places) => {
                    tracing::info!(seq, count = places.len(), "search results applied");
                    s.results = Arc::new(SearchResultSet::new(
                        places,
                        ResultMeta {
                            fetched_at: Utc::now(),
                            filters,
                            origin: query.origin,
                            radius_meters: query.radius_meters,
                        },
                    ));
                    s.status = SearchStatus::Ready;
                }
                Err(e) => {
                    tracing::warn!(seq, error = %e, "search failed");
                    s.results = Arc::default();
                    s.status = SearchStatus::Failed(e);
                }
            }
            true
        });

        if outcome == SearchOutcome::Superseded {
            tracing::debug!(seq, "discarding stale search response");
        }
        outcome
    }
}

/// `Some(override)` wins (blank meaning unconstrained); otherwise the stored value.
fn resolve(override_value: Option<&str>, current: Option<&str>) -> Option<String> {
    match override_value {
        Some(value) => {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_owned())
        }
        None => current.map(str::to_owned),
    }
}
