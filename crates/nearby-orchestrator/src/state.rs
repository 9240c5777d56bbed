use std::sync::Arc;

use chrono::{DateTime, Utc};
use nearby_core::{Category, Coordinates, NearbyError, PlaceRecord, SearchFilters};
use serde::Serialize;

use crate::distance::{calculate_distance, format_distance};

/// Lifecycle of the orchestrator. There is no terminal state: `Failed` stays
/// interactive and can move back to `LocatingDevice` or `Searching`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchStatus {
    #[default]
    Idle,
    LocatingDevice,
    Searching,
    Ready,
    Failed(NearbyError),
}

impl SearchStatus {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::LocatingDevice | Self::Searching)
    }

    #[must_use]
    pub fn error(&self) -> Option<&NearbyError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// A received place plus its distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceResult {
    #[serde(flatten)]
    pub place: PlaceRecord,
    pub distance_meters: f64,
    /// Always `format_distance(distance_meters)`.
    pub distance_label: String,
}

impl PlaceResult {
    #[must_use]
    pub fn new(place: PlaceRecord, origin: Coordinates) -> Self {
        let distance_meters = calculate_distance(origin, place.location);
        Self {
            distance_label: format_distance(distance_meters),
            place,
            distance_meters,
        }
    }
}

/// What produced a [`SearchResultSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMeta {
    pub fetched_at: DateTime<Utc>,
    /// Effective filters (overrides applied) the fetch was issued with.
    pub filters: SearchFilters,
    pub origin: Coordinates,
    pub radius_meters: u32,
}

/// An ordered, immutable set of results. Replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub places: Vec<PlaceResult>,
    pub meta: Option<ResultMeta>,
}

impl SearchResultSet {
    /// Augments `places` with distances from `meta.origin`, keeping provider order.
    #[must_use]
    pub fn new(places: Vec<PlaceRecord>, meta: ResultMeta) -> Self {
        let origin = meta.origin;
        Self {
            places: places
                .into_iter()
                .map(|p| PlaceResult::new(p, origin))
                .collect(),
            meta: Some(meta),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Same base records with distances recomputed from a new origin.
    #[must_use]
    pub fn relocated(&self, origin: Coordinates) -> Self {
        Self {
            places: self
                .places
                .iter()
                .map(|r| PlaceResult::new(r.place.clone(), origin))
                .collect(),
            meta: self.meta.clone().map(|m| ResultMeta { origin, ..m }),
        }
    }
}

/// Everything a consumer may render, published as one value on every change.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub location: Option<Coordinates>,
    pub filters: SearchFilters,
    pub status: SearchStatus,
    pub results: Arc<SearchResultSet>,
    pub categories: Arc<Vec<Category>>,
}
