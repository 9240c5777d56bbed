//! Scripted providers for orchestrator tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nearby_core::{
    builtin_categories, Category, Coordinates, GeolocationProvider, NearbyError, NearbyQuery,
    PlaceRecord, PlacesProvider,
};
use nearby_orchestrator::{OrchestratorConfig, SearchOrchestrator};

pub const HOME: Coordinates = Coordinates {
    latitude: 40.7128,
    longitude: -74.006,
};

pub const ELSEWHERE: Coordinates = Coordinates {
    latitude: 40.7306,
    longitude: -73.9352,
};

pub fn place(id: &str, lat: f64, lng: f64) -> PlaceRecord {
    PlaceRecord::new(id, format!("Place {id}"), Coordinates::new(lat, lng))
}

pub fn two_places() -> Vec<PlaceRecord> {
    vec![place("1", 40.7138, -74.005), place("2", 40.7118, -74.007)]
}

/// One scripted answer to `search_nearby`.
pub struct Reply {
    pub delay: Duration,
    pub result: Result<Vec<PlaceRecord>, NearbyError>,
}

impl Reply {
    pub fn ok(places: Vec<PlaceRecord>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(places),
        }
    }

    pub fn err(error: NearbyError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Answers searches from a queue; once drained, every search returns
/// [`two_places`] immediately.
pub struct ScriptedPlaces {
    replies: Mutex<VecDeque<Reply>>,
    queries: Mutex<Vec<NearbyQuery>>,
    categories: Mutex<Result<Vec<Category>, NearbyError>>,
}

impl Default for ScriptedPlaces {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
            categories: Mutex::new(Ok(builtin_categories())),
        }
    }
}

impl ScriptedPlaces {
    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn set_categories(&self, categories: Result<Vec<Category>, NearbyError>) {
        *self.categories.lock().unwrap() = categories;
    }

    pub fn queries(&self) -> Vec<NearbyQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn last_query(&self) -> NearbyQuery {
        self.queries
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one search should have been issued")
    }
}

#[async_trait]
impl PlacesProvider for ScriptedPlaces {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<PlaceRecord>, NearbyError> {
        self.queries.lock().unwrap().push(query.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::ok(two_places()));
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }

    async fn get_details(&self, place_id: &str) -> Result<PlaceRecord, NearbyError> {
        if place_id == "missing" {
            return Err(NearbyError::Provider {
                status: "NOT_FOUND".to_string(),
                message: "Place not found".to_string(),
            });
        }
        let mut record = place(place_id, 40.7138, -74.005);
        record.phone = Some("+1 212-555-0100".to_string());
        Ok(record)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, NearbyError> {
        self.categories.lock().unwrap().clone()
    }
}

/// Answers location requests from a queue; once drained, repeats [`HOME`].
#[derive(Default)]
pub struct ScriptedLocation {
    replies: Mutex<VecDeque<Result<Coordinates, NearbyError>>>,
    calls: AtomicU32,
}

impl ScriptedLocation {
    pub fn push(&self, reply: Result<Coordinates, NearbyError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationProvider for ScriptedLocation {
    async fn current_location(&self) -> Result<Coordinates, NearbyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(HOME))
    }
}

pub struct Harness {
    pub places: Arc<ScriptedPlaces>,
    pub location: Arc<ScriptedLocation>,
    pub orchestrator: SearchOrchestrator,
}

pub fn harness() -> Harness {
    harness_with(ScriptedPlaces::default(), ScriptedLocation::default())
}

pub fn harness_with(places: ScriptedPlaces, location: ScriptedLocation) -> Harness {
    let places = Arc::new(places);
    let location = Arc::new(location);
    let orchestrator = SearchOrchestrator::new(
        Arc::clone(&places) as Arc<dyn PlacesProvider>,
        Arc::clone(&location) as Arc<dyn GeolocationProvider>,
        OrchestratorConfig::default(),
    );
    Harness {
        places,
        location,
        orchestrator,
    }
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
