//! Location-aware nearby search.
//!
//! [`SearchOrchestrator`] ties a [`nearby_core::GeolocationProvider`] and a
//! [`nearby_core::PlacesProvider`] together: it debounces filter edits,
//! guarantees that only the newest search's response is ever shown, and
//! publishes every state change as a [`Snapshot`].

pub mod categories;
pub mod debounce;
pub mod distance;
pub mod orchestrator;
pub mod state;

pub use categories::{is_known_category, load_categories};
pub use debounce::Debouncer;
pub use distance::{calculate_distance, format_distance};
pub use orchestrator::{OrchestratorConfig, SearchOrchestrator, SearchOutcome, SearchOverrides};
pub use state::{PlaceResult, ResultMeta, SearchResultSet, SearchStatus, Snapshot};
