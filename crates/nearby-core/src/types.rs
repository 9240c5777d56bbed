use serde::{Deserialize, Serialize};

/// Default search radius used by the mobile client and the proxy.
pub const DEFAULT_RADIUS_METERS: u32 = 1500;

/// A device or place position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Wire form of a position (`{ "lat": .., "lng": .. }`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinates> for LatLng {
    fn from(c: Coordinates) -> Self {
        Self {
            lat: c.latitude,
            lng: c.longitude,
        }
    }
}

impl From<LatLng> for Coordinates {
    fn from(l: LatLng) -> Self {
        Self::new(l.lat, l.lng)
    }
}

/// A point of interest as returned by the places proxy.
///
/// Immutable as received. Serializes to (and deserializes from) the proxy's
/// wire shape: `geometry.location`, `photos[].photo_reference`,
/// `opening_hours.open_now`, `formatted_phone_number` and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "wire::PlaceWire", into = "wire::PlaceWire")]
pub struct PlaceRecord {
    pub id: String,
    pub name: String,
    pub location: Coordinates,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub types: Vec<String>,
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
    pub photo_ref: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl PlaceRecord {
    /// Minimal record with only the required fields populated.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            vicinity: None,
            rating: None,
            user_ratings_total: None,
            types: Vec::new(),
            open_now: None,
            weekday_text: Vec::new(),
            photo_ref: None,
            phone: None,
            website: None,
            address: None,
        }
    }
}

/// A selectable search category (chip in the search header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Provider search-type token, e.g. `"gas_station"`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// User-editable search inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: String,
    pub category: Option<String>,
}

impl SearchFilters {
    /// The free-text query, or `None` when it is blank.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        non_blank(&self.query)
    }

    /// The selected category, or `None` when unset or blank.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().and_then(non_blank)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyword().is_none() && self.category().is_none()
    }
}

/// A single nearby-search request as sent to a [`crate::PlacesProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub origin: Coordinates,
    pub radius_meters: u32,
    pub category: Option<String>,
    pub keyword: Option<String>,
}

impl NearbyQuery {
    #[must_use]
    pub fn new(origin: Coordinates) -> Self {
        Self {
            origin,
            radius_meters: DEFAULT_RADIUS_METERS,
            category: None,
            keyword: None,
        }
    }
}

pub(crate) fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

mod wire {
    use serde::{Deserialize, Serialize};

    use super::{LatLng, PlaceRecord};

    #[derive(Serialize, Deserialize)]
    pub(super) struct Geometry {
        pub location: LatLng,
    }

    #[derive(Serialize, Deserialize)]
    pub(super) struct Photo {
        pub photo_reference: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub html_attributions: Vec<String>,
    }

    #[derive(Serialize, Deserialize)]
    pub(super) struct OpeningHours {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub open_now: Option<bool>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub weekday_text: Vec<String>,
    }

    #[derive(Serialize, Deserialize)]
    pub(super) struct PlaceWire {
        pub id: String,
        pub name: String,
        pub geometry: Geometry,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub vicinity: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub rating: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user_ratings_total: Option<u32>,
        #[serde(default)]
        pub types: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub photos: Vec<Photo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub opening_hours: Option<OpeningHours>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub formatted_phone_number: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub website: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub formatted_address: Option<String>,
    }

    impl From<PlaceWire> for PlaceRecord {
        fn from(w: PlaceWire) -> Self {
            let (open_now, weekday_text) = w
                .opening_hours
                .map_or((None, Vec::new()), |h| (h.open_now, h.weekday_text));
            Self {
                id: w.id,
                name: w.name,
                location: w.geometry.location.into(),
                vicinity: w.vicinity,
                rating: w.rating,
                user_ratings_total: w.user_ratings_total,
                types: w.types,
                open_now,
                weekday_text,
                photo_ref: w.photos.into_iter().next().map(|p| p.photo_reference),
                phone: w.formatted_phone_number,
                website: w.website,
                address: w.formatted_address,
            }
        }
    }

    impl From<PlaceRecord> for PlaceWire {
        fn from(p: PlaceRecord) -> Self {
            let opening_hours = (p.open_now.is_some() || !p.weekday_text.is_empty()).then(|| {
                OpeningHours {
                    open_now: p.open_now,
                    weekday_text: p.weekday_text,
                }
            });
            Self {
                id: p.id,
                name: p.name,
                geometry: Geometry {
                    location: p.location.into(),
                },
                vicinity: p.vicinity,
                rating: p.rating,
                user_ratings_total: p.user_ratings_total,
                types: p.types,
                photos: p
                    .photo_ref
                    .map(|photo_reference| Photo {
                        photo_reference,
                        html_attributions: Vec::new(),
                    })
                    .into_iter()
                    .collect(),
                opening_hours,
                formatted_phone_number: p.phone,
                website: p.website,
                formatted_address: p.address,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validity_checks_ranges() {
        assert!(Coordinates::new(40.7128, -74.006).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn place_record_reads_proxy_wire_shape() {
        let json = serde_json::json!({
            "id": "abc",
            "name": "Test Restaurant",
            "vicinity": "123 Test Street",
            "geometry": { "location": { "lat": 40.001, "lng": -74.001 } },
            "rating": 4.5,
            "types": ["restaurant", "food"],
            "photos": [{ "photo_reference": "ref-1", "html_attributions": [] }],
            "opening_hours": { "open_now": true },
            "user_ratings_total": 120
        });
        let place: PlaceRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(place.id, "abc");
        assert_eq!(place.location, Coordinates::new(40.001, -74.001));
        assert_eq!(place.types, vec!["restaurant", "food"]);
        assert_eq!(place.open_now, Some(true));
        assert_eq!(place.photo_ref.as_deref(), Some("ref-1"));
        assert_eq!(place.user_ratings_total, Some(120));
        assert!(place.phone.is_none());
    }

    #[test]
    fn place_record_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "id": "x",
            "name": "Bare",
            "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
        });
        let place: PlaceRecord = serde_json::from_value(json).expect("deserialize");
        assert!(place.types.is_empty());
        assert!(place.open_now.is_none());
        assert!(place.weekday_text.is_empty());
    }

    #[test]
    fn place_record_writes_wire_field_names() {
        let mut place = PlaceRecord::new("p1", "Cafe", Coordinates::new(1.0, 2.0));
        place.phone = Some("+1 555".to_string());
        let json = serde_json::to_value(&place).expect("serialize");
        assert_eq!(json["geometry"]["location"]["lng"].as_f64(), Some(2.0));
        assert_eq!(json["formatted_phone_number"].as_str(), Some("+1 555"));
        assert!(json.get("opening_hours").is_none());
        assert!(json.get("photos").is_none());
    }

    #[test]
    fn category_uses_type_key_on_the_wire() {
        let json = serde_json::json!({
            "id": "cafe", "name": "Cafés", "icon": "coffee", "type": "cafe"
        });
        let cat: Category = serde_json::from_value(json).expect("deserialize");
        assert_eq!(cat.kind, "cafe");
    }

    #[test]
    fn search_filters_treat_blank_as_unconstrained() {
        let filters = SearchFilters {
            query: "   ".to_string(),
            category: Some(String::new()),
        };
        assert!(filters.keyword().is_none());
        assert!(filters.category().is_none());
        assert!(filters.is_empty());

        let filters = SearchFilters {
            query: " pizza ".to_string(),
            category: Some("restaurant".to_string()),
        };
        assert_eq!(filters.keyword(), Some("pizza"));
        assert_eq!(filters.category(), Some("restaurant"));
    }
}
