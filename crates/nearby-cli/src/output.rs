//! Plain-text rendering for terminal output.

use nearby_core::{Category, Coordinates, PlaceRecord};
use nearby_orchestrator::{PlaceResult, SearchStatus, Snapshot};

const NAME_WIDTH: usize = 32;

pub fn print_places(origin: Coordinates, places: Vec<PlaceRecord>) {
    let results: Vec<PlaceResult> = places
        .into_iter()
        .map(|p| PlaceResult::new(p, origin))
        .collect();
    print_results(&results);
}

pub fn print_results(results: &[PlaceResult]) {
    if results.is_empty() {
        println!("no places found in this area");
        return;
    }

    println!("{:<34}{:<14}{:<12}{:<8}ID", "NAME", "DISTANCE", "RATING", "OPEN");
    for r in results {
        println!(
            "{:<34}{:<14}{:<12}{:<8}{}",
            truncate(&r.place.name, NAME_WIDTH),
            r.distance_label.trim_end_matches(" away"),
            fmt_rating(r.place.rating, r.place.user_ratings_total),
            fmt_open(r.place.open_now),
            r.place.id
        );
    }
}

pub fn print_details(place: &PlaceRecord) {
    println!("{}", place.name);
    if let Some(address) = place.address.as_deref().or(place.vicinity.as_deref()) {
        println!("  address: {address}");
    }
    println!(
        "  location: {:.6}, {:.6}",
        place.location.latitude, place.location.longitude
    );
    println!(
        "  rating: {}",
        fmt_rating(place.rating, place.user_ratings_total)
    );
    if let Some(phone) = &place.phone {
        println!("  phone: {phone}");
    }
    if let Some(website) = &place.website {
        println!("  website: {website}");
    }
    if !place.types.is_empty() {
        println!("  types: {}", place.types.join(", "));
    }
    println!("  open now: {}", fmt_open(place.open_now));
    for line in &place.weekday_text {
        println!("    {line}");
    }
}

pub fn print_categories(categories: &[Category]) {
    println!("{:<16}{:<18}ICON", "TYPE", "NAME");
    for c in categories {
        println!("{:<16}{:<18}{}", c.kind, c.name, c.icon);
    }
}

/// One status line, then the result table when results are present.
pub fn print_snapshot(snapshot: &Snapshot) {
    println!("{}", status_line(snapshot));
    if snapshot.status == SearchStatus::Ready {
        print_results(&snapshot.results.places);
    }
}

pub fn status_line(snapshot: &Snapshot) -> String {
    let filters = match (snapshot.filters.category(), snapshot.filters.keyword()) {
        (None, None) => "no filters".to_string(),
        (Some(c), None) => format!("category={c}"),
        (None, Some(k)) => format!("query=\"{k}\""),
        (Some(c), Some(k)) => format!("category={c} query=\"{k}\""),
    };
    match &snapshot.status {
        SearchStatus::Idle => format!("[idle] {filters}"),
        SearchStatus::LocatingDevice => "[locating]".to_string(),
        SearchStatus::Searching => format!("[searching] {filters}"),
        SearchStatus::Ready => format!("[ready] {} result(s), {filters}", snapshot.results.len()),
        SearchStatus::Failed(e) => format!("[error] {e}"),
    }
}

fn fmt_rating(rating: Option<f64>, total: Option<u32>) -> String {
    match (rating, total) {
        (Some(r), Some(n)) => format!("{r:.1} ({n})"),
        (Some(r), None) => format!("{r:.1}"),
        (None, _) => "-".to_string(),
    }
}

fn fmt_open(open_now: Option<bool>) -> &'static str {
    match open_now {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max - 3).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use nearby_core::{NearbyError, SearchFilters};

    use super::*;

    #[test]
    fn rating_formats() {
        assert_eq!(fmt_rating(Some(4.46), Some(120)), "4.5 (120)");
        assert_eq!(fmt_rating(Some(4.0), None), "4.0");
        assert_eq!(fmt_rating(None, Some(3)), "-");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 32), "short");
        let long = "Café ".repeat(10);
        let cut = truncate(&long, 12);
        assert_eq!(cut.chars().count(), 12);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn status_line_describes_filters_and_errors() {
        let mut snapshot = Snapshot {
            filters: SearchFilters {
                query: "pizza".to_string(),
                category: Some("restaurant".to_string()),
            },
            status: SearchStatus::Searching,
            ..Snapshot::default()
        };
        assert_eq!(
            status_line(&snapshot),
            "[searching] category=restaurant query=\"pizza\""
        );

        snapshot.status = SearchStatus::Failed(NearbyError::Network("offline".to_string()));
        assert_eq!(status_line(&snapshot), "[error] offline");
    }
}
