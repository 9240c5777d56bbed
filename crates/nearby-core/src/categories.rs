use crate::types::Category;

const BUILTIN: &[(&str, &str, &str)] = &[
    ("restaurant", "Restaurants", "utensils"),
    ("cafe", "Cafés", "coffee"),
    ("bar", "Bars", "glass"),
    ("park", "Parks", "tree"),
    ("museum", "Museums", "landmark"),
    ("store", "Stores", "shopping-bag"),
    ("gas_station", "Gas Stations", "fuel"),
    ("hospital", "Hospitals", "heart"),
    ("pharmacy", "Pharmacies", "plus"),
    ("bank", "Banks", "dollar-sign"),
];

/// The static category list served by the proxy and used as the client-side
/// fallback when the category endpoint cannot be reached.
#[must_use]
pub fn builtin_categories() -> Vec<Category> {
    BUILTIN
        .iter()
        .map(|(kind, name, icon)| Category {
            id: (*kind).to_string(),
            name: (*name).to_string(),
            icon: (*icon).to_string(),
            kind: (*kind).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_list_has_at_least_eight_unique_types() {
        let cats = builtin_categories();
        assert!(cats.len() >= 8);
        let kinds: HashSet<_> = cats.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds.len(), cats.len(), "category types must be unique");
    }

    #[test]
    fn builtin_ids_match_types() {
        for cat in builtin_categories() {
            assert_eq!(cat.id, cat.kind);
            assert!(!cat.icon.is_empty());
        }
    }
}
