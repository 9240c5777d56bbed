use nearby_core::{builtin_categories, Category, PlacesProvider};

/// Fetches categories from `provider`, substituting the built-in list when
/// the call fails or yields nothing. Never fails.
pub async fn load_categories(provider: &dyn PlacesProvider) -> Vec<Category> {
    match provider.list_categories().await {
        Ok(categories) if !categories.is_empty() => {
            tracing::debug!(count = categories.len(), "categories loaded from provider");
            categories
        }
        Ok(_) => {
            tracing::warn!("provider returned no categories; using built-in list");
            builtin_categories()
        }
        Err(e) => {
            tracing::warn!(error = %e, "category fetch failed; using built-in list");
            builtin_categories()
        }
    }
}

/// `true` if `kind` is the search-type token of one of `categories`.
#[must_use]
pub fn is_known_category(categories: &[Category], kind: &str) -> bool {
    categories.iter().any(|c| c.kind == kind)
}
