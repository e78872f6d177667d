use crate::state::AppState;
use tower_http::cors::{Any, CorsLayer};

/// CampusFlow and its browser frontend call this server cross-origin, so the
/// layer also answers `OPTIONS` preflights for every route.
pub fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = state
        .config
        .cors_allowed_origins
        .as_deref()
        .map(|list| {
            list.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    let layer = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        // Wildcard – set CC_CORS_ORIGINS to restrict.
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
