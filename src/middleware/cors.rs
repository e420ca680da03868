// CORS configuration from the `server.cors_allowed_origins` setting

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Allow the configured origins; an empty list or `*` allows any origin.
pub fn apply_cors(router: Router, allowed_origins: &[String]) -> Router {
    router.layer(
        CorsLayer::new()
            .allow_origin(allow_origin(allowed_origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

fn allow_origin(allowed_origins: &[String]) -> AllowOrigin {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}
