//! Dashboard UI bundled into the server binary.
//!
//! Compiled only with the `embedded-frontend` feature. Without it the router
//! falls back to a minimal inline page.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

const INDEX: &str = "index.html";
const CACHE_POLICY: &str = "public, max-age=3600";

#[derive(Embed)]
#[folder = "src/frontend/"]
struct DashboardAssets;

/// Response for the bundled asset at `path`, or 404.
pub fn asset(path: &str) -> Response {
    let path = path.trim_start_matches('/');
    let Some(file) = DashboardAssets::get(path) else {
        tracing::debug!("Frontend asset not found: {}", path);
        return (StatusCode::NOT_FOUND, format!("No such asset: {path}")).into_response();
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    (
        [
            (header::CONTENT_TYPE, mime.essence_str().to_string()),
            (header::CACHE_CONTROL, CACHE_POLICY.to_string()),
        ],
        file.data,
    )
        .into_response()
}

/// The dashboard page.
pub fn index() -> Response {
    asset(INDEX)
}

/// Names of every bundled asset, sorted.
pub fn asset_names() -> Vec<String> {
    let mut names: Vec<String> = DashboardAssets::iter().map(|name| name.into_owned()).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_contents() {
        assert_eq!(asset_names(), vec!["app.js", "index.html", "styles.css"]);
    }

    #[test]
    fn test_asset_lookup() {
        assert_eq!(index().status(), StatusCode::OK);
        assert_eq!(asset("/app.js").status(), StatusCode::OK);
        assert_eq!(asset("nope.js").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_type() {
        let response = asset("styles.css");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }
}
