//! Front-end delivery: files from the build directory, `index.html` for client routes

use axum::{
    body::Body,
    http::{header, HeaderMap, Response, StatusCode, Uri},
    response::IntoResponse,
};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const NOT_BUILT_HINT: &str = "Front-end is not built. Run npm --prefix front run build.";

/// Answer a request no file matched.
///
/// Paths with an extension are missing assets and get a 404, as do clients
/// that do not accept HTML. Everything else is a client-side route and
/// receives `index.html`, or a 500 with a build hint when it is absent.
pub async fn spa_fallback(index_html: &Path, uri: &Uri, headers: &HeaderMap) -> Response<Body> {
    let path = uri.path();

    if path.contains("..") || path.contains('\\') {
        return plain(StatusCode::BAD_REQUEST, "Invalid path");
    }
    if Path::new(path).extension().is_some() || !accepts_html(headers) {
        return plain(StatusCode::NOT_FOUND, "Not found");
    }

    match tokio::fs::read(index_html).await {
        Ok(html) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(err) => {
            warn!("Cannot serve {}: {}", index_html.display(), err);
            plain(StatusCode::INTERNAL_SERVER_ERROR, NOT_BUILT_HINT)
        }
    }
}

pub fn index_path(static_dir: &Path) -> PathBuf {
    static_dir.join("index.html")
}

/// A missing Accept header accepts anything
fn accepts_html(headers: &HeaderMap) -> bool {
    let accept = match headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
        Some(accept) => accept,
        None => return true,
    };
    accept.split(',').any(|part| {
        let media = part.split(';').next().unwrap_or("").trim();
        matches!(media, "text/html" | "text/*" | "*/*")
    })
}

fn plain(status: StatusCode, message: &'static str) -> Response<Body> {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_accepts_html() {
        assert!(accepts_html(&HeaderMap::new()));
        assert!(accepts_html(&accept("text/html,application/xhtml+xml;q=0.9")));
        assert!(accepts_html(&accept("*/*")));
        assert!(!accepts_html(&accept("application/json")));
    }

    #[tokio::test]
    async fn test_missing_index_reports_build_hint() {
        let uri: Uri = "/chat".parse().unwrap();
        let response = spa_fallback(Path::new("/nonexistent/index.html"), &uri, &HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_asset_paths_are_not_rewritten() {
        let uri: Uri = "/assets/app.js".parse().unwrap();
        let response = spa_fallback(Path::new("/nonexistent/index.html"), &uri, &HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
