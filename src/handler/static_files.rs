//! Static file serving module
//!
//! Serves files from the public directory ahead of the application routes.
//! A miss returns `None` so routing continues.

use crate::http::{self, cache, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve `request_path` from `public_dir` if such a file exists
pub async fn serve_static(
    public_dir: &str,
    request_path: &str,
    is_head: bool,
    if_none_match: Option<&str>,
) -> Option<Response<Full<Bytes>>> {
    let file = resolve_file(Path::new(public_dir), request_path).await?;
    let data = match fs::read(&file).await {
        Ok(data) => data,
        Err(e) => {
            crate::logger::log_warning(&format!("Failed to read {}: {e}", file.display()));
            return None;
        }
    };

    let etag = cache::weak_etag(&data);
    if cache::is_not_modified(if_none_match, &etag) {
        return Some(http::build_304_response(&etag));
    }

    Some(http::build_static_response(
        Bytes::from(data),
        mime::content_type_for(&file),
        &etag,
        is_head,
    ))
}

/// Map a request path onto a file below `root`
///
/// Percent-decoded; any `..` segment, backslash or NUL rejects the path.
/// Directories resolve to their `index.html`.
async fn resolve_file(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;

    let mut candidate = root.to_path_buf();
    for segment in decoded.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." || segment.contains(['\\', '\0']) {
            return None;
        }
        candidate.push(segment);
    }

    let metadata = fs::metadata(&candidate).await.ok()?;
    if metadata.is_file() {
        return Some(candidate);
    }

    if metadata.is_dir() {
        let index = candidate.join(INDEX_FILE);
        if fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
            return Some(index);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn public_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/style.css"), "main { margin: 0 }").unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let dir = public_dir();
        let root = dir.path().to_str().unwrap();

        let resp = serve_static(root, "/css/style.css", false, None).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"main { margin: 0 }");
    }

    #[tokio::test]
    async fn test_directory_index_and_misses() {
        let dir = public_dir();
        let root = dir.path().to_str().unwrap();

        assert!(serve_static(root, "/docs/", false, None).await.is_some());
        assert!(serve_static(root, "/css", false, None).await.is_none());
        assert!(serve_static(root, "/api/students", false, None).await.is_none());
        assert!(serve_static(root, "/../secret", false, None).await.is_none());
        assert!(serve_static(root, "/css/%2e%2e/css/style.css", false, None).await.is_none());
    }

    #[tokio::test]
    async fn test_conditional_get() {
        let dir = public_dir();
        let root = dir.path().to_str().unwrap();

        let first = serve_static(root, "/css/style.css", false, None).await.unwrap();
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let second = serve_static(root, "/css/style.css", false, Some(&etag)).await.unwrap();
        assert_eq!(second.status(), 304);
    }

    #[tokio::test]
    async fn test_missing_public_dir() {
        assert!(serve_static("/definitely/not/here", "/index.html", false, None)
            .await
            .is_none());
    }
}
