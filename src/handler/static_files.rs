//! Static file serving module
//!
//! Serves a directory tree below a mount point: path cleaning, directory
//! redirects, `index.html` and listings, `ETag` revalidation and byte ranges.
//! Caching headers are left to the router.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome};
use crate::logger;
use hyper::body::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve `relative` (already stripped of the mount prefix) from `root`
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    root: &str,
    relative: &str,
) -> http::HttpResponse {
    if let Some(dir) = ctx.path.strip_suffix(INDEX_FILE) {
        if dir.ends_with('/') {
            return http::build_redirect_response(&encode_path(dir));
        }
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{root}': {e}"
            ));
            return http::build_404_response();
        }
    };

    let file_path = root_canonical.join(clean_relative_path(relative));

    // Not found is the common case, no need to log it
    let Ok(canonical) = fs::canonicalize(&file_path).await else {
        return http::build_404_response();
    };
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escapes served directory: {} -> {}",
            ctx.path,
            canonical.display()
        ));
        return http::build_404_response();
    }

    let metadata = match fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", canonical.display()));
            return http::build_404_response();
        }
    };

    if metadata.is_dir() {
        if !ctx.path.ends_with('/') {
            return http::build_redirect_response(&encode_path(&format!("{}/", ctx.path)));
        }
        let index = canonical.join(INDEX_FILE);
        if fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index).await;
        }
        return match list_directory(&canonical).await {
            Ok(html) => http::response::build_html_response(html, ctx.is_head),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to list directory '{}': {e}",
                    canonical.display()
                ));
                http::build_404_response()
            }
        };
    }

    if ctx.path.len() > 1 && ctx.path.ends_with('/') {
        return http::build_redirect_response(&encode_path(ctx.path.trim_end_matches('/')));
    }
    serve_file_as(ctx, &canonical, &file_path).await
}

async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> http::HttpResponse {
    serve_file_as(ctx, path, path).await
}

/// Read `path` and answer with the content type of `type_path`
/// (the requested name, which may be a symlink to something else)
async fn serve_file_as(
    ctx: &RequestContext<'_>,
    path: &Path,
    type_path: &Path,
) -> http::HttpResponse {
    let content = match fs::read(path).await {
        Ok(c) => Bytes::from(c),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(type_path);
    let etag = cache::generate_etag(&content);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), content.len()) {
        RangeOutcome::Partial(range) => http::response::build_partial_response(
            &content,
            content_type,
            &etag,
            range,
            ctx.is_head,
        ),
        RangeOutcome::NotSatisfiable => http::build_416_response(content.len()),
        RangeOutcome::Full => {
            http::response::build_file_response(content, content_type, &etag, ctx.is_head)
        }
    }
}

/// Resolve `.` and `..` lexically so the result never leaves the root
pub fn clean_relative_path(relative: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.iter().collect()
}

/// Percent-encode each segment of a decoded path, keeping the slashes
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// HTML listing of a directory, sorted by name, subdirectories marked with `/`
async fn list_directory(dir: &Path) -> io::Result<String> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for name in &names {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            encode_path(name),
            escape_html(name)
        ));
    }
    html.push_str("</pre>\n");
    Ok(html)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&#34;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_TYPE, ETAG, LOCATION};
    use hyper::StatusCode;
    use tempfile::TempDir;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("style.css"), "body{}").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs").join("index.html"), "<h1>docs</h1>").unwrap();
        std::fs::create_dir(dir.path().join("empty dir")).unwrap();
        std::fs::write(dir.path().join("a & b.txt"), "amp").unwrap();
        dir
    }

    async fn body_text(resp: http::HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_clean_relative_path() {
        assert_eq!(clean_relative_path("a/b/c.png"), PathBuf::from("a/b/c.png"));
        assert_eq!(clean_relative_path("/./a//b/"), PathBuf::from("a/b"));
        assert_eq!(clean_relative_path("../../etc/passwd"), PathBuf::from("etc/passwd"));
        assert_eq!(clean_relative_path("a/../../b"), PathBuf::from("b"));
        assert_eq!(clean_relative_path(""), PathBuf::new());
    }

    #[test]
    fn test_encode_path_keeps_slashes() {
        assert_eq!(encode_path("/images/my photo.png"), "/images/my%20photo.png");
        assert_eq!(encode_path("/docs/"), "/docs/");
    }

    #[tokio::test]
    async fn test_serves_file_with_content_type_and_etag() {
        let dir = site();
        let root = dir.path().to_str().unwrap();
        let resp = serve_directory(&ctx("/style.css"), root, "style.css").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css; charset=utf-8");
        assert!(resp.headers().contains_key(ETAG));
        assert_eq!(body_text(resp).await, "body{}");
    }

    #[tokio::test]
    async fn test_matching_etag_gives_304() {
        let dir = site();
        let root = dir.path().to_str().unwrap();
        let etag = cache::generate_etag(b"body{}");
        let mut c = ctx("/style.css");
        c.if_none_match = Some(etag);
        let resp = serve_directory(&c, root, "style.css").await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_range_request() {
        let dir = site();
        let root = dir.path().to_str().unwrap();
        let mut c = ctx("/style.css");
        c.range_header = Some("bytes=0-3".to_string());
        let resp = serve_directory(&c, root, "style.css").await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(body_text(resp).await, "body");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = site();
        let root = dir.path().to_str().unwrap();
        let resp = serve_directory(&ctx("/nope.js"), root, "nope.js").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_root() {
        let outer = TempDir::new().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::fs::create_dir(outer.path().join("public")).unwrap();
        let root = outer.path().join("public");
        let resp = serve_directory(&ctx("/../secret.txt"), root.to_str().unwrap(), "../secret.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_redirects_and_index() {
        let dir = site();
        let root = dir.path().to_str().unwrap();

        let resp = serve_directory(&ctx("/docs"), root, "docs").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/");

        let resp = serve_directory(&ctx("/docs/"), root, "docs/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "<h1>docs</h1>");

        let resp = serve_directory(&ctx("/docs/index.html"), root, "docs/index.html").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/");

        let resp = serve_directory(&ctx("/style.css/"), root, "style.css/").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/style.css");
    }

    #[tokio::test]
    async fn test_directory_listing_without_index() {
        let dir = site();
        let root = dir.path().to_str().unwrap();
        let resp = serve_directory(&ctx("/"), root, "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let html = body_text(resp).await;
        assert!(html.contains("<a href=\"a%20%26%20b.txt\">a &amp; b.txt</a>"));
        assert!(html.contains("<a href=\"docs/\">docs/</a>"));
        assert!(html.contains("<a href=\"empty%20dir/\">empty dir/</a>"));
        let docs = html.find("docs/").unwrap();
        let style = html.find("style.css").unwrap();
        assert!(docs < style);
    }
}
