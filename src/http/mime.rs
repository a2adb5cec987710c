//! MIME type detection module
//!
//! Content-Type from a file's extension, matched case-insensitively.

use std::path::Path;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-Type for a file path
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(DEFAULT_CONTENT_TYPE, |ext| {
            content_type_for_extension(&ext.to_ascii_lowercase())
        })
}

fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        // Pages and assets
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "text/xml; charset=utf-8",
        "wasm" => "application/wasm",
        "map" => "application/json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        _ => DEFAULT_CONTENT_TYPE,
    }
}
