//! HTTP cache control module
//!
//! `ETag` generation, conditional request matching and the per-route
//! `Cache-Control` policies.

use chrono::{DateTime, Duration, Utc};
use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES};
use hyper::HeaderMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// One day, used by every cacheable route
pub const ONE_DAY_SECS: u32 = 86_400;

/// Generate a quoted `ETag` from content
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"9f2c1e0d4b"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Whether `If-None-Match` matches the server `ETag`
///
/// Accepts a single tag, a comma-separated list, or the `*` wildcard.
///
/// # Arguments
/// * `if_none_match` - Client-sent If-None-Match header
/// * `etag` - Server-computed `ETag`
///
/// # Returns
/// true when the client copy is current and a 304 should be sent
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Cache-Control policy applied by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Shared caches may keep the response for the given seconds
    Public(u32),
    /// Same as `Public`, plus an absolute `Expires` computed at response time
    PublicWithExpires(u32),
    /// Clients must revalidate before reuse
    NoCache,
    /// Never stored
    NoStore,
}

impl CachePolicy {
    /// Policy for the static root: stylesheets and scripts are cached for a
    /// day, everything else (HTML in particular) is never stored
    pub fn for_static_path(path: &str) -> Self {
        if path.ends_with(".css") || path.ends_with(".js") {
            Self::Public(ONE_DAY_SECS)
        } else {
            Self::NoStore
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) | Self::PublicWithExpires(max_age) => {
                format!("public, max-age={max_age}")
            }
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-cache, no-store, must-revalidate".to_string(),
        }
    }

    /// Set `Cache-Control` (and `Expires` where the policy wants it),
    /// replacing whatever the file layer put there
    pub fn apply(self, headers: &mut HeaderMap, now: DateTime<Utc>) {
        if let Ok(value) = HeaderValue::from_str(&self.to_header_value()) {
            headers.insert(CACHE_CONTROL, value);
        }
        if let Self::PublicWithExpires(max_age) = self {
            let expires = now + Duration::seconds(i64::from(max_age));
            if let Ok(value) = HeaderValue::from_str(&http_date(expires)) {
                headers.insert(EXPIRES, value);
            }
        }
    }
}

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
