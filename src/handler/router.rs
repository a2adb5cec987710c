//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path decoding, route matching,
//! dispatch and the per-route caching headers.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, cache::ONE_DAY_SECS, CachePolicy};
use crate::logger::{self, AccessLogEntry};
use crate::slides::IMAGE_URL_PREFIX;
use hyper::body::Body as _;
use hyper::header::{IF_NONE_MATCH, RANGE, REFERER, USER_AGENT};
use hyper::{HeaderMap, Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Mount point of the images directory, shared with the slide image URLs
pub const IMAGES_PREFIX: &str = IMAGE_URL_PREFIX;

/// Exact path of the slides API
pub const API_SLIDES_PATH: &str = "/api/slides";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Percent-decoded request path
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Routes in match order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Api,
    /// `/images` without the trailing slash
    ImagesRedirect,
    Images,
    Static,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        if path == API_SLIDES_PATH {
            Self::Api
        } else if path == IMAGES_PREFIX.trim_end_matches('/') {
            Self::ImagesRedirect
        } else if path.starts_with(IMAGES_PREFIX) {
            Self::Images
        } else {
            Self::Static
        }
    }

    /// Caching policy for responses on this route, `None` to leave headers alone
    pub fn cache_policy(self, path: &str) -> Option<CachePolicy> {
        match self {
            Self::Api => Some(CachePolicy::NoCache),
            Self::Images => Some(CachePolicy::PublicWithExpires(ONE_DAY_SECS)),
            Self::Static => Some(CachePolicy::for_static_path(path)),
            Self::ImagesRedirect => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::ImagesRedirect | Self::Images => "images",
            Self::Static => "static",
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<http::HttpResponse, Infallible> {
    let started = Instant::now();
    let raw_path = req.uri().path();

    // Route on the lossy form so a rejected path still gets its route's headers
    let decoded = urlencoding::decode_binary(raw_path.as_bytes());
    let valid_utf8 = std::str::from_utf8(&decoded).is_ok();
    let path = String::from_utf8_lossy(&decoded);

    let ctx = RequestContext {
        path: &path,
        is_head: req.method() == Method::HEAD,
        if_none_match: header_string(req.headers(), &IF_NONE_MATCH),
        range_header: header_string(req.headers(), &RANGE),
    };

    let route = Route::resolve(ctx.path);
    let mut response = if valid_utf8 {
        dispatch(route, &ctx, &state).await
    } else {
        logger::log_warning(&format!("Undecodable request path: {raw_path}"));
        http::response::build_400_response()
    };

    if let Some(policy) = route.cache_policy(ctx.path) {
        policy.apply(response.headers_mut(), chrono::Utc::now());
    }

    if state.config.logging.access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.ip().to_string(),
            time: chrono::Local::now(),
            method: req.method().to_string(),
            uri: req
                .uri()
                .path_and_query()
                .map_or_else(|| raw_path.to_string(), ToString::to_string),
            http_version: version_label(req.version()).to_string(),
            status: response.status().as_u16(),
            body_bytes: response.body().size_hint().exact().unwrap_or(0),
            referer: header_string(req.headers(), &REFERER),
            user_agent: header_string(req.headers(), &USER_AGENT),
            route: route.as_str(),
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch(
    route: Route,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> http::HttpResponse {
    let paths = &state.config.paths;
    match route {
        Route::Api => api::handle_slides(&state.slides, ctx.is_head),
        Route::ImagesRedirect => http::build_redirect_response(IMAGES_PREFIX),
        Route::Images => {
            let relative = ctx.path.strip_prefix(IMAGES_PREFIX).unwrap_or(ctx.path);
            static_files::serve_directory(ctx, &paths.images_dir, relative).await
        }
        Route::Static => static_files::serve_directory(ctx, &paths.static_dir, ctx.path).await,
    }
}

fn header_string(headers: &HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
