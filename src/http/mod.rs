//! HTTP protocol layer module
//!
//! Caching, content types, ranges and response builders shared by the
//! file handlers and the slides API.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use cache::CachePolicy;
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_416_response, build_500_response,
    build_redirect_response, HttpResponse,
};
