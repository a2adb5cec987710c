//! HTTP response building module
//!
//! Builders for the status codes the file and API handlers produce.
//! Route-level caching headers are applied afterwards by the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LOCATION,
};
use hyper::{Response, StatusCode};

use super::range::ByteRange;

pub type HttpResponse = Response<Full<Bytes>>;

/// Build 200 response for a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 206 Partial Content response; `data` is the whole file
pub fn build_partial_response(
    data: &Bytes,
    content_type: &str,
    etag: &str,
    range: ByteRange,
    is_head: bool,
) -> HttpResponse {
    let body = if is_head {
        Bytes::new()
    } else {
        data.slice(range.start..=range.end)
    };

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, range.content_range(data.len()))
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 JSON response
pub fn build_json_response(body: Vec<u8>, is_head: bool) -> HttpResponse {
    let content_length = body.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(body)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> HttpResponse {
    build_text_response(StatusCode::BAD_REQUEST, "400 Bad Request")
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> HttpResponse {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("416 Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 500 Internal Server Error response with a plain-text message
pub fn build_500_response(message: &'static str) -> HttpResponse {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn build_text_response(status: StatusCode, message: &'static str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(message.as_bytes())))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_partial_response_slices_body() {
        let data = Bytes::from_static(b"0123456789");
        let resp = build_partial_response(
            &data,
            "text/plain",
            "\"e\"",
            ByteRange { start: 2, end: 4 },
            false,
        );
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 2-4/10");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "3");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"234");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_file_response(Bytes::from_static(b"hello"), "text/plain", "\"e\"", true);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_text_responses() {
        let resp = build_500_response("Failed to encode slides");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(build_404_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(build_416_response(10).headers()[CONTENT_RANGE], "bytes */10");
    }
}
