// API module entry
// Read-only JSON view of the slide store

use crate::http::{self, response::build_json_response};
use crate::logger;
use crate::slides::SlideStore;

const ENCODE_FAILURE: &str = "Failed to encode slides";

/// Serve the slide store as a JSON array, whatever the method
pub fn handle_slides(slides: &SlideStore, is_head: bool) -> http::HttpResponse {
    slides_response(slides.to_api_json(), is_head)
}

fn slides_response(encoded: serde_json::Result<Vec<u8>>, is_head: bool) -> http::HttpResponse {
    match encoded {
        Ok(body) => build_json_response(body, is_head),
        Err(e) => {
            logger::log_error(&format!("{ENCODE_FAILURE}: {e}"));
            http::build_500_response(ENCODE_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::Slide;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use hyper::StatusCode;

    #[tokio::test]
    async fn test_slides_as_json_array() {
        let store = SlideStore::new(vec![Slide::new(
            1,
            "/images/placeholder_1.txt".into(),
            "The only way to do great work is to love what you do.".into(),
            Some("Steve Jobs".into()),
        )]);
        let resp = handle_slides(&store, false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &body[..],
            br#"[{"id":1,"imageUrl":"/images/placeholder_1.txt","quote":"The only way to do great work is to love what you do.","author":"Steve Jobs"}]
"#
        );
    }

    #[tokio::test]
    async fn test_empty_store_is_empty_array() {
        let resp = handle_slides(&SlideStore::default(), false);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"[]\n");
    }

    #[tokio::test]
    async fn test_head_keeps_length_without_body() {
        let store = SlideStore::new(vec![Slide::new(1, "/images/a.png".into(), "q".into(), None)]);
        let expected_len = store.to_api_json().unwrap().len();

        let resp = handle_slides(&store, true);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            resp.headers()[CONTENT_LENGTH],
            expected_len.to_string().as_str()
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_encode_failure_is_500() {
        let err = serde_json::from_str::<u8>("not json").unwrap_err();
        let resp = slides_response(Err(err), false);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], ENCODE_FAILURE.as_bytes());
    }
}
