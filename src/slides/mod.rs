//! Slide store module
//!
//! Holds the slide data model and the startup derivation that fills it.
//! The store is built once before the server binds and is read-only afterwards.

pub mod bootstrap;
mod error;

use serde::{Deserialize, Serialize};

pub use bootstrap::{load_or_derive, SlideSource};

/// URL prefix under which slide images are served
pub const IMAGE_URL_PREFIX: &str = "/images/";

/// A single slide: an image reference paired with a quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slide {
    pub id: i64,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub quote: String,
    #[serde(skip_serializing_if = "author_is_blank")]
    pub author: Option<String>,
}

#[allow(clippy::ref_option)]
fn author_is_blank(author: &Option<String>) -> bool {
    author.as_deref().map_or(true, str::is_empty)
}

impl Slide {
    pub fn new(id: i64, image_url: String, quote: String, author: Option<String>) -> Self {
        Self {
            id,
            image_url,
            quote,
            author,
        }
    }
}

/// Ordered slide collection; insertion order is display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlideStore {
    slides: Vec<Slide>,
}

impl SlideStore {
    pub const fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    /// Parse a persisted slides document.
    ///
    /// A top-level `null` is accepted and yields an empty store.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        let slides: Option<Vec<Slide>> = serde_json::from_slice(data)?;
        Ok(Self::new(slides.unwrap_or_default()))
    }

    /// Indented form written to the slides file
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.slides)
    }

    /// Compact form served by the API, newline terminated
    pub fn to_api_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut body = serde_json::to_vec(&self.slides)?;
        body.push(b'\n');
        Ok(body)
    }

    #[cfg(test)]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_omitted_when_missing_or_empty() {
        let store = SlideStore::new(vec![
            Slide::new(1, "/images/a.png".into(), "one".into(), None),
            Slide::new(2, "/images/b.png".into(), "two".into(), Some(String::new())),
            Slide::new(3, "/images/c.png".into(), "three".into(), Some("Ada".into())),
        ]);
        let json: serde_json::Value = serde_json::from_slice(&store.to_api_json().unwrap()).unwrap();
        let items = json.as_array().unwrap();
        assert!(items[0].get("author").is_none());
        assert!(items[1].get("author").is_none());
        assert_eq!(items[2]["author"], "Ada");
        assert_eq!(items[0]["imageUrl"], "/images/a.png");
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let store = SlideStore::new(vec![Slide::new(
            1,
            "/images/a.png".into(),
            "q".into(),
            Some("Unknown".into()),
        )]);
        let text = store.to_pretty_json().unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
        assert!(text.contains("\"imageUrl\": \"/images/a.png\""));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_from_json_keeps_file_order_and_tolerates_gaps() {
        let data = br#"[
            {"id": 7, "imageUrl": "/images/z.png", "quote": "last", "extra": true},
            {"id": 7, "quote": "dup id, no image"}
        ]"#;
        let store = SlideStore::from_json(data).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.slides()[0].quote, "last");
        assert_eq!(store.slides()[1].id, 7);
        assert_eq!(store.slides()[1].image_url, "");
        assert_eq!(store.slides()[1].author, None);
    }

    #[test]
    fn test_from_json_null_is_empty() {
        let store = SlideStore::from_json(b"null").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.to_api_json().unwrap(), b"[]\n");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(SlideStore::from_json(b"{not json").is_err());
        assert!(SlideStore::from_json(br#"{"id": 1}"#).is_err());
    }
}
