//! Startup derivation of the slide store
//!
//! Priority order:
//! 1. Persisted slides file, used as-is
//! 2. Scan of the images directory
//! 3. Fixed sample quotes with placeholder files
//!
//! Results of 2 and 3 are written back to the slides file.

use std::fs;
use std::io;
use std::path::Path;

use super::error::{Result, SlideError};
use super::{Slide, SlideStore, IMAGE_URL_PREFIX};
use crate::config::PathsConfig;
use crate::logger;

/// Lowercased extensions accepted as slide images
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

const DEFAULT_AUTHOR: &str = "Unknown";

const SAMPLE_QUOTES: [(&str, &str); 4] = [
    (
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    (
        "Life is what happens when you're busy making other plans.",
        "John Lennon",
    ),
    (
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
    ),
    (
        "Success is not final, failure is not fatal: It is the courage to continue that counts.",
        "Winston Churchill",
    ),
];

/// Where the slide store came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideSource {
    Persisted,
    Scanned,
    Samples,
}

impl SlideSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Persisted => "slides file",
            Self::Scanned => "images directory scan",
            Self::Samples => "sample data",
        }
    }
}

/// Build the slide store for this process.
///
/// Persisted data wins when it reads and parses; anything else falls back to
/// derivation, and derived stores are persisted before returning.
pub fn load_or_derive(paths: &PathsConfig) -> Result<(SlideStore, SlideSource)> {
    let slides_file = Path::new(&paths.slides_file);

    match read_persisted(slides_file) {
        Ok(store) => return Ok((store, SlideSource::Persisted)),
        Err(SlideError::ReadPersisted { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            logger::log_info(&format!(
                "[Slides] {} not found, initializing from {}",
                slides_file.display(),
                paths.images_dir
            ));
        }
        Err(e) => {
            logger::log_warning(&format!("{e}; deriving slides from {}", paths.images_dir));
        }
    }

    let (slides, source) = derive(Path::new(&paths.images_dir))?;
    let store = SlideStore::new(slides);
    persist(slides_file, &store)?;
    Ok((store, source))
}

/// Read and parse the persisted slides file
pub fn read_persisted(path: &Path) -> Result<SlideStore> {
    let data = fs::read(path).map_err(|source| SlideError::ReadPersisted {
        path: path.to_path_buf(),
        source,
    })?;
    SlideStore::from_json(&data).map_err(|source| SlideError::ParsePersisted {
        path: path.to_path_buf(),
        source,
    })
}

/// Scan the images directory, falling back to samples when it is new or holds no images
fn derive(images_dir: &Path) -> Result<(Vec<Slide>, SlideSource)> {
    if !images_dir.exists() {
        fs::create_dir_all(images_dir).map_err(|source| SlideError::CreateImagesDir {
            path: images_dir.to_path_buf(),
            source,
        })?;
        logger::log_info(&format!(
            "[Slides] Created images directory {}",
            images_dir.display()
        ));
        return Ok((synthesize_samples(images_dir)?, SlideSource::Samples));
    }

    let slides = scan_images(images_dir)?;
    if slides.is_empty() {
        logger::log_info(&format!(
            "[Slides] No images found in {}, using sample data",
            images_dir.display()
        ));
        return Ok((synthesize_samples(images_dir)?, SlideSource::Samples));
    }
    Ok((slides, SlideSource::Scanned))
}

/// One slide per image file directly inside `images_dir`, in file name order
pub fn scan_images(images_dir: &Path) -> Result<Vec<Slide>> {
    let read_err = |source| SlideError::ReadImagesDir {
        path: images_dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(images_dir)
        .map_err(read_err)?
        .collect::<io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut slides = Vec::new();
    for entry in entries {
        if entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            logger::log_warning(&format!(
                "Skipping non UTF-8 file name in images directory: {}",
                entry.path().display()
            ));
            continue;
        };
        if !is_image_file(file_name) {
            continue;
        }

        let id = i64::try_from(slides.len()).unwrap_or(i64::MAX) + 1;
        slides.push(Slide::new(
            id,
            format!("{IMAGE_URL_PREFIX}{file_name}"),
            format!("This is a default quote for image {file_name}"),
            Some(DEFAULT_AUTHOR.to_string()),
        ));
    }
    Ok(slides)
}

/// Extension check on the text after the last dot, case-insensitive
fn is_image_file(file_name: &str) -> bool {
    file_name.rsplit_once('.').is_some_and(|(_, ext)| {
        let ext = ext.to_ascii_lowercase();
        IMAGE_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Write one placeholder file per sample quote and return the matching slides.
///
/// The placeholders are plain text, so the slide images will not render.
pub fn synthesize_samples(images_dir: &Path) -> Result<Vec<Slide>> {
    fs::create_dir_all(images_dir).map_err(|source| SlideError::CreateImagesDir {
        path: images_dir.to_path_buf(),
        source,
    })?;

    let mut slides = Vec::with_capacity(SAMPLE_QUOTES.len());
    for (n, (quote, author)) in (1_i64..).zip(SAMPLE_QUOTES) {
        let file_name = format!("placeholder_{n}.txt");
        let path = images_dir.join(&file_name);
        let content =
            format!("This is a placeholder for image {n}. Replace with an actual image file.");
        fs::write(&path, content).map_err(|source| SlideError::WritePlaceholder {
            path: path.clone(),
            source,
        })?;

        slides.push(Slide::new(
            n,
            format!("{IMAGE_URL_PREFIX}{file_name}"),
            quote.to_string(),
            Some(author.to_string()),
        ));
    }
    Ok(slides)
}

/// Overwrite the slides file with indented JSON
pub fn persist(path: &Path, store: &SlideStore) -> Result<()> {
    let json = store.to_pretty_json().map_err(SlideError::Serialize)?;
    fs::write(path, json).map_err(|source| SlideError::WritePersisted {
        path: path.to_path_buf(),
        source,
    })
}
