//! Image metadata
//!
//! Pixel sizes of images come from outside the converter. Reading them needs image
//! decoding, and converting non-web formats needs external tools; both live behind
//! [`ImageMetadata`] so the core only computes destinations and scaled sizes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extensions browsers display directly
pub const WEB_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Supplies the pixel size of image files
pub trait ImageMetadata: Send + Sync {
    /// Width and height in pixels, if the file is known
    fn dimensions(&self, path: &Path) -> Option<(u32, u32)>;
}

/// Knows no image; every lookup fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageMetadata;

impl ImageMetadata for NoImageMetadata {
    fn dimensions(&self, _path: &Path) -> Option<(u32, u32)> {
        None
    }
}

/// A fixed table of sizes
#[derive(Debug, Clone, Default)]
pub struct StaticImageMetadata {
    sizes: HashMap<PathBuf, (u32, u32)>,
}

impl StaticImageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.sizes.insert(path.into(), (width, height));
        self
    }
}

impl ImageMetadata for StaticImageMetadata {
    fn dimensions(&self, path: &Path) -> Option<(u32, u32)> {
        self.sizes.get(path).copied()
    }
}

/// The file the page should link to: web formats as is, others converted to PNG
pub fn destination_for(source: &str) -> String {
    let path = Path::new(source);
    let is_web = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WEB_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
    if is_web {
        source.to_string()
    } else {
        path.with_extension("png").to_string_lossy().into_owned()
    }
}

/// Apply a percentage scale to a size
pub fn scale_dimensions((width, height): (u32, u32), percent: f64) -> (u32, u32) {
    let factor = percent / 100.0;
    (
        (width as f64 * factor).round() as u32,
        (height as f64 * factor).round() as u32,
    )
}
