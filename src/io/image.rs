//! Image loading, discovery and export boundaries
//!
//! The mosaic core only sees these traits. [`FileSystem`] implements all of
//! them on top of the `image` crate and a recursive directory walk.

use crate::io::configuration::SUPPORTED_EXTENSIONS;
use crate::io::error::{MosaicError, Result, WithPath};
use image::RgbImage;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Decodes an image file into 8-bit RGB
pub trait ImageLoader: Sync {
    /// Load the image at `path`
    ///
    /// # Errors
    ///
    /// Returns `ImageLoad` if the file cannot be read or decoded
    fn load(&self, path: &Path) -> Result<RgbImage>;
}

/// Lists candidate image files below a directory
pub trait ImageDiscovery {
    /// Every candidate image path under `root`, recursively
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the directory tree cannot be traversed
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Persists a finished composite
pub trait ImageWriter {
    /// Encode `image` to `path`, format chosen by extension
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the parent directory cannot be created and
    /// `ImageExport` if encoding or writing fails
    fn write(&self, image: &RgbImage, path: &Path) -> Result<()>;
}

/// Local filesystem implementation of all image boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl ImageLoader for FileSystem {
    fn load(&self, path: &Path) -> Result<RgbImage> {
        let img = image::open(path).with_path(path)?;
        Ok(img.to_rgb8())
    }
}

impl ImageDiscovery for FileSystem {
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        // Sorted traversal keeps library order, and so tie-breaks, stable across runs
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }
}

impl ImageWriter for FileSystem {
    fn write(&self, image: &RgbImage, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        image.save(path).map_err(|e| MosaicError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Whether the file extension names a supported image format
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}
