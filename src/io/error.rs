//! Error types and path context for mosaic operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save the composite image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tiling requires square images
    NonSquareImage {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// Two signatures hold different numbers of sub-tile histograms
    SignatureMismatch {
        /// Histogram count of the source signature
        expected: usize,
        /// Histogram count of the candidate signature
        found: usize,
        /// Library index of the offending candidate
        candidate: usize,
    },

    /// Two signatures were extracted at different bin resolutions
    ResolutionMismatch {
        /// Bins per channel of the source signature
        expected: usize,
        /// Bins per channel of the candidate signature
        found: usize,
        /// Library index of the offending candidate
        candidate: usize,
    },

    /// No usable candidate images were available for matching
    EmptyLibrary,

    /// Wrong number of matched images handed to the assembler
    TileCount {
        /// Number of images the grid requires
        expected: usize,
        /// Number of images supplied
        found: usize,
    },

    /// A matched image does not line up with its neighbours
    MismatchedTileSize {
        /// Position of the offending image in the assembly order
        index: usize,
        /// Dimensions (width, height) the grid requires at this position
        expected: (u32, u32),
        /// Dimensions (width, height) of the supplied image
        found: (u32, u32),
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NonSquareImage { width, height } => {
                write!(f, "Image must be square, got {width}x{height}")
            }
            Self::SignatureMismatch {
                expected,
                found,
                candidate,
            } => {
                write!(
                    f,
                    "Signature mismatch for candidate {candidate}: expected {expected} histograms, found {found}"
                )
            }
            Self::ResolutionMismatch {
                expected,
                found,
                candidate,
            } => {
                write!(
                    f,
                    "Resolution mismatch for candidate {candidate}: expected {expected} bins per channel, found {found}"
                )
            }
            Self::EmptyLibrary => {
                write!(f, "Candidate library is empty, no images to match against")
            }
            Self::TileCount { expected, found } => {
                write!(f, "Expected {expected} matched images, got {found}")
            }
            Self::MismatchedTileSize {
                index,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Image {index} is {}x{} but the grid requires {}x{}",
                    found.0, found.1, expected.0, expected.1
                )
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Attaches the path being worked on to errors converted without one
pub trait WithPath<T> {
    /// Replace a placeholder path in the error with `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<MosaicError>,
{
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only path-carrying variants benefit from the context
            match &mut error {
                MosaicError::ImageLoad { path: slot, .. }
                | MosaicError::ImageExport { path: slot, .. }
                | MosaicError::FileSystem { path: slot, .. } => {
                    path.clone_into(slot);
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<walkdir::Error> for MosaicError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map_or_else(|| PathBuf::from("<unknown>"), Path::to_path_buf);
        Self::FileSystem {
            path,
            operation: "directory traversal",
            source: err.into(),
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
