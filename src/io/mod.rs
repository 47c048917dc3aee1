/// Command-line parsing and run orchestration
pub mod cli;
/// Tunables and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Image loading, discovery and export
pub mod image;
/// Terminal progress display
pub mod progress;
