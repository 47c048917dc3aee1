/// Composite assembly from matched images
pub mod assembly;
/// End-to-end mosaic pipeline
pub mod executor;
/// Candidate signing and the read-only candidate library
pub mod library;
/// Progress side channel for parallel stages
pub mod observer;
/// Nearest-candidate search
pub mod search;
