//! Unit tests mirroring the source tree one file per module
