//! End-to-end tests for rowforge-xlsx.
//!
//! Each test writes a complete document into memory (or a temp file), opens
//! the result with `zip::ZipArchive` and checks the emitted parts.

mod common;
mod writing;

// Re-export common utilities for submodules
pub use common::*;
