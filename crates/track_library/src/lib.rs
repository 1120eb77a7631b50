//! # Track Library Module
//!
//! This module provides functionality for inspecting a local directory of
//! downloaded tracks: deciding which remote tracks are already present and
//! where a new track should be written.
//!
//! The module exposes a small abstraction layer so callers can swap the
//! directory-backed library for an in-memory one in tests.

mod domain;
mod library;

pub use domain::sanitize_filename;
pub use library::local::LocalLibrary;
pub use library::Library;
