//! Filesystem primitives for Storyline
//!
//! Provides base-directory relative path resolution and safe text I/O.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use constants::StoryPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
