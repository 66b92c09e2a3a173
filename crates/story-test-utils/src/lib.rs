//! Shared test fixtures for the storyline workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`workspace`]: [`TestWorkspace`] builder for a base directory with
//!   story documents, a ledger and optional configuration

pub mod workspace;

pub use workspace::{TestWorkspace, story_document};
