//! Status reconciliation and story document checks for Storyline
//!
//! This crate sits between the ledger editor and the command line:
//!
//! - **Scanner**: reads the status marker each story document declares
//! - **Status vocabulary**: maps free status text onto the closed set
//! - **Reconciliation**: diffs scanned statuses against the ledger and
//!   writes the differences back
//! - **Story checks**: validation, repetition cleanup, checkbox reset and
//!   status backfill over the story documents
//!
//! ```text
//!              story-cli
//!                  |
//!              story-core
//!                  |
//!     +------------+------------+
//!     |            |            |
//! story-fs    story-meta   story-ledger
//! ```

pub mod epic;
pub mod error;
pub mod reconcile;
pub mod scanner;
pub mod status;
pub mod stories;
pub mod sync;

pub use epic::EpicFilter;
pub use error::{Error, Result};
pub use reconcile::{
    AppliedChange, ApplyReport, Discrepancy, LedgerValue, SkippedChange, apply, reconcile,
};
pub use scanner::{ScanOptions, ScanReport, UnrecognizedStatus, is_excluded, scan};
pub use status::{Normalized, Status, normalize};
pub use sync::{StatusSync, SyncMode, SyncReport, SyncRequest};
