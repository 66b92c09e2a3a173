//! Line-preserving editor for the sprint status ledger.
//!
//! The ledger (`sprint-status.yaml`) is never deserialized. It is held as
//! the ordered list of its raw lines, and only the lines inside the
//! `development_status:` section that follow the entry shape are
//! understood:
//!
//! ```text
//! # last_verified: 2026-01-02 10:00:00
//! development_status:
//!   epic-1: in-progress
//!   1-a-foo: ready-for-dev  # note
//! ```
//!
//! Everything else is carried through byte-for-byte. Story entries belong
//! to the epic line above them; [`LedgerOutline`] rebuilds that grouping
//! from the flat scan.

pub mod backup;
pub mod error;
pub mod ledger;
pub mod line;
pub mod outline;

pub use backup::BackupStore;
pub use error::{Error, Result};
pub use ledger::{InsertOutcome, SaveReport, SprintLedger, UpdateOutcome};
pub use line::{EntryLine, epic_key_for};
pub use outline::{EntryNode, EpicNode, LedgerOutline};

/// Header line that opens the tracked section.
pub const SECTION_HEADER: &str = "development_status:";

/// Prefix of the verification timestamp header line.
pub const VERIFIED_MARKER: &str = "# last_verified:";
