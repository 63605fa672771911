//! Audit logging for the price tracker
//!
//! Records every item create, update and delete, every price change and
//! every catalog import in an append-only JSONL file.
//!
//! - `AuditEntry`: one operation with category, entity and before/after state
//! - `AuditLogger`: appends entries to the log file and reads them back

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
