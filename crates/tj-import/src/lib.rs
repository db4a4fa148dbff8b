//! Trade import pipeline: from CSV text to stored trades.
//!
//! [`ImportSession`] drives the stages:
//!
//! 1. ingest the CSV and sample its columns
//! 2. detect a column mapping (header, then value patterns)
//! 3. optionally enrich the mapping with translations
//! 4. parse and validate every row, computing derived fields
//! 5. submit accepted rows to a [`TradeStore`] and reconcile the outcome
//!
//! Structural problems (unreadable CSV, no headers) stop the session early.
//! Row problems are collected as [`tj_model::RowError`] values and never
//! abort the batch.

mod derived;
mod error;
mod parser;
mod readiness;
mod session;
mod store;
mod submit;

pub use derived::{DerivedFields, apply_derived, derive};
pub use error::{ImportError, Result};
pub use parser::{AcceptedRow, ParseOutcome, RowParser, parse_table};
pub use readiness::{MissingField, SubmissionBlock, check_ready};
pub use session::ImportSession;
pub use store::{JsonLinesStore, MemoryStore, StoredTrade};
pub use submit::{
    ImportFailure, ImportReport, ImportRequest, ImportResponse, StorageFailure, TradeStore,
    reconcile,
};
