//! The record-to-document mapping engine.
//!
//! A declarative rule table walks a fresh template instance per record,
//! fills or schedules removal of its nodes through typed value
//! transforms, expands one-to-many agent relations by cloning
//! placeholder subtrees, prunes last, and serializes. The batch driver
//! isolates per-record failures so one bad record never aborts a run.

pub mod agents;
pub mod biograf;
pub mod driver;
pub mod error;
pub mod rules;
pub mod transforms;
pub mod tv2;

pub use driver::{BatchSummary, DirectorySink, MemorySink, OutputSink, RecordReport, run_batch};
pub use error::MapError;
pub use rules::{AbsentAction, Fallback, MappingRule, populate};
pub use transforms::{TransformError, ValueTransform};
