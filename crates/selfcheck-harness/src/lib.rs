//! Inline expectation harness for self-verifying library code.
//!
//! This crate provides:
//! - Conditional expectations: a method declares which message it should log
//!   for specific argument values ([`Harness::register_if_match`], [`expecting!`])
//! - Reconciliation: each logged return message resolves the caller's pending
//!   expectations into pass/fail records ([`Harness::log`], [`log_return!`])
//! - Report generation: an HTML document with all results, failures only, and
//!   overflow blocks for multi-line messages ([`Harness::generate_report`])
//! - Structured JSONL diagnostics for the harness lifecycle
//!
//! A disabled harness (the default) turns every call into a single flag check.

#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expectation;
pub mod harness;
pub mod log_record;
mod macros;
pub mod report;
pub mod sink;
pub mod value;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use expectation::ExpectationRecord;
pub use harness::{Harness, ReportOutcome};
pub use log_record::LogRecord;
pub use report::{RenderedReport, ReportRenderer, ReportSummary};
pub use sink::{MemorySink, NumberedFileSink, ReportSink};
pub use value::{ArgValue, Condition};
