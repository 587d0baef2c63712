//! Reconciled log records.

use chrono::{DateTime, Local};

use crate::expectation::ExpectationRecord;

/// Timestamp format used in report rows, e.g. `Jan 30, 2014 4:07 PM`.
pub const TIMESTAMP_FORMAT: &str = "%b %d, %Y %-I:%M %p";

/// An expectation paired with the message the method actually logged.
#[derive(Debug, Clone)]
pub struct LogRecord {
    expectation: ExpectationRecord,
    actual_message: String,
    timestamp: DateTime<Local>,
}

impl LogRecord {
    /// Pair `expectation` with `actual_message`, stamped with the current wall clock.
    #[must_use]
    pub fn new(expectation: ExpectationRecord, actual_message: impl Into<String>) -> Self {
        Self::at(expectation, actual_message, Local::now())
    }

    /// Same as [`LogRecord::new`] with an explicit timestamp.
    #[must_use]
    pub fn at(
        expectation: ExpectationRecord,
        actual_message: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            expectation,
            actual_message: actual_message.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn expectation(&self) -> &ExpectationRecord {
        &self.expectation
    }

    #[must_use]
    pub fn actual_message(&self) -> &str {
        &self.actual_message
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Exact string equality between the logged and the expected message.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.actual_message == self.expectation.expected_message()
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
