//! Structured diagnostics channel for harness lifecycle events.
//!
//! Provides:
//! - [`DiagnosticEvent`]: one JSONL record with required + optional fields.
//! - [`DiagnosticEmitter`]: writes JSONL lines to stderr, a buffer, or nowhere.
//! - [`validate_diagnostic_line`]: checks a single JSONL line against the schema.
//!
//! Report generation never fails loudly; this channel is where its failures go.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::sink::SharedBuffer;

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Severity level for diagnostic events, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Outcome of a reported run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Canonical diagnostic record.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub timestamp: String,
    pub trace_id: String,
    pub level: Level,
    pub event: String,

    /// Location of the artifact this event refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    /// Hex SHA-256 of the artifact bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DiagnosticEvent {
    /// Create an event with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: Level, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            artifact: None,
            sha256: None,
            outcome: None,
            message: None,
            details: None,
        }
    }

    /// Attach an artifact location and its digest.
    #[must_use]
    pub fn with_artifact(mut self, location: impl Into<String>, sha256: impl Into<String>) -> Self {
        self.artifact = Some(location.into());
        self.sha256 = Some(sha256.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Where diagnostic lines go.
#[derive(Debug, Clone, Default)]
pub enum DiagnosticsTarget {
    /// Warnings and errors only, so a healthy run prints nothing.
    #[default]
    Stderr,
    /// Every event, lifecycle included.
    StderrVerbose,
    Silent,
    /// In-memory buffer, for embedders that want to inspect events.
    Buffer(SharedBuffer),
}

impl DiagnosticsTarget {
    /// Parse from string (case-insensitive). Unknown values fall back to stderr.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "silent" | "quiet" => Self::Silent,
            "verbose" | "all" | "debug" => Self::StderrVerbose,
            _ => Self::Stderr,
        }
    }
}

/// Writes [`DiagnosticEvent`]s as JSONL with sequential trace ids.
pub struct DiagnosticEmitter {
    writer: Box<dyn Write>,
    min_level: Level,
    seq: u64,
    run_id: String,
}

impl DiagnosticEmitter {
    #[must_use]
    pub fn new(target: &DiagnosticsTarget, run_id: &str) -> Self {
        let writer: Box<dyn Write> = match target {
            DiagnosticsTarget::Stderr | DiagnosticsTarget::StderrVerbose => {
                Box::new(std::io::stderr())
            }
            DiagnosticsTarget::Silent => Box::new(std::io::sink()),
            DiagnosticsTarget::Buffer(buffer) => Box::new(buffer.clone()),
        };
        let min_level = match target {
            DiagnosticsTarget::Stderr => Level::Warn,
            _ => Level::Trace,
        };
        Self {
            writer,
            min_level,
            seq: 0,
            run_id: run_id.to_string(),
        }
    }

    /// Generate the next trace id: `selfcheck::<run>::<seq>`.
    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("selfcheck::{}::{:03}", self.run_id, self.seq)
    }

    /// Start an event carrying the next trace id.
    pub fn event(&mut self, level: Level, event: &str) -> DiagnosticEvent {
        let trace_id = self.next_trace_id();
        DiagnosticEvent::new(trace_id, level, event)
    }

    /// Whether events at `level` reach the target.
    #[must_use]
    pub fn accepts(&self, level: Level) -> bool {
        level >= self.min_level
    }

    /// Write an event. Failures are dropped: diagnostics never interrupt a run.
    pub fn emit(&mut self, entry: &DiagnosticEvent) {
        if !self.accepts(entry.level) {
            return;
        }
        if let Ok(line) = entry.to_jsonl() {
            let _ = writeln!(self.writer, "{line}");
            let _ = self.writer.flush();
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a diagnostic line.
#[derive(Debug)]
pub struct DiagnosticValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for DiagnosticValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Validate a single JSONL line.
pub fn validate_diagnostic_line(
    line: &str,
    line_number: usize,
) -> Result<DiagnosticEvent, Vec<DiagnosticValidationError>> {
    let mut errors = Vec::new();
    let error = |field: &str, message: String| DiagnosticValidationError {
        line_number,
        field: field.to_string(),
        message,
    };

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Err(vec![error("<json>", format!("invalid JSON: {e}"))]),
    };
    let Some(obj) = value.as_object() else {
        return Err(vec![error("<root>", "expected JSON object".to_string())]);
    };

    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(error(field, "required field missing".to_string()));
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !["trace", "debug", "info", "warn", "error"].contains(&level)
    {
        errors.push(error("level", format!("invalid level: '{level}'")));
    }

    if let Some(outcome) = obj.get("outcome").and_then(|v| v.as_str())
        && !["pass", "fail", "error"].contains(&outcome)
    {
        errors.push(error("outcome", format!("invalid outcome: '{outcome}'")));
    }

    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && !trace_id.contains("::")
    {
        errors.push(error(
            "trace_id",
            format!("trace_id should follow selfcheck::<run>::<seq> format, got: '{trace_id}'"),
        ));
    }

    if obj.contains_key("sha256") && !obj.contains_key("artifact") {
        errors.push(error("artifact", "sha256 present without artifact".to_string()));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value::<DiagnosticEvent>(value)
        .map_err(|e| vec![error("<deserialization>", format!("failed to deserialize: {e}"))])
}

fn now_utc() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
