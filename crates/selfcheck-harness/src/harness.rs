//! The expectation harness.
//!
//! A [`Harness`] is either disabled, in which case every operation returns
//! immediately without allocating, or enabled with a run configuration and
//! three queues:
//! - pending expectations, in registration order;
//! - completed log records, in `log` call order;
//! - overflow blocks for multi-line messages, filled at render time.
//!
//! Instrumented code shares the handle by reference. State lives behind a
//! `RefCell`, so the harness is single-threaded by construction (`!Sync`).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;

use sha2::{Digest, Sha256};

use crate::config::HarnessConfig;
use crate::diagnostics::{DiagnosticEmitter, Level, Outcome};
use crate::error::HarnessError;
use crate::expectation::ExpectationRecord;
use crate::log_record::LogRecord;
use crate::report::{RenderedReport, ReportInput, ReportRenderer, ReportSummary};
use crate::sink::{NumberedFileSink, ReportSink};
use crate::value::{ArgValue, Condition};

/// Result of a successful report generation.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Where the artifact was written.
    pub location: String,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
    pub summary: ReportSummary,
}

struct EnabledState {
    config: HarnessConfig,
    pending: Vec<ExpectationRecord>,
    completed: VecDeque<LogRecord>,
    overflow: Vec<String>,
    renderer: ReportRenderer,
    sink: Box<dyn ReportSink>,
    diagnostics: DiagnosticEmitter,
}

enum HarnessMode {
    Disabled,
    Enabled(Box<EnabledState>),
}

/// Inline expectation harness. Starts disabled.
pub struct Harness {
    mode: RefCell<HarnessMode>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.mode.borrow() {
            HarnessMode::Disabled => f.write_str("Harness::Disabled"),
            HarnessMode::Enabled(state) => f
                .debug_struct("Harness::Enabled")
                .field("run_name", &state.config.run_name)
                .field("pending", &state.pending.len())
                .field("completed", &state.completed.len())
                .finish(),
        }
    }
}

impl Harness {
    /// A harness on which every operation is a no-op.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            mode: RefCell::new(HarnessMode::Disabled),
        }
    }

    /// An enabled harness writing numbered files under `config.output_root`.
    #[must_use]
    pub fn with_config(config: HarnessConfig) -> Self {
        let harness = Self::disabled();
        harness.enable_with(config);
        harness
    }

    /// Enabled from `SELFCHECK_*` variables, disabled when `SELFCHECK_RUN` is unset.
    #[must_use]
    pub fn from_env() -> Self {
        HarnessConfig::from_env().map_or_else(Self::disabled, Self::with_config)
    }

    /// Enable with default settings. Any previous state is discarded.
    pub fn enable(&self, run_name: &str, output_base_name: &str) {
        self.enable_with(HarnessConfig::new(run_name, output_base_name));
    }

    /// Enable with `config`, writing numbered files under `config.output_root`.
    pub fn enable_with(&self, config: HarnessConfig) {
        let sink = NumberedFileSink::new(
            &config.output_root,
            &config.run_name,
            &config.output_base_name,
        );
        self.enable_with_sink(config, Box::new(sink));
    }

    /// Enable with an explicit output sink. Any previous state is discarded.
    pub fn enable_with_sink(&self, config: HarnessConfig, sink: Box<dyn ReportSink>) {
        let mut diagnostics = DiagnosticEmitter::new(&config.diagnostics, &config.run_name);
        let event = diagnostics
            .event(Level::Info, "harness_enabled")
            .with_details(serde_json::json!({
                "run_name": config.run_name,
                "output_base_name": config.output_base_name,
            }));
        diagnostics.emit(&event);

        let state = EnabledState {
            renderer: ReportRenderer::new(&config.run_name, &config.asset_prefix),
            config,
            pending: Vec::new(),
            completed: VecDeque::new(),
            overflow: Vec::new(),
            sink,
            diagnostics,
        };
        *self.mode.borrow_mut() = HarnessMode::Enabled(Box::new(state));
    }

    /// Return to the disabled state, discarding everything recorded so far.
    pub fn disable(&self) {
        *self.mode.borrow_mut() = HarnessMode::Disabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(*self.mode.borrow(), HarnessMode::Enabled(_))
    }

    /// Configuration of the current run, if enabled.
    #[must_use]
    pub fn config(&self) -> Option<HarnessConfig> {
        match &*self.mode.borrow() {
            HarnessMode::Disabled => None,
            HarnessMode::Enabled(state) => Some(state.config.clone()),
        }
    }

    /// Expectations registered but not yet resolved by a `log` call.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        match &*self.mode.borrow() {
            HarnessMode::Disabled => 0,
            HarnessMode::Enabled(state) => state.pending.len(),
        }
    }

    /// Records waiting for the next report.
    #[must_use]
    pub fn completed_len(&self) -> usize {
        match &*self.mode.borrow() {
            HarnessMode::Disabled => 0,
            HarnessMode::Enabled(state) => state.completed.len(),
        }
    }

    /// Register `expected_message` for `method` if every condition holds.
    ///
    /// Returns whether an expectation was registered. The recorded arguments
    /// are the `actual` side of each condition.
    pub fn register_if_match(
        &self,
        method: &str,
        expected_message: &str,
        conditions: &[Condition],
    ) -> bool {
        let mut mode = self.mode.borrow_mut();
        let HarnessMode::Enabled(state) = &mut *mode else {
            return false;
        };
        if !conditions.iter().all(Condition::holds) {
            return false;
        }
        let arguments = conditions.iter().map(|c| c.actual.clone()).collect();
        state
            .pending
            .push(ExpectationRecord::new(method, expected_message, arguments));
        true
    }

    /// Flattened form of [`Harness::register_if_match`]: `values` alternates
    /// actual and expected values.
    ///
    /// An odd number of values is a caller bug and is returned as
    /// [`HarnessError::UnpairedCondition`]. Disabled harnesses do not inspect
    /// `values` at all.
    pub fn register_flattened(
        &self,
        method: &str,
        expected_message: &str,
        values: Vec<ArgValue>,
    ) -> Result<bool, HarnessError> {
        if !self.is_enabled() {
            return Ok(false);
        }
        if values.len() % 2 != 0 {
            return Err(HarnessError::UnpairedCondition { len: values.len() });
        }
        let mut values = values.into_iter();
        let mut conditions = Vec::with_capacity(values.len() / 2);
        while let (Some(actual), Some(expected)) = (values.next(), values.next()) {
            conditions.push(Condition { actual, expected });
        }
        Ok(self.register_if_match(method, expected_message, &conditions))
    }

    /// Resolve every pending expectation of `method` against `message`.
    ///
    /// Matching expectations leave the pending queue in registration order
    /// and are appended to the completed log. Returns how many were resolved;
    /// zero is the normal case for methods without expectations.
    pub fn log(&self, method: &str, message: &str) -> usize {
        let mut mode = self.mode.borrow_mut();
        let HarnessMode::Enabled(state) = &mut *mode else {
            return 0;
        };
        let state = &mut **state;

        let mut resolved = 0;
        let mut i = 0;
        while i < state.pending.len() {
            if state.pending[i].method() == method {
                let expectation = state.pending.remove(i);
                state
                    .completed
                    .push_back(LogRecord::new(expectation, message));
                resolved += 1;
            } else {
                i += 1;
            }
        }
        resolved
    }

    /// Drain the completed log into a rendered report without writing it anywhere.
    ///
    /// Returns `None` when disabled. A second call renders an empty report.
    #[must_use]
    pub fn render_report(&self) -> Option<RenderedReport> {
        let mut mode = self.mode.borrow_mut();
        let HarnessMode::Enabled(state) = &mut *mode else {
            return None;
        };
        Some(render_state(state))
    }

    /// Drain the completed log, render it, and write it to a fresh artifact.
    ///
    /// I/O failures are reported on the diagnostics channel and yield `None`;
    /// they never panic or propagate. Returns `None` when disabled.
    pub fn generate_report(&self) -> Option<ReportOutcome> {
        let mut mode = self.mode.borrow_mut();
        let HarnessMode::Enabled(state) = &mut *mode else {
            return None;
        };

        if !state.pending.is_empty() {
            let event = state
                .diagnostics
                .event(Level::Warn, "unconsumed_expectations")
                .with_details(serde_json::json!({ "pending": state.pending.len() }));
            state.diagnostics.emit(&event);
        }

        let report = render_state(state);
        match write_artifact(state.sink.as_mut(), &report) {
            Ok((location, sha256)) => {
                let outcome = if report.summary.all_passed() {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                };
                let details = serde_json::to_value(&report.summary).ok();
                let mut event = state
                    .diagnostics
                    .event(Level::Info, "report_written")
                    .with_artifact(&location, &sha256)
                    .with_outcome(outcome);
                event.details = details;
                state.diagnostics.emit(&event);
                Some(ReportOutcome {
                    location,
                    sha256,
                    summary: report.summary,
                })
            }
            Err(err) => {
                let event = state
                    .diagnostics
                    .event(Level::Error, "report_failed")
                    .with_outcome(Outcome::Error)
                    .with_message(err.to_string());
                state.diagnostics.emit(&event);
                None
            }
        }
    }
}

fn render_state(state: &mut EnabledState) -> RenderedReport {
    let input = ReportInput {
        records: std::mem::take(&mut state.completed),
        overflow: std::mem::take(&mut state.overflow),
    };
    state.renderer.render(input)
}

fn write_artifact(
    sink: &mut dyn ReportSink,
    report: &RenderedReport,
) -> Result<(String, String), HarnessError> {
    let mut artifact = sink.create()?;
    artifact.writer.write_all(report.html.as_bytes())?;
    artifact.writer.flush()?;
    let digest = Sha256::digest(report.html.as_bytes());
    let sha256: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    Ok((artifact.location, sha256))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsTarget;
    use crate::sink::{MemorySink, SharedBuffer};

    fn enabled() -> (Harness, MemorySink) {
        let sink = MemorySink::new();
        let harness = Harness::disabled();
        harness.enable_with_sink(
            HarnessConfig::new("unit", "output.html").with_diagnostics(DiagnosticsTarget::Silent),
            Box::new(sink.clone()),
        );
        (harness, sink)
    }

    #[test]
    fn disabled_harness_ignores_everything() {
        let harness = Harness::default();
        assert!(!harness.is_enabled());
        assert!(!harness.register_if_match("m", "x", &[Condition::new(1, 1)]));
        assert_eq!(harness.log("m", "x"), 0);
        assert!(harness.render_report().is_none());
        assert!(harness.generate_report().is_none());
        assert_eq!(harness.pending_len(), 0);
        assert!(harness.config().is_none());
    }

    #[test]
    fn disabled_harness_skips_flattened_validation() {
        let harness = Harness::disabled();
        let result = harness.register_flattened("m", "x", vec![ArgValue::from(1)]);
        assert!(matches!(result, Ok(false)));
    }

    #[test]
    fn guard_requires_every_pair() {
        let (harness, _) = enabled();
        assert!(!harness.register_if_match(
            "m",
            "x",
            &[Condition::new(1, 2), Condition::new(3, 3)]
        ));
        assert!(!harness.register_if_match(
            "m",
            "x",
            &[Condition::new(3, 3), Condition::new(1, 2)]
        ));
        assert_eq!(harness.pending_len(), 0);
        assert!(harness.register_if_match(
            "m",
            "x",
            &[Condition::new(1, 1), Condition::new(3, 3)]
        ));
        assert_eq!(harness.pending_len(), 1);
    }

    #[test]
    fn empty_condition_list_always_registers() {
        let (harness, _) = enabled();
        assert!(harness.register_if_match("m", "x", &[]));
    }

    #[test]
    fn odd_flattened_list_is_a_usage_error() {
        let (harness, _) = enabled();
        let err = harness
            .register_flattened("m", "x", vec![ArgValue::from(1), ArgValue::from(1), ArgValue::from(2)])
            .unwrap_err();
        assert!(matches!(err, HarnessError::UnpairedCondition { len: 3 }));
        assert_eq!(harness.pending_len(), 0);
    }

    #[test]
    fn flattened_list_pairs_values_in_order() {
        let (harness, _) = enabled();
        let registered = harness
            .register_flattened(
                "m",
                "x",
                vec![ArgValue::from(5_i8), ArgValue::from(5_i64), ArgValue::from("a"), ArgValue::from("a")],
            )
            .unwrap();
        assert!(registered);
        harness.log("m", "x");
        let report = harness.render_report().unwrap();
        assert!(report.html.contains("<td>(5, a)</td>"));
    }

    #[test]
    fn log_resolves_only_the_callers_expectations() {
        let (harness, _) = enabled();
        harness.register_if_match("a", "1", &[]);
        harness.register_if_match("b", "2", &[]);
        harness.register_if_match("a", "3", &[]);
        assert_eq!(harness.log("a", "1"), 2);
        assert_eq!(harness.pending_len(), 1);
        assert_eq!(harness.completed_len(), 2);
        assert_eq!(harness.log("c", "zzz"), 0);
        assert_eq!(harness.log("b", "2"), 1);
        assert_eq!(harness.pending_len(), 0);
    }

    #[test]
    fn log_without_pending_expectation_records_nothing() {
        let (harness, _) = enabled();
        assert_eq!(harness.log("m", "return false"), 0);
        assert_eq!(harness.completed_len(), 0);
    }

    #[test]
    fn re_enabling_discards_state() {
        let (harness, _) = enabled();
        harness.register_if_match("m", "x", &[]);
        harness.register_if_match("n", "y", &[]);
        harness.log("n", "y");
        harness.enable_with_sink(
            HarnessConfig::new("second", "o.html").with_diagnostics(DiagnosticsTarget::Silent),
            Box::new(MemorySink::new()),
        );
        assert_eq!(harness.pending_len(), 0);
        assert_eq!(harness.completed_len(), 0);
        assert_eq!(harness.config().unwrap().run_name, "second");
    }

    #[test]
    fn disable_discards_state() {
        let (harness, _) = enabled();
        harness.register_if_match("m", "x", &[]);
        harness.disable();
        assert!(!harness.is_enabled());
        assert_eq!(harness.pending_len(), 0);
    }

    #[test]
    fn report_generation_drains_the_log() {
        let (harness, sink) = enabled();
        harness.register_if_match("m", "x", &[]);
        harness.log("m", "x");
        let first = harness.generate_report().expect("report written");
        assert_eq!(first.summary.total, 1);
        assert_eq!(first.location, "memory://000");
        assert_eq!(first.sha256.len(), 64);
        assert_eq!(harness.completed_len(), 0);

        let second = harness.generate_report().expect("report written");
        assert_eq!(second.summary.total, 0);
        assert_eq!(sink.len(), 2);
        assert!(sink.artifacts()[1].contains("<table id=\"all\""));
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn create(&mut self) -> std::io::Result<crate::sink::Artifact> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ))
        }
    }

    #[test]
    fn io_failure_is_reported_not_raised() {
        let diagnostics = SharedBuffer::new();
        let harness = Harness::disabled();
        harness.enable_with_sink(
            HarnessConfig::new("unit", "o.html")
                .with_diagnostics(DiagnosticsTarget::Buffer(diagnostics.clone())),
            Box::new(FailingSink),
        );
        harness.register_if_match("m", "x", &[]);
        harness.log("m", "x");
        assert!(harness.generate_report().is_none());
        assert_eq!(harness.completed_len(), 0);

        let lines = diagnostics.contents();
        let failed = lines
            .lines()
            .find(|l| l.contains("report_failed"))
            .expect("failure event emitted");
        assert!(failed.contains("read-only"));
    }

    #[test]
    fn pending_expectations_are_flagged_at_report_time() {
        let diagnostics = SharedBuffer::new();
        let harness = Harness::disabled();
        harness.enable_with_sink(
            HarnessConfig::new("unit", "o.html")
                .with_diagnostics(DiagnosticsTarget::Buffer(diagnostics.clone())),
            Box::new(MemorySink::new()),
        );
        harness.register_if_match("never_logged", "x", &[]);
        harness.generate_report().expect("report written");
        assert!(diagnostics.contents().contains("unconsumed_expectations"));
    }
}
