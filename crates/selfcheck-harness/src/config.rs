//! Harness configuration.
//!
//! A harness is enabled with an explicit [`HarnessConfig`], or from the
//! environment via [`HarnessConfig::from_env`]:
//! - `SELFCHECK_RUN`: run name, also the output directory. Unset means disabled.
//! - `SELFCHECK_OUTPUT`: artifact base name (default `output.html`).
//! - `SELFCHECK_ROOT`: directory the run directory is created under (default `.`).
//! - `SELFCHECK_ASSETS`: relative prefix for the stylesheet and scripts (default `../scripts`).
//! - `SELFCHECK_DIAGNOSTICS`: `stderr` (default, warnings and errors only),
//!   `verbose` (every event) or `off`.

use std::path::PathBuf;

use crate::diagnostics::DiagnosticsTarget;

pub const ENV_RUN: &str = "SELFCHECK_RUN";
pub const ENV_OUTPUT: &str = "SELFCHECK_OUTPUT";
pub const ENV_ROOT: &str = "SELFCHECK_ROOT";
pub const ENV_ASSETS: &str = "SELFCHECK_ASSETS";
pub const ENV_DIAGNOSTICS: &str = "SELFCHECK_DIAGNOSTICS";

pub const DEFAULT_OUTPUT_BASE_NAME: &str = "output.html";
pub const DEFAULT_ASSET_PREFIX: &str = "../scripts";

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Run name; titles the report and names the output directory.
    pub run_name: String,
    /// Artifact base name; a three-digit counter is inserted before its extension.
    pub output_base_name: String,
    /// Directory under which `run_name/` is created.
    pub output_root: PathBuf,
    /// Relative path prefix for `style.css` and the table-sorter scripts.
    pub asset_prefix: String,
    pub diagnostics: DiagnosticsTarget,
}

impl HarnessConfig {
    #[must_use]
    pub fn new(run_name: impl Into<String>, output_base_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            output_base_name: output_base_name.into(),
            output_root: PathBuf::from("."),
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
            diagnostics: DiagnosticsTarget::default(),
        }
    }

    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    #[must_use]
    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, target: DiagnosticsTarget) -> Self {
        self.diagnostics = target;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// Returns `None` when `SELFCHECK_RUN` is unset or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`HarnessConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let run_name = non_blank(ENV_RUN)?;
        let output = non_blank(ENV_OUTPUT).unwrap_or_else(|| DEFAULT_OUTPUT_BASE_NAME.to_string());
        let mut config = Self::new(run_name, output);
        if let Some(root) = non_blank(ENV_ROOT) {
            config.output_root = PathBuf::from(root);
        }
        if let Some(prefix) = non_blank(ENV_ASSETS) {
            config.asset_prefix = prefix;
        }
        if let Some(target) = non_blank(ENV_DIAGNOSTICS) {
            config.diagnostics = DiagnosticsTarget::from_str_loose(&target);
        }
        Some(config)
    }
}
