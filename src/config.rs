//! Probe configuration
//!
//! Settings come from three layers, lowest precedence first: built-in
//! defaults, an optional JSON file, then command-line flags.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{DuplicatePolicy, IterationOrder, MissPolicy};
use crate::error_codes::ProbeError;
use crate::value::ValueType;

/// Seed for randomized traversal when none is configured, so a run's
/// verdict is the same every time it is repeated
pub const DEFAULT_SEED: u64 = 0x5eed;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The bare outcome, one line
    #[default]
    Text,
    /// A serialized probe result
    Json,
}

impl OutputFormat {
    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Text => "Plain text",
            OutputFormat::Json => "JSON",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Configuration for a probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// What a missing key yields
    pub miss_policy: MissPolicy,
    /// How duplicate literal keys resolve
    pub duplicate_policy: DuplicatePolicy,
    /// Traversal order of containers under test
    pub order: IterationOrder,
    /// Traversals per stability check (at least 2)
    pub passes: usize,
    /// Value type, which fixes the declared zero value
    pub value_type: ValueType,
    /// Output format
    pub format: OutputFormat,
    /// Seed for randomized traversal; `DEFAULT_SEED` when unset
    pub seed: Option<u64>,
}

impl ProbeConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        ProbeConfig {
            miss_policy: MissPolicy::ExplicitSignal,
            duplicate_policy: DuplicatePolicy::LastWins,
            order: IterationOrder::Randomized,
            passes: 5,
            value_type: ValueType::Int,
            format: OutputFormat::Text,
            seed: None,
        }
    }

    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_order(mut self, order: IterationOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse configuration from JSON text.
    ///
    /// The pass count is not checked here; only traversing commands need it.
    pub fn from_json_str(text: &str) -> Result<Self, ProbeError> {
        serde_json::from_str(text).map_err(|e| ProbeError::Config(e.to_string()))
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProbeError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading probe configuration");
        let text = fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Validate settings used by iteration stability checks
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.passes < 2 {
            return Err(ProbeError::InvalidPassCount { passes: self.passes });
        }
        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new()
    }
}
