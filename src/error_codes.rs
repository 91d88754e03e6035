//! Probe error codes
//!
//! Every failure the probe can report carries a stable, kebab-case code that:
//! - is printed verbatim by the CLI so scripts can match on it
//! - maps to a fixed process exit status
//! - links to a catalog entry with a title, message and fix

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

/// Errors produced by probe operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("invalid key kind `{input}`: {detail}")]
    InvalidKeyKind { input: String, detail: String },

    #[error("duplicate key {key} at construction")]
    DuplicateKeyAtConstruction { key: String },

    #[error("invalid pass count {passes}: at least 2 passes are required")]
    InvalidPassCount { passes: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to encode output: {0}")]
    Output(String),
}

impl ProbeError {
    /// Stable code string, identical to the catalog key.
    pub fn code(&self) -> &'static str {
        match self {
            ProbeError::InvalidKeyKind { .. } => "invalid-key-kind",
            ProbeError::DuplicateKeyAtConstruction { .. } => "duplicate-key-at-construction",
            ProbeError::InvalidPassCount { .. } => "invalid-pass-count",
            ProbeError::Config(_) => "invalid-config",
            ProbeError::Output(_) => "output-failed",
        }
    }

    /// Exit status used by the CLI.
    ///
    /// A rejected construction is an observed outcome (1); malformed input
    /// is a usage error (2), matching what clap uses for bad arguments;
    /// anything else is an internal failure (3).
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::DuplicateKeyAtConstruction { .. } => 1,
            ProbeError::InvalidKeyKind { .. }
            | ProbeError::InvalidPassCount { .. }
            | ProbeError::Config(_) => 2,
            ProbeError::Output(_) => 3,
        }
    }

    /// Catalog entry for this error.
    pub fn catalog_entry(&self) -> Option<ErrorCode> {
        lookup_error_code(self.code())
    }
}

/// Catalog entry describing one error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub title: &'static str,
    pub message: &'static str,
    pub fix: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller supplied something the probe cannot interpret
    Input,
    /// The modeled container refused the operation
    Container,
    /// The probe itself failed
    Internal,
}

static ERROR_CODES: OnceLock<HashMap<&'static str, ErrorCode>> = OnceLock::new();

fn get_error_codes_map() -> &'static HashMap<&'static str, ErrorCode> {
    ERROR_CODES.get_or_init(|| {
        let mut m = HashMap::new();

        m.insert("invalid-key-kind", ErrorCode {
            code: "invalid-key-kind",
            category: ErrorCategory::Input,
            title: "Unrecognized key kind",
            message: "The key kind could not be parsed",
            fix: "Use a primitive (int, uint, float, bool, char, string) or compose one: [T; N], (T, U), [T], map<K, V>, set<T>, &T, fn",
        });

        m.insert("duplicate-key-at-construction", ErrorCode {
            code: "duplicate-key-at-construction",
            category: ErrorCategory::Container,
            title: "Duplicate key in literal",
            message: "The same key appeared more than once while building a container under the reject policy",
            fix: "Remove the repeated key or select the first-wins or last-wins policy",
        });

        m.insert("invalid-pass-count", ErrorCode {
            code: "invalid-pass-count",
            category: ErrorCategory::Input,
            title: "Too few traversals",
            message: "Iteration stability needs at least two traversals to compare",
            fix: "Pass --passes 2 or more",
        });

        m.insert("invalid-config", ErrorCode {
            code: "invalid-config",
            category: ErrorCategory::Input,
            title: "Bad configuration",
            message: "The configuration file could not be read or contains invalid settings",
            fix: "Check the file path and that every field is spelled as documented",
        });

        m.insert("output-failed", ErrorCode {
            code: "output-failed",
            category: ErrorCategory::Internal,
            title: "Output encoding failed",
            message: "A probe result could not be serialized",
            fix: "Retry with --format text",
        });

        m
    })
}

/// Get a catalog entry by code string
pub fn lookup_error_code(code: &str) -> Option<ErrorCode> {
    get_error_codes_map().get(code).cloned()
}

/// All catalogued codes, sorted
pub fn all_error_codes() -> Vec<&'static str> {
    let mut codes: Vec<_> = get_error_codes_map().keys().copied().collect();
    codes.sort_unstable();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_is_catalogued() {
        let errors = [
            ProbeError::InvalidKeyKind { input: "x".into(), detail: "y".into() },
            ProbeError::DuplicateKeyAtConstruction { key: "\"K\"".into() },
            ProbeError::InvalidPassCount { passes: 1 },
            ProbeError::Config("bad".into()),
            ProbeError::Output("eof".into()),
        ];
        for err in &errors {
            let entry = err.catalog_entry().expect("missing catalog entry");
            assert_eq!(entry.code, err.code());
        }
        assert_eq!(all_error_codes().len(), errors.len());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProbeError::DuplicateKeyAtConstruction { key: "k".into() }.exit_code(), 1);
        assert_eq!(ProbeError::InvalidPassCount { passes: 0 }.exit_code(), 2);
    }

    #[test]
    fn test_unknown_code() {
        assert!(lookup_error_code("E999").is_none());
    }

    #[test]
    fn test_display_mentions_detail() {
        let err = ProbeError::InvalidPassCount { passes: 1 };
        assert!(err.to_string().contains("at least 2"));
    }
}
