//! Language profiles
//!
//! Each profile bundles the policies of one language's built-in map together
//! with what that language is known to do, so a report can confirm the
//! probe reproduces it.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::ProbeConfig;
use crate::container::{DuplicatePolicy, IterationOrder, MissPolicy};
use crate::error_codes::ProbeError;
use crate::keys::parse_key_kind;
use crate::probe::{stability_label, Check, MapSemanticsProbe, ProbeResult};
use crate::value::ValueType;

/// The literal used for duplicate resolution checks
pub const DUPLICATE_LITERAL: [(&str, &str); 2] = [
    ("Green Lantern", "John Stewart"),
    ("Green Lantern", "Hal Jordan"),
];

/// Entries in the container traversed by stability checks
const REPORT_KEYS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LanguageProfile {
    /// Zero value on miss, duplicate literal keys rejected, randomized ranges
    Go,
    /// KeyError on miss, last literal key wins, insertion order
    Python,
    /// `Option` on miss, `HashMap::from` keeps the last pair, hash order
    Rust,
}

impl LanguageProfile {
    pub fn name(&self) -> &'static str {
        match self {
            LanguageProfile::Go => "go",
            LanguageProfile::Python => "python",
            LanguageProfile::Rust => "rust",
        }
    }

    /// Probe configuration emulating this language
    pub fn config(&self) -> ProbeConfig {
        let base = ProbeConfig::new().with_value_type(ValueType::Int);
        match self {
            LanguageProfile::Go => base
                .with_miss_policy(MissPolicy::DefaultOnMiss)
                .with_duplicate_policy(DuplicatePolicy::Reject)
                .with_order(IterationOrder::Randomized),
            LanguageProfile::Python => base
                .with_miss_policy(MissPolicy::ExplicitSignal)
                .with_duplicate_policy(DuplicatePolicy::LastWins)
                .with_order(IterationOrder::Insertion),
            LanguageProfile::Rust => base
                .with_miss_policy(MissPolicy::ExplicitSignal)
                .with_duplicate_policy(DuplicatePolicy::LastWins)
                .with_order(IterationOrder::Hashed),
        }
    }

    /// Key kinds and the verdict the language gives them
    pub fn expected_key_verdicts(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            LanguageProfile::Go => &[
                ("string", "accepted"),
                ("[int; 3]", "accepted"),
                ("(string, int)", "accepted"),
                ("[int]", "rejected:unhashable"),
                ("map<string, int>", "rejected:unhashable"),
                ("fn", "rejected:structurally-invalid"),
            ],
            LanguageProfile::Python => &[
                ("string", "accepted"),
                ("(int, string)", "accepted"),
                ("[int]", "rejected:unhashable"),
                ("map<string, int>", "rejected:unhashable"),
                ("set<int>", "rejected:unhashable"),
            ],
            LanguageProfile::Rust => &[
                ("string", "accepted"),
                ("[uint; 4]", "accepted"),
                ("(string, char)", "accepted"),
                ("vec<int>", "rejected:unhashable"),
                ("map<string, int>", "rejected:unhashable"),
            ],
        }
    }

    pub fn expected_missing_key(&self) -> &'static str {
        match self {
            LanguageProfile::Go => "0",
            LanguageProfile::Python | LanguageProfile::Rust => "not-found",
        }
    }

    pub fn expected_duplicate(&self) -> &'static str {
        match self {
            LanguageProfile::Go => "duplicate-key-at-construction",
            LanguageProfile::Python | LanguageProfile::Rust => "Hal Jordan",
        }
    }

    pub fn expected_stability(&self) -> &'static str {
        match self {
            LanguageProfile::Go => "unstable",
            LanguageProfile::Python | LanguageProfile::Rust => "stable",
        }
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run every check under `profile`'s policies against its expectations.
///
/// `config` supplies the pass count and seed; its policies are replaced by
/// the profile's. Without a seed, randomized traversal uses `DEFAULT_SEED`.
pub fn run_report(profile: LanguageProfile, config: &ProbeConfig) -> Result<Vec<ProbeResult>, ProbeError> {
    let mut profile_config = profile.config().with_passes(config.passes);
    profile_config.seed = config.seed;
    let probe = MapSemanticsProbe::new(profile_config);
    let mut results = Vec::new();

    for (input, expected) in profile.expected_key_verdicts() {
        let kind = parse_key_kind(input)?;
        let verdict = probe.check_key_eligibility(&kind);
        results.push(ProbeResult::new(Check::KeyEligibility, kind.to_string(), verdict.to_string()).expect(*expected));
    }

    let zero = probe.config().value_type.zero();
    let map = probe.container::<String, _>(zero);
    let observed = probe.query_missing_key(&map, &"missing".to_string()).to_string();
    results.push(
        ProbeResult::new(Check::MissingKey, probe.config().miss_policy.as_str(), observed)
            .expect(profile.expected_missing_key()),
    );

    let observed = match probe.build_with_duplicates(DUPLICATE_LITERAL) {
        Ok(map) => map
            .get(&DUPLICATE_LITERAL[0].0)
            .map(|v| v.to_string())
            .unwrap_or_default(),
        Err(e) => e.code().to_string(),
    };
    results.push(
        ProbeResult::new(Check::Duplicates, probe.config().duplicate_policy.as_str(), observed)
            .expect(profile.expected_duplicate()),
    );

    let map = probe.build_with_duplicates((0..REPORT_KEYS).map(|i| (i, i)))?;
    let stable = probe.iteration_stability(&map, probe.config().passes)?;
    results.push(
        ProbeResult::new(Check::IterationStability, probe.config().order.as_str(), stability_label(stable))
            .expect(profile.expected_stability()),
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_profile_passes() {
        for profile in LanguageProfile::value_variants() {
            let results = run_report(*profile, &ProbeConfig::new()).unwrap();
            for r in &results {
                assert!(r.passed(), "{}: {}", profile, r);
            }
            assert_eq!(results.len(), profile.expected_key_verdicts().len() + 3);
        }
    }

    #[test]
    fn test_report_rejects_single_pass() {
        let mut config = ProbeConfig::new();
        config.passes = 1;
        let err = run_report(LanguageProfile::Python, &config).unwrap_err();
        assert_eq!(err.code(), "invalid-pass-count");
    }
}
