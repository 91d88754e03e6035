//! Map semantics probe
//!
//! Runs the four semantic checks against containers configured from a
//! [`ProbeConfig`] and records each outcome as a [`ProbeResult`].

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ProbeConfig, DEFAULT_SEED};
use crate::container::{Lookup, ProbeMap};
use crate::error_codes::ProbeError;
use crate::keys::{Eligibility, KeyKind};

/// Which semantic property a result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    KeyEligibility,
    MissingKey,
    Duplicates,
    IterationStability,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::KeyEligibility => "key-eligibility",
            Check::MissingKey => "missing-key",
            Check::Duplicates => "duplicates",
            Check::IterationStability => "iteration-stability",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    /// No expectation was declared
    Observed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Observed => write!(f, "OBSERVED"),
        }
    }
}

/// Outcome of one semantic check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub check: Check,
    /// What was probed: a key kind, a policy, a container
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub observed: String,
    pub verdict: Verdict,
}

impl ProbeResult {
    pub fn new(check: Check, subject: impl Into<String>, observed: impl Into<String>) -> Self {
        ProbeResult {
            check,
            subject: subject.into(),
            expected: None,
            observed: observed.into(),
            verdict: Verdict::Observed,
        }
    }

    /// Declare the expected outcome and settle the verdict
    pub fn expect(mut self, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        self.verdict = if expected == self.observed {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        self.expected = Some(expected);
        self
    }

    pub fn passed(&self) -> bool {
        self.verdict != Verdict::Fail
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.verdict, self.check, self.subject)?;
        if let Some(expected) = &self.expected {
            write!(f, " expected={}", expected)?;
        }
        write!(f, " observed={}", self.observed)
    }
}

/// Stability verdict as printed
pub fn stability_label(stable: bool) -> &'static str {
    if stable {
        "stable"
    } else {
        "unstable"
    }
}

/// Checks container semantics under one configuration
#[derive(Debug, Clone, Default)]
pub struct MapSemanticsProbe {
    config: ProbeConfig,
}

impl MapSemanticsProbe {
    pub fn new(config: ProbeConfig) -> Self {
        MapSemanticsProbe { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// An empty container with this probe's order, miss policy and seed.
    /// Randomized traversal falls back to `DEFAULT_SEED`.
    pub fn container<K: Hash + Eq + Ord, V>(&self, zero: V) -> ProbeMap<K, V> {
        ProbeMap::with_zero(self.config.order, zero)
            .with_miss_policy(self.config.miss_policy)
            .with_seed(self.config.seed.unwrap_or(DEFAULT_SEED))
    }

    /// Is `kind` allowed as a key?
    pub fn check_key_eligibility(&self, kind: &KeyKind) -> Eligibility {
        let verdict = kind.eligibility();
        info!(kind = %kind, %verdict, "checked key eligibility");
        verdict
    }

    /// Query a key the caller knows to be absent.
    pub fn query_missing_key<'a, K, V>(&self, map: &'a ProbeMap<K, V>, key: &K) -> Lookup<&'a V>
    where
        K: Hash + Eq + Ord + fmt::Debug,
    {
        let lookup = map.query(key);
        if matches!(lookup, Lookup::Found(_)) {
            debug!(key = ?key, "queried key is present");
        }
        info!(policy = %map.miss_policy(), not_found = lookup.is_not_found(), "queried missing key");
        lookup
    }

    /// Build a container from a literal that may repeat keys.
    pub fn build_with_duplicates<K, V, I>(&self, pairs: I) -> Result<ProbeMap<K, V>, ProbeError>
    where
        K: Hash + Eq + Ord + fmt::Debug,
        V: Default,
        I: IntoIterator<Item = (K, V)>,
    {
        self.build_with_zero(pairs, V::default())
    }

    /// Like [`build_with_duplicates`](Self::build_with_duplicates), with an
    /// explicitly declared zero value.
    pub fn build_with_zero<K, V, I>(&self, pairs: I, zero: V) -> Result<ProbeMap<K, V>, ProbeError>
    where
        K: Hash + Eq + Ord + fmt::Debug,
        I: IntoIterator<Item = (K, V)>,
    {
        self.container(zero).build(pairs, self.config.duplicate_policy)
    }

    /// Traverse `map` `passes` times and report whether every traversal
    /// visited the keys in the same order. All passes are performed even
    /// after a mismatch.
    pub fn iteration_stability<K, V>(&self, map: &ProbeMap<K, V>, passes: usize) -> Result<bool, ProbeError>
    where
        K: Hash + Eq + Ord,
    {
        if passes < 2 {
            return Err(ProbeError::InvalidPassCount { passes });
        }

        let first = map.keys();
        let mut stable = true;
        for pass in 1..passes {
            if map.keys() != first {
                debug!(pass, "traversal order diverged");
                stable = false;
            }
        }

        info!(order = %map.order(), passes, stable, "checked iteration stability");
        Ok(stable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{DuplicatePolicy, IterationOrder, MissPolicy};

    fn probe(config: ProbeConfig) -> MapSemanticsProbe {
        MapSemanticsProbe::new(config)
    }

    #[test]
    fn test_duplicates_each_policy() {
        let pairs = || vec![("K", "A"), ("K", "B")];

        let last = probe(ProbeConfig::new().with_duplicate_policy(DuplicatePolicy::LastWins))
            .build_with_duplicates(pairs())
            .unwrap();
        assert_eq!(last.get(&"K"), Some(&"B"));

        let first = probe(ProbeConfig::new().with_duplicate_policy(DuplicatePolicy::FirstWins))
            .build_with_duplicates(pairs())
            .unwrap();
        assert_eq!(first.get(&"K"), Some(&"A"));

        let rejected = probe(ProbeConfig::new().with_duplicate_policy(DuplicatePolicy::Reject))
            .build_with_duplicates(pairs());
        assert!(matches!(rejected, Err(ProbeError::DuplicateKeyAtConstruction { .. })));
    }

    #[test]
    fn test_missing_key_default() {
        let p = probe(ProbeConfig::new().with_miss_policy(MissPolicy::DefaultOnMiss));
        let map: ProbeMap<&str, i64> = p.container(0);
        assert_eq!(p.query_missing_key(&map, &"absent"), Lookup::Zero(&0));
    }

    #[test]
    fn test_unseeded_randomized_verdict_repeats() {
        let run = || {
            let p = MapSemanticsProbe::default();
            let map = p.build_with_duplicates((0..4).map(|i| (i, i))).unwrap();
            (map.keys().into_iter().copied().collect::<Vec<_>>(), p.iteration_stability(&map, 2))
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_declared_zero_for_literal() {
        let p = probe(
            ProbeConfig::new()
                .with_miss_policy(MissPolicy::DefaultOnMiss)
                .with_duplicate_policy(DuplicatePolicy::LastWins),
        );
        let map = p
            .build_with_zero(vec![("K".to_string(), "A".to_string())], "0".to_string())
            .unwrap();
        assert_eq!(map.query(&"Z".to_string()), Lookup::Zero(&"0".to_string()));
    }

    #[test]
    fn test_pass_count_validated() {
        let p = probe(ProbeConfig::new());
        let map: ProbeMap<i32, i32> = p.container(0);
        assert_eq!(
            p.iteration_stability(&map, 1),
            Err(ProbeError::InvalidPassCount { passes: 1 })
        );
    }

    #[test]
    fn test_sorted_is_stable() {
        let p = probe(ProbeConfig::new().with_order(IterationOrder::Sorted));
        let map = p.build_with_duplicates((0..20).map(|i| (i, i))).unwrap();
        assert_eq!(p.iteration_stability(&map, 5), Ok(true));
    }

    #[test]
    fn test_randomized_is_unstable() {
        let p = probe(ProbeConfig::new().with_order(IterationOrder::Randomized).with_seed(42));
        let map = p.build_with_duplicates((0..64).map(|i| (i, i))).unwrap();
        assert_eq!(p.iteration_stability(&map, 10), Ok(false));
    }

    #[test]
    fn test_result_verdicts() {
        let r = ProbeResult::new(Check::Duplicates, "last-wins", "Hal Jordan");
        assert_eq!(r.verdict, Verdict::Observed);
        assert!(r.clone().expect("Hal Jordan").passed());
        let failed = r.expect("John Stewart");
        assert_eq!(failed.verdict, Verdict::Fail);
        assert_eq!(
            failed.to_string(),
            "FAIL duplicates last-wins expected=John Stewart observed=Hal Jordan"
        );
    }
}
