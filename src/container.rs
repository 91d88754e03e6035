//! Associative container with configurable semantics
//!
//! `ProbeMap` behaves like the built-in map of whichever language it is
//! configured to emulate: what a missing key yields, how duplicate keys in a
//! literal resolve, and in what order a traversal visits entries.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

use clap::ValueEnum;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error_codes::ProbeError;

/// What a lookup of an absent key produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MissPolicy {
    /// Yield the declared zero value of the value type
    DefaultOnMiss,
    /// Yield a not-found signal outside the value domain
    ExplicitSignal,
}

impl MissPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissPolicy::DefaultOnMiss => "default-on-miss",
            MissPolicy::ExplicitSignal => "explicit-signal",
        }
    }
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How repeated keys resolve while building from a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    FirstWins,
    LastWins,
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::FirstWins => "first-wins",
            DuplicatePolicy::LastWins => "last-wins",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traversal order discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IterationOrder {
    /// Whatever the hash table layout gives
    Hashed,
    /// Order of first insertion
    Insertion,
    /// Ascending key order
    Sorted,
    /// Fresh random start position on every traversal
    Randomized,
}

impl IterationOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationOrder::Hashed => "hashed",
            IterationOrder::Insertion => "insertion",
            IterationOrder::Sorted => "sorted",
            IterationOrder::Randomized => "randomized",
        }
    }
}

impl fmt::Display for IterationOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a policy-aware lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<V> {
    /// The key is present
    Found(V),
    /// The key is absent and the container yields its zero value
    Zero(V),
    /// The key is absent and the container signals it
    NotFound,
}

impl<V> Lookup<V> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    /// The value a caller would observe, if any
    pub fn value(self) -> Option<V> {
        match self {
            Lookup::Found(v) | Lookup::Zero(v) => Some(v),
            Lookup::NotFound => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Lookup<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lookup::Found(v) | Lookup::Zero(v) => write!(f, "{}", v),
            Lookup::NotFound => write!(f, "not-found"),
        }
    }
}

#[derive(Debug, Clone)]
enum Backing<K: Hash + Eq, V> {
    Hashed(HashMap<K, V>),
    Insertion(IndexMap<K, V>),
    Sorted(BTreeMap<K, V>),
    Randomized {
        entries: IndexMap<K, V>,
        rng: RefCell<StdRng>,
    },
}

/// Map whose miss, duplicate and ordering behavior is configured, not fixed
#[derive(Debug, Clone)]
pub struct ProbeMap<K: Hash + Eq, V> {
    backing: Backing<K, V>,
    order: IterationOrder,
    miss_policy: MissPolicy,
    zero: V,
}

impl<K: Hash + Eq + Ord, V: Default> ProbeMap<K, V> {
    /// Create an empty map whose zero value is `V::default()`
    pub fn new(order: IterationOrder) -> Self {
        Self::with_zero(order, V::default())
    }
}

impl<K: Hash + Eq + Ord, V> ProbeMap<K, V> {
    /// Create an empty map with an explicitly declared zero value
    pub fn with_zero(order: IterationOrder, zero: V) -> Self {
        let backing = match order {
            IterationOrder::Hashed => Backing::Hashed(HashMap::new()),
            IterationOrder::Insertion => Backing::Insertion(IndexMap::new()),
            IterationOrder::Sorted => Backing::Sorted(BTreeMap::new()),
            IterationOrder::Randomized => Backing::Randomized {
                entries: IndexMap::new(),
                rng: RefCell::new(StdRng::seed_from_u64(rand::random())),
            },
        };
        ProbeMap {
            backing,
            order,
            miss_policy: MissPolicy::ExplicitSignal,
            zero,
        }
    }

    /// Set the miss policy
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    /// Fix the traversal randomness so runs are reproducible.
    /// No effect unless the order is randomized.
    pub fn with_seed(mut self, seed: u64) -> Self {
        if let Backing::Randomized { rng, .. } = &mut self.backing {
            *rng.get_mut() = StdRng::seed_from_u64(seed);
        }
        self
    }

    /// Build from an ordered literal of pairs under `policy`.
    pub fn build<I>(mut self, pairs: I, policy: DuplicatePolicy) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Debug,
    {
        for (key, value) in pairs {
            if self.contains_key(&key) {
                match policy {
                    DuplicatePolicy::FirstWins => {
                        debug!(key = ?key, "duplicate key ignored");
                        continue;
                    }
                    DuplicatePolicy::LastWins => {
                        debug!(key = ?key, "duplicate key overwrites earlier value");
                    }
                    DuplicatePolicy::Reject => {
                        warn!(key = ?key, "duplicate key rejected at construction");
                        return Err(ProbeError::DuplicateKeyAtConstruction {
                            key: format!("{:?}", key),
                        });
                    }
                }
            }
            self.insert(key, value);
        }
        Ok(self)
    }

    pub fn order(&self) -> IterationOrder {
        self.order
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    /// The declared zero value
    pub fn zero(&self) -> &V {
        &self.zero
    }

    /// Insert key-value pair, returning the previous value.
    /// An existing key keeps its position in insertion-ordered backings.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.backing {
            Backing::Hashed(m) => m.insert(key, value),
            Backing::Insertion(m) => m.insert(key, value),
            Backing::Sorted(m) => m.insert(key, value),
            Backing::Randomized { entries, .. } => entries.insert(key, value),
        }
    }

    /// Get value by key
    pub fn get(&self, key: &K) -> Option<&V> {
        match &self.backing {
            Backing::Hashed(m) => m.get(key),
            Backing::Insertion(m) => m.get(key),
            Backing::Sorted(m) => m.get(key),
            Backing::Randomized { entries, .. } => entries.get(key),
        }
    }

    /// Contains key
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Length
    pub fn len(&self) -> usize {
        match &self.backing {
            Backing::Hashed(m) => m.len(),
            Backing::Insertion(m) => m.len(),
            Backing::Sorted(m) => m.len(),
            Backing::Randomized { entries, .. } => entries.len(),
        }
    }

    /// Is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `key`, applying the miss policy when it is absent
    pub fn query(&self, key: &K) -> Lookup<&V> {
        match (self.get(key), self.miss_policy) {
            (Some(v), _) => Lookup::Found(v),
            (None, MissPolicy::DefaultOnMiss) => Lookup::Zero(&self.zero),
            (None, MissPolicy::ExplicitSignal) => Lookup::NotFound,
        }
    }

    /// One traversal over all entries.
    ///
    /// Randomized maps draw a new start position each call, so two calls
    /// may disagree even though nothing was mutated in between.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        match &self.backing {
            Backing::Hashed(m) => Box::new(m.iter()),
            Backing::Insertion(m) => Box::new(m.iter()),
            Backing::Sorted(m) => Box::new(m.iter()),
            Backing::Randomized { entries, rng } => {
                let offset = if entries.is_empty() {
                    0
                } else {
                    rng.borrow_mut().random_range(0..entries.len())
                };
                Box::new(entries.iter().skip(offset).chain(entries.iter().take(offset)))
            }
        }
    }

    /// Keys in the order of one traversal
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }
}
