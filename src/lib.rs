//! # mapprobe - Associative Container Semantics Probe
//!
//! Demonstrates and verifies how dictionary/map constructs differ between
//! languages by running the same checks against containers whose behavior
//! is configured rather than built in.
//!
//! ## Checks
//!
//! ```text
//! key kind      ─[keys]──────────> accepted | rejected:<reason>
//! absent key    ─[MissPolicy]────> zero value | not-found
//! literal pairs ─[DuplicatePolicy]> first | last | duplicate-key-at-construction
//! N traversals  ─[IterationOrder]─> stable | unstable
//! ```
//!
//! ## Usage as a Library
//!
//! ```
//! use mapprobe::{DuplicatePolicy, MapSemanticsProbe, ProbeConfig};
//!
//! let probe = MapSemanticsProbe::new(
//!     ProbeConfig::new().with_duplicate_policy(DuplicatePolicy::LastWins),
//! );
//! let map = probe
//!     .build_with_duplicates([("Green Lantern", "John Stewart"), ("Green Lantern", "Hal Jordan")])
//!     .unwrap();
//! assert_eq!(map.get(&"Green Lantern"), Some(&"Hal Jordan"));
//! ```

pub mod config;
pub mod container;
pub mod error_codes;
pub mod keys;
pub mod probe;
pub mod profile;
pub mod value;

pub use config::{OutputFormat, ProbeConfig};
pub use container::{DuplicatePolicy, IterationOrder, Lookup, MissPolicy, ProbeMap};
pub use error_codes::{lookup_error_code, ErrorCode, ProbeError};
pub use keys::{parse_key_kind, Eligibility, KeyKind, KindClass, Primitive, RejectReason};
pub use probe::{Check, MapSemanticsProbe, ProbeResult, Verdict};
pub use profile::{run_report, LanguageProfile};
pub use value::{Value, ValueType};
