//! Map semantics probe CLI
//!
//! # Commands
//!
//! - `probe key-eligibility --kind <kind>` - Is a key kind allowed?
//! - `probe missing-key --policy <policy>` - What does an absent key yield?
//! - `probe duplicates --policy <policy>` - Which duplicate literal key wins?
//! - `probe iteration-stability --passes <n>` - Do traversals agree?
//! - `probe report --profile <language>` - Run every check for one language

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mapprobe::profile::DUPLICATE_LITERAL;
use mapprobe::{
    parse_key_kind, run_report, Check, DuplicatePolicy, IterationOrder, LanguageProfile,
    MapSemanticsProbe, MissPolicy, OutputFormat, ProbeConfig, ProbeError, ProbeResult, ValueType,
};

#[derive(Parser)]
#[command(name = "probe")]
#[command(about = "Probe the semantics of dictionary/map containers")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,
    /// Expected outcome; exit with status 1 when the observed one differs
    #[arg(long, global = true)]
    expect: Option<String>,
    /// Log probe internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a key kind may be used as a key
    KeyEligibility {
        /// Key kind, e.g. `int`, `[int; 3]`, `(string, bool)`, `[int]`, `map<string, int>`
        #[arg(long)]
        kind: String,
    },
    /// Query a key absent from the container
    MissingKey {
        #[arg(long, value_enum)]
        policy: Option<MissPolicy>,
        /// Value type, which fixes the zero value
        #[arg(long, value_enum)]
        value_type: Option<ValueType>,
        #[arg(long, default_value = "missing")]
        key: String,
    },
    /// Build a container from a literal with repeated keys
    Duplicates {
        #[arg(long, value_enum)]
        policy: Option<DuplicatePolicy>,
        /// Literal entry as KEY=VALUE, in order (repeatable)
        #[arg(long = "pair", value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
        /// Key to report (default: the first repeated key).
        ///
        /// In text output under explicit-signal, a stored value of literally
        /// `not-found` prints the same as a missing key; with `--format json`
        /// an absent key is marked in the result's subject.
        #[arg(long)]
        key: Option<String>,
    },
    /// Traverse an unmutated container repeatedly and compare key orders
    IterationStability {
        #[arg(long)]
        passes: Option<usize>,
        #[arg(long, value_enum)]
        order: Option<IterationOrder>,
        /// Number of entries in the container
        #[arg(long, default_value_t = 8)]
        keys: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run every check with one language's policies and expectations
    Report {
        #[arg(long, value_enum)]
        profile: LanguageProfile,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MAPPROBE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// First key that occurs more than once, else the first key
fn reported_key(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .enumerate()
        .find(|(i, (k, _))| pairs[..*i].iter().any(|(earlier, _)| earlier == k))
        .or_else(|| pairs.iter().enumerate().next())
        .map(|(_, (k, _))| k.clone())
        .unwrap_or_default()
}

fn duplicates(probe: &MapSemanticsProbe, pairs: Vec<(String, String)>, key: Option<String>) -> Result<ProbeResult, ProbeError> {
    let pairs = if pairs.is_empty() {
        DUPLICATE_LITERAL
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        pairs
    };
    let key = key.unwrap_or_else(|| reported_key(&pairs));
    debug!(pairs = pairs.len(), key = %key, "building literal");

    let zero = probe.config().value_type.zero().to_string();
    let map = probe.build_with_zero(pairs, zero)?;
    let lookup = map.query(&key);
    let subject = if lookup.is_not_found() {
        format!("{} (key absent)", probe.config().duplicate_policy)
    } else {
        probe.config().duplicate_policy.as_str().to_string()
    };
    Ok(ProbeResult::new(Check::Duplicates, subject, lookup.to_string()))
}

fn emit(result: &ProbeResult, format: OutputFormat) -> Result<(), ProbeError> {
    match format {
        OutputFormat::Text => {
            println!("{}", result.observed);
            if !result.passed() {
                eprintln!("{}", result);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result).map_err(|e| ProbeError::Output(e.to_string()))?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn report(profile: LanguageProfile, config: &ProbeConfig) -> Result<i32, ProbeError> {
    let results = run_report(profile, config)?;
    match config.format {
        OutputFormat::Text => {
            for r in &results {
                println!("{}", r);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&results).map_err(|e| ProbeError::Output(e.to_string()))?;
            println!("{}", json);
        }
    }
    Ok(if results.iter().all(ProbeResult::passed) { 0 } else { 1 })
}

fn run(cli: Cli) -> Result<i32, ProbeError> {
    let mut config = match &cli.config {
        Some(path) => ProbeConfig::from_file(path)?,
        None => ProbeConfig::new(),
    };
    if let Some(format) = cli.format {
        config.format = format;
    }

    let result = match cli.command {
        Commands::Report { profile } => return report(profile, &config),
        Commands::KeyEligibility { kind } => {
            let kind = parse_key_kind(&kind)?;
            let probe = MapSemanticsProbe::new(config.clone());
            let verdict = probe.check_key_eligibility(&kind);
            ProbeResult::new(Check::KeyEligibility, kind.to_string(), verdict.to_string())
        }
        Commands::MissingKey { policy, value_type, key } => {
            if let Some(policy) = policy {
                config.miss_policy = policy;
            }
            if let Some(value_type) = value_type {
                config.value_type = value_type;
            }
            let probe = MapSemanticsProbe::new(config.clone());
            let map = probe.container::<String, _>(config.value_type.zero());
            let lookup = probe.query_missing_key(&map, &key);
            ProbeResult::new(Check::MissingKey, config.miss_policy.as_str(), lookup.to_string())
        }
        Commands::Duplicates { policy, pairs, key } => {
            if let Some(policy) = policy {
                config.duplicate_policy = policy;
            }
            let probe = MapSemanticsProbe::new(config.clone());
            match duplicates(&probe, pairs, key) {
                Ok(result) => result,
                // A rejected construction is the outcome being checked.
                Err(e @ ProbeError::DuplicateKeyAtConstruction { .. }) if cli.expect.is_some() => {
                    ProbeResult::new(Check::Duplicates, config.duplicate_policy.as_str(), e.code())
                }
                Err(e) => return Err(e),
            }
        }
        Commands::IterationStability { passes, order, keys, seed } => {
            if let Some(passes) = passes {
                config.passes = passes;
            }
            if let Some(order) = order {
                config.order = order;
            }
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            let probe = MapSemanticsProbe::new(config.clone());
            let map = probe.build_with_duplicates((0..keys).map(|i| (i, i)))?;
            let stable = probe.iteration_stability(&map, config.passes)?;
            ProbeResult::new(
                Check::IterationStability,
                config.order.as_str(),
                mapprobe::probe::stability_label(stable),
            )
        }
    };

    let result = match cli.expect {
        Some(expected) => result.expect(expected),
        None => result,
    };
    emit(&result, config.format)?;
    Ok(if result.passed() { 0 } else { 1 })
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error[{}]: {}", e.code(), e);
            if let Some(entry) = e.catalog_entry() {
                eprintln!("  = help: {}", entry.fix);
            }
            process::exit(e.exit_code());
        }
    }
}
