//! Node configuration, read from the environment (and `.env` via dotenvy).

use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{ChainValidation, DEFAULT_DIFFICULTY, DIFF_MAX, DIFF_MIN, LedgerConfig};

/// Which flavour of node to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMode {
    /// One ledger for the whole node.
    Single,
    /// One ledger per tracked file.
    Files,
}

impl FromStr for NodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(NodeMode::Single),
            "files" | "multi" => Ok(NodeMode::Files),
            other => Err(format!("unknown node mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub mode: NodeMode,
    pub difficulty: u32,
    pub peer_timeout: Duration,
    pub strict_linkage: bool,
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = parse_or(&lookup, "NODE_MODE", NodeMode::Single);
        let default_port = match mode {
            NodeMode::Single => 5001,
            NodeMode::Files => 5002,
        };

        let mut difficulty = parse_or(&lookup, "POW_DIFFICULTY", DEFAULT_DIFFICULTY);
        if !(DIFF_MIN..=DIFF_MAX).contains(&difficulty) {
            warn!("POW_DIFFICULTY={difficulty} out of range; using {DEFAULT_DIFFICULTY}");
            difficulty = DEFAULT_DIFFICULTY;
        }

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", default_port),
            mode,
            difficulty,
            peer_timeout: Duration::from_secs(parse_or(&lookup, "PEER_TIMEOUT_SECS", 10)),
            strict_linkage: parse_or(&lookup, "STRICT_LINKAGE", false),
        }
    }

    /// Settings for every ledger this node creates.
    pub fn ledger_config(&self) -> LedgerConfig {
        let base = match self.mode {
            NodeMode::Single => LedgerConfig::default(),
            NodeMode::Files => LedgerConfig::for_files(),
        };
        let validation = if self.strict_linkage {
            ChainValidation::ProofAndLinkage
        } else {
            ChainValidation::ProofOnly
        };
        base.with_difficulty(self.difficulty).with_validation(validation)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeConfig, NodeMode};
    use crate::blockchain::ChainValidation;
    use std::collections::HashMap;
    use std::time::Duration;

    fn config(pairs: &[(&str, &str)]) -> NodeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.mode, NodeMode::Single);
        assert_eq!(cfg.difficulty, 4);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(10));

        let ledger = cfg.ledger_config();
        assert_eq!(ledger.genesis_previous_hash, "1");
        assert_eq!(ledger.validation, ChainValidation::ProofOnly);
    }

    #[test]
    fn files_mode_changes_port_and_genesis() {
        let cfg = config(&[("NODE_MODE", "files"), ("STRICT_LINKAGE", "true")]);
        assert_eq!(cfg.port, 5002);
        let ledger = cfg.ledger_config();
        assert_eq!(ledger.genesis_previous_hash, "genesis");
        assert_eq!(ledger.validation, ChainValidation::ProofAndLinkage);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = config(&[
            ("PORT", "not-a-port"),
            ("POW_DIFFICULTY", "99"),
            ("NODE_MODE", "cluster"),
        ]);
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.difficulty, 4);
        assert_eq!(cfg.mode, NodeMode::Single);
    }

    #[test]
    fn explicit_values_win() {
        let cfg = config(&[("PORT", "8080"), ("POW_DIFFICULTY", "2"), ("HOST", "0.0.0.0")]);
        assert_eq!((cfg.host.as_str(), cfg.port, cfg.difficulty), ("0.0.0.0", 8080, 2));
    }
}
