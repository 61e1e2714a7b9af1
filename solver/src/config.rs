use crate::graph::DungeonGraph;
use serde::Serialize;
use std::env;
use std::str::FromStr;

pub const MAX_ITERATIONS_VAR: &str = "DUNGEON_MAX_ITERATIONS";
pub const RECOMPUTE_VAR: &str = "DUNGEON_RECOMPUTE";

/// How the shortest path table is refreshed after a key pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecomputeStrategy {
    /// Rebuild the whole table.
    #[default]
    Full,
    /// Patch only the pairs whose route can use a cheapened edge.
    Incremental,
}

impl FromStr for RecomputeStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(RecomputeStrategy::Full),
            "incremental" => Ok(RecomputeStrategy::Incremental),
            _ => Err(ConfigError::InvalidValue {
                var: RECOMPUTE_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Upper bound on resolver iterations. `None` derives it from the
    /// number of keys in the dungeon.
    pub max_iterations: Option<usize>,
    pub recompute: RecomputeStrategy,
}

impl SolverConfig {
    /// Reads overrides from the environment. Unset variables keep the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`SolverConfig::from_env`], with `lookup` standing in for the
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(MAX_ITERATIONS_VAR) {
            let limit = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: MAX_ITERATIONS_VAR,
                value: value.clone(),
            })?;
            config.max_iterations = Some(limit);
        }
        if let Some(value) = lookup(RECOMPUTE_VAR) {
            config.recompute = value.parse()?;
        }

        Ok(config)
    }

    pub fn iteration_limit(&self, graph: &DungeonGraph) -> usize {
        self.max_iterations
            .unwrap_or_else(|| default_iteration_limit(graph.key_count()))
    }
}

/// Every blocker sends the resolver to a key room it has not been to yet and
/// each key room is sent to at most once, so a solve that terminates needs at
/// most `2 * keys + 1` iterations. The default leaves some headroom on top.
pub fn default_iteration_limit(keys: usize) -> usize {
    4 * (keys + 1)
}
