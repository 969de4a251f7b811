mod replay;
mod simple;

pub use replay::ReplayStrategy;
pub use simple::{AggressiveStrategy, AvoidPointsStrategy, RandomStrategy, penalty_weighted_rank};

use crate::search::{SearchConfig, SimulationStrategy, TreeSearchStrategy};
use hearts_core::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Strategies a driver can configure by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    AvoidPoints,
    Aggressive,
    Simulation,
    TreeSearch,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Random,
        StrategyKind::AvoidPoints,
        StrategyKind::Aggressive,
        StrategyKind::Simulation,
        StrategyKind::TreeSearch,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::AvoidPoints => "avoid_points",
            StrategyKind::Aggressive => "aggressive",
            StrategyKind::Simulation => "simulation",
            StrategyKind::TreeSearch => "tree_search",
        }
    }

    /// Whether the strategy reads [`SearchConfig`].
    pub const fn uses_search(self) -> bool {
        matches!(self, StrategyKind::Simulation | StrategyKind::TreeSearch)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy kind '{0}'")]
pub struct UnknownStrategyKind(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategyKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownStrategyKind(s.to_string()))
    }
}

/// Builds a boxed strategy. `seed` feeds the strategy's own RNG; strategies
/// without randomness ignore it.
pub fn build_strategy(kind: StrategyKind, seed: u64, config: &SearchConfig) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
        StrategyKind::AvoidPoints => Box::new(AvoidPointsStrategy),
        StrategyKind::Aggressive => Box::new(AggressiveStrategy),
        StrategyKind::Simulation => Box::new(SimulationStrategy::new(config.clone(), seed)),
        StrategyKind::TreeSearch => Box::new(TreeSearchStrategy::new(config.clone(), seed)),
    }
}
