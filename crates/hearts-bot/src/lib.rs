pub mod policy;
pub mod search;

pub use policy::{
    AggressiveStrategy, AvoidPointsStrategy, RandomStrategy, ReplayStrategy, StrategyKind,
    UnknownStrategyKind, build_strategy,
};
pub use search::{MoveEstimate, SearchConfig, SimulationStrategy, TreeSearchStrategy};
