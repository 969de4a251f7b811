//! Determinized simulation strategies.
//!
//! Both strategies sample full deals consistent with what the deciding seat
//! has seen, play each candidate card and finish the game with random play.
//! [`SimulationStrategy`] spreads rollouts evenly over the candidates;
//! [`TreeSearchStrategy`] allocates them with UCT.

pub mod cache;
pub mod config;
pub mod grouping;
pub mod rollout;
pub mod simulation;
pub mod tree;

pub use cache::{MoveCache, MoveCacheKey};
pub use config::SearchConfig;
pub use grouping::group_equivalent_moves;
pub use rollout::{RolloutError, rollout};
pub use simulation::{MoveEstimate, SimulationStrategy, best_estimate};
pub use tree::TreeSearchStrategy;
