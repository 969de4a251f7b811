use super::cache::{MoveCache, MoveCacheKey};
use super::config::SearchConfig;
use super::grouping::group_equivalent_moves;
use super::rollout::{RolloutError, rollout};
use hearts_core::belief::{DeterminizeError, Determinizer};
use hearts_core::model::card::Card;
use hearts_core::strategy::{Strategy, StrategyGameState};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{Level, event};

/// Aggregated rollout results for one candidate card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEstimate {
    pub card: Card,
    /// Rollouts attempted, failures included.
    pub samples: usize,
    pub failures: usize,
    /// Mean points added to the deciding seat; failed rollouts count as zero.
    pub average: f64,
}

impl MoveEstimate {
    fn empty(card: Card) -> Self {
        Self {
            card,
            samples: 0,
            failures: 0,
            average: 0.0,
        }
    }
}

/// Lowest average among sampled moves; earlier moves win ties.
pub fn best_estimate(estimates: &[MoveEstimate]) -> Option<&MoveEstimate> {
    let mut best: Option<&MoveEstimate> = None;
    for estimate in estimates.iter().filter(|e| e.samples > 0) {
        match best {
            Some(current) if estimate.average >= current.average => {}
            _ => best = Some(estimate),
        }
    }
    best
}

/// Flat Monte Carlo: every candidate card gets the same number of
/// determinized rollouts and the lowest mean penalty wins.
#[derive(Debug)]
pub struct SimulationStrategy {
    config: SearchConfig,
    rng: SmallRng,
    cache: MoveCache,
    last_estimates: Vec<MoveEstimate>,
}

impl SimulationStrategy {
    pub fn new(config: SearchConfig, seed: u64) -> Self {
        let cache = MoveCache::new(config.cache_capacity);
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            cache,
            last_estimates: Vec::new(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn last_estimates(&self) -> &[MoveEstimate] {
        &self.last_estimates
    }

    /// Rollouts per candidate given the cards left in hand and the number of legal moves.
    pub fn simulations_per_move(&self, cards_left: usize, move_count: usize) -> usize {
        let nominal = self.config.num_simulations;
        let budget = if cards_left <= 3 {
            (nominal / 5).max(50)
        } else {
            nominal
        };
        (budget / move_count.max(1)).max(self.config.min_simulations_per_move)
    }

    /// Runs the rollouts for every grouped candidate and returns their statistics
    /// in candidate order.
    pub fn evaluate(&mut self, state: &StrategyGameState<'_>) -> Vec<MoveEstimate> {
        let candidates = group_equivalent_moves(state.valid_moves);
        let per_move = self.simulations_per_move(state.player_hand.len(), state.valid_moves.len());
        let determinizer = Determinizer::new(state);
        if let Err(err) = &determinizer {
            event!(target: "hearts_bot::simulation", Level::DEBUG, error = %err, "determinization unavailable");
        }

        // Seeds are drawn before dispatch so results do not depend on scheduling.
        let jobs: Vec<(Card, u64)> = candidates
            .iter()
            .map(|card| (*card, self.rng.next_u64()))
            .collect();
        let deadline = self.config.time_cap().map(|cap| Instant::now() + cap);

        let run = |(card, seed): &(Card, u64)| {
            simulate_move(&determinizer, *card, *seed, per_move, deadline)
        };
        if self.config.parallel {
            jobs.par_iter().map(run).collect()
        } else {
            jobs.iter().map(run).collect()
        }
    }
}

fn simulate_move(
    determinizer: &Result<Determinizer, DeterminizeError>,
    card: Card,
    seed: u64,
    samples: usize,
    deadline: Option<Instant>,
) -> MoveEstimate {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut estimate = MoveEstimate::empty(card);
    let mut total = 0u64;

    for _ in 0..samples {
        if deadline.is_some_and(|limit| Instant::now() >= limit) {
            break;
        }
        let outcome = match determinizer {
            Ok(determinizer) => rollout(determinizer, card, &mut rng),
            Err(err) => Err(RolloutError::from(*err)),
        };
        estimate.samples += 1;
        match outcome {
            Ok(added) => total += u64::from(added),
            Err(err) => {
                estimate.failures += 1;
                event!(target: "hearts_bot::simulation", Level::DEBUG, %card, error = %err, "rollout failed");
            }
        }
    }

    if estimate.samples > 0 {
        estimate.average = total as f64 / estimate.samples as f64;
    }
    estimate
}

impl Strategy for SimulationStrategy {
    fn name(&self) -> &str {
        "simulation"
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        if state.valid_moves.len() == 1 {
            return state.valid_moves[0];
        }

        let key = MoveCacheKey::from_state(state);
        if let Some(card) = self.cache.get(&key)
            && state.valid_moves.contains(&card)
        {
            return card;
        }

        let started = Instant::now();
        let estimates = self.evaluate(state);
        let choice = best_estimate(&estimates)
            .map(|estimate| estimate.card)
            .unwrap_or(state.valid_moves[0]);

        if tracing::enabled!(Level::DEBUG) {
            let summary = estimates
                .iter()
                .map(|e| format!("{}:{:.2}/{}", e.card, e.average, e.samples))
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "hearts_bot::simulation",
                Level::DEBUG,
                seat = %state.player_index,
                trick = state.game_state.previous_tricks.len() + 1,
                legal_count = state.valid_moves.len(),
                candidates = estimates.len(),
                chosen = %choice,
                elapsed_ms = started.elapsed().as_millis() as u64,
                estimates = %summary,
            );
        }

        self.cache.insert(key, choice);
        self.last_estimates = estimates;
        choice
    }
}
