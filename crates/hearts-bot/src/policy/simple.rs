use hearts_core::model::card::Card;
use hearts_core::strategy::{Strategy, StrategyGameState};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Rank, lifted by 13 for cards that carry points.
pub fn penalty_weighted_rank(card: Card) -> u8 {
    if card.is_penalty() {
        card.rank.value() + 13
    } else {
        card.rank.value()
    }
}

/// Uniform choice among the legal moves.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: SmallRng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self, moves: &[Card]) -> Option<Card> {
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.gen_range(0..moves.len())])
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        match self.pick(state.valid_moves) {
            Some(card) => card,
            None => state.player_hand.cards()[0],
        }
    }
}

/// Dumps the cheapest card, treating point cards as expensive.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvoidPointsStrategy;

impl Strategy for AvoidPointsStrategy {
    fn name(&self) -> &str {
        "avoid_points"
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        let mut best = state.valid_moves[0];
        for card in &state.valid_moves[1..] {
            if penalty_weighted_rank(*card) < penalty_weighted_rank(best) {
                best = *card;
            }
        }
        best
    }
}

/// Plays the most expensive card available.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveStrategy;

impl Strategy for AggressiveStrategy {
    fn name(&self) -> &str {
        "aggressive"
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        let mut best = state.valid_moves[0];
        for card in &state.valid_moves[1..] {
            if penalty_weighted_rank(*card) > penalty_weighted_rank(best) {
                best = *card;
            }
        }
        best
    }
}
