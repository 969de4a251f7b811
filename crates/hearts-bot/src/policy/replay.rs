use hearts_core::game::completed::CompletedGame;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::strategy::{Strategy, StrategyGameState};
use std::collections::VecDeque;

/// Plays back a recorded sequence of cards for one seat.
///
/// Recorded cards are returned as-is, so a diverging replay surfaces as an
/// invalid move from the engine.
#[derive(Debug, Clone)]
pub struct ReplayStrategy {
    name: String,
    cards: VecDeque<Card>,
}

impl ReplayStrategy {
    pub fn new(name: impl Into<String>, cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            name: name.into(),
            cards: cards.into_iter().collect(),
        }
    }

    /// Cards `seat` played in `game`, keeping that player's recorded strategy name.
    pub fn for_seat(game: &CompletedGame, seat: PlayerPosition) -> Self {
        Self::new(
            game.players[seat.index()].strategy.clone(),
            game.cards_played_by(seat),
        )
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Strategy for ReplayStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        self.cards
            .pop_front()
            .unwrap_or(state.valid_moves[0])
    }
}
