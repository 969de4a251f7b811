use crate::game::completed::CompletedGame;
use crate::game::state::GameCurrentState;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::PlayerPosition;
use crate::model::trick::CompletedTrick;

/// Read-only view handed to a strategy when it is asked for a card.
#[derive(Debug, Clone, Copy)]
pub struct StrategyGameState<'a> {
    pub game_state: &'a GameCurrentState,
    pub player_hand: &'a Hand,
    pub player_index: PlayerPosition,
    pub player_score: u32,
    pub valid_moves: &'a [Card],
}

/// Card selection policy plugged into a seat.
///
/// `choose_card` must return one of `state.valid_moves`; the engine rejects
/// anything else with [`GameError::InvalidMove`](crate::game::GameError::InvalidMove).
pub trait Strategy: Send {
    fn name(&self) -> &str;

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card;

    /// Opt in to per-trick notifications through [`Strategy::observe_trick`].
    fn requires_extended_bookkeeping(&self) -> bool {
        false
    }

    fn observe_trick(&mut self, _trick: &CompletedTrick) {}

    fn on_game_complete(&mut self, _game: &CompletedGame) {}
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        (**self).choose_card(state)
    }

    fn requires_extended_bookkeeping(&self) -> bool {
        (**self).requires_extended_bookkeeping()
    }

    fn observe_trick(&mut self, trick: &CompletedTrick) {
        (**self).observe_trick(trick)
    }

    fn on_game_complete(&mut self, game: &CompletedGame) {
        (**self).on_game_complete(game)
    }
}
