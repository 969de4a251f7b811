pub mod belief;
pub mod game;
pub mod model;
pub mod strategy;

pub use game::{CompletedGame, GameCurrentState, GameError, HeartsGame, PlayerSummary};
pub use model::card::{Card, QUEEN_OF_SPADES, TWO_OF_CLUBS};
pub use model::player::{Player, PlayerPosition};
pub use model::round::RoundState;
pub use strategy::{Strategy, StrategyGameState};
