pub mod completed;
pub mod hearts_game;
pub mod state;

pub use completed::{CompletedGame, PlayerSummary};
pub use hearts_game::{GameError, HeartsGame};
pub use state::GameCurrentState;
