use crate::policy::RandomStrategy;
use hearts_core::belief::{DeterminizeError, Determinizer};
use hearts_core::game::GameError;
use hearts_core::model::card::Card;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RolloutError {
    #[error(transparent)]
    Determinize(#[from] DeterminizeError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Samples a deal, plays `card` for the deciding seat and finishes the game
/// with random play on every seat. Returns the points the deciding seat
/// collected from here on.
pub fn rollout<R: Rng + ?Sized>(
    determinizer: &Determinizer,
    card: Card,
    rng: &mut R,
) -> Result<u32, RolloutError> {
    let deal = determinizer.sample(rng);
    let mut round = deal.round;
    let seat = determinizer.acting();
    let before = round.score(seat);

    round.play_card(card).map_err(GameError::from)?;
    let mut policy = RandomStrategy::new(rng.next_u64());
    round.play_out(&mut policy)?;

    Ok(round.score(seat).saturating_sub(before))
}
