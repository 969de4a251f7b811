use crate::game::completed::{CompletedGame, PlayerSummary};
use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::model::player::{Player, PlayerPosition};
use crate::model::round::{PlayError, PlayOutcome, RoundState};
use std::array;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{seat} chose {card}, which is not a legal move")]
    InvalidMove { seat: PlayerPosition, card: Card },
    #[error("{seat} holds cards but has no legal move")]
    NoLegalMoves { seat: PlayerPosition },
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Four players and the deal they are playing.
#[derive(Debug)]
pub struct HeartsGame {
    players: [Player; 4],
    round: RoundState,
}

impl HeartsGame {
    pub fn new(mut players: [Player; 4], deck: &Deck) -> Result<Self, GameError> {
        let round = RoundState::deal(deck)?;
        for seat in PlayerPosition::LOOP {
            players[seat.index()].set_initial_hand(round.hand(seat).clone());
        }
        Ok(Self { players, round })
    }

    pub fn player(&self, seat: PlayerPosition) -> &Player {
        &self.players[seat.index()]
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        self.round.hand(seat)
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.round.score(seat)
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn is_game_over(&self) -> bool {
        self.round.is_game_over()
    }

    /// Plays the deal to the end and notifies every strategy of the result.
    pub fn play_game(mut self) -> Result<CompletedGame, GameError> {
        while !self.round.is_game_over() {
            let seat = self.round.current_player();
            let strategy = self.players[seat.index()].strategy_mut();
            if let PlayOutcome::TrickCompleted(trick) = self.round.play_turn(strategy)? {
                for player in self.players.iter_mut() {
                    if player.strategy().requires_extended_bookkeeping() {
                        player.strategy_mut().observe_trick(&trick);
                    }
                }
            }
        }

        let summaries = array::from_fn(|index| {
            let player = &self.players[index];
            PlayerSummary {
                name: player.name().to_string(),
                strategy: player.strategy_name().to_string(),
                initial_hand: player.initial_hand().cards().to_vec(),
                score: self.round.scores()[index],
            }
        });
        let completed = CompletedGame::new(summaries, self.round.state().previous_tricks.clone());
        event!(
            target: "hearts_core::game",
            Level::DEBUG,
            winner = completed.winner_index,
            scores = ?completed.scores(),
            "game completed"
        );
        for player in self.players.iter_mut() {
            player.strategy_mut().on_game_complete(&completed);
        }
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::{GameError, HeartsGame};
    use crate::game::completed::CompletedGame;
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::player::Player;
    use crate::model::trick::CompletedTrick;
    use crate::strategy::{Strategy, StrategyGameState};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FirstLegal {
        tricks_seen: Arc<AtomicUsize>,
        games_seen: Arc<AtomicUsize>,
    }

    impl Strategy for FirstLegal {
        fn name(&self) -> &str {
            "first_legal"
        }

        fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
            state.valid_moves[0]
        }

        fn requires_extended_bookkeeping(&self) -> bool {
            true
        }

        fn observe_trick(&mut self, _trick: &CompletedTrick) {
            self.tricks_seen.fetch_add(1, Ordering::SeqCst);
        }

        fn on_game_complete(&mut self, _game: &CompletedGame) {
            self.games_seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Cheater;

    impl Strategy for Cheater {
        fn name(&self) -> &str {
            "cheater"
        }

        fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
            state
                .player_hand
                .iter()
                .copied()
                .find(|card| !state.valid_moves.contains(card))
                .unwrap_or(state.valid_moves[0])
        }
    }

    #[test]
    fn observers_receive_every_trick_and_the_result() {
        let tricks = Arc::new(AtomicUsize::new(0));
        let games = Arc::new(AtomicUsize::new(0));
        let players = std::array::from_fn(|i| {
            Player::new(
                format!("p{i}"),
                Box::new(FirstLegal {
                    tricks_seen: Arc::clone(&tricks),
                    games_seen: Arc::clone(&games),
                }),
            )
        });
        let game = HeartsGame::new(players, &Deck::shuffled_with_seed(8)).unwrap();
        let completed = game.play_game().unwrap();
        assert_eq!(completed.tricks.len(), 13);
        assert_eq!(tricks.load(Ordering::SeqCst), 13 * 4);
        assert_eq!(games.load(Ordering::SeqCst), 4);
        assert_eq!(completed.players[0].name, "p0");
        assert_eq!(completed.players[0].strategy, "first_legal");
    }

    #[test]
    fn illegal_choice_is_reported() {
        let players = std::array::from_fn(|i| Player::new(format!("p{i}"), Box::new(Cheater)));
        let game = HeartsGame::new(players, &Deck::shuffled_with_seed(8)).unwrap();
        let leader = game.round().current_player();
        match game.play_game() {
            Err(GameError::InvalidMove { seat, .. }) => assert_eq!(seat, leader),
            other => panic!("expected invalid move, got {other:?}"),
        }
    }
}
