use crate::game::GameError;
use crate::game::state::GameCurrentState;
use crate::model::card::{Card, QUEEN_OF_SPADES, TWO_OF_CLUBS};
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use crate::model::trick::{CompletedTrick, TrickError};
use crate::strategy::{Strategy, StrategyGameState};
use std::array;
use thiserror::Error;
use tracing::{Level, event};

pub const HAND_SIZE: usize = 13;

/// Hands, running scores and public state of one deal. Holds no strategies,
/// so it can be cloned freely for simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    hands: [Hand; 4],
    scores: [u32; 4],
    state: GameCurrentState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted(CompletedTrick),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("{seat} does not hold {card}")]
    CardNotInHand { seat: PlayerPosition, card: Card },
    #[error("game is already over")]
    GameOver,
    #[error(transparent)]
    Trick(#[from] TrickError),
}

impl RoundState {
    /// Deals 13 cards to each seat; the holder of the two of clubs leads.
    pub fn deal(deck: &Deck) -> Result<Self, DeckError> {
        let dealt = deck.deal(4, HAND_SIZE)?;
        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        for (hand, cards) in hands.iter_mut().zip(dealt) {
            *hand = Hand::with_cards(cards);
        }
        let starting_player = Self::find_starting_player(&hands);
        Ok(Self {
            hands,
            scores: [0; 4],
            state: GameCurrentState::new(starting_player),
        })
    }

    pub fn from_parts(hands: [Hand; 4], scores: [u32; 4], state: GameCurrentState) -> Self {
        Self {
            hands,
            scores,
            state,
        }
    }

    pub fn find_starting_player(hands: &[Hand; 4]) -> PlayerPosition {
        PlayerPosition::LOOP
            .iter()
            .copied()
            .find(|seat| hands[seat.index()].contains(TWO_OF_CLUBS))
            .unwrap_or(PlayerPosition::North)
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.scores[seat.index()]
    }

    pub fn scores(&self) -> [u32; 4] {
        self.scores
    }

    pub fn state(&self) -> &GameCurrentState {
        &self.state
    }

    pub fn current_player(&self) -> PlayerPosition {
        self.state.current_player
    }

    pub fn hearts_broken(&self) -> bool {
        self.state.hearts_broken
    }

    pub fn is_game_over(&self) -> bool {
        self.hands.iter().all(Hand::is_empty)
    }

    /// Legal cards for `seat`. The first rule that leaves a non-empty set
    /// wins; a non-empty hand never yields an empty set.
    pub fn valid_moves(&self, seat: PlayerPosition) -> Vec<Card> {
        let hand = self.hands[seat.index()].cards();
        if hand.is_empty() {
            return Vec::new();
        }
        let trick = &self.state.current_trick;
        let first_trick = self.state.previous_tricks.is_empty();

        if self.state.is_opening_lead() {
            let moves = retain(hand, |card| *card == TWO_OF_CLUBS);
            if !moves.is_empty() {
                return moves;
            }
        }

        if let Some(lead_suit) = trick.lead_suit() {
            let moves = retain(hand, |card| card.suit == lead_suit);
            if !moves.is_empty() {
                return moves;
            }
            return hand.to_vec();
        }

        if first_trick {
            let moves = retain(hand, |card| card.suit != Suit::Hearts && *card != QUEEN_OF_SPADES);
            if !moves.is_empty() {
                return moves;
            }
        }

        if !self.state.hearts_broken {
            let moves = retain(hand, |card| card.suit != Suit::Hearts);
            if !moves.is_empty() {
                return moves;
            }
        }

        hand.to_vec()
    }

    /// Plays `card` for the current player. Only hand membership is checked;
    /// rule legality is enforced where strategies are consulted.
    pub fn play_card(&mut self, card: Card) -> Result<PlayOutcome, PlayError> {
        if self.is_game_over() {
            return Err(PlayError::GameOver);
        }
        let seat = self.state.current_player;
        if !self.hands[seat.index()].contains(card) {
            return Err(PlayError::CardNotInHand { seat, card });
        }

        self.state.current_trick.add_card(seat, card)?;
        self.hands[seat.index()].remove(card);
        if card.suit == Suit::Hearts {
            self.state.hearts_broken = true;
        }
        event!(target: "hearts_core::round", Level::TRACE, %seat, %card, "card played");

        if !self.state.current_trick.is_completed() {
            self.state.current_player = seat.next();
            return Ok(PlayOutcome::Played);
        }

        let completed = self.state.current_trick.to_completed()?;
        let winner = completed.winner();
        self.scores[winner.index()] += completed.score;
        self.state.previous_tricks.push(completed);
        self.state.current_trick.reset();
        self.state.current_player = winner;
        event!(
            target: "hearts_core::round",
            Level::DEBUG,
            trick = self.state.previous_tricks.len(),
            %winner,
            score = completed.score,
            "trick completed"
        );
        Ok(PlayOutcome::TrickCompleted(completed))
    }

    /// Asks `strategy` for the current player's card, checks it against the
    /// legal moves and plays it.
    pub fn play_turn<S: Strategy + ?Sized>(
        &mut self,
        strategy: &mut S,
    ) -> Result<PlayOutcome, GameError> {
        let seat = self.state.current_player;
        let moves = self.valid_moves(seat);
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves { seat });
        }
        let view = StrategyGameState {
            game_state: &self.state,
            player_hand: &self.hands[seat.index()],
            player_index: seat,
            player_score: self.scores[seat.index()],
            valid_moves: &moves,
        };
        let card = strategy.choose_card(&view);
        if !moves.contains(&card) {
            return Err(GameError::InvalidMove { seat, card });
        }
        Ok(self.play_card(card)?)
    }

    /// Finishes the deal from the current position with one strategy on every seat.
    pub fn play_out<S: Strategy + ?Sized>(&mut self, strategy: &mut S) -> Result<(), GameError> {
        while !self.is_game_over() {
            self.play_turn(strategy)?;
        }
        Ok(())
    }
}

fn retain(hand: &[Card], keep: impl Fn(&Card) -> bool) -> Vec<Card> {
    hand.iter().copied().filter(|card| keep(card)).collect()
}
