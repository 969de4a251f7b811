use crate::model::card_set::CardSet;
use crate::model::player::PlayerPosition;
use crate::model::trick::{CompletedTrick, Trick};
use serde::{Deserialize, Serialize};

/// Authoritative public state of a game in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCurrentState {
    pub previous_tricks: Vec<CompletedTrick>,
    pub current_trick: Trick,
    pub hearts_broken: bool,
    pub current_player: PlayerPosition,
}

impl GameCurrentState {
    pub fn new(starting_player: PlayerPosition) -> Self {
        Self {
            current_player: starting_player,
            ..Self::default()
        }
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player.index()
    }

    /// No card has been played yet.
    pub fn is_opening_lead(&self) -> bool {
        self.previous_tricks.is_empty() && self.current_trick.is_empty()
    }

    /// Every card visible on the table or in the archive.
    pub fn played_cards(&self) -> CardSet {
        let mut played = CardSet::EMPTY;
        for trick in &self.previous_tricks {
            for card in trick.cards {
                played.insert(card);
            }
        }
        for card in self.current_trick.slots().iter().flatten() {
            played.insert(*card);
        }
        played
    }

    pub fn cards_played_by(&self, seat: PlayerPosition) -> usize {
        let in_current = usize::from(self.current_trick.card_at(seat).is_some());
        self.previous_tricks.len() + in_current
    }

    /// Penalty points each seat has collected from archived tricks.
    pub fn trick_scores(&self) -> [u32; 4] {
        let mut scores = [0u32; 4];
        for trick in &self.previous_tricks {
            scores[trick.winner_index % 4] += trick.score;
        }
        scores
    }
}
