use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The trick currently on the table, one slot per seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    slots: [Option<Card>; 4],
    leader: Option<PlayerPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("{0} has already played this trick")]
    AlreadyPlayed(PlayerPosition),
    #[error("trick is not complete")]
    Incomplete,
}

/// Archived trick. Built once, when a full trick is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    /// Cards indexed by seat.
    pub cards: [Card; 4],
    pub first_player_index: usize,
    pub winner_index: usize,
    pub score: u32,
}

impl Trick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leader(&self) -> Option<PlayerPosition> {
        self.leader
    }

    pub fn card_at(&self, seat: PlayerPosition) -> Option<Card> {
        self.slots[seat.index()]
    }

    pub fn slots(&self) -> &[Option<Card>; 4] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_completed(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.leader
            .and_then(|leader| self.slots[leader.index()])
            .map(|card| card.suit)
    }

    /// Places a card for `seat`. The first card after a reset fixes the leader.
    pub fn add_card(&mut self, seat: PlayerPosition, card: Card) -> Result<(), TrickError> {
        if self.is_completed() {
            return Err(TrickError::TrickComplete);
        }
        if self.slots[seat.index()].is_some() {
            return Err(TrickError::AlreadyPlayed(seat));
        }
        if self.is_empty() {
            self.leader = Some(seat);
        }
        self.slots[seat.index()] = Some(card);
        Ok(())
    }

    /// Played cards in table order, starting at the leader.
    pub fn ordered_cards(&self) -> Vec<(PlayerPosition, Card)> {
        let Some(leader) = self.leader else {
            return Vec::new();
        };
        (0..4)
            .map(|step| leader.offset(step))
            .filter_map(|seat| self.slots[seat.index()].map(|card| (seat, card)))
            .collect()
    }

    pub fn score(&self) -> u32 {
        self.slots
            .iter()
            .flatten()
            .map(|card| u32::from(card.penalty_value()))
            .sum()
    }

    /// Highest card of the lead suit among the cards played so far.
    pub fn winner(&self) -> Option<PlayerPosition> {
        let lead_suit = self.lead_suit()?;
        self.ordered_cards()
            .into_iter()
            .filter(|(_, card)| card.suit == lead_suit)
            .max_by_key(|(_, card)| card.rank)
            .map(|(seat, _)| seat)
    }

    pub fn reset(&mut self) {
        self.slots = [None; 4];
        self.leader = None;
    }

    pub fn to_completed(&self) -> Result<CompletedTrick, TrickError> {
        let (Some(leader), Some(winner)) = (self.leader, self.winner()) else {
            return Err(TrickError::Incomplete);
        };
        let [Some(a), Some(b), Some(c), Some(d)] = self.slots else {
            return Err(TrickError::Incomplete);
        };
        Ok(CompletedTrick {
            cards: [a, b, c, d],
            first_player_index: leader.index(),
            winner_index: winner.index(),
            score: self.score(),
        })
    }
}

impl CompletedTrick {
    pub fn card_of(&self, seat: PlayerPosition) -> Card {
        self.cards[seat.index()]
    }

    pub fn lead_suit(&self) -> Suit {
        self.cards[self.first_player_index % 4].suit
    }

    pub fn leader(&self) -> PlayerPosition {
        PlayerPosition::from_index(self.first_player_index % 4).unwrap_or(PlayerPosition::North)
    }

    pub fn winner(&self) -> PlayerPosition {
        PlayerPosition::from_index(self.winner_index % 4).unwrap_or(PlayerPosition::North)
    }

    /// Cards in table order, starting at the leader.
    pub fn ordered_cards(&self) -> impl Iterator<Item = (PlayerPosition, Card)> + '_ {
        let leader = self.leader();
        (0..4).map(move |step| {
            let seat = leader.offset(step);
            (seat, self.cards[seat.index()])
        })
    }
}
