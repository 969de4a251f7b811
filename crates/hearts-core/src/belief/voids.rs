use crate::game::state::GameCurrentState;
use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;

/// Bit-mask describing which suits are void for a seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SuitMask(u8);

impl SuitMask {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, suit: Suit) -> bool {
        let bit = 1 << suit as u8;
        self.0 & bit != 0
    }

    pub fn with(mut self, suit: Suit) -> Self {
        let bit = 1 << suit as u8;
        self.0 |= bit;
        self
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn allows(self, card: Card) -> bool {
        !self.contains(card.suit)
    }
}

/// Suits each seat has shown out of, from archived tricks and the trick on the table.
pub fn infer_voids(state: &GameCurrentState) -> [SuitMask; 4] {
    let mut voids = [SuitMask::EMPTY; 4];
    let mut mark = |seat: PlayerPosition, card: Card, lead: Suit| {
        if card.suit != lead {
            voids[seat.index()] = voids[seat.index()].with(lead);
        }
    };

    for trick in &state.previous_tricks {
        let lead = trick.lead_suit();
        for (seat, card) in trick.ordered_cards() {
            mark(seat, card, lead);
        }
    }

    if let Some(lead) = state.current_trick.lead_suit() {
        for (seat, card) in state.current_trick.ordered_cards() {
            mark(seat, card, lead);
        }
    }

    voids
}
