use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The mandatory opening lead.
pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
/// Worth thirteen penalty points to whoever takes it.
pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse card from {0:?}")]
pub struct ParseCardError(pub String);

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    pub const fn is_penalty(self) -> bool {
        matches!(self.suit, Suit::Hearts) || self.is_queen_of_spades()
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub fn penalty_value(self) -> u8 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit == Suit::Hearts {
            1
        } else {
            0
        }
    }

    /// Interned index in `0..52`, grouped by suit then rank.
    pub const fn id(self) -> u8 {
        self.suit as u8 * 13 + self.rank.offset()
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        if id >= 52 {
            return None;
        }
        let suit = match Suit::from_index((id / 13) as usize) {
            Some(suit) => suit,
            None => return None,
        };
        match Rank::from_value(id % 13 + 2) {
            Some(rank) => Some(Card::new(rank, suit)),
            None => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.value(), self.suit)
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        let suit_symbol = chars
            .next_back()
            .ok_or_else(|| ParseCardError(text.to_string()))?;
        let suit = Suit::from_symbol(suit_symbol).ok_or_else(|| ParseCardError(text.to_string()))?;
        let rank = Rank::from_symbol(chars.as_str()).ok_or_else(|| ParseCardError(text.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, QUEEN_OF_SPADES, Rank, Suit, TWO_OF_CLUBS};

    #[test]
    fn queen_of_spades_identified() {
        assert!(QUEEN_OF_SPADES.is_queen_of_spades());
        assert!(QUEEN_OF_SPADES.is_penalty());
        assert_eq!(QUEEN_OF_SPADES.penalty_value(), 13);
    }

    #[test]
    fn regular_card_not_penalty() {
        let card = Card::new(Rank::Ten, Suit::Clubs);
        assert!(!card.is_penalty());
        assert_eq!(card.penalty_value(), 0);
    }

    #[test]
    fn hearts_are_one_point() {
        let card = Card::new(Rank::Ace, Suit::Hearts);
        assert!(card.is_penalty());
        assert_eq!(card.penalty_value(), 1);
    }

    #[test]
    fn display_uses_numeric_rank() {
        assert_eq!(QUEEN_OF_SPADES.to_string(), "12S");
        assert_eq!(TWO_OF_CLUBS.to_string(), "2C");
    }

    #[test]
    fn ids_cover_the_deck_once() {
        let mut seen = [false; 52];
        for id in 0..52u8 {
            let card = Card::from_id(id).expect("valid id");
            assert_eq!(card.id(), id);
            assert!(!seen[id as usize]);
            seen[id as usize] = true;
        }
        assert_eq!(Card::from_id(52), None);
    }

    #[test]
    fn parses_numeric_and_face_forms() {
        assert_eq!("12S".parse::<Card>().unwrap(), QUEEN_OF_SPADES);
        assert_eq!("QS".parse::<Card>().unwrap(), QUEEN_OF_SPADES);
        assert_eq!("10h".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert!("1C".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn serializes_as_suit_and_rank_fields() {
        let json = serde_json::to_string(&QUEEN_OF_SPADES).unwrap();
        assert_eq!(json, r#"{"suit":"S","rank":12}"#);
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QUEEN_OF_SPADES);
    }
}
