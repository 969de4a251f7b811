use crate::model::card::Card;

/// Bit set over interned card ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self((1u64 << 52) - 1);

    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut set = Self::EMPTY;
        for card in cards {
            set.insert(*card);
        }
        set
    }

    pub fn insert(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.id();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn remove(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.id();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(self, card: Card) -> bool {
        self.0 & (1u64 << card.id()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Cards in id order.
    pub fn iter(self) -> impl Iterator<Item = Card> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let id = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Card::from_id(id)
        })
    }

    pub fn to_vec(self) -> Vec<Card> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::CardSet;
    use crate::model::card::{Card, QUEEN_OF_SPADES, TWO_OF_CLUBS};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn full_set_holds_every_card() {
        assert_eq!(CardSet::FULL.len(), 52);
        assert_eq!(CardSet::FULL.iter().count(), 52);
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = CardSet::EMPTY;
        assert!(set.insert(QUEEN_OF_SPADES));
        assert!(!set.insert(QUEEN_OF_SPADES));
        assert!(set.contains(QUEEN_OF_SPADES));
        assert!(set.remove(QUEEN_OF_SPADES));
        assert!(!set.remove(QUEEN_OF_SPADES));
        assert!(set.is_empty());
    }

    #[test]
    fn difference_removes_seen_cards() {
        let seen = CardSet::from_cards(&[TWO_OF_CLUBS, QUEEN_OF_SPADES]);
        let unseen = CardSet::FULL.difference(seen);
        assert_eq!(unseen.len(), 50);
        assert!(!unseen.contains(TWO_OF_CLUBS));
        assert!(unseen.contains(Card::new(Rank::Ace, Suit::Spades)));
    }

    #[test]
    fn iteration_is_in_id_order() {
        let set = CardSet::from_cards(&[QUEEN_OF_SPADES, TWO_OF_CLUBS]);
        assert_eq!(set.to_vec(), vec![TWO_OF_CLUBS, QUEEN_OF_SPADES]);
    }
}
