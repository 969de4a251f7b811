use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("cannot deal {hands} hands of {cards} cards from a {available}-card deck")]
    NotEnoughCards {
        hands: usize,
        cards: usize,
        available: usize,
    },
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Rebuilds the full 52 cards and shuffles them again.
    pub fn reset<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::shuffled(rng);
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Rotates the arrangement so the same shuffle can be dealt to different seats.
    pub fn shift_left(&mut self, count: usize) {
        if self.cards.is_empty() {
            return;
        }
        let count = count % self.cards.len();
        self.cards.rotate_left(count);
    }

    /// Contiguous partition: hand `i` receives `cards[i * num_cards..(i + 1) * num_cards]`.
    pub fn deal(&self, num_hands: usize, num_cards: usize) -> Result<Vec<Vec<Card>>, DeckError> {
        let needed = num_hands.saturating_mul(num_cards);
        if needed > self.cards.len() {
            return Err(DeckError::NotEnoughCards {
                hands: num_hands,
                cards: num_cards,
                available: self.cards.len(),
            });
        }
        Ok((0..num_hands)
            .map(|i| self.cards[i * num_cards..(i + 1) * num_cards].to_vec())
            .collect())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
