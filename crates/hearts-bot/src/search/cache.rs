//! Per-strategy memo of earlier decisions.

use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::strategy::StrategyGameState;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveCacheKey {
    current_trick: Vec<(PlayerPosition, Card)>,
    hand: Vec<Card>,
    previous_tricks: Vec<(usize, u32)>,
    player_score: u32,
}

impl MoveCacheKey {
    pub fn from_state(state: &StrategyGameState<'_>) -> Self {
        let current_trick = PlayerPosition::LOOP
            .iter()
            .filter_map(|seat| {
                state
                    .game_state
                    .current_trick
                    .card_at(*seat)
                    .map(|card| (*seat, card))
            })
            .collect();
        let mut hand = state.player_hand.cards().to_vec();
        hand.sort_by_key(|card| card.id());
        let previous_tricks = state
            .game_state
            .previous_tricks
            .iter()
            .map(|trick| (trick.winner_index, trick.score))
            .collect();
        Self {
            current_trick,
            hand,
            previous_tricks,
            player_score: state.player_score,
        }
    }
}

/// Chosen cards with an LRU eviction policy.
#[derive(Debug)]
pub struct MoveCache {
    entries: HashMap<MoveCacheKey, Card>,
    order: VecDeque<MoveCacheKey>,
    capacity: usize,
}

impl MoveCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &MoveCacheKey) -> Option<Card> {
        let card = *self.entries.get(key)?;
        self.touch(key);
        Some(card)
    }

    pub fn insert(&mut self, key: MoveCacheKey, card: Card) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), card).is_some() {
            self.touch(&key);
        } else {
            self.order.push_back(key);
        }
        self.evict_if_needed();
    }

    fn touch(&mut self, key: &MoveCacheKey) {
        if let Some(position) = self.order.iter().position(|existing| existing == key) {
            if let Some(existing) = self.order.remove(position) {
                self.order.push_back(existing);
            }
        }
    }

    fn evict_if_needed(&mut self) {
        while self.capacity > 0 && self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}
