//! Sampling concrete opponent hands consistent with the public history.

use super::voids::{SuitMask, infer_voids};
use crate::game::state::GameCurrentState;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::hand::Hand;
use crate::model::player::PlayerPosition;
use crate::model::round::{HAND_SIZE, RoundState};
use crate::strategy::StrategyGameState;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeterminizeError {
    #[error("{unseen} unseen cards cannot fill {required} open hand slots")]
    CardCountMismatch { unseen: usize, required: usize },
}

/// A sampled full-information deal.
#[derive(Debug, Clone)]
pub struct DeterminizedDeal {
    pub round: RoundState,
    /// Cards left in a seat that has shown out of their suit.
    pub violations: usize,
}

/// Everything about a decision point that does not change between samples.
/// Built once per decision and shared read-only by every rollout.
#[derive(Debug, Clone)]
pub struct Determinizer {
    state: GameCurrentState,
    acting: PlayerPosition,
    acting_hand: Hand,
    scores: [u32; 4],
    unseen: Vec<Card>,
    voids: [SuitMask; 4],
    required: [usize; 4],
}

impl Determinizer {
    pub fn new(view: &StrategyGameState<'_>) -> Result<Self, DeterminizeError> {
        let state = view.game_state.clone();
        let acting = view.player_index;

        let seen = state
            .played_cards()
            .union(CardSet::from_cards(view.player_hand.cards()));
        let unseen = CardSet::FULL.difference(seen).to_vec();

        let mut required = [0usize; 4];
        for seat in PlayerPosition::LOOP {
            if seat != acting {
                required[seat.index()] = HAND_SIZE.saturating_sub(state.cards_played_by(seat));
            }
        }
        let total: usize = required.iter().sum();
        if total != unseen.len() {
            return Err(DeterminizeError::CardCountMismatch {
                unseen: unseen.len(),
                required: total,
            });
        }

        // Opponent scores are approximated from the tricks each is recorded to have won.
        let mut scores = state.trick_scores();
        scores[acting.index()] = view.player_score;

        Ok(Self {
            voids: infer_voids(&state),
            state,
            acting,
            acting_hand: view.player_hand.clone(),
            scores,
            unseen,
            required,
        })
    }

    pub fn acting(&self) -> PlayerPosition {
        self.acting
    }

    pub fn unseen(&self) -> &[Card] {
        &self.unseen
    }

    pub fn voids(&self) -> &[SuitMask; 4] {
        &self.voids
    }

    /// Deals the unseen cards to the other seats, respecting known voids where possible.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DeterminizedDeal {
        let mut pool = self.unseen.clone();
        pool.shuffle(rng);

        let mut hands: [Vec<Card>; 4] = Default::default();
        hands[self.acting.index()] = self.acting_hand.cards().to_vec();

        for seat in self.fill_order(&pool) {
            let need = self.required[seat.index()];
            let mask = self.voids[seat.index()];
            let mut taken = Vec::with_capacity(need);
            let mut rest = Vec::with_capacity(pool.len());
            for card in pool.drain(..) {
                if taken.len() < need && mask.allows(card) {
                    taken.push(card);
                } else {
                    rest.push(card);
                }
            }
            pool = rest;
            // Relax the constraint rather than leave the seat short.
            while taken.len() < need {
                match pool.pop() {
                    Some(card) => taken.push(card),
                    None => break,
                }
            }
            hands[seat.index()] = taken;
        }

        let violations = repair_violations(&mut hands, &self.voids, self.acting);
        let round = RoundState::from_parts(
            hands.map(Hand::with_cards),
            self.scores,
            self.state.clone(),
        );
        DeterminizedDeal { round, violations }
    }

    /// Other seats, least slack between allowed cards and required count first.
    fn fill_order(&self, pool: &[Card]) -> Vec<PlayerPosition> {
        let mut order: Vec<(PlayerPosition, isize)> = PlayerPosition::LOOP
            .iter()
            .copied()
            .filter(|seat| *seat != self.acting)
            .map(|seat| {
                let mask = self.voids[seat.index()];
                let allowed = pool.iter().filter(|card| mask.allows(**card)).count();
                (seat, allowed as isize - self.required[seat.index()] as isize)
            })
            .collect();
        order.sort_by_key(|(_, slack)| *slack);
        order.into_iter().map(|(seat, _)| seat).collect()
    }
}

/// Swaps misplaced cards between opponents until no profitable swap remains.
/// Returns the violations left over.
fn repair_violations(
    hands: &mut [Vec<Card>; 4],
    voids: &[SuitMask; 4],
    acting: PlayerPosition,
) -> usize {
    for seat in PlayerPosition::LOOP {
        if seat == acting {
            continue;
        }
        for index in 0..hands[seat.index()].len() {
            let card = hands[seat.index()][index];
            if voids[seat.index()].allows(card) {
                continue;
            }
            let partner = PlayerPosition::LOOP
                .iter()
                .copied()
                .filter(|other| *other != seat && *other != acting)
                .filter(|other| voids[other.index()].allows(card))
                .find_map(|other| {
                    hands[other.index()]
                        .iter()
                        .position(|candidate| voids[seat.index()].allows(*candidate))
                        .map(|position| (other, position))
                });
            if let Some((other, position)) = partner {
                let (mine, theirs) = split_two_mut(hands, seat.index(), other.index());
                std::mem::swap(&mut mine[index], &mut theirs[position]);
            }
        }
    }
    count_violations(hands, voids, acting)
}

fn count_violations(hands: &[Vec<Card>; 4], voids: &[SuitMask; 4], acting: PlayerPosition) -> usize {
    PlayerPosition::LOOP
        .iter()
        .filter(|seat| **seat != acting)
        .map(|seat| {
            hands[seat.index()]
                .iter()
                .filter(|card| !voids[seat.index()].allows(**card))
                .count()
        })
        .sum()
}

fn split_two_mut<T>(slice: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b);
    if a < b {
        let (left, right) = slice.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
