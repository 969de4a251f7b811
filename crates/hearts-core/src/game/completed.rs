use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::trick::CompletedTrick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub strategy: String,
    pub initial_hand: Vec<Card>,
    pub score: u32,
}

/// Final record of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedGame {
    pub players: [PlayerSummary; 4],
    pub winner_index: usize,
    pub tricks: Vec<CompletedTrick>,
}

impl CompletedGame {
    pub fn new(players: [PlayerSummary; 4], tricks: Vec<CompletedTrick>) -> Self {
        let winner_index = lowest_score_index(&players);
        Self {
            players,
            winner_index,
            tricks,
        }
    }

    pub fn winner(&self) -> PlayerPosition {
        PlayerPosition::from_index(self.winner_index).unwrap_or(PlayerPosition::North)
    }

    pub fn scores(&self) -> [u32; 4] {
        [
            self.players[0].score,
            self.players[1].score,
            self.players[2].score,
            self.players[3].score,
        ]
    }

    /// Seats sharing the lowest score.
    pub fn tied_winners(&self) -> Vec<PlayerPosition> {
        let scores = self.scores();
        let best = scores.iter().copied().min().unwrap_or(0);
        PlayerPosition::LOOP
            .iter()
            .copied()
            .filter(|seat| scores[seat.index()] == best)
            .collect()
    }

    /// Cards played by `seat`, one per trick, in play order.
    pub fn cards_played_by(&self, seat: PlayerPosition) -> Vec<Card> {
        self.tricks.iter().map(|trick| trick.card_of(seat)).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn lowest_score_index(players: &[PlayerSummary; 4]) -> usize {
    let mut best = 0;
    for (index, player) in players.iter().enumerate().skip(1) {
        if player.score < players[best].score {
            best = index;
        }
    }
    best
}
