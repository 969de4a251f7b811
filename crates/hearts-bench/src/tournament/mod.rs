use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary};
use crate::config::{BenchmarkConfig, ResolvedOutputs, SEAT_COUNT, ValidationError};
use hearts_bot::policy::{StrategyKind, build_strategy};
use hearts_bot::search::SearchConfig;
use hearts_core::game::{CompletedGame, GameError, HeartsGame};
use hearts_core::model::deck::Deck;
use hearts_core::model::player::{Player, PlayerPosition};
use hearts_core::model::round::HAND_SIZE;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Plays the configured agents against each other over seeded deals.
///
/// Agents keep their seat for the whole run. With `rotate_seats` every deal
/// is replayed four times with the deck shifted by one hand, so each agent
/// receives each of the four hands once.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub deals_played: usize,
    pub rotations: usize,
    pub games_played: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub elapsed: Duration,
    pub analytics: AnalyticsSummary,
}

/// One line of the games JSONL file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub run_id: String,
    pub game_id: String,
    pub deal_index: usize,
    pub rotation: usize,
    pub deal_seed: u64,
    pub game: CompletedGame,
}

impl GameRecord {
    /// Deck the game was dealt from.
    pub fn deck(&self) -> Deck {
        rotated_deck(self.deal_seed, self.rotation)
    }
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != SEAT_COUNT {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }
        let agents = config
            .agents
            .iter()
            .map(|agent| {
                Ok(AgentBlueprint {
                    name: agent.name.clone(),
                    kind: agent.kind,
                    search: agent.search_config()?,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    /// Execute the tournament, streaming one JSONL record per game.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let started = Instant::now();
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(self.config.baseline().map(str::to_string));
        let rotations = self.config.games.rotations();
        let mut games_played = 0usize;

        for deal_index in 0..self.config.games.deals {
            let deal_seed = rng.next_u64();
            for rotation in 0..rotations {
                let record = self.play_game(deal_index, rotation, deal_seed)?;
                analytics.record_game(&record.game);
                serde_json::to_writer(&mut writer, &record)?;
                writer.write_all(b"\n")?;
                games_played += 1;
            }
        }
        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;
        let elapsed = started.elapsed();
        event!(
            target: "hearts_bench::run",
            Level::INFO,
            run_id = %self.config.run_id,
            games = games_played,
            elapsed_ms = elapsed.as_millis() as u64,
            "tournament complete"
        );

        Ok(RunSummary {
            deals_played: self.config.games.deals,
            rotations,
            games_played,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            elapsed,
            analytics: summary,
        })
    }

    fn play_game(
        &self,
        deal_index: usize,
        rotation: usize,
        deal_seed: u64,
    ) -> Result<GameRecord, RunnerError> {
        let game_id = format!("D{deal_index:05}_R{rotation}");
        let players = PlayerPosition::LOOP.map(|seat| {
            let agent = &self.agents[seat.index()];
            Player::new(
                agent.name.clone(),
                build_strategy(agent.kind, strategy_seed(deal_seed, rotation, seat), &agent.search),
            )
        });

        let started = Instant::now();
        let game = HeartsGame::new(players, &rotated_deck(deal_seed, rotation))
            .and_then(HeartsGame::play_game)
            .map_err(|source| RunnerError::Game {
                game_id: game_id.clone(),
                source,
            })?;

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "hearts_bench::game",
                Level::INFO,
                run_id = %self.config.run_id,
                game_id = %game_id,
                deal_seed,
                winner = %game.players[game.winner_index].name,
                scores = ?game.scores(),
                elapsed_ms = started.elapsed().as_millis() as u64,
            );
        }

        Ok(GameRecord {
            run_id: self.config.run_id.clone(),
            game_id,
            deal_index,
            rotation,
            deal_seed,
            game,
        })
    }
}

struct AgentBlueprint {
    name: String,
    kind: StrategyKind,
    search: SearchConfig,
}

/// Shuffled deck for `deal_seed`, shifted left by one hand per rotation.
pub fn rotated_deck(deal_seed: u64, rotation: usize) -> Deck {
    let mut deck = Deck::shuffled_with_seed(deal_seed);
    deck.shift_left(HAND_SIZE * rotation);
    deck
}

fn strategy_seed(deal_seed: u64, rotation: usize, seat: PlayerPosition) -> u64 {
    let slot = (rotation * SEAT_COUNT + seat.index() + 1) as u64;
    deal_seed ^ slot.wrapping_mul(SEED_STRIDE)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Reads a games JSONL file written by [`TournamentRunner::run`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<GameRecord>, RunnerError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| RunnerError::Record {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize game record: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("malformed game record on line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("game {game_id} failed: {source}")]
    Game {
        game_id: String,
        #[source]
        source: GameError,
    },
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
    #[error("invalid agent configuration: {0}")]
    Agent(#[from] ValidationError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
