use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use hearts_core::game::CompletedGame;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("no games to summarise")]
    NoGames,
    #[error("baseline agent '{0}' not present in tournament results")]
    MissingBaseline(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent results game by game. Agents are identified by
/// player name and reported in the order they were first seen.
pub struct AnalyticsCollector {
    baseline: Option<String>,
    agents: Vec<AgentAccumulator>,
    index: HashMap<String, usize>,
    comparisons: HashMap<String, Vec<f64>>,
    games: usize,
}

impl AnalyticsCollector {
    pub fn new(baseline: Option<String>) -> Self {
        Self {
            baseline,
            agents: Vec::new(),
            index: HashMap::new(),
            comparisons: HashMap::new(),
            games: 0,
        }
    }

    /// Records one game. Every player sharing the lowest score is credited a win.
    pub fn record_game(&mut self, game: &CompletedGame) {
        self.games += 1;
        let winners = game.tied_winners();
        for (seat, player) in game.players.iter().enumerate() {
            let slot = match self.index.get(&player.name) {
                Some(slot) => *slot,
                None => {
                    self.agents
                        .push(AgentAccumulator::new(&player.name, &player.strategy));
                    self.index.insert(player.name.clone(), self.agents.len() - 1);
                    self.agents.len() - 1
                }
            };
            let won = winners.iter().any(|winner| winner.index() == seat);
            self.agents[slot].record(player.score, won);
        }

        let Some(baseline) = self.baseline.as_deref() else {
            return;
        };
        let Some(baseline_score) = game
            .players
            .iter()
            .find(|player| player.name == baseline)
            .map(|player| f64::from(player.score))
        else {
            return;
        };
        for player in game.players.iter().filter(|p| p.name != baseline) {
            self.comparisons
                .entry(player.name.clone())
                .or_default()
                .push(f64::from(player.score) - baseline_score);
        }
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        if self.games == 0 {
            return Err(AnalyticsError::NoGames);
        }
        if let Some(baseline) = self.baseline.as_ref()
            && !self.index.contains_key(baseline)
        {
            return Err(AnalyticsError::MissingBaseline(baseline.clone()));
        }

        let mut agents = Vec::with_capacity(self.agents.len());
        for acc in std::mem::take(&mut self.agents) {
            let is_baseline = self.baseline.as_deref() == Some(acc.name.as_str());
            let comparison = if is_baseline {
                Some(Comparison::baseline(acc.scores.len()))
            } else {
                self.comparisons
                    .remove(&acc.name)
                    .map(|diffs| Comparison::paired(&diffs))
            };
            agents.push(acc.into_report(comparison));
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            games: self.games,
            agents,
        })
    }
}

/// Summarises already finished games, as read back from a JSONL file.
pub fn summarize<'a>(
    games: impl IntoIterator<Item = &'a CompletedGame>,
    baseline: Option<String>,
) -> Result<AnalyticsSummary, AnalyticsError> {
    let mut collector = AnalyticsCollector::new(baseline);
    for game in games {
        collector.record_game(game);
    }
    collector.finalize()
}

struct AgentAccumulator {
    name: String,
    strategy: String,
    scores: Vec<f64>,
    total: u64,
    wins: usize,
}

impl AgentAccumulator {
    fn new(name: &str, strategy: &str) -> Self {
        Self {
            name: name.to_string(),
            strategy: strategy.to_string(),
            scores: Vec::new(),
            total: 0,
            wins: 0,
        }
    }

    fn record(&mut self, score: u32, won: bool) {
        self.scores.push(f64::from(score));
        self.total += u64::from(score);
        if won {
            self.wins += 1;
        }
    }

    fn into_report(self, comparison: Option<Comparison>) -> AgentReport {
        let games = self.scores.len();
        let (avg_score, ci95) = mean_with_interval(&self.scores);
        AgentReport {
            name: self.name,
            strategy: self.strategy,
            games,
            wins: self.wins,
            win_rate: if games == 0 {
                0.0
            } else {
                self.wins as f64 / games as f64
            },
            avg_score,
            ci95,
            total_score: self.total,
            delta_vs_baseline: comparison.map(|c| c.mean_delta),
            p_value: comparison.and_then(|c| c.p_value),
            paired_games: comparison.map_or(0, |c| c.sample_size),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Comparison {
    mean_delta: f64,
    p_value: Option<f64>,
    sample_size: usize,
}

impl Comparison {
    fn baseline(games: usize) -> Self {
        Self {
            mean_delta: 0.0,
            p_value: None,
            sample_size: games,
        }
    }

    /// Mean paired score difference with a two-sided p-value from the normal
    /// approximation of its sampling distribution.
    fn paired(diffs: &[f64]) -> Self {
        let n = diffs.len();
        if n == 0 {
            return Self {
                mean_delta: 0.0,
                p_value: None,
                sample_size: 0,
            };
        }
        let mean = diffs.iter().sum::<f64>() / n as f64;
        let p_value = if n < 2 {
            None
        } else {
            let variance =
                diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
            let std_error = (variance / n as f64).sqrt();
            if std_error <= f64::EPSILON {
                Some(if mean.abs() <= f64::EPSILON { 1.0 } else { 0.0 })
            } else {
                let z = (mean / std_error).abs();
                Normal::new(0.0, 1.0)
                    .ok()
                    .map(|normal| (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0))
            }
        };
        Self {
            mean_delta: mean,
            p_value,
            sample_size: n,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: Option<String>,
    pub games: usize,
    pub agents: Vec<AgentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub strategy: String,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_score: f64,
    pub ci95: (f64, f64),
    pub total_score: u64,
    /// Mean of (agent score − baseline score) over shared games.
    pub delta_vs_baseline: Option<f64>,
    pub p_value: Option<f64>,
    pub paired_games: usize,
}

impl AnalyticsSummary {
    pub fn agent(&self, name: &str) -> Option<&AgentReport> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Tournament Summary\n\n");
        let _ = writeln!(out, "Games: {}", self.games);
        if let Some(baseline) = &self.baseline {
            let _ = writeln!(out, "Baseline: {baseline}");
        }
        out.push('\n');
        out.push_str("| Agent | Strategy | Games | Wins | Win % | Avg score | 95% CI | Total | Δ vs baseline | p-value |\n");
        out.push_str("|-------|----------|-------|------|-------|-----------|--------|-------|----------------|---------|\n");

        for agent in &self.agents {
            let delta = agent
                .delta_vs_baseline
                .map_or_else(|| "-".to_string(), |d| format!("{d:+.3}"));
            let p_value = agent
                .p_value
                .map_or_else(|| "-".to_string(), |p| format!("{p:.3}"));
            let _ = writeln!(
                out,
                "| {name} | {strategy} | {games} | {wins} | {win:.1}% | {avg:.3} | [{lo:.3}, {hi:.3}] | {total} | {delta} | {p_value} |",
                name = agent.name,
                strategy = agent.strategy,
                games = agent.games,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                avg = agent.avg_score,
                lo = agent.ci95.0,
                hi = agent.ci95.1,
                total = agent.total_score,
            );
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

fn mean_with_interval(points: &[f64]) -> (f64, (f64, f64)) {
    if points.is_empty() {
        return (0.0, (0.0, 0.0));
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, (mean, mean));
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let margin = CONFIDENCE_Z * (variance / points.len() as f64).sqrt();
    (mean, (mean - margin, mean + margin))
}
