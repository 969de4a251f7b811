use std::fs;
use std::path::Path;

use hearts_bench::analytics::summarize;
use hearts_bench::config::BenchmarkConfig;
use hearts_bench::tournament::{TournamentRunner, read_records};
use hearts_bot::policy::ReplayStrategy;
use hearts_core::game::HeartsGame;
use hearts_core::model::player::{Player, PlayerPosition};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(output_dir: &Path) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: 4242
  deals: 2
agents:
  - name: "baseline"
    kind: "avoid_points"
  - name: "mc"
    kind: "simulation"
    params:
      num_simulations: 16
      min_simulations_per_move: 2
  - name: "random"
    kind: "random"
  - name: "aggressive"
    kind: "aggressive"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
metrics:
  baseline: "baseline"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("{run_id}").join("games.jsonl").display(),
        summary = output_dir.join("{run_id}").join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_digest(dir: &Path) -> (String, std::path::PathBuf) {
    let config = load_config(dir);
    let outputs = config.resolved_outputs();
    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("tournament completes");

    assert_eq!(summary.deals_played, 2);
    assert_eq!(summary.rotations, 4);
    assert_eq!(summary.games_played, 8);
    assert!(summary.summary_path.exists(), "summary markdown missing");
    assert!(summary.jsonl_path.starts_with(dir.join("test_smoke")));

    let jsonl = fs::read(&summary.jsonl_path).expect("jsonl readable");
    let digest = Sha256::digest(&jsonl);
    (hex::encode(digest), summary.jsonl_path)
}

#[test]
fn same_seed_produces_identical_jsonl() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    let (a, _) = run_digest(first.path());
    let (b, _) = run_digest(second.path());
    assert_eq!(a, b, "JSONL output differs between identical runs");
}

#[test]
fn records_replay_and_reanalyse() {
    let dir = tempdir().expect("temp dir");
    let (_, jsonl_path) = run_digest(dir.path());
    let records = read_records(&jsonl_path).expect("records decode");
    assert_eq!(records.len(), 8);

    for record in &records {
        assert_eq!(record.run_id, "test_smoke");
        assert_eq!(record.game.scores().iter().sum::<u32>(), 26);
        assert_eq!(record.game.players[1].strategy, "simulation");
    }

    // Rotations of one deal share the seed and hand each agent a different hand.
    assert_eq!(records[0].deal_seed, records[3].deal_seed);
    assert_ne!(
        records[0].game.players[0].initial_hand,
        records[1].game.players[0].initial_hand
    );
    assert_eq!(
        records[0].game.players[1].initial_hand,
        records[1].game.players[0].initial_hand
    );

    let record = &records[5];
    let players = PlayerPosition::LOOP.map(|seat| {
        Player::new(
            record.game.players[seat.index()].name.clone(),
            Box::new(ReplayStrategy::for_seat(&record.game, seat)),
        )
    });
    let replayed = HeartsGame::new(players, &record.deck())
        .expect("deal")
        .play_game()
        .expect("replay is legal");
    assert_eq!(replayed, record.game);

    let summary = summarize(records.iter().map(|r| &r.game), Some("baseline".to_string()))
        .expect("summary");
    assert_eq!(summary.games, 8);
    assert_eq!(summary.agents.len(), 4);
    let wins: usize = summary.agents.iter().map(|a| a.wins).sum();
    assert!(wins >= 8);
}
