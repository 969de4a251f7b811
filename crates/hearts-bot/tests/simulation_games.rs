use hearts_bot::policy::{ReplayStrategy, StrategyKind, build_strategy};
use hearts_bot::search::SearchConfig;
use hearts_core::game::CompletedGame;
use hearts_core::game::hearts_game::{GameError, HeartsGame};
use hearts_core::model::deck::Deck;
use hearts_core::model::player::{Player, PlayerPosition};

fn quick_config() -> SearchConfig {
    SearchConfig {
        num_simulations: 40,
        min_simulations_per_move: 4,
        ..SearchConfig::default()
    }
}

fn play(kinds: [StrategyKind; 4], deck_seed: u64) -> Result<CompletedGame, GameError> {
    let config = quick_config();
    let players = PlayerPosition::LOOP.map(|seat| {
        let kind = kinds[seat.index()];
        Player::new(
            format!("{kind}-{seat}"),
            build_strategy(kind, deck_seed + seat.index() as u64, &config),
        )
    });
    HeartsGame::new(players, &Deck::shuffled_with_seed(deck_seed))?.play_game()
}

#[test]
fn simulation_agents_finish_a_legal_game() {
    let game = play(
        [
            StrategyKind::Simulation,
            StrategyKind::Random,
            StrategyKind::AvoidPoints,
            StrategyKind::Aggressive,
        ],
        2024,
    )
    .unwrap();
    assert_eq!(game.tricks.len(), 13);
    assert_eq!(game.scores().iter().sum::<u32>(), 26);
    assert_eq!(game.players[0].strategy, "simulation");
}

#[test]
fn seeded_simulation_games_are_reproducible() {
    let kinds = [
        StrategyKind::Simulation,
        StrategyKind::Simulation,
        StrategyKind::Random,
        StrategyKind::Random,
    ];
    let first = play(kinds, 77).unwrap();
    let second = play(kinds, 77).unwrap();
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn replaying_a_recorded_game_reproduces_it() {
    let recorded = play(
        [
            StrategyKind::Simulation,
            StrategyKind::Random,
            StrategyKind::Random,
            StrategyKind::AvoidPoints,
        ],
        9,
    )
    .unwrap();
    let players = PlayerPosition::LOOP.map(|seat| {
        Player::new(
            recorded.players[seat.index()].name.clone(),
            Box::new(ReplayStrategy::for_seat(&recorded, seat)),
        )
    });
    let replayed = HeartsGame::new(players, &Deck::shuffled_with_seed(9))
        .unwrap()
        .play_game()
        .unwrap();
    assert_eq!(replayed.tricks, recorded.tricks);
    assert_eq!(replayed.scores(), recorded.scores());
    assert_eq!(replayed.players[0].strategy, "simulation");
}

#[test]
fn replay_on_a_different_deal_is_rejected() {
    let recorded = play([StrategyKind::Random; 4], 9).unwrap();
    let players = PlayerPosition::LOOP.map(|seat| {
        Player::new(
            recorded.players[seat.index()].name.clone(),
            Box::new(ReplayStrategy::for_seat(&recorded, seat)),
        )
    });
    let result = HeartsGame::new(players, &Deck::shuffled_with_seed(10))
        .unwrap()
        .play_game();
    assert!(matches!(result, Err(GameError::InvalidMove { .. })));
}
