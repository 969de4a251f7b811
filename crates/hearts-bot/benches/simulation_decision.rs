use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hearts_bot::search::{SearchConfig, SimulationStrategy, TreeSearchStrategy};
use hearts_core::model::deck::Deck;
use hearts_core::model::round::RoundState;
use hearts_core::strategy::{Strategy, StrategyGameState};

/// Plays the first legal card `turns` times from a seeded deal.
fn position(seed: u64, turns: usize) -> RoundState {
    let mut round = match RoundState::deal(&Deck::shuffled_with_seed(seed)) {
        Ok(round) => round,
        Err(err) => panic!("deal failed: {err}"),
    };
    for _ in 0..turns {
        let moves = round.valid_moves(round.current_player());
        if round.play_card(moves[0]).is_err() {
            break;
        }
    }
    round
}

fn decide<S: Strategy>(strategy: &mut S, round: &RoundState) {
    let seat = round.current_player();
    let moves = round.valid_moves(seat);
    let view = StrategyGameState {
        game_state: round.state(),
        player_hand: round.hand(seat),
        player_index: seat,
        player_score: round.score(seat),
        valid_moves: &moves,
    };
    black_box(strategy.choose_card(&view));
}

fn simulation_decision_bench(c: &mut Criterion) {
    let config = SearchConfig {
        num_simulations: 400,
        min_simulations_per_move: 20,
        cache_capacity: 0,
        ..SearchConfig::default()
    };
    let mut group = c.benchmark_group("simulation_decision");
    group.sample_size(10);
    for (seed, turns) in [(1040u64, 5usize), (1082, 13), (1145, 22)] {
        let round = position(seed, turns);
        group.bench_function(format!("monte_carlo_{seed}_{turns}"), |b| {
            let mut strategy = SimulationStrategy::new(config.clone(), seed);
            b.iter(|| decide(&mut strategy, &round))
        });
        group.bench_function(format!("serial_{seed}_{turns}"), |b| {
            let mut strategy = SimulationStrategy::new(
                SearchConfig {
                    parallel: false,
                    ..config.clone()
                },
                seed,
            );
            b.iter(|| decide(&mut strategy, &round))
        });
    }
    let opening = position(1040, 5);
    group.bench_function("tree_search_1040_5", |b| {
        let mut strategy = TreeSearchStrategy::new(config.clone(), 1040);
        b.iter(|| decide(&mut strategy, &opening))
    });
    group.finish();
}

criterion_group!(benches, simulation_decision_bench);
criterion_main!(benches);
