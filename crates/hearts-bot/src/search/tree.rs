use super::cache::{MoveCache, MoveCacheKey};
use super::config::SearchConfig;
use super::grouping::group_equivalent_moves;
use super::rollout::rollout;
use super::simulation::{MoveEstimate, best_estimate};
use hearts_core::belief::Determinizer;
use hearts_core::model::card::Card;
use hearts_core::strategy::{Strategy, StrategyGameState};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{Level, event};

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node {
    card: Option<Card>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Card>,
    visits: u32,
    failures: u32,
    total: f64,
}

impl Node {
    fn new(card: Option<Card>, parent: Option<usize>, untried: Vec<Card>) -> Self {
        Self {
            card,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            failures: 0,
            total: 0.0,
        }
    }

    fn average(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / self.visits as f64
        }
    }

    fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    fn is_terminal(&self) -> bool {
        self.untried.is_empty() && self.children.is_empty()
    }
}

/// Search tree stored as an arena; nodes refer to each other by index.
#[derive(Debug, Clone)]
struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    fn new(moves: Vec<Card>) -> Self {
        Self {
            nodes: vec![Node::new(None, None, moves)],
        }
    }

    fn expand<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Option<usize> {
        let node = &mut self.nodes[index];
        if node.untried.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..node.untried.len());
        let card = node.untried.remove(pick);
        let child = self.nodes.len();
        self.nodes.push(Node::new(Some(card), Some(index), Vec::new()));
        self.nodes[index].children.push(child);
        Some(child)
    }

    /// Child maximising `-avg + c * sqrt(ln(parent visits) / visits)`.
    /// Unvisited children score infinity.
    fn select_child(&self, index: usize, exploration: f64) -> Option<usize> {
        let parent = &self.nodes[index];
        let log_visits = if parent.visits > 0 {
            (parent.visits as f64).ln()
        } else {
            0.0
        };
        let mut best: Option<(usize, f64)> = None;
        for &child in &parent.children {
            let node = &self.nodes[child];
            let score = if node.visits == 0 {
                f64::INFINITY
            } else {
                -node.average() + exploration * (log_visits / node.visits as f64).sqrt()
            };
            match best {
                Some((_, current)) if score <= current => {}
                _ => best = Some((child, score)),
            }
        }
        best.map(|(child, _)| child)
    }

    fn backpropagate(&mut self, mut index: usize, value: f64) {
        loop {
            let node = &mut self.nodes[index];
            node.visits += 1;
            node.total += value;
            match node.parent {
                Some(parent) => index = parent,
                None => break,
            }
        }
    }

    /// Backs up a neutral value for a rollout that produced no result.
    fn backpropagate_failure(&mut self, index: usize) {
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            let node = &mut self.nodes[current];
            node.failures += 1;
            cursor = node.parent;
        }
        self.backpropagate(index, 0.0);
    }

    fn root_estimates(&self) -> Vec<MoveEstimate> {
        self.nodes[ROOT]
            .children
            .iter()
            .filter_map(|&child| {
                let node = &self.nodes[child];
                node.card.map(|card| MoveEstimate {
                    card,
                    samples: node.visits as usize,
                    failures: node.failures as usize,
                    average: node.average(),
                })
            })
            .collect()
    }
}

/// UCT search over the deciding seat's candidate cards.
#[derive(Debug)]
pub struct TreeSearchStrategy {
    config: SearchConfig,
    rng: SmallRng,
    cache: MoveCache,
    last_estimates: Vec<MoveEstimate>,
}

impl TreeSearchStrategy {
    pub fn new(config: SearchConfig, seed: u64) -> Self {
        let cache = MoveCache::new(config.cache_capacity);
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            cache,
            last_estimates: Vec::new(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn last_estimates(&self) -> &[MoveEstimate] {
        &self.last_estimates
    }

    /// Iterations for a decision; late tricks get a larger budget.
    pub fn iterations(&self, cards_left: usize) -> usize {
        let nominal = self.config.num_simulations;
        if cards_left <= 3 {
            (nominal * 3).max(10_000)
        } else if cards_left <= 7 {
            (nominal * 2).max(7_000)
        } else {
            nominal
        }
    }

    pub fn search(&mut self, state: &StrategyGameState<'_>, iterations: usize) -> Vec<MoveEstimate> {
        let mut tree = SearchTree::new(group_equivalent_moves(state.valid_moves));
        let determinizer = Determinizer::new(state);
        let deadline = self.config.time_cap().map(|cap| Instant::now() + cap);

        for _ in 0..iterations {
            if deadline.is_some_and(|limit| Instant::now() >= limit) {
                break;
            }

            let mut node = ROOT;
            while !tree.nodes[node].is_terminal() && tree.nodes[node].is_fully_expanded() {
                match tree.select_child(node, self.config.exploration) {
                    Some(child) => node = child,
                    None => break,
                }
            }
            if !tree.nodes[node].is_terminal()
                && let Some(child) = tree.expand(node, &mut self.rng)
            {
                node = child;
            }

            let Some(card) = tree.nodes[node].card else {
                continue;
            };
            match &determinizer {
                Ok(determinizer) => match rollout(determinizer, card, &mut self.rng) {
                    Ok(added) => tree.backpropagate(node, f64::from(added)),
                    Err(err) => {
                        event!(target: "hearts_bot::tree", Level::DEBUG, %card, error = %err, "rollout failed");
                        tree.backpropagate_failure(node);
                    }
                },
                Err(_) => tree.backpropagate_failure(node),
            }
        }

        let failures = tree.nodes[ROOT].failures;
        if failures > 0 {
            event!(target: "hearts_bot::tree", Level::DEBUG, failures, "search finished with failed rollouts");
        }
        tree.root_estimates()
    }
}

impl Strategy for TreeSearchStrategy {
    fn name(&self) -> &str {
        "tree_search"
    }

    fn choose_card(&mut self, state: &StrategyGameState<'_>) -> Card {
        if state.valid_moves.len() == 1 {
            return state.valid_moves[0];
        }

        let key = MoveCacheKey::from_state(state);
        if let Some(card) = self.cache.get(&key)
            && state.valid_moves.contains(&card)
        {
            return card;
        }

        let iterations = self.iterations(state.player_hand.len());
        let estimates = self.search(state, iterations);
        let choice = best_estimate(&estimates)
            .map(|estimate| estimate.card)
            .unwrap_or(state.valid_moves[0]);

        event!(
            target: "hearts_bot::tree",
            Level::DEBUG,
            seat = %state.player_index,
            iterations,
            candidates = estimates.len(),
            chosen = %choice,
        );

        self.cache.insert(key, choice);
        self.last_estimates = estimates;
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchTree, TreeSearchStrategy};
    use crate::search::config::SearchConfig;
    use hearts_core::model::card::{Card, QUEEN_OF_SPADES};
    use hearts_core::model::deck::Deck;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::round::RoundState;
    use hearts_core::model::suit::Suit;
    use hearts_core::strategy::{Strategy, StrategyGameState};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config() -> SearchConfig {
        SearchConfig {
            num_simulations: 80,
            ..SearchConfig::default()
        }
    }

    fn view<'a>(round: &'a RoundState, moves: &'a [Card]) -> StrategyGameState<'a> {
        let seat = round.current_player();
        StrategyGameState {
            game_state: round.state(),
            player_hand: round.hand(seat),
            player_index: seat,
            player_score: round.score(seat),
            valid_moves: moves,
        }
    }

    #[test]
    fn expansion_consumes_untried_moves() {
        let moves = vec![QUEEN_OF_SPADES, Card::new(Rank::Two, Suit::Hearts)];
        let mut tree = SearchTree::new(moves);
        let mut rng = StdRng::seed_from_u64(3);
        let a = tree.expand(0, &mut rng).unwrap();
        let b = tree.expand(0, &mut rng).unwrap();
        assert!(tree.expand(0, &mut rng).is_none());
        assert!(tree.nodes[0].is_fully_expanded());
        assert!(tree.nodes[a].is_terminal());
        assert_ne!(tree.nodes[a].card, tree.nodes[b].card);
    }

    #[test]
    fn unvisited_children_are_selected_first() {
        let mut tree = SearchTree::new(vec![QUEEN_OF_SPADES, Card::new(Rank::Two, Suit::Hearts)]);
        let mut rng = StdRng::seed_from_u64(1);
        let a = tree.expand(0, &mut rng).unwrap();
        let b = tree.expand(0, &mut rng).unwrap();
        tree.backpropagate(a, 0.0);
        assert_eq!(tree.select_child(0, 1.4), Some(b));
    }

    #[test]
    fn selection_prefers_lower_penalties() {
        let mut tree = SearchTree::new(vec![QUEEN_OF_SPADES, Card::new(Rank::Two, Suit::Hearts)]);
        let mut rng = StdRng::seed_from_u64(1);
        let a = tree.expand(0, &mut rng).unwrap();
        let b = tree.expand(0, &mut rng).unwrap();
        for _ in 0..10 {
            tree.backpropagate(a, 13.0);
            tree.backpropagate(b, 1.0);
        }
        assert_eq!(tree.select_child(0, 1.4), Some(b));
        assert_eq!(tree.nodes[0].visits, 20);
        assert!((tree.nodes[a].average() - 13.0).abs() < 1e-9);
    }

    #[test]
    fn failed_rollouts_are_counted_per_move() {
        let mut tree = SearchTree::new(vec![QUEEN_OF_SPADES, Card::new(Rank::Two, Suit::Hearts)]);
        let mut rng = StdRng::seed_from_u64(5);
        let a = tree.expand(0, &mut rng).unwrap();
        let b = tree.expand(0, &mut rng).unwrap();
        tree.backpropagate(a, 4.0);
        tree.backpropagate_failure(a);
        tree.backpropagate(b, 2.0);

        assert_eq!(tree.nodes[0].failures, 1);
        let estimates = tree.root_estimates();
        let of = |index: usize| {
            estimates
                .iter()
                .find(|e| Some(e.card) == tree.nodes[index].card)
                .unwrap()
        };
        assert_eq!((of(a).samples, of(a).failures), (2, 1));
        assert!((of(a).average - 2.0).abs() < 1e-9);
        assert_eq!((of(b).samples, of(b).failures), (1, 0));
    }

    #[test]
    fn budget_scales_with_game_stage() {
        let strategy = TreeSearchStrategy::new(SearchConfig::default(), 1);
        assert_eq!(strategy.iterations(13), 5000);
        assert_eq!(strategy.iterations(6), 10_000);
        assert_eq!(strategy.iterations(2), 15_000);
        let small = TreeSearchStrategy::new(config(), 1);
        assert_eq!(small.iterations(6), 7_000);
        assert_eq!(small.iterations(3), 10_000);
    }

    #[test]
    fn search_visits_every_candidate_and_picks_a_legal_card() {
        let mut round = RoundState::deal(&Deck::shuffled_with_seed(61)).unwrap();
        for _ in 0..5 {
            let moves = round.valid_moves(round.current_player());
            round.play_card(moves[0]).unwrap();
        }
        let moves = round.valid_moves(round.current_player());
        let mut strategy = TreeSearchStrategy::new(config(), 13);
        let card = strategy.choose_card(&view(&round, &moves));
        assert!(moves.contains(&card));
        if moves.len() > 1 {
            let total: usize = strategy.last_estimates().iter().map(|e| e.samples).sum();
            assert_eq!(total, 80);
            assert!(strategy.last_estimates().iter().all(|e| e.samples > 0));
        }
    }
}
