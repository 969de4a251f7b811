use hearts_core::model::card::{Card, QUEEN_OF_SPADES};
use hearts_core::model::suit::Suit;

/// Collapses runs of consecutive ranks within a suit to their highest card.
///
/// Suits keep the order in which they first appear in `moves`. The queen of
/// spades splits any run it sits in and stays a candidate of its own. When
/// nothing collapses the input is returned unchanged.
pub fn group_equivalent_moves(moves: &[Card]) -> Vec<Card> {
    let mut suits: Vec<Suit> = Vec::with_capacity(4);
    for card in moves {
        if !suits.contains(&card.suit) {
            suits.push(card.suit);
        }
    }

    let mut grouped = Vec::with_capacity(moves.len());
    for suit in suits {
        let mut in_suit: Vec<Card> = moves.iter().copied().filter(|c| c.suit == suit).collect();
        in_suit.sort_by_key(|card| card.rank);
        let mut run_top: Option<Card> = None;
        for card in in_suit {
            match run_top {
                Some(top)
                    if card.rank.value() == top.rank.value() + 1
                        && top != QUEEN_OF_SPADES
                        && card != QUEEN_OF_SPADES =>
                {
                    run_top = Some(card)
                }
                Some(top) => {
                    grouped.push(top);
                    run_top = Some(card);
                }
                None => run_top = Some(card),
            }
        }
        if let Some(top) = run_top {
            grouped.push(top);
        }
    }

    if grouped.len() >= moves.len() {
        return moves.to_vec();
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::group_equivalent_moves;
    use hearts_core::model::card::{Card, QUEEN_OF_SPADES};
    use hearts_core::model::rank::Rank;
    use hearts_core::model::suit::Suit;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn consecutive_runs_keep_their_top() {
        let moves = [
            c(Rank::Two, Suit::Clubs),
            c(Rank::Three, Suit::Clubs),
            c(Rank::Four, Suit::Clubs),
            c(Rank::Nine, Suit::Clubs),
            c(Rank::Ten, Suit::Diamonds),
        ];
        assert_eq!(
            group_equivalent_moves(&moves),
            vec![
                c(Rank::Four, Suit::Clubs),
                c(Rank::Nine, Suit::Clubs),
                c(Rank::Ten, Suit::Diamonds)
            ]
        );
    }

    #[test]
    fn queen_of_spades_splits_spade_runs() {
        let moves = [
            c(Rank::Jack, Suit::Spades),
            QUEEN_OF_SPADES,
            c(Rank::King, Suit::Spades),
        ];
        assert_eq!(group_equivalent_moves(&moves), moves.to_vec());
    }

    #[test]
    fn card_below_the_queen_keeps_its_own_run() {
        let moves = [
            c(Rank::Nine, Suit::Spades),
            c(Rank::Ten, Suit::Spades),
            c(Rank::Jack, Suit::Spades),
            QUEEN_OF_SPADES,
        ];
        assert_eq!(
            group_equivalent_moves(&moves),
            vec![c(Rank::Jack, Suit::Spades), QUEEN_OF_SPADES]
        );
        let pair = [c(Rank::Jack, Suit::Spades), QUEEN_OF_SPADES];
        assert_eq!(group_equivalent_moves(&pair), pair.to_vec());
    }

    #[test]
    fn unreduced_input_is_returned_as_is() {
        let moves = [
            c(Rank::Nine, Suit::Hearts),
            c(Rank::Two, Suit::Hearts),
            c(Rank::Six, Suit::Hearts),
        ];
        assert_eq!(group_equivalent_moves(&moves), moves.to_vec());
    }
}
