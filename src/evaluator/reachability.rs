use crate::cards::{Card, Rank};
use crate::hand::CardSet;

/// Same-suit card `delta` ranks away, if that rank exists (no wrap-around).
fn neighbour(card: Card, delta: i8) -> Option<Card> {
    let index = card.rank().index() as i8 + delta;
    if index < 0 {
        return None;
    }
    Rank::from_index(index as u8).map(|rank| Card::new(rank, card.suit()))
}

fn same_rank(card: Card) -> impl Iterator<Item = Card> {
    crate::cards::Suit::ALL
        .into_iter()
        .map(move |suit| Card::new(card.rank(), suit))
        .filter(move |&c| c != card)
}

/// Cards with no same-rank partner and no same-suit card within one rank
/// elsewhere in `hand`: nothing in hand can start a meld with them.
///
/// ```
/// use gin_rummy_agent::cards::parse_cards;
/// use gin_rummy_agent::evaluator::single_unmeldable_cards;
///
/// let hand = parse_cards("5c 5d 9s Ks Qs 2h").unwrap();
/// let singles = single_unmeldable_cards(&hand);
/// assert_eq!(singles.to_vec(), parse_cards("2h 9s").unwrap());
/// ```
pub fn single_unmeldable_cards(hand: &[Card]) -> CardSet {
    let held = CardSet::of(hand);
    hand.iter()
        .copied()
        .filter(|&card| {
            let partner = same_rank(card).any(|c| held.contains(c));
            let adjacent = [-1, 1].into_iter().filter_map(|d| neighbour(card, d)).any(|c| held.contains(c));
            !partner && !adjacent
        })
        .collect()
}

/// Single cards that stay meldless even after two more draws from the unseen cards.
///
/// A single card is reachable when the cards neither seen nor held include two
/// more of its rank, or two same-suit cards that make three consecutive ranks with
/// it (one rank away plus two ranks away on the same side, or one on each side).
pub fn unreachable_even_with_two_draws(hand: &[Card], seen: CardSet) -> CardSet {
    let unseen = CardSet::full().difference(seen).difference(CardSet::of(hand));
    let open = |card: Option<Card>| card.is_some_and(|c| unseen.contains(c));

    single_unmeldable_cards(hand)
        .iter()
        .filter(|&card| {
            let set_reachable = same_rank(card).filter(|&c| unseen.contains(c)).count() >= 2;
            let run_reachable = (open(neighbour(card, 1)) && open(neighbour(card, 2)))
                || (open(neighbour(card, -1)) && open(neighbour(card, -2)))
                || (open(neighbour(card, -1)) && open(neighbour(card, 1)));
            !set_reachable && !run_reachable
        })
        .collect()
}

/// Whether the opponent could plausibly meld with `card` if it were discarded.
///
/// True when the opponent is known to hold a same-rank card, or a same-suit card
/// one rank away, and the card still needed to finish that meld is either also
/// held by the opponent or not yet accounted for in `seen`.
pub fn opponent_meld_threat(seen: CardSet, opponent_cards: CardSet, card: Card) -> bool {
    let available = |c: Card| opponent_cards.contains(c) || !seen.contains(c);

    let partners: Vec<Card> = same_rank(card).filter(|&c| opponent_cards.contains(c)).collect();
    let set_threat = match partners.len() {
        0 => false,
        1 => same_rank(card).filter(|&c| c != partners[0]).any(|c| available(c)),
        _ => true,
    };
    if set_threat {
        return true;
    }

    [1i8, -1].into_iter().any(|d| {
        let Some(near) = neighbour(card, d) else {
            return false;
        };
        if !opponent_cards.contains(near) {
            return false;
        }
        // beyond the neighbour, or on the other side of the card
        [neighbour(card, 2 * d), neighbour(card, -d)].into_iter().flatten().any(|c| available(c))
    })
}
