//! Heuristic evaluators over candidate hands.
//!
//! Every function here is pure: it takes the oracle and immutable snapshots of the
//! cards involved and returns a fresh value. What-if evaluations copy the hand,
//! never mutate it.

pub(crate) mod estimates;
pub(crate) mod reachability;

use crate::cards::Card;
use crate::hand::{with_card, without_card, HAND_SIZE};
use crate::meld::MeldOracle;

pub use estimates::{average_deadwood_after_draw, count_cards_completing_gin};
pub use reachability::{opponent_meld_threat, single_unmeldable_cards, unreachable_even_with_two_draws};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand size: need {expected} cards, got {got}")]
    InvalidHandSize { expected: &'static str, got: usize },
    #[error("no cards left to draw from")]
    EmptyDrawPool,
}

/// Deadwood drop expected from taking `candidate` and later shedding the weakest card.
///
/// Returns 0 when `hand + candidate` holds no meld at all. Otherwise compares the
/// best deadwood reachable by removing one card from `hand` against the deadwood
/// left when one card is removed from `hand + candidate`, the latter measured
/// against the first best partition of the augmented hand. Positive means the
/// card is worth drawing.
///
/// ```
/// use gin_rummy_agent::cards::parse_cards;
/// use gin_rummy_agent::evaluator::meld_and_deadwood_drop;
/// use gin_rummy_agent::meld::StandardOracle;
///
/// let hand = parse_cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh").unwrap();
/// let nine = "9d".parse().unwrap();
/// assert!(meld_and_deadwood_drop(&StandardOracle, &hand, nine) > 0);
/// ```
pub fn meld_and_deadwood_drop<O>(oracle: &O, hand: &[Card], candidate: Card) -> i32
where
    O: MeldOracle + ?Sized,
{
    let augmented = with_card(hand, candidate);
    let partitions = oracle.best_meld_partitions(&augmented);
    let Some(melds) = partitions.first() else {
        return 0;
    };

    let current_min = hand
        .iter()
        .map(|&card| oracle.min_deadwood(&without_card(hand, card)))
        .min()
        .unwrap_or(0);
    let augmented_min = augmented
        .iter()
        .map(|&card| oracle.deadwood_points_with(melds, &without_card(&augmented, card)))
        .min()
        .unwrap_or(0);

    current_min as i32 - augmented_min as i32
}

/// Lowest deadwood left after discarding the best card from a hand of 11 or more.
pub fn best_deadwood_after_discard<O>(oracle: &O, hand: &[Card]) -> Result<u32, EvalError>
where
    O: MeldOracle + ?Sized,
{
    if hand.len() <= HAND_SIZE {
        return Err(EvalError::InvalidHandSize { expected: "11 or more", got: hand.len() });
    }
    let best = hand
        .iter()
        .map(|&card| oracle.min_deadwood(&without_card(hand, card)))
        .min()
        .unwrap_or(u32::MAX);
    Ok(best)
}

/// Best deadwood of a ten-card hand, or its raw point sum when it holds no meld.
///
/// ```
/// use gin_rummy_agent::cards::parse_cards;
/// use gin_rummy_agent::evaluator::best_deadwood;
/// use gin_rummy_agent::meld::StandardOracle;
///
/// let hand = parse_cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh").unwrap();
/// assert_eq!(best_deadwood(&StandardOracle, &hand).unwrap(), 38);
/// assert!(best_deadwood(&StandardOracle, &hand[..9]).is_err());
/// ```
pub fn best_deadwood<O>(oracle: &O, hand: &[Card]) -> Result<u32, EvalError>
where
    O: MeldOracle + ?Sized,
{
    if hand.len() != HAND_SIZE {
        return Err(EvalError::InvalidHandSize { expected: "exactly 10", got: hand.len() });
    }
    Ok(oracle.min_deadwood(hand))
}

/// Deadwood of `cards` once the hand is back to ten cards: [`best_deadwood`] for
/// exactly ten, [`best_deadwood_after_discard`] for more.
pub fn settled_deadwood<O>(oracle: &O, cards: &[Card]) -> Result<u32, EvalError>
where
    O: MeldOracle + ?Sized,
{
    if cards.len() > HAND_SIZE {
        best_deadwood_after_discard(oracle, cards)
    } else {
        best_deadwood(oracle, cards)
    }
}

/// Fail early when a hand grown by one card could not be settled.
pub(crate) fn require_settleable(drawn_len: usize) -> Result<(), EvalError> {
    if drawn_len < HAND_SIZE {
        return Err(EvalError::InvalidHandSize { expected: "at least 9", got: drawn_len - 1 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::meld::StandardOracle;

    fn cards(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    const HAND: &str = "5c 5d 5h 9s 9c 2d 3d 4d Ks Qh";

    #[test]
    fn third_nine_drops_deadwood() {
        let hand = cards(HAND);
        // as dealt: shed K or Q -> 28; with 9d: 5-5-5, 9-9-9, 2-3-4d, shed K -> 10
        assert_eq!(meld_and_deadwood_drop(&StandardOracle, &hand, "9d".parse().unwrap()), 18);
    }

    #[test]
    fn card_that_forms_no_meld_is_not_a_drop() {
        let hand = cards("Ac 3d 5h 7s 9c Jd Kh 2s 4c 6d");
        assert_eq!(meld_and_deadwood_drop(&StandardOracle, &hand, "Qs".parse().unwrap()), 0);
    }

    #[test]
    fn useless_high_card_does_not_help() {
        let hand = cards(HAND);
        // Kh only pairs with Ks; the melds stay the same so the drop is not positive
        assert!(meld_and_deadwood_drop(&StandardOracle, &hand, "Kh".parse().unwrap()) <= 0);
    }

    #[test]
    fn best_deadwood_requires_ten_cards() {
        let hand = cards(HAND);
        assert_eq!(best_deadwood(&StandardOracle, &hand), Ok(38));
        assert_eq!(
            best_deadwood(&StandardOracle, &hand[..9]),
            Err(EvalError::InvalidHandSize { expected: "exactly 10", got: 9 })
        );
    }

    #[test]
    fn best_deadwood_without_melds_is_raw_sum() {
        let hand = cards("Ac 3d 5h 7s 9c Jd Kh 2s 4c 6d");
        let raw: u32 = hand.iter().map(|c| c.points()).sum();
        assert_eq!(best_deadwood(&StandardOracle, &hand), Ok(raw));
    }

    #[test]
    fn after_discard_requires_eleven() {
        let hand = cards(HAND);
        assert!(matches!(
            best_deadwood_after_discard(&StandardOracle, &hand),
            Err(EvalError::InvalidHandSize { got: 10, .. })
        ));
        let eleven = with_card(&hand, "9d".parse().unwrap());
        assert_eq!(best_deadwood_after_discard(&StandardOracle, &eleven), Ok(10));
    }

    #[test]
    fn settled_deadwood_dispatches_on_size() {
        let hand = cards(HAND);
        assert_eq!(settled_deadwood(&StandardOracle, &hand), Ok(38));
        let eleven = with_card(&hand, "9d".parse().unwrap());
        assert_eq!(settled_deadwood(&StandardOracle, &eleven), Ok(10));
        assert!(settled_deadwood(&StandardOracle, &hand[..5]).is_err());
    }
}
