use super::{require_settleable, settled_deadwood, EvalError};
use crate::cards::Card;
use crate::hand::{with_card, CardSet};
use crate::meld::MeldOracle;

/// Number of cards outside `seen` (and outside the hand) whose draw leaves zero
/// deadwood once the hand is settled back to ten cards.
///
/// The result is always within `0..=52 - seen.len()`.
pub fn count_cards_completing_gin<O>(oracle: &O, hand: &[Card], seen: CardSet) -> Result<usize, EvalError>
where
    O: MeldOracle + ?Sized,
{
    require_settleable(hand.len() + 1)?;
    let pool = CardSet::full().difference(seen).difference(CardSet::of(hand));
    let mut count = 0;
    for card in pool {
        if settled_deadwood(oracle, &with_card(hand, card))? == 0 {
            count += 1;
        }
    }
    Ok(count)
}

/// Truncated mean settled deadwood over every card that might come next.
///
/// The pool is the whole deck minus the hand and the opponent's discards, with
/// cards known to be in the opponent's hand kept in: the estimate treats them as
/// still drawable.
pub fn average_deadwood_after_draw<O>(
    oracle: &O,
    hand: &[Card],
    opponent_discards: CardSet,
    opponent_cards: CardSet,
) -> Result<u32, EvalError>
where
    O: MeldOracle + ?Sized,
{
    let pool = CardSet::full()
        .difference(CardSet::of(hand))
        .difference(opponent_discards)
        .union(opponent_cards);
    if pool.is_empty() {
        return Err(EvalError::EmptyDrawPool);
    }
    require_settleable(hand.len() + 1)?;

    let mut total: u64 = 0;
    for card in pool {
        total += u64::from(settled_deadwood(oracle, &with_card(hand, card))?);
    }
    Ok((total / pool.len() as u64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::meld::StandardOracle;

    fn cards(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    #[test]
    fn one_card_from_gin() {
        let hand = cards("2c 3c 4c 7h 7d 7s Th Jh Qh 8s");
        let seen = CardSet::of(&hand);
        let outs = count_cards_completing_gin(&StandardOracle, &hand, seen).unwrap();
        // 8s is the lone deadwood; Ac, 5c, 7c, 9h and Kh each extend a meld
        // so shedding 8s leaves gin
        assert_eq!(outs, 5);
    }

    #[test]
    fn seen_cards_are_not_counted() {
        let hand = cards("2c 3c 4c 7h 7d 7s Th Jh Qh 8s");
        let mut seen = CardSet::of(&hand);
        seen.extend(cards("Ac 5c 7c"));
        assert_eq!(count_cards_completing_gin(&StandardOracle, &hand, seen), Ok(2));
    }

    #[test]
    fn gin_count_rejects_short_hands() {
        let hand = cards("2c 3c 4c");
        assert!(matches!(
            count_cards_completing_gin(&StandardOracle, &hand, CardSet::new()),
            Err(EvalError::InvalidHandSize { got: 3, .. })
        ));
    }

    #[test]
    fn average_matches_manual_mean_on_small_pool() {
        let hand = cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh");
        // discard everything except the hand and two outs
        let keep = CardSet::of(&cards("9d Kh"));
        let discards = CardSet::full().difference(CardSet::of(&hand)).difference(keep);
        // 9d settles to 10 (shed Q or K), Kh settles to 38 (shed Kh)
        let avg = average_deadwood_after_draw(&StandardOracle, &hand, discards, CardSet::new());
        assert_eq!(avg, Ok((10 + 38) / 2));
    }

    #[test]
    fn opponent_cards_return_to_the_pool() {
        let hand = cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh");
        let nine = CardSet::of(&cards("9d"));
        let discards = CardSet::full().difference(CardSet::of(&hand));
        assert_eq!(average_deadwood_after_draw(&StandardOracle, &hand, discards, nine), Ok(10));
    }

    #[test]
    fn empty_pool_is_an_error() {
        let hand = cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh");
        let discards = CardSet::full().difference(CardSet::of(&hand));
        assert_eq!(
            average_deadwood_after_draw(&StandardOracle, &hand, discards, CardSet::new()),
            Err(EvalError::EmptyDrawPool)
        );
    }
}
