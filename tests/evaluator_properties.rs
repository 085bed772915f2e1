use gin_rummy_agent::agents::{AgentProfile, GinRummyPlayer, HeuristicAgent};
use gin_rummy_agent::cards::Card;
use gin_rummy_agent::evaluator::{
    best_deadwood, best_deadwood_after_discard, count_cards_completing_gin, single_unmeldable_cards,
    unreachable_even_with_two_draws,
};
use gin_rummy_agent::hand::{with_card, without_card, CardSet};
use gin_rummy_agent::meld::{covered, MeldOracle, StandardOracle};
use proptest::prelude::*;

fn ids_to_cards(ids: Vec<u8>) -> Vec<Card> {
    ids.into_iter().filter_map(Card::from_id).collect()
}

/// Ten distinct cards plus one more distinct card to draw.
fn hand_and_draw() -> impl Strategy<Value = (Vec<Card>, Card)> {
    proptest::sample::subsequence((0u8..52).collect::<Vec<_>>(), 11)
        .prop_shuffle()
        .prop_map(|ids| {
            let mut cards = ids_to_cards(ids);
            let extra = cards.pop().unwrap();
            (cards, extra)
        })
}

fn seen_cards() -> impl Strategy<Value = CardSet> {
    proptest::collection::vec(0u8..52, 0..20).prop_map(|ids| ids_to_cards(ids).into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn best_deadwood_never_exceeds_raw_points((hand, _) in hand_and_draw()) {
        let oracle = StandardOracle;
        let best = best_deadwood(&oracle, &hand).unwrap();
        prop_assert!(best <= oracle.deadwood_points(&hand));

        for melds in oracle.best_meld_partitions(&hand) {
            let mut seen = CardSet::new();
            for meld in &melds {
                prop_assert!(seen.is_disjoint(meld.cards()));
                seen = seen.union(meld.cards());
            }
            prop_assert!(covered(&melds).is_subset(CardSet::of(&hand)));
            prop_assert_eq!(oracle.deadwood_points_with(&melds, &hand), best);
        }
    }

    #[test]
    fn an_extra_card_never_hurts((hand, extra) in hand_and_draw()) {
        let oracle = StandardOracle;
        let before = best_deadwood(&oracle, &hand).unwrap();
        let after = best_deadwood_after_discard(&oracle, &with_card(&hand, extra)).unwrap();
        prop_assert!(after <= before);
    }

    #[test]
    fn gin_outs_fit_the_unseen_pool((hand, _) in hand_and_draw(), seen in seen_cards()) {
        let seen = seen.union(CardSet::of(&hand));
        let outs = count_cards_completing_gin(&StandardOracle, &hand, seen).unwrap();
        prop_assert!(outs <= 52 - seen.len());
    }

    #[test]
    fn dead_cards_are_single_cards((hand, _) in hand_and_draw(), seen in seen_cards()) {
        let singles = single_unmeldable_cards(&hand);
        prop_assert!(singles.is_subset(CardSet::of(&hand)));
        let dead = unreachable_even_with_two_draws(&hand, seen);
        prop_assert!(dead.is_subset(singles));
    }

    #[test]
    fn agent_discard_is_minimal((hand, drawn) in hand_and_draw(), seed in any::<u64>()) {
        let oracle = StandardOracle;
        let mut agent = HeuristicAgent::new(oracle, AgentProfile::default().with_seed(seed));
        agent.start_round(0, 0, &hand, 32).unwrap();
        agent.observe_draw(0, Some(drawn)).unwrap();

        let grown = with_card(&hand, drawn);
        let choice = agent.discard().unwrap();
        prop_assert!(grown.contains(&choice));
        let left = best_deadwood(&oracle, &without_card(&grown, choice)).unwrap();
        prop_assert_eq!(left, best_deadwood_after_discard(&oracle, &grown).unwrap());
    }
}
