//! Melds and the meld/deadwood oracle.
//!
//! The agent's evaluators only need two answers from the rules of the game: which
//! partitions of a hand into melds leave the least deadwood, and how many points a
//! set of cards is worth once some melds are laid aside. [`MeldOracle`] is that
//! contract; [`StandardOracle`] is an exhaustive implementation of it suitable for
//! hands of up to a dozen cards.

use crate::cards::{Card, Rank, Suit};
use crate::hand::CardSet;
use std::fmt;

/// Maximum deadwood points that still allow a knock.
pub const MAX_DEADWOOD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MeldKind {
    /// Three or more consecutive ranks of one suit, Ace low.
    Run,
    /// Three or four cards of one rank.
    Set,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MeldError {
    #[error("not a meld: {0}")]
    NotAMeld(String),
}

/// A run or set of cards removed from deadwood scoring.
///
/// ```
/// use gin_rummy_agent::cards::parse_cards;
/// use gin_rummy_agent::meld::{Meld, MeldKind};
///
/// let run = Meld::try_new(&parse_cards("2d 4d 3d").unwrap()).unwrap();
/// assert_eq!(run.kind(), MeldKind::Run);
/// assert_eq!(run.to_string(), "[2d 3d 4d]");
/// assert!(Meld::try_new(&parse_cards("2d 3d 5d").unwrap()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Meld {
    cards: CardSet,
    kind: MeldKind,
}

impl Meld {
    /// Validate `cards` as a run or a set.
    pub fn try_new(cards: &[Card]) -> Result<Self, MeldError> {
        let set = CardSet::of(cards);
        let invalid = || MeldError::NotAMeld(CardSet::of(cards).to_string());
        if set.len() != cards.len() || set.len() < 3 {
            return Err(invalid());
        }
        let first = cards[0];
        if set.len() <= 4 && cards.iter().all(|c| c.rank() == first.rank()) {
            return Ok(Self { cards: set, kind: MeldKind::Set });
        }
        if cards.iter().all(|c| c.suit() == first.suit()) {
            // ids are contiguous within a suit exactly when the ranks are consecutive
            let bits = set.bits() >> set.bits().trailing_zeros();
            if bits & (bits + 1) == 0 {
                return Ok(Self { cards: set, kind: MeldKind::Run });
            }
        }
        Err(invalid())
    }

    fn run(suit: Suit, low: u8, high: u8) -> Self {
        let cards = (low..=high)
            .filter_map(Rank::from_index)
            .map(|rank| Card::new(rank, suit))
            .collect();
        Self { cards, kind: MeldKind::Run }
    }

    fn set(cards: CardSet) -> Self {
        Self { cards, kind: MeldKind::Set }
    }

    pub const fn kind(&self) -> MeldKind {
        self.kind
    }

    pub const fn cards(&self) -> CardSet {
        self.cards
    }

    pub const fn len(&self) -> usize {
        self.cards.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub const fn contains(&self, card: Card) -> bool {
        self.cards.contains(card)
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.to_vec()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.cards)
    }
}

/// Union of every card covered by `melds`.
pub fn covered(melds: &[Meld]) -> CardSet {
    melds.iter().fold(CardSet::new(), |acc, m| acc.union(m.cards()))
}

/// Rules oracle for melds and deadwood.
pub trait MeldOracle {
    /// All disjoint meld partitions of `cards` that leave the minimum deadwood,
    /// in a deterministic order. Empty when `cards` contains no meld at all.
    fn best_meld_partitions(&self, cards: &[Card]) -> Vec<Vec<Meld>>;

    /// Raw point sum of `cards` with no melds laid aside.
    fn deadwood_points(&self, cards: &[Card]) -> u32 {
        cards.iter().map(|c| c.points()).sum()
    }

    /// Point sum of the cards in `cards` not covered by any of `melds`.
    fn deadwood_points_with(&self, melds: &[Meld], cards: &[Card]) -> u32 {
        let covered = covered(melds);
        cards.iter().filter(|&&c| !covered.contains(c)).map(|c| c.points()).sum()
    }

    /// Deadwood of `cards` under their first best partition, or the raw sum when
    /// no meld exists.
    fn min_deadwood(&self, cards: &[Card]) -> u32 {
        match self.best_meld_partitions(cards).first() {
            Some(melds) => self.deadwood_points_with(melds, cards),
            None => self.deadwood_points(cards),
        }
    }
}

/// Exhaustive oracle: enumerates every candidate meld, then every combination of
/// pairwise-disjoint candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOracle;

impl StandardOracle {
    pub const fn new() -> Self {
        Self
    }

    /// Every run and set contained in `cards`: runs first (by suit, then low rank,
    /// then length), then sets (by rank, the full four-card set before its
    /// three-card subsets).
    pub fn all_melds(&self, cards: CardSet) -> Vec<Meld> {
        let mut melds = Vec::new();
        for suit in Suit::ALL {
            for low in 0..13u8 {
                let mut high = low;
                while high < 13 && Self::has(cards, suit, high) {
                    if high >= low + 2 {
                        melds.push(Meld::run(suit, low, high));
                    }
                    high += 1;
                }
            }
        }
        for rank in Rank::ALL {
            let same: CardSet = Suit::ALL
                .iter()
                .map(|&s| Card::new(rank, s))
                .filter(|&c| cards.contains(c))
                .collect();
            match same.len() {
                3 => melds.push(Meld::set(same)),
                4 => {
                    melds.push(Meld::set(same));
                    for left_out in same {
                        melds.push(Meld::set(same.without(left_out)));
                    }
                }
                _ => {}
            }
        }
        melds
    }

    fn has(cards: CardSet, suit: Suit, rank_index: u8) -> bool {
        Rank::from_index(rank_index).is_some_and(|rank| cards.contains(Card::new(rank, suit)))
    }
}

struct PartitionSearch<'a> {
    melds: &'a [Meld],
    total: u32,
    best_deadwood: u32,
    best: Vec<Vec<usize>>,
    chosen: Vec<usize>,
}

impl PartitionSearch<'_> {
    fn walk(&mut self, start: usize, used: CardSet, covered_points: u32) {
        if !self.chosen.is_empty() {
            let deadwood = self.total - covered_points;
            if deadwood < self.best_deadwood {
                self.best_deadwood = deadwood;
                self.best.clear();
            }
            if deadwood == self.best_deadwood {
                self.best.push(self.chosen.clone());
            }
        }
        for i in start..self.melds.len() {
            let meld = self.melds[i];
            if !meld.cards().is_disjoint(used) {
                continue;
            }
            let points: u32 = meld.cards().iter().map(|c| c.points()).sum();
            self.chosen.push(i);
            self.walk(i + 1, used.union(meld.cards()), covered_points + points);
            self.chosen.pop();
        }
    }
}

impl MeldOracle for StandardOracle {
    fn best_meld_partitions(&self, cards: &[Card]) -> Vec<Vec<Meld>> {
        let melds = self.all_melds(CardSet::of(cards));
        if melds.is_empty() {
            return Vec::new();
        }
        let mut search = PartitionSearch {
            melds: &melds,
            total: self.deadwood_points(cards),
            best_deadwood: u32::MAX,
            best: Vec::new(),
            chosen: Vec::new(),
        };
        search.walk(0, CardSet::new(), 0);
        search.best.into_iter().map(|idx| idx.into_iter().map(|i| melds[i]).collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn cards(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    #[test]
    fn meld_validation() {
        assert_eq!(Meld::try_new(&cards("9s 9c 9d")).unwrap().kind(), MeldKind::Set);
        assert_eq!(Meld::try_new(&cards("Jh Qh Kh Th")).unwrap().kind(), MeldKind::Run);
        assert!(Meld::try_new(&cards("9s 9c")).is_err());
        assert!(Meld::try_new(&cards("Qh Kh Ah")).is_err(), "no wrap-around");
        assert!(Meld::try_new(&cards("2c 3c 4d")).is_err());
        assert!(Meld::try_new(&cards("2c 2c 2d")).is_err());
    }

    #[test]
    fn all_melds_finds_runs_and_set_subsets() {
        let oracle = StandardOracle::new();
        let melds = oracle.all_melds(CardSet::of(&cards("Ac 2c 3c 4c 7h 7d 7s 7c")));
        let runs = melds.iter().filter(|m| m.kind() == MeldKind::Run).count();
        let sets = melds.iter().filter(|m| m.kind() == MeldKind::Set).count();
        // A-3, A-4, 2-4
        assert_eq!(runs, 3);
        // the four sevens plus four three-card subsets
        assert_eq!(sets, 5);
    }

    #[test]
    fn no_melds_yields_no_partitions() {
        let oracle = StandardOracle::new();
        let hand = cards("Ac 3d 5h 7s 9c Jd Kh 2s 4c 6d");
        assert!(oracle.best_meld_partitions(&hand).is_empty());
        assert_eq!(oracle.min_deadwood(&hand), oracle.deadwood_points(&hand));
    }

    #[test]
    fn best_partition_prefers_lower_deadwood() {
        let oracle = StandardOracle::new();
        let hand = cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh");
        let best = oracle.best_meld_partitions(&hand);
        assert_eq!(best.len(), 1);
        // 5-5-5 and 2-3-4d beat the 2-5d run
        assert_eq!(oracle.deadwood_points_with(&best[0], &hand), 9 + 9 + 10 + 10);
    }

    #[test]
    fn ties_are_all_reported() {
        let oracle = StandardOracle::new();
        // Qc sits in either T-J-Qc or the queens; both leave 20 points
        let hand = cards("Tc Jc Qc Qd Qh");
        let best = oracle.best_meld_partitions(&hand);
        assert_eq!(best.len(), 2);
        for partition in &best {
            assert_eq!(oracle.deadwood_points_with(partition, &hand), 20);
        }
        assert_eq!(best[0][0].kind(), MeldKind::Run);
    }

    #[test]
    fn cheaper_meld_wins_when_cards_overlap() {
        let oracle = StandardOracle::new();
        // 5-6-7c leaves 7d 7h (14); the sevens leave 5c 6c (11)
        let hand = cards("5c 6c 7c 7d 7h");
        let best = oracle.best_meld_partitions(&hand);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0][0].kind(), MeldKind::Set);
        assert_eq!(oracle.min_deadwood(&hand), 11);
    }

    #[test]
    fn gin_hand_has_zero_deadwood() {
        let oracle = StandardOracle::new();
        let hand = cards("Ac 2c 3c 4c 7h 7d 7s Th Jh Qh");
        assert_eq!(oracle.min_deadwood(&hand), 0);
    }

    #[test]
    fn deadwood_with_melds_ignores_covered_cards() {
        let oracle = StandardOracle::new();
        let hand = cards("9s 9c 9d Ks");
        let meld = Meld::try_new(&cards("9s 9c 9d")).unwrap();
        assert_eq!(oracle.deadwood_points_with(&[meld], &hand), 10);
        assert_eq!(oracle.deadwood_points(&hand), 37);
    }
}
