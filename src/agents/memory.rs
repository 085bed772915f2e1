use crate::cards::Card;
use crate::hand::CardSet;
use std::collections::HashSet;

/// Draw-then-discard pairs already played this round, keyed by the canonical
/// card-set encoding of the two cards.
#[derive(Debug, Clone, Default)]
pub struct DrawDiscardMemory {
    pairs: HashSet<u64>,
}

impl DrawDiscardMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(drawn: Card, discarded: Card) -> u64 {
        CardSet::new().with(drawn).with(discarded).bits()
    }

    pub fn contains(&self, drawn: Card, discarded: Card) -> bool {
        self.pairs.contains(&Self::key(drawn, discarded))
    }

    /// Returns false when the pair was already remembered.
    pub fn record(&mut self, drawn: Card, discarded: Card) -> bool {
        self.pairs.insert(Self::key(drawn, discarded))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_remembered_until_cleared() {
        let k: Card = "Ks".parse().unwrap();
        let q: Card = "Qh".parse().unwrap();
        let mut memory = DrawDiscardMemory::new();
        assert!(!memory.contains(k, q));
        assert!(memory.record(k, q));
        assert!(!memory.record(k, q));
        assert!(memory.contains(k, q));
        assert_eq!(memory.len(), 1);
        memory.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn drawing_and_discarding_the_same_card_is_its_own_pair() {
        let k: Card = "Ks".parse().unwrap();
        let q: Card = "Qh".parse().unwrap();
        let mut memory = DrawDiscardMemory::new();
        memory.record(k, k);
        assert!(memory.contains(k, k));
        assert!(!memory.contains(k, q));
    }
}
