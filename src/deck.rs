use crate::cards::{Card, DECK_SIZE};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A standard 52-card deck, top of the deck at the end of the vector.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use gin_rummy_agent::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        cards.extend(Card::all());
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::CardSet;

    #[test]
    fn standard_deck_has_52_distinct_cards() {
        let d = Deck::standard();
        assert_eq!(d.len(), 52);
        assert_eq!(CardSet::of(&d.cards), CardSet::full());
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::standard();
        let mut d2 = Deck::standard();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
    }

    #[test]
    fn dealing_two_gin_hands_leaves_32_cards() {
        let mut d = Deck::standard();
        d.shuffle_seeded(7);
        let first = d.draw_n(10);
        let second = d.draw_n(10);
        assert!(CardSet::of(&first).is_disjoint(CardSet::of(&second)));
        assert_eq!(d.len(), 32);
    }
}
