use crate::cards::{parse_cards, Card, DECK_SIZE};
use std::fmt;
use std::str::FromStr;

/// Cards held between turns.
pub const HAND_SIZE: usize = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate card in hand: {0}")]
    DuplicateCard(Card),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A set of cards encoded as a 52-bit mask, bit `id` set when the card is present.
///
/// The raw bits are the canonical encoding used for set equality and hashing, so
/// two sets holding the same cards always compare equal regardless of insertion order.
///
/// ```
/// use gin_rummy_agent::cards::{Card, Rank, Suit};
/// use gin_rummy_agent::hand::CardSet;
///
/// let a = Card::new(Rank::Ace, Suit::Clubs);
/// let k = Card::new(Rank::King, Suit::Spades);
/// let set: CardSet = [k, a].into_iter().collect();
/// assert_eq!(set, CardSet::of(&[a, k]));
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(a));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u64);

impl CardSet {
    const FULL_MASK: u64 = (1u64 << DECK_SIZE) - 1;

    pub const fn new() -> Self {
        Self(0)
    }

    /// The full 52-card universe.
    pub const fn full() -> Self {
        Self(Self::FULL_MASK)
    }

    /// Build a set from raw bits; bits above the deck range are dropped.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & Self::FULL_MASK)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn of(cards: &[Card]) -> Self {
        cards.iter().copied().collect()
    }

    /// Insert a card; returns false when it was already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let bit = Self::bit(card);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    /// Remove a card; returns false when it was absent.
    pub fn remove(&mut self, card: Card) -> bool {
        let bit = Self::bit(card);
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub const fn contains(self, card: Card) -> bool {
        self.0 & Self::bit(card) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub const fn with(self, card: Card) -> Self {
        Self(self.0 | Self::bit(card))
    }

    pub const fn without(self, card: Card) -> Self {
        Self(self.0 & !Self::bit(card))
    }

    pub const fn union(self, other: CardSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: CardSet) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn difference(self, other: CardSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_disjoint(self, other: CardSet) -> bool {
        self.0 & other.0 == 0
    }

    pub const fn is_subset(self, other: CardSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Cards in ascending id order.
    pub fn iter(self) -> CardSetIter {
        CardSetIter(self.0)
    }

    pub fn to_vec(self) -> Vec<Card> {
        self.iter().collect()
    }

    const fn bit(card: Card) -> u64 {
        1u64 << card.id()
    }
}

/// Iterator over a [`CardSet`], lowest id first.
#[derive(Debug, Clone)]
pub struct CardSetIter(u64);

impl Iterator for CardSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.0 == 0 {
            return None;
        }
        let id = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Card::from_id(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for CardSetIter {}

impl IntoIterator for CardSet {
    type Item = Card;
    type IntoIter = CardSetIter;
    fn into_iter(self) -> CardSetIter {
        self.iter()
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::new();
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl Extend<Card> for CardSet {
    fn extend<I: IntoIterator<Item = Card>>(&mut self, iter: I) {
        for card in iter {
            self.insert(card);
        }
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.to_string())).finish()
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cards(f, self.iter())
    }
}

/// The agent's held cards, kept in arrival order.
///
/// Ten cards during normal play, eleven between a draw and the following discard.
///
/// ```
/// use gin_rummy_agent::hand::Hand;
///
/// let mut hand: Hand = "5c 5d 5h".parse().unwrap();
/// let nine = "9s".parse().unwrap();
/// hand.push(nine).unwrap();
/// assert_eq!(hand.len(), 4);
/// assert!(hand.remove(nine));
/// assert_eq!(hand.to_string(), "5c 5d 5h");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        let mut set = CardSet::new();
        for &card in &cards {
            if !set.insert(card) {
                return Err(HandError::DuplicateCard(card));
            }
        }
        Ok(Self { cards })
    }

    /// Append a card; a card already held is rejected.
    pub fn push(&mut self, card: Card) -> Result<(), HandError> {
        if self.contains(card) {
            return Err(HandError::DuplicateCard(card));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove a card, preserving the order of the rest; false when not held.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn to_set(&self) -> CardSet {
        CardSet::of(&self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl FromStr for Hand {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Hand::try_new(cards)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cards(f, self.cards.iter().copied())
    }
}

/// Copy of `cards` with `extra` appended.
pub fn with_card(cards: &[Card], extra: Card) -> Vec<Card> {
    let mut out = Vec::with_capacity(cards.len() + 1);
    out.extend_from_slice(cards);
    out.push(extra);
    out
}

/// Copy of `cards` with the first occurrence of `card` removed.
pub fn without_card(cards: &[Card], card: Card) -> Vec<Card> {
    let mut out = cards.to_vec();
    if let Some(index) = out.iter().position(|&c| c == card) {
        out.remove(index);
    }
    out
}

fn write_cards(f: &mut fmt::Formatter<'_>, cards: impl Iterator<Item = Card>) -> fmt::Result {
    for (i, card) in cards.enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{card}")?;
    }
    Ok(())
}
