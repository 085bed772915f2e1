//! Per-round bookkeeping of what the agent knows about the hidden game state.

use crate::cards::Card;
use crate::hand::CardSet;

/// Mutable record of one round as observed by a single agent.
///
/// Each agent owns its own instance; nothing here is shared between agents.
/// Operations do no validation beyond the types: callers invoke them in the order
/// the game dictates.
///
/// ```
/// use gin_rummy_agent::cards::Card;
/// use gin_rummy_agent::tracker::RoundState;
///
/// let mut state = RoundState::start(32);
/// let card: Card = "9d".parse().unwrap();
/// state.record_opponent_pickup(card);
/// state.record_opponent_discard(card);
/// assert!(state.opponent_cards().is_empty());
/// assert!(state.opponent_discards().contains(card));
/// assert!(state.seen().contains(card));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    turn: u32,
    remaining_deck: u32,
    face_up: Option<Card>,
    seen: CardSet,
    opponent_cards: CardSet,
    opponent_discards: CardSet,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state for a round whose face-down pile holds `remaining_deck` cards.
    pub fn start(remaining_deck: u32) -> Self {
        Self { remaining_deck, ..Self::default() }
    }

    /// Clear the turn counter, the face-up card and every tracked collection.
    /// The deck count is left for the caller to re-initialise.
    pub fn reset(&mut self) {
        self.turn = 0;
        self.face_up = None;
        self.seen.clear();
        self.opponent_cards.clear();
        self.opponent_discards.clear();
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    pub fn increment_turn(&mut self) {
        self.turn += 1;
    }

    pub fn remaining_deck(&self) -> u32 {
        self.remaining_deck
    }

    pub fn set_remaining_deck(&mut self, remaining: u32) {
        self.remaining_deck = remaining;
    }

    pub fn decrement_remaining_deck(&mut self) {
        self.remaining_deck = self.remaining_deck.saturating_sub(1);
    }

    /// Undo an erroneous decrement.
    pub fn increment_remaining_deck(&mut self) {
        self.remaining_deck += 1;
    }

    pub fn face_up(&self) -> Option<Card> {
        self.face_up
    }

    pub fn set_face_up(&mut self, card: Card) {
        self.face_up = Some(card);
    }

    pub fn seen(&self) -> CardSet {
        self.seen
    }

    pub fn add_seen(&mut self, card: Card) {
        self.seen.insert(card);
    }

    pub fn opponent_cards(&self) -> CardSet {
        self.opponent_cards
    }

    pub fn add_opponent_card(&mut self, card: Card) {
        self.opponent_cards.insert(card);
    }

    /// Returns false when the card was not believed to be in the opponent's hand.
    pub fn remove_opponent_card(&mut self, card: Card) -> bool {
        self.opponent_cards.remove(card)
    }

    pub fn opponent_discards(&self) -> CardSet {
        self.opponent_discards
    }

    pub fn add_opponent_discard(&mut self, card: Card) {
        self.opponent_discards.insert(card);
    }

    /// The opponent took a known card (the face-up card).
    pub fn record_opponent_pickup(&mut self, card: Card) {
        self.add_opponent_card(card);
        self.add_seen(card);
    }

    /// The opponent discarded `card`; it becomes the face-up card.
    pub fn record_opponent_discard(&mut self, card: Card) {
        self.set_face_up(card);
        self.remove_opponent_card(card);
        self.add_opponent_discard(card);
        self.add_seen(card);
    }

    /// Cards neither seen nor in `hand`: what could still come off the deck.
    pub fn unseen(&self, hand: CardSet) -> CardSet {
        CardSet::full().difference(self.seen).difference(hand)
    }
}
