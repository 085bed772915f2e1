//! Agents: players driven by an external Gin Rummy engine.
//!
//! The engine owns the deck, the turn order and the scoring. It calls a
//! [`GinRummyPlayer`] at each decision point and reports what every player did;
//! the agent keeps whatever it needs to remember between those calls.

use crate::cards::Card;
use crate::evaluator::EvalError;
use crate::hand::HandError;
use crate::meld::Meld;

mod heuristic;
mod memory;

pub use heuristic::{AgentProfile, HeuristicAgent};
pub use memory::DrawDiscardMemory;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}

/// Where an agent is within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    /// No round has started yet.
    Idle,
    AwaitingFaceUpDecision,
    AwaitingDraw,
    AwaitingDiscard,
    RoundEnd,
}

/// Turn callbacks an engine invokes on a player, one at a time.
///
/// Seats are engine-assigned indices. Callbacks that can detect a broken engine
/// contract return [`AgentError`] instead of carrying on with corrupt state.
pub trait GinRummyPlayer {
    /// A new round: this player's seat, the seat that moves first, the ten dealt
    /// cards and the number of cards left face down after the deal.
    fn start_round(
        &mut self,
        seat: usize,
        starting_seat: usize,
        hand: &[Card],
        remaining_deck: u32,
    ) -> Result<(), AgentError>;

    /// Whether to take `card` from the discard pile instead of drawing face down.
    fn will_draw_face_up(&mut self, card: Card) -> Result<bool, AgentError>;

    /// A player drew. `card` is `None` when the opponent drew face down.
    fn observe_draw(&mut self, seat: usize, card: Option<Card>) -> Result<(), AgentError>;

    /// The card to discard from the eleven now held.
    fn discard(&mut self) -> Result<Card, AgentError>;

    fn observe_discard(&mut self, seat: usize, card: Card) -> Result<(), AgentError>;

    /// Melds to reveal at the end of the round, or `None` to decline knocking.
    fn final_melds(&mut self) -> Option<Vec<Meld>>;

    fn observe_final_melds(&mut self, seat: usize, melds: &[Meld]);

    fn observe_scores(&mut self, _scores: &[i32]) {}

    fn observe_layoff(&mut self, _seat: usize, _card: Card, _meld: &Meld) {}

    fn observe_final_hand(&mut self, seat: usize, hand: &[Card]);
}
