use crate::cards::Card;
use crate::evaluator::{
    average_deadwood_after_draw, best_deadwood, count_cards_completing_gin, meld_and_deadwood_drop,
    opponent_meld_threat, unreachable_even_with_two_draws, EvalError,
};
use crate::hand::{without_card, CardSet, Hand, HAND_SIZE};
use crate::meld::{Meld, MeldOracle, StandardOracle, MAX_DEADWOOD};
use crate::tracker::RoundState;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, Level};

use super::{AgentError, DrawDiscardMemory, GinRummyPlayer, Phase};

/// Tunables for a [`HeuristicAgent`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct AgentProfile {
    /// Highest deadwood at which the agent knocks.
    pub max_deadwood: u32,
    /// Seed for the meld tie-break; OS entropy when `None`.
    pub rng_seed: Option<u64>,
}

impl AgentProfile {
    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_max_deadwood(mut self, max_deadwood: u32) -> Self {
        self.max_deadwood = max_deadwood;
        self
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self { max_deadwood: MAX_DEADWOOD, rng_seed: None }
    }
}

/// Greedy deadwood-minimising player.
///
/// Takes the face-up card only when it lowers expected deadwood, discards the
/// card leaving the least deadwood (preferring high, unpaired cards on ties and
/// never repeating a draw/discard pair within a round) and knocks as soon as the
/// deadwood allows.
///
/// ```
/// use gin_rummy_agent::agents::{AgentProfile, GinRummyPlayer, HeuristicAgent};
/// use gin_rummy_agent::cards::parse_cards;
/// use gin_rummy_agent::meld::StandardOracle;
///
/// let mut agent = HeuristicAgent::new(StandardOracle, AgentProfile::default().with_seed(1));
/// let hand = parse_cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh").unwrap();
/// agent.start_round(0, 0, &hand, 32).unwrap();
///
/// let nine = "9d".parse().unwrap();
/// assert!(agent.will_draw_face_up(nine).unwrap());
/// agent.observe_draw(0, Some(nine)).unwrap();
/// assert_eq!(agent.discard().unwrap().to_string(), "Ks");
/// ```
#[derive(Debug)]
pub struct HeuristicAgent<O = StandardOracle, R = ChaCha8Rng> {
    oracle: O,
    profile: AgentProfile,
    rng: R,
    seat: usize,
    starting_seat: usize,
    hand: Hand,
    state: RoundState,
    memory: DrawDiscardMemory,
    phase: Phase,
    offered: Option<Card>,
    drawn: Option<Card>,
    face_up_recorded: bool,
    opponent_knocked: bool,
}

impl<O: MeldOracle> HeuristicAgent<O, ChaCha8Rng> {
    pub fn new(oracle: O, profile: AgentProfile) -> Self {
        let rng = match profile.rng_seed {
            Some(v) => ChaCha8Rng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                ChaCha8Rng::from_seed(seed)
            }
        };
        Self::with_rng(oracle, profile, rng)
    }
}

impl<O: MeldOracle, R: Rng> HeuristicAgent<O, R> {
    /// Build an agent around a caller-supplied randomness source.
    pub fn with_rng(oracle: O, profile: AgentProfile, rng: R) -> Self {
        Self {
            oracle,
            profile,
            rng,
            seat: 0,
            starting_seat: 0,
            hand: Hand::new(),
            state: RoundState::new(),
            memory: DrawDiscardMemory::new(),
            phase: Phase::Idle,
            offered: None,
            drawn: None,
            face_up_recorded: false,
            opponent_knocked: false,
        }
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn memory(&self) -> &DrawDiscardMemory {
        &self.memory
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn starting_seat(&self) -> usize {
        self.starting_seat
    }

    pub fn opponent_knocked(&self) -> bool {
        self.opponent_knocked
    }

    /// Unseen cards that would give gin from the current hand.
    pub fn gin_outs(&self) -> Result<usize, EvalError> {
        count_cards_completing_gin(&self.oracle, self.hand.as_slice(), self.state.seen())
    }

    /// Expected settled deadwood after the next draw.
    pub fn expected_deadwood_after_draw(&self) -> Result<u32, EvalError> {
        average_deadwood_after_draw(
            &self.oracle,
            self.hand.as_slice(),
            self.state.opponent_discards(),
            self.state.opponent_cards(),
        )
    }

    /// Held cards that cannot join a meld within two more draws.
    pub fn dead_cards(&self) -> CardSet {
        unreachable_even_with_two_draws(self.hand.as_slice(), self.state.seen())
    }

    fn is_own(&self, seat: usize) -> bool {
        seat == self.seat
    }

    /// Minimal-deadwood discard candidates, skipping the face-up card just taken
    /// and any pair already played this round.
    fn discard_candidates(&self, drawn: Card) -> Result<(u32, Vec<Card>), AgentError> {
        let cards = self.hand.as_slice();
        let took_face_up = self.offered == Some(drawn);
        let mut min_deadwood = u32::MAX;
        let mut candidates = Vec::new();
        for &card in cards {
            if card == drawn && took_face_up {
                continue;
            }
            if self.memory.contains(drawn, card) {
                continue;
            }
            let deadwood = best_deadwood(&self.oracle, &without_card(cards, card))?;
            if deadwood < min_deadwood {
                min_deadwood = deadwood;
                candidates.clear();
            }
            if deadwood == min_deadwood {
                candidates.push(card);
            }
        }
        Ok((min_deadwood, candidates))
    }

    fn trace_outlook(&self) {
        if !tracing::enabled!(Level::TRACE) {
            return;
        }
        let outs = self.gin_outs().ok();
        let expected = self.expected_deadwood_after_draw().ok();
        let dead = self.dead_cards();
        trace!(seat = self.seat, hand = %self.hand, ?outs, ?expected, dead = %dead, "hand outlook");
    }
}

/// Highest-ranked card, the earliest one on equal rank.
fn highest_rank(cards: &[Card]) -> Option<Card> {
    cards.iter().copied().fold(None, |best, card| match best {
        Some(b) if card.rank() <= b.rank() => Some(b),
        _ => Some(card),
    })
}

impl<O: MeldOracle, R: Rng> GinRummyPlayer for HeuristicAgent<O, R> {
    fn start_round(
        &mut self,
        seat: usize,
        starting_seat: usize,
        hand: &[Card],
        remaining_deck: u32,
    ) -> Result<(), AgentError> {
        if hand.len() != HAND_SIZE {
            return Err(EvalError::InvalidHandSize { expected: "exactly 10", got: hand.len() }.into());
        }
        self.hand = Hand::try_new(hand.to_vec())?;
        self.state = RoundState::start(remaining_deck);
        for &card in hand {
            self.state.add_seen(card);
        }
        self.seat = seat;
        self.starting_seat = starting_seat;
        self.memory.clear();
        self.offered = None;
        self.drawn = None;
        self.face_up_recorded = false;
        self.opponent_knocked = false;
        self.phase = Phase::AwaitingFaceUpDecision;
        trace!(seat, starting_seat, hand = %self.hand, remaining_deck, "round started");
        Ok(())
    }

    fn will_draw_face_up(&mut self, card: Card) -> Result<bool, AgentError> {
        if !self.face_up_recorded {
            // the opening face-up card came off the face-down pile
            self.state.set_face_up(card);
            self.state.add_seen(card);
            self.state.decrement_remaining_deck();
            self.face_up_recorded = true;
        }
        self.offered = Some(card);
        let drop = meld_and_deadwood_drop(&self.oracle, self.hand.as_slice(), card);
        let accept = drop > 0;
        self.phase = Phase::AwaitingDraw;
        debug!(seat = self.seat, %card, drop, accept, "face-up decision");
        Ok(accept)
    }

    fn observe_draw(&mut self, seat: usize, card: Option<Card>) -> Result<(), AgentError> {
        if self.is_own(seat) {
            let card = card.ok_or_else(|| {
                AgentError::InconsistentState("own draw reported without a card".to_string())
            })?;
            self.hand.push(card)?;
            self.state.add_seen(card);
            if self.offered != Some(card) {
                self.state.decrement_remaining_deck();
            }
            self.drawn = Some(card);
            self.phase = Phase::AwaitingDiscard;
            trace!(seat, %card, remaining = self.state.remaining_deck(), "drew");
            return Ok(());
        }
        match card {
            None => self.state.decrement_remaining_deck(),
            Some(card) => self.state.record_opponent_pickup(card),
        }
        trace!(seat, card = ?card, remaining = self.state.remaining_deck(), "opponent drew");
        Ok(())
    }

    fn discard(&mut self) -> Result<Card, AgentError> {
        let drawn = self.drawn.ok_or_else(|| {
            AgentError::InconsistentState("discard requested before a draw".to_string())
        })?;
        let (deadwood, candidates) = self.discard_candidates(drawn)?;

        let singles: Vec<Card> = candidates
            .iter()
            .copied()
            .filter(|c| self.hand.iter().filter(|h| h.rank() == c.rank()).count() == 1)
            .collect();
        let choice = highest_rank(&singles).or_else(|| highest_rank(&candidates)).ok_or_else(|| {
            AgentError::InconsistentState(format!("no eligible discard after drawing {drawn}"))
        })?;

        self.memory.record(drawn, choice);
        let threat = opponent_meld_threat(self.state.seen(), self.state.opponent_cards(), choice);
        debug!(
            seat = self.seat,
            %drawn,
            discard = %choice,
            deadwood,
            candidates = candidates.len(),
            threat,
            "discard decision"
        );
        self.trace_outlook();
        Ok(choice)
    }

    fn observe_discard(&mut self, seat: usize, card: Card) -> Result<(), AgentError> {
        if self.is_own(seat) {
            if !self.hand.remove(card) {
                return Err(AgentError::InconsistentState(format!("discarded {card} is not in hand")));
            }
            self.state.increment_turn();
            self.state.set_face_up(card);
            self.drawn = None;
            self.phase = Phase::AwaitingFaceUpDecision;
        } else {
            self.state.record_opponent_discard(card);
        }
        trace!(seat, %card, turn = self.state.turn(), "discarded");
        Ok(())
    }

    fn final_melds(&mut self) -> Option<Vec<Meld>> {
        let cards = self.hand.as_slice();
        let mut partitions = self.oracle.best_meld_partitions(cards);
        let deadwood = match partitions.first() {
            Some(melds) => self.oracle.deadwood_points_with(melds, cards),
            None => self.oracle.deadwood_points(cards),
        };
        if !self.opponent_knocked && (partitions.is_empty() || deadwood > self.profile.max_deadwood) {
            debug!(seat = self.seat, deadwood, "declining to knock");
            return None;
        }
        if partitions.is_empty() {
            debug!(seat = self.seat, "revealing no melds");
            return Some(Vec::new());
        }
        let pick = self.rng.random_range(0..partitions.len());
        let melds = partitions.swap_remove(pick);
        debug!(seat = self.seat, melds = melds.len(), ties = partitions.len() + 1, "revealing melds");
        Some(melds)
    }

    fn observe_final_melds(&mut self, seat: usize, melds: &[Meld]) {
        // the first report of a round comes from the player who ended it
        if self.phase != Phase::RoundEnd && !self.is_own(seat) {
            self.opponent_knocked = true;
        }
        self.state.reset();
        self.phase = Phase::RoundEnd;
        trace!(seat, melds = melds.len(), opponent_knocked = self.opponent_knocked, "final melds");
    }

    fn observe_final_hand(&mut self, seat: usize, hand: &[Card]) {
        self.state.reset();
        self.phase = Phase::RoundEnd;
        trace!(seat, cards = hand.len(), "final hand");
    }
}
