//! gin-rummy-agent: heuristic Gin Rummy player
//!
//! Goals:
//! - Exhaustive meld search behind a swappable [`meld::MeldOracle`]
//! - Pure evaluators for deadwood, gin outs and meld reachability
//! - A callback-driven agent that an external game engine drives turn by turn
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: decide on a face-up card
//! ```
//! use gin_rummy_agent::agents::{AgentProfile, GinRummyPlayer, HeuristicAgent};
//! use gin_rummy_agent::cards::parse_cards;
//! use gin_rummy_agent::evaluator::best_deadwood;
//! use gin_rummy_agent::meld::StandardOracle;
//!
//! let hand = parse_cards("5c 5d 5h 9s 9c 2d 3d 4d Ks Qh").unwrap();
//! assert_eq!(best_deadwood(&StandardOracle, &hand).unwrap(), 38);
//!
//! let mut agent = HeuristicAgent::new(StandardOracle, AgentProfile::default().with_seed(42));
//! agent.start_round(0, 0, &hand, 32).unwrap();
//! assert!(agent.will_draw_face_up("9d".parse().unwrap()).unwrap());
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod evaluator;
pub mod hand;
pub mod meld;
pub mod tracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
