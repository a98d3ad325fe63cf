//! Board engine for the 2048 sliding-tile puzzle: a 4x4 grid that slides and
//! merges in four directions, tracks legal moves and score, and spawns a 2
//! after every accepted move.
//!
//! ```
//! use swipe2048::{Direction, Game};
//!
//! let mut game = Game::new(1);
//! for &dir in Direction::ALL.iter() {
//!   if game.can_move(dir) {
//!     let outcome = game.play(dir).unwrap();
//!     assert!(outcome.changed);
//!     break;
//!   }
//! }
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod expmax;
pub mod game;
pub mod movavg;
pub mod runner;
pub mod state;

pub use board::{Board, Direction};
pub use config::{Config, StrategyKind};
pub use error::{Error, Result, StateError};
pub use game::{Game, LegalMoves, MoveOutcome};
