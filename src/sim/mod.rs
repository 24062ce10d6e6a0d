//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation clock only (no wall time)
//! - Seeded or scripted dice only
//! - No rendering or audio dependencies

pub mod autoplay;
pub mod board;
pub mod denial;
pub mod dice;
pub mod gamble;
pub mod payout;
pub mod paytable;
pub mod spin;
pub mod state;
pub mod tick;

pub use board::{BETTABLE, BOARD, BoardPosition, Symbol};
pub use denial::Denial;
pub use dice::{Dice, Draw, LoadedDice, SeededDice};
pub use gamble::{Choice, GambleOutcome};
pub use payout::SpinOutcome;
pub use spin::{SpinRun, SpinStep};
pub use state::{BetSlate, GambleState, GameEvent, GamePhase, GameState, MessageKey, Snapshot};
pub use tick::{Command, CommandResult, advance, apply, run_until_input};
