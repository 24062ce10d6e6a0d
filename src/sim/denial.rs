//! Refused commands

use thiserror::Error;

use super::board::Symbol;
use super::state::{GamePhase, MessageKey};
use super::tick::Command;

/// Why a command was refused. A denial never changes the session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    #[error("{command:?} is not allowed while {phase:?}")]
    WrongPhase { command: Command, phase: GamePhase },

    #[error("gamble reveal still running")]
    RevealInProgress,

    #[error("insufficient credits: need {needed}, have {available}")]
    InsufficientCredits { needed: u64, available: u64 },

    #[error("no bet placed")]
    NoBet,

    #[error("no bets to clear")]
    NothingToClear,

    #[error("{0:?} cannot be bet on")]
    NotBettable(Symbol),
}

impl Denial {
    /// Message the cabinet shows for this denial, if any
    pub fn message(&self) -> Option<MessageKey> {
        match self {
            Denial::InsufficientCredits { .. } => Some(MessageKey::InsufficientCredits),
            Denial::NoBet => Some(MessageKey::NoBetPlaced),
            _ => None,
        }
    }
}
