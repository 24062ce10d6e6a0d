//! Landing resolution

use serde::{Deserialize, Serialize};

use super::board::{BoardPosition, Symbol};
use super::paytable;
use super::state::BetSlate;

/// What a landing pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinOutcome {
    /// Free re-spin with the same bets
    ChainBonus,
    /// Nothing staked on the landed symbol
    Loss,
    Win { amount: u64 },
    /// Whole jackpot pool won; the caller must reseed the pool
    Jackpot { amount: u64 },
}

impl SpinOutcome {
    pub fn amount(&self) -> u64 {
        match self {
            SpinOutcome::Win { amount } | SpinOutcome::Jackpot { amount } => *amount,
            SpinOutcome::ChainBonus | SpinOutcome::Loss => 0,
        }
    }
}

/// Resolve a landing against the current bets and jackpot pool
pub fn resolve(position: &BoardPosition, bets: &BetSlate, jackpot: u64) -> SpinOutcome {
    if position.symbol == Symbol::OnceMore {
        return SpinOutcome::ChainBonus;
    }

    let base = position.base_symbol();
    let stake = bets.get(base);
    if stake == 0 {
        return SpinOutcome::Loss;
    }

    if position.symbol == Symbol::Jackpot {
        return SpinOutcome::Jackpot { amount: jackpot };
    }

    let Some(pays) = paytable::payout_for(base) else {
        log::warn!("Landed on {:?} with no paytable entry", position.symbol);
        return SpinOutcome::Loss;
    };

    // Bar positions print their own payout; everything else multiplies
    let amount = if base == Symbol::Bar {
        stake.saturating_mul(position.multiplier.unwrap_or(pays))
    } else {
        stake.saturating_mul(pays).saturating_mul(position.factor())
    };
    SpinOutcome::Win { amount }
}
