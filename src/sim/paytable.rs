//! Flat payout multiples per bettable symbol

use super::board::{BETTABLE, Symbol};

/// Credits returned per credit staked, before any board multiplier.
/// `None` for symbols that cannot be bet on.
pub fn payout_for(symbol: Symbol) -> Option<u64> {
    match symbol {
        Symbol::Bar => Some(100),
        Symbol::Seven => Some(40),
        Symbol::Star => Some(30),
        Symbol::Watermelon => Some(20),
        Symbol::Bell => Some(20),
        Symbol::Grape => Some(15),
        Symbol::Orange => Some(10),
        Symbol::Apple => Some(5),
        Symbol::OnceMore | Symbol::Jackpot | Symbol::Big | Symbol::Small => None,
    }
}

/// (symbol, payout) pairs in bet-panel order
pub fn entries() -> impl Iterator<Item = (Symbol, u64)> {
    BETTABLE
        .iter()
        .filter_map(|&s| payout_for(s).map(|p| (s, p)))
}
