//! Board layout for the chasing light
//!
//! The 24 positions run clockwise around an 8x6 grid perimeter:
//! - top row: indices 0..8, left to right
//! - right column: indices 8..12, top to bottom
//! - bottom row: indices 12..20, right to left
//! - left column: indices 20..24, bottom to top

use serde::{Deserialize, Serialize};

use crate::consts::{BETTABLE_COUNT, BOARD_SIZE};

/// Every symbol the machine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Orange,
    Bell,
    Apple,
    Watermelon,
    Seven,
    Star,
    Bar,
    Grape,
    /// Chain bonus: lands a free re-spin
    OnceMore,
    /// Jackpot trigger, pays against the bar stake
    Jackpot,
    /// Gamble round choices, never on the board
    Big,
    Small,
}

/// Bettable symbols in bet-panel order (highest payout first)
pub const BETTABLE: [Symbol; BETTABLE_COUNT] = [
    Symbol::Bar,
    Symbol::Seven,
    Symbol::Star,
    Symbol::Watermelon,
    Symbol::Bell,
    Symbol::Grape,
    Symbol::Orange,
    Symbol::Apple,
];

impl Symbol {
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Orange => "Orange",
            Symbol::Bell => "Bell",
            Symbol::Apple => "Apple",
            Symbol::Watermelon => "Watermelon",
            Symbol::Seven => "77",
            Symbol::Star => "Star",
            Symbol::Bar => "BAR",
            Symbol::Grape => "Grape",
            Symbol::OnceMore => "ONCE MORE",
            Symbol::Jackpot => "JP",
            Symbol::Big => "BIG",
            Symbol::Small => "SMALL",
        }
    }

    /// Parse a user-facing symbol name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "orange" => Some(Symbol::Orange),
            "bell" => Some(Symbol::Bell),
            "apple" => Some(Symbol::Apple),
            "watermelon" | "melon" => Some(Symbol::Watermelon),
            "seven" | "77" => Some(Symbol::Seven),
            "star" => Some(Symbol::Star),
            "bar" => Some(Symbol::Bar),
            "grape" => Some(Symbol::Grape),
            _ => None,
        }
    }

    /// Slot in the bet slate, `None` for symbols that cannot be staked
    pub fn bet_slot(&self) -> Option<usize> {
        BETTABLE.iter().position(|s| s == self)
    }

    pub fn is_bettable(&self) -> bool {
        self.bet_slot().is_some()
    }

    /// Symbol whose stake and paytable entry a landing resolves against
    pub fn base_symbol(&self) -> Symbol {
        match self {
            Symbol::Jackpot => Symbol::Bar,
            other => *other,
        }
    }
}

/// One slot on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPosition {
    pub symbol: Symbol,
    /// Printed multiplier; bar positions use it in place of the paytable
    pub multiplier: Option<u64>,
}

impl BoardPosition {
    const fn plain(symbol: Symbol) -> Self {
        Self {
            symbol,
            multiplier: None,
        }
    }

    const fn times(symbol: Symbol, multiplier: u64) -> Self {
        Self {
            symbol,
            multiplier: Some(multiplier),
        }
    }

    pub fn base_symbol(&self) -> Symbol {
        self.symbol.base_symbol()
    }

    /// Multiplier applied to non-bar payouts
    pub fn factor(&self) -> u64 {
        self.multiplier.unwrap_or(1)
    }

    pub fn label(&self) -> String {
        match self.multiplier {
            Some(m) => format!("{} x{}", self.symbol.name(), m),
            None => self.symbol.name().to_string(),
        }
    }
}

/// Traversal order of the chasing light
pub const BOARD: [BoardPosition; BOARD_SIZE] = [
    // Top row
    BoardPosition::times(Symbol::Bell, 2),
    BoardPosition::plain(Symbol::Orange),
    BoardPosition::plain(Symbol::Bell),
    BoardPosition::times(Symbol::Bar, 50),
    BoardPosition::plain(Symbol::Jackpot),
    BoardPosition::times(Symbol::Bar, 100),
    BoardPosition::plain(Symbol::Apple),
    BoardPosition::plain(Symbol::Grape),
    // Right column
    BoardPosition::times(Symbol::Watermelon, 2),
    BoardPosition::plain(Symbol::Watermelon),
    BoardPosition::plain(Symbol::OnceMore),
    BoardPosition::plain(Symbol::Apple),
    // Bottom row
    BoardPosition::times(Symbol::Orange, 2),
    BoardPosition::plain(Symbol::Orange),
    BoardPosition::plain(Symbol::Bell),
    BoardPosition::times(Symbol::Seven, 2),
    BoardPosition::plain(Symbol::Seven),
    BoardPosition::plain(Symbol::Apple),
    BoardPosition::times(Symbol::Grape, 2),
    BoardPosition::plain(Symbol::Star),
    // Left column
    BoardPosition::times(Symbol::Star, 2),
    BoardPosition::plain(Symbol::Star),
    BoardPosition::plain(Symbol::OnceMore),
    BoardPosition::plain(Symbol::Apple),
];

/// Position at `index`, wrapping around the perimeter
#[inline]
pub fn position_at(index: usize) -> &'static BoardPosition {
    &BOARD[index % BOARD_SIZE]
}

#[inline]
pub fn position_count() -> usize {
    BOARD_SIZE
}

/// Light index after moving `steps` positions from `start`
#[inline]
pub fn advance_index(start: usize, steps: u32) -> usize {
    (start + steps as usize) % BOARD_SIZE
}

/// 1-based (column, row) of an index on the 8x6 grid
pub fn grid_cell(index: usize) -> (usize, usize) {
    let index = index % BOARD_SIZE;
    match index {
        0..8 => (index + 1, 1),
        8..12 => (8, index - 6),
        12..20 => (20 - index, 6),
        _ => (1, 25 - index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_board_has_one_slot_per_index() {
        assert_eq!(position_count(), 24);
        assert_eq!(BOARD.iter().filter(|p| p.symbol == Symbol::Jackpot).count(), 1);
        assert_eq!(BOARD.iter().filter(|p| p.symbol == Symbol::OnceMore).count(), 2);
        assert!(BOARD.iter().all(|p| !matches!(p.symbol, Symbol::Big | Symbol::Small)));
    }

    #[test]
    fn test_jackpot_resolves_to_bar() {
        assert_eq!(position_at(4).symbol, Symbol::Jackpot);
        assert_eq!(position_at(4).base_symbol(), Symbol::Bar);
        assert_eq!(position_at(3).base_symbol(), Symbol::Bar);
        assert_eq!(position_at(6).base_symbol(), Symbol::Apple);
    }

    #[test]
    fn test_labels() {
        assert_eq!(position_at(0).label(), "Bell x2");
        assert_eq!(position_at(3).label(), "BAR x50");
        assert_eq!(position_at(10).label(), "ONCE MORE");
        assert_eq!(position_at(23).label(), "Apple");
    }

    #[test]
    fn test_grid_cells_trace_the_perimeter() {
        assert_eq!(grid_cell(0), (1, 1));
        assert_eq!(grid_cell(7), (8, 1));
        assert_eq!(grid_cell(8), (8, 2));
        assert_eq!(grid_cell(11), (8, 5));
        assert_eq!(grid_cell(12), (8, 6));
        assert_eq!(grid_cell(19), (1, 6));
        assert_eq!(grid_cell(20), (1, 5));
        assert_eq!(grid_cell(21), (1, 4));
        assert_eq!(grid_cell(22), (1, 3));
        assert_eq!(grid_cell(23), (1, 2));

        let cells: HashSet<_> = (0..BOARD_SIZE).map(grid_cell).collect();
        assert_eq!(cells.len(), BOARD_SIZE);
        assert!(cells.iter().all(|&(c, r)| c == 1 || c == 8 || r == 1 || r == 6));
    }

    #[test]
    fn test_bet_slots() {
        assert_eq!(Symbol::Bar.bet_slot(), Some(0));
        assert_eq!(Symbol::Apple.bet_slot(), Some(7));
        assert!(!Symbol::Jackpot.is_bettable());
        assert!(!Symbol::OnceMore.is_bettable());
        assert_eq!(Symbol::from_name("APPLE"), Some(Symbol::Apple));
        assert_eq!(Symbol::from_name("jp"), None);
    }

    #[test]
    fn test_advance_wraps() {
        assert_eq!(advance_index(0, 78), 6);
        assert_eq!(advance_index(23, 1), 0);
        assert_eq!(advance_index(10, 68), 6);
    }
}
