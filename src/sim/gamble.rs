//! Big/small double-or-nothing round

use serde::{Deserialize, Serialize};

use super::dice::{Dice, Draw};
use crate::consts::{GAMBLE_FLICKER_MS, GAMBLE_REVEAL_MS};

/// Player's call on the next die face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// Faces 4..=6
    Big,
    /// Faces 1..=3
    Small,
}

impl Choice {
    pub fn wins_on(&self, face: u8) -> bool {
        match self {
            Choice::Big => (4..=6).contains(&face),
            Choice::Small => (1..=3).contains(&face),
        }
    }
}

/// Settled gamble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GambleOutcome {
    pub face: u8,
    pub won: bool,
    /// Pending win after the gamble (doubled or zero)
    pub pending_win: u64,
}

/// Settle `pending_win` on a final `face`
pub fn resolve(choice: Choice, face: u8, pending_win: u64) -> GambleOutcome {
    let won = choice.wins_on(face);
    GambleOutcome {
        face,
        won,
        pending_win: if won { pending_win.saturating_mul(2) } else { 0 },
    }
}

pub fn roll_face(dice: &mut impl Dice) -> u8 {
    dice.draw(Draw::GambleFace, 1..7) as u8
}

pub fn flicker_face(dice: &mut impl Dice) -> u8 {
    dice.draw(Draw::GambleFlicker, 1..7) as u8
}

/// Timeline of a running reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub choice: Choice,
    /// Time since the choice was made
    pub elapsed_ms: u32,
}

impl Reveal {
    pub fn new(choice: Choice) -> Self {
        Self {
            choice,
            elapsed_ms: 0,
        }
    }

    /// Advance to the next beat; returns the delay until it
    pub fn next_beat(&mut self) -> u32 {
        let next = (self.elapsed_ms + GAMBLE_FLICKER_MS).min(GAMBLE_REVEAL_MS);
        let delay = next - self.elapsed_ms;
        self.elapsed_ms = next;
        delay
    }

    /// The current beat settles the gamble instead of flickering
    pub fn is_final(&self) -> bool {
        self.elapsed_ms >= GAMBLE_REVEAL_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dice::LoadedDice;

    #[test]
    fn test_big_and_small_split_the_die() {
        for face in 1..=6u8 {
            assert_eq!(Choice::Big.wins_on(face), face >= 4);
            assert_eq!(Choice::Small.wins_on(face), face <= 3);
        }
    }

    #[test]
    fn test_win_doubles_loss_zeroes() {
        assert_eq!(resolve(Choice::Big, 5, 10).pending_win, 20);
        assert!(resolve(Choice::Big, 5, 10).won);
        assert_eq!(resolve(Choice::Big, 2, 10).pending_win, 0);
        assert_eq!(resolve(Choice::Small, 3, 7).pending_win, 14);
        assert_eq!(resolve(Choice::Small, 4, 7).pending_win, 0);
    }

    #[test]
    fn test_reveal_has_fifteen_flickers_then_settles() {
        let mut reveal = Reveal::new(Choice::Big);
        let mut flickers = 0;
        let mut total = 0;
        loop {
            total += reveal.next_beat();
            if reveal.is_final() {
                break;
            }
            flickers += 1;
        }
        assert_eq!(flickers, 15);
        assert_eq!(total, GAMBLE_REVEAL_MS);
    }

    #[test]
    fn test_faces_come_from_dice() {
        let mut dice = LoadedDice::new().with_face(6).with_flicker(2);
        assert_eq!(flicker_face(&mut dice), 2);
        assert_eq!(roll_face(&mut dice), 6);
    }
}
