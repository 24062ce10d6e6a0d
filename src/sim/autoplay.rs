//! Idle/demo mode - the machine plays itself

use super::board::BETTABLE;
use super::dice::Dice;
use super::gamble::Choice;
use super::state::{GamePhase, GameState};
use super::tick::Command;

/// Wins at or above this many stake multiples get collected
const COLLECT_AT_MULTIPLE: u64 = 20;

/// Next command the demo player would issue, or `None` while the machine
/// is busy or the player is out of credits
pub fn next_command<D: Dice>(state: &GameState<D>) -> Option<Command> {
    if !state.awaiting_input() {
        return None;
    }

    match state.phase {
        GamePhase::Idle => {
            if state.total_bet() > 0 {
                Some(Command::StartSpin)
            } else if state.credits >= state.bet_max_cost() {
                Some(Command::BetMax)
            } else if state.credits >= state.bet_unit {
                // Rotate through symbols so small bankrolls still spread out
                let pick = (state.time_ms / 1000) as usize % BETTABLE.len();
                Some(Command::PlaceBet(BETTABLE[pick]))
            } else {
                None
            }
        }
        GamePhase::Gambling => {
            let stake = state.total_bet().max(1);
            if state.pending_win >= stake * COLLECT_AT_MULTIPLE {
                Some(Command::Collect)
            } else {
                Some(Command::Gamble(Choice::Big))
            }
        }
        GamePhase::Spinning => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::run_until_input;

    #[test]
    fn test_idle_player_bets_then_spins() {
        let mut state = GameState::new(8);
        assert_eq!(next_command(&state), Some(Command::BetMax));
        state.bet_max().unwrap();
        assert_eq!(next_command(&state), Some(Command::StartSpin));
        state.start_spin().unwrap();
        assert_eq!(next_command(&state), None);
    }

    #[test]
    fn test_broke_player_stops() {
        let mut state = GameState::new(8);
        state.credits = 0;
        assert_eq!(next_command(&state), None);
        state.credits = 3;
        assert!(matches!(next_command(&state), Some(Command::PlaceBet(_))));
    }

    #[test]
    fn test_demo_runs_many_rounds() {
        let mut state = GameState::new(2024);
        let mut rounds = 0;
        while rounds < 50 {
            let Some(command) = next_command(&state) else {
                break;
            };
            if command == Command::StartSpin {
                rounds += 1;
            }
            state.apply(command).unwrap();
            run_until_input(&mut state);
        }
        assert!(state.awaiting_input());
        assert_ne!(state.phase, GamePhase::Spinning);
    }
}
