//! Game session state and core simulation types

use serde::{Deserialize, Serialize};

use super::board::{BETTABLE, Symbol};
use super::dice::{Dice, SeededDice};
use super::gamble::{Choice, Reveal};
use super::payout::SpinOutcome;
use super::spin::SpinRun;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Taking bets
    Idle,
    /// Light is chasing (including the pause before a chain-bonus re-spin)
    Spinning,
    /// Holding a win: gamble it or collect it
    Gambling,
}

/// Display message shown on the cabinet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKey {
    PlaceYourBet,
    Spinning,
    InsufficientCredits,
    NoBetPlaced,
    ChainBonus,
    JackpotWon,
    WonGambleOrCollect,
    LostTryAgain,
}

impl MessageKey {
    pub fn text(&self) -> &'static str {
        match self {
            MessageKey::PlaceYourBet => "Place your bet!",
            MessageKey::Spinning => "Spinning...",
            MessageKey::InsufficientCredits => "Insufficient credits!",
            MessageKey::NoBetPlaced => "Place a bet first!",
            MessageKey::ChainBonus => "Once more!",
            MessageKey::JackpotWon => "JACKPOT!",
            MessageKey::WonGambleOrCollect => "You won! Gamble or collect",
            MessageKey::LostTryAgain => "Bad luck, try again!",
        }
    }
}

/// Stake per bettable symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BetSlate {
    stakes: [u64; BETTABLE_COUNT],
}

impl BetSlate {
    /// Stake on `symbol` (zero for symbols that cannot be bet on)
    pub fn get(&self, symbol: Symbol) -> u64 {
        symbol.bet_slot().map(|i| self.stakes[i]).unwrap_or(0)
    }

    /// Add to the stake on `symbol`; returns false if it is not bettable
    pub fn add(&mut self, symbol: Symbol, amount: u64) -> bool {
        match symbol.bet_slot() {
            Some(i) => {
                self.stakes[i] = self.stakes[i].saturating_add(amount);
                true
            }
            None => false,
        }
    }

    pub fn total(&self) -> u64 {
        self.stakes.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.stakes = [0; BETTABLE_COUNT];
    }

    /// (symbol, stake) pairs in bet-panel order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        BETTABLE.iter().copied().zip(self.stakes.iter().copied())
    }
}

/// Big/small sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GambleState {
    /// Last die face shown, if any
    pub face: Option<u8>,
    /// A reveal (or the settle after a loss) is running; gamble commands are refused
    pub revealing: bool,
}

/// Notifications for presentation and audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Chasing light stepped
    LightMoved { index: usize },
    SpinResolved { index: usize, outcome: SpinOutcome },
    /// Big/small call accepted, reveal running
    GambleStarted { choice: Choice },
    /// Interim die face during a reveal
    GambleFlicker { face: u8 },
    GambleResolved {
        choice: Choice,
        face: u8,
        won: bool,
        pending_win: u64,
    },
    PhaseChanged { phase: GamePhase, message: MessageKey },
    CreditsChanged { credits: u64 },
    BetsChanged { total: u64 },
    WinChanged { pending_win: u64 },
    JackpotChanged { pool: u64 },
}

/// Work scheduled on the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Spin(SpinRun),
    ChainRespin,
    Reveal(Reveal),
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timer {
    pub due_ms: u64,
    pub step: Step,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<D = SeededDice> {
    pub credits: u64,
    pub jackpot: u64,
    pub bets: BetSlate,
    pub phase: GamePhase,
    /// Index of the lit board position
    pub light: usize,
    pub pending_win: u64,
    pub gamble: GambleState,
    pub message: MessageKey,
    /// Chain bonuses landed in the current round
    pub chain_count: u32,
    /// Simulation clock
    pub time_ms: u64,
    /// Stake added by one place-bet
    pub bet_unit: u64,
    /// Stake added to every symbol by bet-max
    pub max_bet_unit: u64,
    pub dice: D,
    pub(crate) timer: Option<Timer>,
    pub(crate) next_accrual_ms: u64,
}

impl GameState<SeededDice> {
    /// Create a session with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings::default(), SeededDice::new(seed))
    }
}

impl<D: Dice> GameState<D> {
    pub fn with_settings(settings: &Settings, dice: D) -> Self {
        let settings = settings.validated();
        log::info!(
            "New session: {} credits, jackpot {}",
            settings.starting_credits,
            settings.starting_jackpot
        );
        Self {
            credits: settings.starting_credits,
            jackpot: settings.starting_jackpot,
            bets: BetSlate::default(),
            phase: GamePhase::Idle,
            light: 0,
            pending_win: 0,
            gamble: GambleState::default(),
            message: MessageKey::PlaceYourBet,
            chain_count: 0,
            time_ms: 0,
            bet_unit: settings.bet_unit,
            max_bet_unit: settings.max_bet_unit,
            dice,
            timer: None,
            next_accrual_ms: u64::from(JACKPOT_ACCRUAL_MS),
        }
    }

    pub fn total_bet(&self) -> u64 {
        self.bets.total()
    }

    /// Cost of one bet-max
    pub fn bet_max_cost(&self) -> u64 {
        self.max_bet_unit.saturating_mul(BETTABLE_COUNT as u64)
    }

    /// True when nothing is scheduled and the machine waits for a command
    pub fn awaiting_input(&self) -> bool {
        self.timer.is_none()
    }

    /// Time of the next scheduled spin/gamble step
    pub fn next_step_ms(&self) -> Option<u64> {
        self.timer.map(|t| t.due_ms)
    }

    pub(crate) fn schedule(&mut self, delay_ms: u32, step: Step) {
        self.timer = Some(Timer {
            due_ms: self.time_ms + u64::from(delay_ms),
            step,
        });
    }

    /// Presentation view of the session
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            credits: self.credits,
            jackpot: self.jackpot,
            bets: self
                .bets
                .iter()
                .map(|(s, amount)| (s.name().to_string(), amount))
                .collect(),
            total_bet: self.total_bet(),
            phase: self.phase,
            light: self.light,
            pending_win: self.pending_win,
            gamble_face: self.gamble.face,
            revealing: self.gamble.revealing,
            chain_count: self.chain_count,
            message: self.message.text().to_string(),
            time_ms: self.time_ms,
        }
    }
}

/// Serializable read-only view for a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub credits: u64,
    pub jackpot: u64,
    pub bets: Vec<(String, u64)>,
    pub total_bet: u64,
    pub phase: GamePhase,
    pub light: usize,
    pub pending_win: u64,
    pub gamble_face: Option<u8>,
    pub revealing: bool,
    pub chain_count: u32,
    pub message: String,
    pub time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let state = GameState::new(12345);
        assert_eq!(state.credits, 1000);
        assert_eq!(state.jackpot, 44_227);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.light, 0);
        assert_eq!(state.total_bet(), 0);
        assert_eq!(state.message, MessageKey::PlaceYourBet);
        assert!(state.awaiting_input());
        assert_eq!(state.bet_max_cost(), 80);
    }

    #[test]
    fn test_bet_slate_tracks_each_symbol() {
        let mut slate = BetSlate::default();
        assert!(slate.add(Symbol::Apple, 2));
        assert!(slate.add(Symbol::Bar, 1));
        assert!(!slate.add(Symbol::Jackpot, 5));
        assert_eq!(slate.get(Symbol::Apple), 2);
        assert_eq!(slate.get(Symbol::Jackpot), 0);
        assert_eq!(slate.total(), 3);
        slate.clear();
        assert!(slate.is_empty());
        assert_eq!(slate.iter().count(), BETTABLE_COUNT);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"credits\":1000"));
        assert!(json.contains("Place your bet!"));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state.snapshot());
    }
}
