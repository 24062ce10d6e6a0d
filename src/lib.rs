//! Small Mary - a fruit machine with a chasing-light board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, bets, spins, payouts, gamble round)
//! - `settings`: Tunable economy and audio preferences
//! - `audio`: Sound cue descriptions for an external synthesizer

pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{Command, Denial, GameEvent, GamePhase, GameState, Symbol};

/// Game configuration constants
///
/// Time values are milliseconds of simulation time.
pub mod consts {
    /// Fixed driver timestep
    pub const SIM_DT_MS: u32 = 10;

    /// Number of positions around the board perimeter
    pub const BOARD_SIZE: usize = 24;
    /// Number of symbols that accept bets
    pub const BETTABLE_COUNT: usize = 8;

    /// Spin length is drawn from BASE..BASE+SPREAD
    pub const SPIN_BASE_STEPS: u32 = 60;
    pub const SPIN_STEP_SPREAD: u32 = 24;
    /// Delay before the second step
    pub const SPIN_BASE_DELAY_MS: u32 = 30;
    /// Past this many steps every step gets slower
    pub const SPIN_SLOWDOWN_AFTER: u32 = 40;
    pub const SPIN_SLOWDOWN_MS: u32 = 5;
    /// Within this many steps of the end the light brakes hard
    pub const SPIN_BRAKE_WINDOW: u32 = 10;
    pub const SPIN_BRAKE_MS: u32 = 20;
    /// Pause between a chain-bonus landing and the free re-spin
    pub const CHAIN_BONUS_DELAY_MS: u32 = 1000;

    /// Interim die faces shown while the gamble reveal runs
    pub const GAMBLE_FLICKER_MS: u32 = 75;
    pub const GAMBLE_REVEAL_MS: u32 = 1200;
    /// Lost gamble rounds stay on screen this long before resetting
    pub const GAMBLE_SETTLE_MS: u32 = 1500;

    /// Jackpot pool grows by one credit per period
    pub const JACKPOT_ACCRUAL_MS: u32 = 2000;
    /// Reseed range after a jackpot pays out (half-open)
    pub const JACKPOT_RESEED_MIN: u64 = 40_000;
    pub const JACKPOT_RESEED_MAX: u64 = 50_000;
}
