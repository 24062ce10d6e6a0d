//! Commands and the simulation clock
//!
//! Commands change the session synchronously. Spin steps, gamble reveals and
//! jackpot accrual run on the simulation clock, which only moves inside
//! [`advance`]. Each step runs to completion before the next is considered.

use serde::{Deserialize, Serialize};

use super::board::{self, Symbol};
use super::denial::Denial;
use super::dice::{Dice, Draw};
use super::gamble::{self, Choice, Reveal};
use super::payout::{self, SpinOutcome};
use super::spin::{SpinRun, SpinStep};
use super::state::{GambleState, GameEvent, GamePhase, GameState, MessageKey, Step};
use crate::consts::*;

/// Player intents accepted from the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    PlaceBet(Symbol),
    ClearBets,
    BetMax,
    StartSpin,
    Gamble(Choice),
    Collect,
}

pub type CommandResult = Result<Vec<GameEvent>, Denial>;

/// Apply one command to the session
pub fn apply<D: Dice>(state: &mut GameState<D>, command: Command) -> CommandResult {
    let result = match command {
        Command::PlaceBet(symbol) => place_bet(state, symbol),
        Command::ClearBets => clear_bets(state),
        Command::BetMax => bet_max(state),
        Command::StartSpin => start_spin(state),
        Command::Gamble(choice) => choose_gamble(state, choice),
        Command::Collect => collect(state),
    };
    if let Err(denial) = &result {
        log::debug!("Denied {:?}: {}", command, denial);
    }
    result
}

/// Move the simulation clock forward by `dt_ms`, running every step that
/// falls due on the way, in order
pub fn advance<D: Dice>(state: &mut GameState<D>, dt_ms: u64) -> Vec<GameEvent> {
    let end = state.time_ms + dt_ms;
    let mut events = Vec::new();

    loop {
        let step_due = state.timer.map(|t| t.due_ms).filter(|&due| due <= end);
        let accrual_due = Some(state.next_accrual_ms).filter(|&due| due <= end);

        match (step_due, accrual_due) {
            (None, None) => break,
            (Some(step), Some(accrual)) if accrual < step => accrue_jackpot(state, &mut events),
            (Some(step), _) => {
                state.time_ms = step;
                if let Some(timer) = state.timer.take() {
                    run_step(state, timer.step, &mut events);
                }
            }
            (None, Some(_)) => accrue_jackpot(state, &mut events),
        }
    }

    state.time_ms = end;
    events
}

/// Advance straight to each scheduled step until the machine waits for input
pub fn run_until_input<D: Dice>(state: &mut GameState<D>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Some(due) = state.next_step_ms() {
        let dt = due.saturating_sub(state.time_ms);
        events.extend(advance(state, dt));
    }
    events
}

impl<D: Dice> GameState<D> {
    pub fn apply(&mut self, command: Command) -> CommandResult {
        apply(self, command)
    }

    pub fn place_bet(&mut self, symbol: Symbol) -> CommandResult {
        apply(self, Command::PlaceBet(symbol))
    }

    pub fn clear_bets(&mut self) -> CommandResult {
        apply(self, Command::ClearBets)
    }

    pub fn bet_max(&mut self) -> CommandResult {
        apply(self, Command::BetMax)
    }

    pub fn start_spin(&mut self) -> CommandResult {
        apply(self, Command::StartSpin)
    }

    pub fn choose_gamble(&mut self, choice: Choice) -> CommandResult {
        apply(self, Command::Gamble(choice))
    }

    pub fn collect(&mut self) -> CommandResult {
        apply(self, Command::Collect)
    }

    pub fn advance(&mut self, dt_ms: u64) -> Vec<GameEvent> {
        advance(self, dt_ms)
    }
}

fn require_idle<D>(state: &GameState<D>, command: Command) -> Result<(), Denial> {
    if state.phase != GamePhase::Idle {
        return Err(Denial::WrongPhase {
            command,
            phase: state.phase,
        });
    }
    Ok(())
}

fn require_gamble_ready<D>(state: &GameState<D>, command: Command) -> Result<(), Denial> {
    if state.phase != GamePhase::Gambling {
        return Err(Denial::WrongPhase {
            command,
            phase: state.phase,
        });
    }
    if state.gamble.revealing {
        return Err(Denial::RevealInProgress);
    }
    Ok(())
}

fn place_bet<D: Dice>(state: &mut GameState<D>, symbol: Symbol) -> CommandResult {
    require_idle(state, Command::PlaceBet(symbol))?;
    if !symbol.is_bettable() {
        return Err(Denial::NotBettable(symbol));
    }
    let unit = state.bet_unit;
    if state.credits < unit {
        return Err(Denial::InsufficientCredits {
            needed: unit,
            available: state.credits,
        });
    }

    state.credits -= unit;
    state.bets.add(symbol, unit);
    Ok(vec![
        GameEvent::CreditsChanged {
            credits: state.credits,
        },
        GameEvent::BetsChanged {
            total: state.total_bet(),
        },
    ])
}

fn clear_bets<D: Dice>(state: &mut GameState<D>) -> CommandResult {
    require_idle(state, Command::ClearBets)?;
    let refund = state.total_bet();
    if refund == 0 {
        return Err(Denial::NothingToClear);
    }

    state.credits += refund;
    state.bets.clear();
    Ok(vec![
        GameEvent::CreditsChanged {
            credits: state.credits,
        },
        GameEvent::BetsChanged { total: 0 },
    ])
}

fn bet_max<D: Dice>(state: &mut GameState<D>) -> CommandResult {
    require_idle(state, Command::BetMax)?;
    let cost = state.bet_max_cost();
    if state.credits < cost {
        return Err(Denial::InsufficientCredits {
            needed: cost,
            available: state.credits,
        });
    }

    state.credits -= cost;
    for symbol in board::BETTABLE {
        state.bets.add(symbol, state.max_bet_unit);
    }
    Ok(vec![
        GameEvent::CreditsChanged {
            credits: state.credits,
        },
        GameEvent::BetsChanged {
            total: state.total_bet(),
        },
    ])
}

fn start_spin<D: Dice>(state: &mut GameState<D>) -> CommandResult {
    require_idle(state, Command::StartSpin)?;
    if state.bets.is_empty() {
        return Err(Denial::NoBet);
    }

    state.phase = GamePhase::Spinning;
    state.message = MessageKey::Spinning;
    state.pending_win = 0;
    state.chain_count = 0;
    state.gamble = GambleState::default();

    let mut events = vec![
        GameEvent::PhaseChanged {
            phase: state.phase,
            message: state.message,
        },
        GameEvent::WinChanged { pending_win: 0 },
    ];
    begin_spin(state, &mut events);
    Ok(events)
}

fn choose_gamble<D: Dice>(state: &mut GameState<D>, choice: Choice) -> CommandResult {
    require_gamble_ready(state, Command::Gamble(choice))?;

    state.gamble = GambleState {
        face: None,
        revealing: true,
    };
    let mut reveal = Reveal::new(choice);
    let delay = reveal.next_beat();
    state.schedule(delay, Step::Reveal(reveal));
    log::debug!("Gamble {:?} on {}", choice, state.pending_win);
    Ok(vec![GameEvent::GambleStarted { choice }])
}

fn collect<D: Dice>(state: &mut GameState<D>) -> CommandResult {
    require_gamble_ready(state, Command::Collect)?;

    let won = state.pending_win;
    state.credits = state.credits.saturating_add(won);
    state.pending_win = 0;
    state.bets.clear();
    state.gamble = GambleState::default();
    state.phase = GamePhase::Idle;
    state.message = MessageKey::PlaceYourBet;
    log::info!("Collected {} (credits now {})", won, state.credits);

    Ok(vec![
        GameEvent::CreditsChanged {
            credits: state.credits,
        },
        GameEvent::WinChanged { pending_win: 0 },
        GameEvent::BetsChanged { total: 0 },
        GameEvent::PhaseChanged {
            phase: state.phase,
            message: state.message,
        },
    ])
}

fn accrue_jackpot<D>(state: &mut GameState<D>, events: &mut Vec<GameEvent>) {
    state.time_ms = state.next_accrual_ms;
    state.jackpot = state.jackpot.saturating_add(1);
    state.next_accrual_ms += u64::from(JACKPOT_ACCRUAL_MS);
    events.push(GameEvent::JackpotChanged {
        pool: state.jackpot,
    });
}

fn run_step<D: Dice>(state: &mut GameState<D>, step: Step, events: &mut Vec<GameEvent>) {
    match step {
        Step::Spin(run) => step_spin(state, run, events),
        Step::ChainRespin => {
            state.message = MessageKey::Spinning;
            events.push(GameEvent::PhaseChanged {
                phase: state.phase,
                message: state.message,
            });
            begin_spin(state, events);
        }
        Step::Reveal(reveal) => step_reveal(state, reveal, events),
        Step::Settle => {
            state.bets.clear();
            state.gamble = GambleState::default();
            state.phase = GamePhase::Idle;
            events.push(GameEvent::BetsChanged { total: 0 });
            events.push(GameEvent::PhaseChanged {
                phase: state.phase,
                message: state.message,
            });
        }
    }
}

/// Draw the spin length up front, then take the first step immediately
fn begin_spin<D: Dice>(state: &mut GameState<D>, events: &mut Vec<GameEvent>) {
    let run = SpinRun::draw(state.light, &mut state.dice);
    log::debug!(
        "Spin from {} for {} steps (lands on {})",
        run.start,
        run.total_steps,
        run.landing()
    );
    step_spin(state, run, events);
}

fn step_spin<D: Dice>(state: &mut GameState<D>, mut run: SpinRun, events: &mut Vec<GameEvent>) {
    match run.step() {
        SpinStep::Moving { index, delay_ms } => {
            log::trace!("Light at {}", index);
            state.light = index;
            events.push(GameEvent::LightMoved { index });
            state.schedule(delay_ms, Step::Spin(run));
        }
        SpinStep::Landed { index } => {
            state.light = index;
            events.push(GameEvent::LightMoved { index });
            land(state, index, events);
        }
    }
}

fn land<D: Dice>(state: &mut GameState<D>, index: usize, events: &mut Vec<GameEvent>) {
    let position = board::position_at(index);
    let outcome = payout::resolve(position, &state.bets, state.jackpot);
    log::debug!("Landed on {} ({}): {:?}", index, position.label(), outcome);
    events.push(GameEvent::SpinResolved { index, outcome });

    match outcome {
        SpinOutcome::ChainBonus => {
            state.chain_count += 1;
            state.message = MessageKey::ChainBonus;
            log::info!("Chain bonus #{} at {}", state.chain_count, index);
            events.push(GameEvent::PhaseChanged {
                phase: state.phase,
                message: state.message,
            });
            state.schedule(CHAIN_BONUS_DELAY_MS, Step::ChainRespin);
        }
        SpinOutcome::Loss => {
            state.bets.clear();
            state.phase = GamePhase::Idle;
            state.message = MessageKey::LostTryAgain;
            events.push(GameEvent::BetsChanged { total: 0 });
            events.push(GameEvent::PhaseChanged {
                phase: state.phase,
                message: state.message,
            });
        }
        SpinOutcome::Win { amount } => {
            enter_gamble(state, amount, MessageKey::WonGambleOrCollect, events);
        }
        SpinOutcome::Jackpot { amount } => {
            state.jackpot = state
                .dice
                .draw(Draw::JackpotReseed, JACKPOT_RESEED_MIN..JACKPOT_RESEED_MAX);
            log::info!("Jackpot of {} won, pool reseeded to {}", amount, state.jackpot);
            events.push(GameEvent::JackpotChanged {
                pool: state.jackpot,
            });
            enter_gamble(state, amount, MessageKey::JackpotWon, events);
        }
    }
}

fn enter_gamble<D>(
    state: &mut GameState<D>,
    amount: u64,
    message: MessageKey,
    events: &mut Vec<GameEvent>,
) {
    state.pending_win = amount;
    state.gamble = GambleState::default();
    state.phase = GamePhase::Gambling;
    state.message = message;
    events.push(GameEvent::WinChanged {
        pending_win: amount,
    });
    events.push(GameEvent::PhaseChanged {
        phase: state.phase,
        message: state.message,
    });
}

fn step_reveal<D: Dice>(state: &mut GameState<D>, mut reveal: Reveal, events: &mut Vec<GameEvent>) {
    if !reveal.is_final() {
        let face = gamble::flicker_face(&mut state.dice);
        log::trace!("Gamble flicker {}", face);
        state.gamble.face = Some(face);
        events.push(GameEvent::GambleFlicker { face });
        let delay = reveal.next_beat();
        state.schedule(delay, Step::Reveal(reveal));
        return;
    }

    let face = gamble::roll_face(&mut state.dice);
    let outcome = gamble::resolve(reveal.choice, face, state.pending_win);
    log::info!(
        "Gamble {:?} rolled {}: {}",
        reveal.choice,
        face,
        if outcome.won { "won" } else { "lost" }
    );

    state.gamble.face = Some(face);
    state.pending_win = outcome.pending_win;
    events.push(GameEvent::GambleResolved {
        choice: reveal.choice,
        face,
        won: outcome.won,
        pending_win: outcome.pending_win,
    });
    events.push(GameEvent::WinChanged {
        pending_win: outcome.pending_win,
    });

    if outcome.won {
        state.gamble.revealing = false;
        state.message = MessageKey::WonGambleOrCollect;
    } else {
        // Stays locked until the settle step returns the machine to idle
        state.message = MessageKey::LostTryAgain;
        state.schedule(GAMBLE_SETTLE_MS, Step::Settle);
    }
    events.push(GameEvent::PhaseChanged {
        phase: state.phase,
        message: state.message,
    });
}
