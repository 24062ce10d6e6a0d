//! Small Mary entry point
//!
//! Console driver: reads commands from stdin and runs the fixed-timestep
//! loop between them.
//!
//! Usage: `small-mary [seed] [settings.json]`

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

use small_mary::audio::{AudioManager, LogSink, SoundEffect, cue_for_command};
use small_mary::consts::SIM_DT_MS;
use small_mary::settings::Settings;
use small_mary::sim::{
    self, Choice, Command, GameEvent, GamePhase, GameState, SeededDice, Symbol, autoplay, board,
};

/// Machine plus its audio hook
struct Game {
    state: GameState,
    audio: AudioManager<LogSink>,
    /// Wall time already fed to the simulation
    last_update: Instant,
    accumulator_ms: u64,
}

impl Game {
    fn new(seed: u64, settings: &Settings) -> Self {
        let dice = SeededDice::new(seed);
        log::info!("Game initialized with seed: {}", dice.seed());
        Self {
            state: GameState::with_settings(settings, dice),
            audio: AudioManager::new(LogSink, settings),
            last_update: Instant::now(),
            accumulator_ms: 0,
        }
    }

    /// Feed real time spent at the prompt into the simulation
    fn catch_up(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_millis();
        self.last_update = now;
        self.elapse(u64::try_from(elapsed).unwrap_or(u64::MAX));
    }

    /// Run whole fixed steps out of `elapsed_ms`, carrying the remainder
    fn elapse(&mut self, elapsed_ms: u64) {
        let dt = u64::from(SIM_DT_MS);
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        while self.accumulator_ms >= dt {
            let events = self.state.advance(dt);
            self.report(&events);
            self.accumulator_ms -= dt;
        }
    }

    /// Issue a command and run the machine until it needs input again
    fn issue(&mut self, command: Command) {
        self.catch_up();
        match sim::apply(&mut self.state, command) {
            Ok(events) => {
                self.audio.play(cue_for_command(&command));
                self.report(&events);
                self.run();
            }
            Err(denial) => {
                self.audio.play(SoundEffect::Error);
                match denial.message() {
                    Some(message) => println!("! {} ({})", message.text(), denial),
                    None => println!("! {}", denial),
                }
            }
        }
    }

    /// Fixed timestep loop until nothing is scheduled
    fn run(&mut self) {
        while !self.state.awaiting_input() {
            let events = self.state.advance(u64::from(SIM_DT_MS));
            self.report(&events);
        }
        // Time played out by the machine is not time the player waited
        self.last_update = Instant::now();
    }

    /// `volume <0-100>`, `sfx <0-100>`, `mute` or `unmute`
    fn adjust_audio(&mut self, line: &str) -> Result<(), String> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let mut level = || -> Result<f32, String> {
            words
                .next()
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|&n| n <= 100)
                .map(|n| f32::from(n) / 100.0)
                .ok_or_else(|| format!("{} needs a number from 0 to 100", verb))
        };
        match verb {
            "volume" => self.audio.set_master_volume(level()?),
            "sfx" => self.audio.set_sfx_volume(level()?),
            "mute" => self.audio.set_muted(true),
            "unmute" => self.audio.set_muted(false),
            other => return Err(format!("unknown audio command '{}'", other)),
        }
        Ok(())
    }

    fn report(&mut self, events: &[GameEvent]) {
        self.audio.play_events(events);
        for event in events {
            match event {
                GameEvent::LightMoved { .. } | GameEvent::GambleFlicker { .. } => {}
                GameEvent::SpinResolved { index, outcome } => {
                    let position = board::position_at(*index);
                    println!("  landed on {} ({}) -> {:?}", index, position.label(), outcome);
                }
                GameEvent::GambleResolved { face, won, pending_win, .. } => {
                    let verdict = if *won { "win" } else { "lose" };
                    println!("  die shows {}: {} (win now {})", face, verdict, pending_win);
                }
                GameEvent::PhaseChanged { message, .. } => println!("  {}", message.text()),
                other => log::debug!("{:?}", other),
            }
        }
    }

    fn autoplay(&mut self, rounds: u32) {
        let mut played = 0;
        while played < rounds {
            let Some(command) = autoplay::next_command(&self.state) else {
                println!("  demo player is out of credits");
                break;
            };
            if command == Command::StartSpin {
                played += 1;
            }
            self.issue(command);
        }
        // Leave the machine ready for bets
        if self.state.phase == GamePhase::Gambling {
            self.issue(Command::Collect);
        }
    }

    fn status_line(&self) -> String {
        let s = &self.state;
        format!(
            "[{:?}] credits {:04} | bet {:02} | win {:04} | jackpot {} | light {}",
            s.phase,
            s.credits,
            s.total_bet(),
            s.pending_win,
            s.jackpot,
            s.light
        )
    }
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let command = match verb.to_lowercase().as_str() {
        "bet" | "b" => {
            let name = words.next().ok_or("bet needs a symbol")?;
            let symbol = Symbol::from_name(name).ok_or_else(|| format!("unknown symbol '{}'", name))?;
            Command::PlaceBet(symbol)
        }
        "clear" | "c" => Command::ClearBets,
        "max" | "m" => Command::BetMax,
        "start" | "s" => Command::StartSpin,
        "big" => Command::Gamble(Choice::Big),
        "small" => Command::Gamble(Choice::Small),
        "collect" | "take" => Command::Collect,
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
}

fn is_audio_command(line: &str) -> bool {
    matches!(
        line.split_whitespace().next(),
        Some("volume" | "sfx" | "mute" | "unmute")
    )
}

fn print_help() {
    println!("commands: bet <symbol> | clear | max | start | big | small | collect");
    println!("          volume <0-100> | sfx <0-100> | mute | unmute");
    println!("          auto [rounds] | status | board | help | quit");
    let symbols: Vec<&str> = board::BETTABLE.iter().map(|s| s.name()).collect();
    println!("symbols:  {}", symbols.join(", "));
}

fn print_board() {
    for (index, position) in board::BOARD.iter().enumerate() {
        let (col, row) = board::grid_cell(index);
        println!("  {:2} @ ({}, {}) {}", index, col, row, position.label());
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Small Mary starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
    let settings = match args.get(1) {
        Some(path) => Settings::load(Path::new(path)),
        None => Settings::default(),
    };

    let mut game = Game::new(seed, &settings);
    print_help();
    println!("{}", game.status_line());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        game.catch_up();
        let trimmed = line.trim();
        match trimmed {
            "quit" | "exit" | "q" => break,
            "help" | "?" => print_help(),
            "board" => print_board(),
            "status" => match serde_json::to_string_pretty(&game.state.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Snapshot failed: {}", e),
            },
            _ if is_audio_command(trimmed) => {
                if let Err(e) = game.adjust_audio(trimmed) {
                    println!("! {}", e);
                }
            }
            _ if trimmed.starts_with("auto") => {
                let rounds = trimmed
                    .split_whitespace()
                    .nth(1)
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(10);
                game.autoplay(rounds);
            }
            _ => match parse_command(trimmed) {
                Ok(Some(command)) => game.issue(command),
                Ok(None) => {}
                Err(e) => println!("! {}", e),
            },
        }
        println!("{}", game.status_line());
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    log::info!("Small Mary exiting with {} credits", game.state.credits);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("bet apple"), Ok(Some(Command::PlaceBet(Symbol::Apple))));
        assert_eq!(parse_command("  MAX "), Ok(Some(Command::BetMax)));
        assert_eq!(parse_command("big"), Ok(Some(Command::Gamble(Choice::Big))));
        assert_eq!(parse_command(""), Ok(None));
        assert!(parse_command("bet").is_err());
        assert!(parse_command("bet jp").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_waiting_at_prompt_accrues_jackpot() {
        let mut game = Game::new(1, &Settings::default());
        game.elapse(4_005);
        assert_eq!(game.state.jackpot, 44_229);
        assert_eq!(game.state.time_ms, 4_000);
        assert_eq!(game.accumulator_ms, 5);
        game.elapse(5);
        assert_eq!(game.state.time_ms, 4_010);
        assert_eq!(game.accumulator_ms, 0);
    }

    #[test]
    fn test_commands_see_wall_time_first() {
        let mut game = Game::new(1, &Settings::default());
        game.last_update = Instant::now() - std::time::Duration::from_millis(2_100);
        game.issue(Command::PlaceBet(Symbol::Apple));
        assert_eq!(game.state.jackpot, 44_228);
        assert!(game.state.time_ms >= 2_100);
        assert_eq!(game.state.bets.get(Symbol::Apple), 1);
    }

    #[test]
    fn test_audio_commands() {
        let mut game = Game::new(3, &Settings::default());
        assert!(is_audio_command("volume 40"));
        assert!(!is_audio_command("bet apple"));
        assert_eq!(game.adjust_audio("volume 40"), Ok(()));
        assert_eq!(game.adjust_audio("sfx 100"), Ok(()));
        assert_eq!(game.adjust_audio("mute"), Ok(()));
        assert!(game.adjust_audio("volume 101").is_err());
        assert!(game.adjust_audio("sfx").is_err());
    }

    #[test]
    fn test_autoplay_leaves_machine_idle() {
        let mut game = Game::new(77, &Settings::default());
        game.autoplay(5);
        assert_eq!(game.state.phase, GamePhase::Idle);
        assert!(game.state.awaiting_input());
    }
}
