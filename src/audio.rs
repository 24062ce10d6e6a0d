//! Sound cues for the cabinet
//!
//! Each effect is a short score of oscillator notes. Turning notes into
//! sound is the job of a [`ToneSink`]; the simulation only says what to play.

use crate::settings::Settings;
use crate::sim::{Command, GameEvent, SpinOutcome};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Single bet placed
    Bet,
    /// Bet-max accepted
    BetAll,
    /// Bets cleared
    Clear,
    /// Spin or gamble started
    Start,
    /// Chasing light stepped
    Tick,
    Win,
    Jackpot,
    Lose,
    Collect,
    /// Chain bonus landed
    OnceMore,
    /// Command refused
    Error,
    GambleTick,
    GambleWin,
    GambleLose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
    /// White noise burst (frequency ignored)
    Noise,
}

/// One oscillator note relative to the start of its effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f32,
    pub offset: f32,
    pub duration: f32,
    pub waveform: Waveform,
    pub volume: f32,
}

const fn note(frequency: f32, offset: f32, duration: f32, waveform: Waveform, volume: f32) -> Note {
    Note {
        frequency,
        offset,
        duration,
        waveform,
        volume,
    }
}

use Waveform::*;

const BET: &[Note] = &[note(880.0, 0.0, 0.1, Triangle, 0.3)];
const BET_ALL: &[Note] = &[
    note(523.0, 0.0, 0.1, Square, 0.4),
    note(659.0, 0.1, 0.1, Square, 0.4),
];
const CLEAR: &[Note] = &[note(0.0, 0.0, 0.3, Noise, 0.1)];
const START: &[Note] = &[
    note(261.0, 0.0, 0.1, Square, 0.4),
    note(329.0, 0.1, 0.1, Square, 0.4),
    note(392.0, 0.2, 0.1, Square, 0.4),
];
const TICK: &[Note] = &[note(465.0, 0.0, 0.05, Square, 0.15)];
const WIN: &[Note] = &[
    note(523.0, 0.0, 0.1, Sine, 0.5),
    note(659.0, 0.1, 0.1, Sine, 0.5),
    note(783.0, 0.2, 0.1, Sine, 0.5),
    note(1046.0, 0.3, 0.2, Sine, 0.5),
];
const JACKPOT: &[Note] = &[
    note(440.0, 0.0, 0.05, Sawtooth, 0.4),
    note(490.0, 0.05, 0.05, Sawtooth, 0.4),
    note(540.0, 0.1, 0.05, Sawtooth, 0.4),
    note(590.0, 0.15, 0.05, Sawtooth, 0.4),
    note(640.0, 0.2, 0.05, Sawtooth, 0.4),
    note(690.0, 0.25, 0.05, Sawtooth, 0.4),
    note(740.0, 0.3, 0.05, Sawtooth, 0.4),
    note(790.0, 0.35, 0.05, Sawtooth, 0.4),
    note(840.0, 0.4, 0.05, Sawtooth, 0.4),
    note(890.0, 0.45, 0.05, Sawtooth, 0.4),
    note(940.0, 0.5, 0.05, Sawtooth, 0.4),
    note(990.0, 0.55, 0.05, Sawtooth, 0.4),
    note(1040.0, 0.6, 0.05, Sawtooth, 0.4),
    note(1090.0, 0.65, 0.05, Sawtooth, 0.4),
    note(1140.0, 0.7, 0.05, Sawtooth, 0.4),
    note(1190.0, 0.75, 0.05, Sawtooth, 0.4),
    // Closing chord
    note(880.0, 0.8, 0.4, Sine, 0.5),
    note(1108.0, 0.8, 0.4, Sine, 0.5),
    note(1318.0, 0.8, 0.4, Sine, 0.5),
];
const LOSE: &[Note] = &[note(220.0, 0.0, 0.5, Sawtooth, 0.4)];
const COLLECT: &[Note] = &[
    note(1046.0, 0.0, 0.1, Sine, 0.6),
    note(1318.0, 0.1, 0.15, Sine, 0.6),
];
const ONCE_MORE: &[Note] = &[
    note(392.0, 0.0, 0.1, Triangle, 0.5),
    note(523.0, 0.15, 0.2, Triangle, 0.5),
];
const ERROR: &[Note] = &[note(110.0, 0.0, 0.2, Sawtooth, 0.4)];
const GAMBLE_TICK: &[Note] = &[note(1300.0, 0.0, 0.05, Square, 0.2)];
const GAMBLE_WIN: &[Note] = &[
    note(783.0, 0.0, 0.1, Triangle, 0.5),
    note(1046.0, 0.1, 0.1, Triangle, 0.5),
    note(1318.0, 0.2, 0.2, Triangle, 0.5),
];
const GAMBLE_LOSE: &[Note] = &[
    note(220.0, 0.0, 0.2, Sawtooth, 0.4),
    note(164.0, 0.2, 0.3, Sawtooth, 0.4),
];

impl SoundEffect {
    pub fn notes(&self) -> &'static [Note] {
        match self {
            SoundEffect::Bet => BET,
            SoundEffect::BetAll => BET_ALL,
            SoundEffect::Clear => CLEAR,
            SoundEffect::Start => START,
            SoundEffect::Tick => TICK,
            SoundEffect::Win => WIN,
            SoundEffect::Jackpot => JACKPOT,
            SoundEffect::Lose => LOSE,
            SoundEffect::Collect => COLLECT,
            SoundEffect::OnceMore => ONCE_MORE,
            SoundEffect::Error => ERROR,
            SoundEffect::GambleTick => GAMBLE_TICK,
            SoundEffect::GambleWin => GAMBLE_WIN,
            SoundEffect::GambleLose => GAMBLE_LOSE,
        }
    }
}

/// Cue for an accepted command
pub fn cue_for_command(command: &Command) -> SoundEffect {
    match command {
        Command::PlaceBet(_) => SoundEffect::Bet,
        Command::ClearBets => SoundEffect::Clear,
        Command::BetMax => SoundEffect::BetAll,
        Command::StartSpin | Command::Gamble(_) => SoundEffect::Start,
        Command::Collect => SoundEffect::Collect,
    }
}

/// Cue for a simulation event, if it has one
pub fn cue_for_event(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::LightMoved { .. } => Some(SoundEffect::Tick),
        GameEvent::SpinResolved { outcome, .. } => Some(match outcome {
            SpinOutcome::ChainBonus => SoundEffect::OnceMore,
            SpinOutcome::Loss => SoundEffect::Lose,
            SpinOutcome::Win { .. } => SoundEffect::Win,
            SpinOutcome::Jackpot { .. } => SoundEffect::Jackpot,
        }),
        GameEvent::GambleFlicker { .. } => Some(SoundEffect::GambleTick),
        GameEvent::GambleResolved { won: true, .. } => Some(SoundEffect::GambleWin),
        GameEvent::GambleResolved { won: false, .. } => Some(SoundEffect::GambleLose),
        _ => None,
    }
}

/// Something that can turn notes into sound
pub trait ToneSink {
    fn play_note(&mut self, note: &Note);
}

/// Sink that only traces what would be played
#[derive(Debug, Default)]
pub struct LogSink;

impl ToneSink for LogSink {
    fn play_note(&mut self, note: &Note) {
        log::trace!(
            "{:?} {:.0}Hz +{:.2}s for {:.2}s at {:.2}",
            note.waveform,
            note.frequency,
            note.offset,
            note.duration,
            note.volume
        );
    }
}

/// Audio manager for the machine
pub struct AudioManager<S> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: ToneSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let settings = settings.validated();
        Self {
            sink,
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        for n in effect.notes() {
            let scaled = Note {
                volume: n.volume * vol,
                ..*n
            };
            self.sink.play_note(&scaled);
        }
    }

    /// Play the cues for a batch of events in order
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(cue_for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Choice, Symbol};

    #[derive(Default)]
    struct Recorder(Vec<Note>);

    impl ToneSink for Recorder {
        fn play_note(&mut self, note: &Note) {
            self.0.push(*note);
        }
    }

    #[test]
    fn test_every_effect_has_notes() {
        use SoundEffect::*;
        for effect in [
            Bet, BetAll, Clear, Start, Tick, Win, Jackpot, Lose, Collect, OnceMore, Error,
            GambleTick, GambleWin, GambleLose,
        ] {
            assert!(!effect.notes().is_empty(), "{:?}", effect);
        }
        assert_eq!(SoundEffect::Jackpot.notes().len(), 19);
    }

    #[test]
    fn test_volume_scales_notes() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let mut audio = AudioManager::new(Recorder::default(), &settings);
        audio.play(SoundEffect::Bet);
        assert_eq!(audio.sink().0.len(), 1);
        assert!((audio.sink().0[0].volume - 0.3 * 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_volume_setters_clamp() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(0.5);
        audio.play(SoundEffect::Tick);
        assert!((audio.sink().0[0].volume - 0.15 * 0.5).abs() < 1e-6);

        audio.set_sfx_volume(-1.0);
        audio.play(SoundEffect::Tick);
        assert_eq!(audio.sink().0.len(), 1);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Win);
        assert!(audio.sink().0.is_empty());
    }

    #[test]
    fn test_event_cues() {
        assert_eq!(
            cue_for_event(&GameEvent::SpinResolved {
                index: 4,
                outcome: SpinOutcome::Jackpot { amount: 1 }
            }),
            Some(SoundEffect::Jackpot)
        );
        assert_eq!(
            cue_for_event(&GameEvent::GambleResolved {
                choice: Choice::Big,
                face: 2,
                won: false,
                pending_win: 0
            }),
            Some(SoundEffect::GambleLose)
        );
        assert_eq!(cue_for_event(&GameEvent::JackpotChanged { pool: 1 }), None);
        assert_eq!(cue_for_command(&Command::PlaceBet(Symbol::Apple)), SoundEffect::Bet);
        assert_eq!(cue_for_command(&Command::Gamble(Choice::Small)), SoundEffect::Start);
    }
}
