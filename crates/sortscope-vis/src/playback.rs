//! Playback state machine for a single sorting run.
//!
//! ```text
//!            start                 pause
//!   Idle ───────────► Running ◄──────────► Paused
//!    ▲                  │       resume        │
//!    │    stop / final  │                     │ stop
//!    └──────────────────┴─────────────────────┘
//! ```
//!
//! Calls that make no sense in the current state are no-ops and return
//! `false`. [`Playback`] is synchronous; the timed drive loop lives in
//! [`Controller`](crate::Controller).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sortscope_steps::{Algorithm, Pull, RunCounters, StepGenerator};
use tracing::{debug, info, trace};

use crate::events::{Frame, Value};

/// Floor for the inter-step delay.
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(1);

/// How often a paused run checks whether it may continue.
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Delay at speed zero; each speed unit takes off [`MS_PER_SPEED_UNIT`].
const BASE_DELAY_MS: u64 = 500;
const MS_PER_SPEED_UNIT: u64 = 5;

/// Playback speed on a bounded `1..=100` scale. Higher is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct PlaybackSpeed(u8);

impl PlaybackSpeed {
    pub const MIN: PlaybackSpeed = PlaybackSpeed(1);
    pub const MAX: PlaybackSpeed = PlaybackSpeed(100);

    /// Create a speed, clamping into range.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Pause between two published steps at this speed.
    pub fn step_delay(&self) -> Duration {
        let ms = BASE_DELAY_MS.saturating_sub(u64::from(self.0) * MS_PER_SPEED_UNIT);
        Duration::from_millis(ms).max(MIN_STEP_DELAY)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(50)
    }
}

impl From<u8> for PlaybackSpeed {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<PlaybackSpeed> for u8 {
    fn from(speed: PlaybackSpeed) -> Self {
        speed.0
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No run is active
    #[default]
    Idle,
    /// Steps are being pulled and published
    Running,
    /// A run is active but no steps are pulled
    Paused,
}

impl PlaybackState {
    pub fn is_active(&self) -> bool {
        !matches!(self, PlaybackState::Idle)
    }
}

/// Result of one [`Playback::advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A step was pulled; publish it and wait one step delay.
    Published(Frame),
    /// The run completed; publish the final frame. Playback is now idle.
    Finished(Frame),
    /// The run is paused; nothing was pulled.
    Paused,
    /// No run is active.
    Idle,
}

/// Playback controller for one sequence and at most one active run.
pub struct Playback {
    frame: Frame,
    state: PlaybackState,
    speed: PlaybackSpeed,
    generator: Option<Box<dyn StepGenerator<Value>>>,
    algorithm: Option<Algorithm>,
    counters: RunCounters,
    run_id: u64,
    steps_published: u64,
}

impl Playback {
    /// Create an idle playback over `data`.
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            frame: Frame::plain(data),
            state: PlaybackState::Idle,
            speed: PlaybackSpeed::default(),
            generator: None,
            algorithm: None,
            counters: RunCounters::default(),
            run_id: 0,
            steps_published: 0,
        }
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Set playback speed. Applies from the next scheduled delay on.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        debug!(speed = speed.value(), "playback speed changed");
        self.speed = speed;
    }

    /// Counters as of the latest published step.
    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// The last published frame. Between runs this is the sequence itself.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The sequence as last published.
    pub fn data(&self) -> &[Value] {
        &self.frame.elements
    }

    /// Identifies the current (or most recent) run.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Algorithm of the current (or most recent) run.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    /// Number of steps published in the current (or most recent) run.
    pub fn steps_published(&self) -> u64 {
        self.steps_published
    }

    /// Start a run over the current sequence. Only allowed while idle.
    pub fn start(&mut self, algorithm: Algorithm) -> bool {
        if self.state.is_active() {
            return false;
        }
        self.counters = RunCounters::default();
        self.steps_published = 0;
        self.frame.highlighted.clear();
        self.generator = Some(algorithm.generator(&self.frame.elements));
        self.algorithm = Some(algorithm);
        self.run_id += 1;
        self.state = PlaybackState::Running;
        info!(run = self.run_id, %algorithm, len = self.frame.elements.len(), "run started");
        true
    }

    /// Pause a running run.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.state = PlaybackState::Paused;
        debug!(run = self.run_id, "run paused");
        true
    }

    /// Resume a paused run.
    pub fn resume(&mut self) -> bool {
        if self.state != PlaybackState::Paused {
            return false;
        }
        self.state = PlaybackState::Running;
        debug!(run = self.run_id, "run resumed");
        true
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle => false,
        }
    }

    /// Abandon the active run. The last published snapshot becomes the
    /// sequence; counters keep their last published values.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.generator = None;
        self.frame.highlighted.clear();
        self.state = PlaybackState::Idle;
        info!(run = self.run_id, steps = self.steps_published, "run stopped");
        true
    }

    /// Replace the sequence. Only allowed while idle; resets counters.
    pub fn regenerate(&mut self, data: Vec<Value>) -> bool {
        if self.state.is_active() {
            return false;
        }
        debug!(len = data.len(), "sequence regenerated");
        self.frame = Frame::plain(data);
        self.counters = RunCounters::default();
        self.steps_published = 0;
        true
    }

    /// Pull at most one step from the active run.
    pub fn advance(&mut self) -> Advance {
        match self.state {
            PlaybackState::Idle => return Advance::Idle,
            PlaybackState::Paused => return Advance::Paused,
            PlaybackState::Running => {}
        }
        let Some(generator) = self.generator.as_mut() else {
            self.state = PlaybackState::Idle;
            return Advance::Idle;
        };

        match generator.pull() {
            Pull::Step(step) => {
                self.frame = Frame {
                    elements: step.elements,
                    highlighted: step.highlighted,
                };
                self.counters = step.counters;
                self.steps_published += 1;
                trace!(
                    run = self.run_id,
                    step = self.steps_published,
                    highlighted = ?self.frame.highlighted,
                    "step published"
                );
                Advance::Published(self.frame.clone())
            }
            Pull::Finished(fin) => {
                self.frame = Frame {
                    elements: fin.elements,
                    highlighted: fin.highlighted,
                };
                self.finish()
            }
            Pull::Exhausted => {
                self.frame.highlighted.clear();
                self.finish()
            }
        }
    }

    fn finish(&mut self) -> Advance {
        self.generator = None;
        self.state = PlaybackState::Idle;
        info!(
            run = self.run_id,
            steps = self.steps_published,
            comparisons = self.counters.comparisons,
            swaps = self.counters.swaps,
            writes = self.counters.writes,
            "run finished"
        );
        Advance::Finished(self.frame.clone())
    }

    /// Which controls make sense right now.
    pub fn controls(&self) -> ControlAvailability {
        ControlAvailability::for_state(self.state)
    }
}

impl std::fmt::Debug for Playback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playback")
            .field("state", &self.state)
            .field("speed", &self.speed)
            .field("algorithm", &self.algorithm)
            .field("run_id", &self.run_id)
            .field("counters", &self.counters)
            .field("len", &self.frame.elements.len())
            .finish()
    }
}

/// Which controls a UI should enable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlAvailability {
    pub generate: bool,
    pub run: bool,
    pub pause: bool,
    pub pause_label: &'static str,
    pub stop: bool,
    pub size: bool,
    pub algorithm: bool,
}

impl ControlAvailability {
    pub fn for_state(state: PlaybackState) -> Self {
        let idle = !state.is_active();
        Self {
            generate: idle,
            run: state != PlaybackState::Running,
            pause: !idle,
            pause_label: if state == PlaybackState::Paused { "Resume" } else { "Pause" },
            stop: !idle,
            size: idle,
            algorithm: idle,
        }
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub step_delay_ms: u64,
    pub algorithm: Option<Algorithm>,
    pub counters: RunCounters,
    pub len: usize,
    pub run_id: u64,
    pub steps_published: u64,
    pub controls: ControlAvailability,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            state: playback.state,
            speed: playback.speed,
            step_delay_ms: u64::try_from(playback.speed.step_delay().as_millis()).unwrap_or(u64::MAX),
            algorithm: playback.algorithm,
            counters: playback.counters,
            len: playback.frame.elements.len(),
            run_id: playback.run_id,
            steps_published: playback.steps_published,
            controls: playback.controls(),
        }
    }
}
