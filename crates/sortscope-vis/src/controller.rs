//! Async driver that plays a run at the configured speed.
//!
//! Each run gets its own drive task. The task pulls one step, publishes it,
//! sleeps for the step delay, and repeats; while paused it polls every
//! [`PAUSE_POLL_INTERVAL`] without pulling. `stop` aborts the task through
//! its handle. The task also checks the run id under the lock, so a task
//! that outlives its run can never publish into a newer one.

use std::sync::Arc;

use sortscope_steps::{Algorithm, RunCounters};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::dataset::{DataSource, MAX_SIZE};
use crate::error::Result;
use crate::events::{CounterDisplay, Frame, Renderer, StatusListener};
use crate::playback::{Advance, Playback, PlaybackSpeed, PlaybackStatus, PAUSE_POLL_INTERVAL};

/// Collaborators that receive everything the controller publishes.
#[derive(Clone)]
struct Outputs {
    renderer: Arc<dyn Renderer>,
    counters: Arc<dyn CounterDisplay>,
    status: Option<Arc<dyn StatusListener>>,
}

impl Outputs {
    fn draw(&self, frame: &Frame) {
        self.renderer.draw(&frame.elements, &frame.highlighted);
    }

    fn notify(&self, playback: &Playback) {
        if let Some(listener) = &self.status {
            listener.status_changed(&PlaybackStatus::from(playback));
        }
    }
}

/// Drives a [`Playback`] in real time and publishes its frames.
pub struct Controller {
    playback: Arc<Mutex<Playback>>,
    source: Mutex<Box<dyn DataSource>>,
    driver: Mutex<Option<JoinHandle<()>>>,
    outputs: Outputs,
}

impl Controller {
    /// Create a controller over an initial sequence of `size` elements.
    pub fn new(
        mut source: Box<dyn DataSource>,
        size: usize,
        renderer: Arc<dyn Renderer>,
        counters: Arc<dyn CounterDisplay>,
    ) -> Self {
        let data = source.generate(size.min(MAX_SIZE));
        Self {
            playback: Arc::new(Mutex::new(Playback::new(data))),
            source: Mutex::new(source),
            driver: Mutex::new(None),
            outputs: Outputs {
                renderer,
                counters,
                status: None,
            },
        }
    }

    /// Also report state and settings changes to `listener`.
    pub fn with_status_listener(mut self, listener: Arc<dyn StatusListener>) -> Self {
        self.outputs.status = Some(listener);
        self
    }

    /// Start a run over the current sequence. No-op unless idle.
    pub async fn start(&self, algorithm: Algorithm) -> bool {
        let mut playback = self.playback.lock().await;
        if !playback.start(algorithm) {
            return false;
        }
        self.outputs.counters.show(playback.counters());
        self.outputs.notify(&playback);

        let task = tokio::spawn(drive(
            Arc::clone(&self.playback),
            self.outputs.clone(),
            playback.run_id(),
        ));
        if let Some(previous) = self.driver.lock().await.replace(task) {
            previous.abort();
        }
        true
    }

    /// Start a run by algorithm identifier.
    ///
    /// An unknown identifier means the controls are miswired, so it fails
    /// instead of being ignored.
    pub async fn start_named(&self, id: &str) -> Result<bool> {
        let algorithm = id.parse::<Algorithm>().map_err(|e| {
            error!(id = %id, "start requested with unknown algorithm");
            e
        })?;
        Ok(self.start(algorithm).await)
    }

    /// Pause a running run.
    pub async fn pause(&self) -> bool {
        let mut playback = self.playback.lock().await;
        let changed = playback.pause();
        if changed {
            self.outputs.notify(&playback);
        }
        changed
    }

    /// Resume a paused run.
    pub async fn resume(&self) -> bool {
        let mut playback = self.playback.lock().await;
        let changed = playback.resume();
        if changed {
            self.outputs.notify(&playback);
        }
        changed
    }

    /// Pause if running, resume if paused.
    pub async fn toggle_pause(&self) -> bool {
        let mut playback = self.playback.lock().await;
        let changed = playback.toggle_pause();
        if changed {
            self.outputs.notify(&playback);
        }
        changed
    }

    /// Abandon the active run and redraw without highlight.
    pub async fn stop(&self) -> bool {
        let mut playback = self.playback.lock().await;
        if !playback.stop() {
            return false;
        }
        if let Some(task) = self.driver.lock().await.take() {
            task.abort();
        }
        self.outputs.draw(playback.frame());
        self.outputs.notify(&playback);
        true
    }

    /// Replace the sequence with `size` fresh elements. No-op unless idle.
    pub async fn regenerate(&self, size: usize) -> bool {
        let mut playback = self.playback.lock().await;
        if playback.state().is_active() {
            return false;
        }
        let data = self.source.lock().await.generate(size.min(MAX_SIZE));
        playback.regenerate(data);
        self.outputs.draw(playback.frame());
        self.outputs.counters.show(playback.counters());
        self.outputs.notify(&playback);
        true
    }

    /// Change the speed. Applies from the next scheduled delay.
    pub async fn set_speed(&self, speed: PlaybackSpeed) {
        let mut playback = self.playback.lock().await;
        playback.set_speed(speed);
        self.outputs.notify(&playback);
    }

    /// Draw the last published elements again without highlight, e.g. after
    /// the surface resized. The stored frame keeps its highlight.
    pub async fn redraw(&self) {
        let playback = self.playback.lock().await;
        self.outputs.renderer.draw(&playback.frame().elements, &[]);
    }

    /// Counters as of the latest published step.
    pub async fn counters(&self) -> RunCounters {
        self.playback.lock().await.counters()
    }

    /// The last published frame.
    pub async fn frame(&self) -> Frame {
        self.playback.lock().await.frame().clone()
    }

    /// Snapshot of state, speed, counters and control availability.
    pub async fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&*self.playback.lock().await)
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller").finish_non_exhaustive()
    }
}

async fn drive(playback: Arc<Mutex<Playback>>, outputs: Outputs, run: u64) {
    loop {
        let wait = {
            let mut playback = playback.lock().await;
            if playback.run_id() != run {
                return;
            }
            match playback.advance() {
                Advance::Published(frame) => {
                    outputs.draw(&frame);
                    outputs.counters.show(playback.counters());
                    playback.speed().step_delay()
                }
                Advance::Paused => PAUSE_POLL_INTERVAL,
                Advance::Finished(frame) => {
                    outputs.draw(&frame);
                    outputs.counters.show(playback.counters());
                    outputs.notify(&playback);
                    info!(run = run, "drive loop finished");
                    return;
                }
                Advance::Idle => return,
            }
        };
        tokio::time::sleep(wait).await;
    }
}
