//! Sortscope Visualization
//!
//! Plays stepwise sorting runs in real time with pause, resume, stop and
//! speed controls, and streams every step to a browser.
//!
//! # Architecture
//!
//! - **Playback**: synchronous Idle/Running/Paused state machine over one sequence
//! - **Controller**: spawns one drive task per run and paces it by speed
//! - **Collaborators**: [`Renderer`], [`CounterDisplay`], [`DataSource`]
//! - **WebSocket**: streams frames and counters to the bundled page
//! - **REST API**: run, pause, stop, generate, speed
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env()?;
//! let server = VisServer::new(&config).with_speed(config.speed).await;
//! server.serve().await?;
//! ```

mod config;
mod controller;
mod dataset;
mod error;
mod events;
mod playback;
mod server;

pub use config::VisConfig;
pub use controller::Controller;
pub use dataset::{DataSource, RandomData, MAX_SIZE, VALUE_RANGE};
pub use error::{Error, Result};
pub use events::{BroadcastRenderer, CounterDisplay, Frame, Renderer, StatusListener, Value, VisEvent};
pub use playback::{
    Advance, ControlAvailability, Playback, PlaybackSpeed, PlaybackState, PlaybackStatus,
    MIN_STEP_DELAY, PAUSE_POLL_INTERVAL,
};
pub use server::VisServer;
pub use sortscope_steps::{Algorithm, RunCounters};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_playback_runs_to_sorted() {
        let data = RandomData::new(Some(9)).generate(30);
        for algo in Algorithm::ALL {
            let mut playback = Playback::new(data.clone());
            assert!(playback.start(algo));

            let last = loop {
                match playback.advance() {
                    Advance::Published(_) => {}
                    Advance::Finished(frame) => break frame,
                    other => panic!("{algo}: unexpected {other:?}"),
                }
            };
            assert!(last.elements.windows(2).all(|w| w[0] <= w[1]), "{algo} left data unsorted");
            assert_eq!(playback.state(), PlaybackState::Idle);
        }
    }

    #[test]
    fn regenerated_data_resets_run_counters() {
        let mut source = RandomData::new(Some(3));
        let mut playback = Playback::new(source.generate(10));
        playback.start(Algorithm::Bubble);
        playback.advance();
        playback.stop();

        assert!(playback.regenerate(source.generate(12)));
        assert_eq!(playback.counters(), RunCounters::default());
        assert_eq!(playback.data().len(), 12);
    }
}
