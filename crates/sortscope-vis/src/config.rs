//! Visualizer configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use sortscope_steps::Algorithm;

use crate::error::{Error, Result};
use crate::playback::PlaybackSpeed;

/// Runtime configuration for the visualizer server.
#[derive(Debug, Clone)]
pub struct VisConfig {
    /// HTTP listen address
    pub addr: SocketAddr,

    /// Number of elements generated at startup
    pub size: usize,

    /// Initial playback speed
    pub speed: PlaybackSpeed,

    /// Algorithm used when a run request names none
    pub algorithm: Algorithm,

    /// Seed for the data source; entropy when unset
    pub seed: Option<u64>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            size: 20,
            speed: PlaybackSpeed::default(),
            algorithm: Algorithm::default(),
            seed: None,
        }
    }
}

impl VisConfig {
    /// Create config from `SORTSCOPE_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            addr: parse_var(&lookup, "SORTSCOPE_ADDR")?.unwrap_or(defaults.addr),
            size: parse_var(&lookup, "SORTSCOPE_SIZE")?.unwrap_or(defaults.size),
            speed: parse_var::<u8, _>(&lookup, "SORTSCOPE_SPEED")?
                .map(PlaybackSpeed::new)
                .unwrap_or(defaults.speed),
            algorithm: parse_var(&lookup, "SORTSCOPE_ALGORITHM")?.unwrap_or(defaults.algorithm),
            seed: parse_var(&lookup, "SORTSCOPE_SEED")?,
        })
    }

    /// Override the listen port, keeping the host.
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| Error::Config {
                key,
                reason: format!("{raw:?}: {e}"),
            })
        })
        .transpose()
}
