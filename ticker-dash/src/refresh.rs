//! Refresh cadence selection and tick scheduling.

use derive_more::Display;
use std::{
    str::FromStr,
    time::{Duration, Instant},
};
use thiserror::Error;

/// User-selectable polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum RefreshSpeed {
    #[default]
    Never,
    Slow,
    Medium,
    Fast,
}

impl RefreshSpeed {
    pub const ALL: [RefreshSpeed; 4] = [
        RefreshSpeed::Never,
        RefreshSpeed::Slow,
        RefreshSpeed::Medium,
        RefreshSpeed::Fast,
    ];

    /// Polling interval, `None` for no automatic ticks.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            RefreshSpeed::Never => None,
            RefreshSpeed::Slow => Some(Duration::from_secs(60)),
            RefreshSpeed::Medium => Some(Duration::from_secs(20)),
            RefreshSpeed::Fast => Some(Duration::from_secs(5)),
        }
    }

    /// Next faster level, saturating at `Fast`.
    pub fn faster(self) -> Self {
        match self {
            RefreshSpeed::Never => RefreshSpeed::Slow,
            RefreshSpeed::Slow => RefreshSpeed::Medium,
            RefreshSpeed::Medium | RefreshSpeed::Fast => RefreshSpeed::Fast,
        }
    }

    /// Next slower level, saturating at `Never`.
    pub fn slower(self) -> Self {
        match self {
            RefreshSpeed::Fast => RefreshSpeed::Medium,
            RefreshSpeed::Medium => RefreshSpeed::Slow,
            RefreshSpeed::Slow | RefreshSpeed::Never => RefreshSpeed::Never,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown refresh speed '{0}', expected one of Never, Slow, Medium, Fast")]
pub struct ParseSpeedError(pub String);

impl FromStr for RefreshSpeed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RefreshSpeed::ALL
            .into_iter()
            .find(|speed| speed.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSpeedError(s.to_string()))
    }
}

/// Decides when the next automatic tick is due for the current [`RefreshSpeed`].
#[derive(Debug, Clone)]
pub struct TickSchedule {
    speed: RefreshSpeed,
    last_tick: Option<Instant>,
}

impl TickSchedule {
    pub fn new(speed: RefreshSpeed) -> Self {
        Self {
            speed,
            last_tick: None,
        }
    }

    pub fn speed(&self) -> RefreshSpeed {
        self.speed
    }

    /// Change cadence; the interval is measured from the last tick that ran.
    pub fn set_speed(&mut self, speed: RefreshSpeed) {
        self.speed = speed;
    }

    /// Instant at which the next automatic tick is due, `None` when polling is off.
    pub fn next_due(&self, now: Instant) -> Option<Instant> {
        let interval = self.speed.interval()?;
        Some(self.last_tick.map_or(now, |last| last + interval))
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due(now).is_some_and(|due| now >= due)
    }

    /// How long the UI may block waiting for input before the next tick, capped at `max`.
    pub fn wait_budget(&self, now: Instant, max: Duration) -> Duration {
        self.next_due(now)
            .map(|due| due.saturating_duration_since(now).min(max))
            .unwrap_or(max)
    }

    /// Record that a tick ran at `now`, automatic or manual.
    pub fn mark(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }
}
