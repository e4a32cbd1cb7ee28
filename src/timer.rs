use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const MIN_MINUTES: i64 = 1;
pub const MAX_MINUTES: i64 = 180;

const NEAR_EXPIRY_SECS: i64 = 10;
const DEFAULT_MINUTES: i64 = 25;

/// Lifecycle stage of the countdown, derived from the underlying fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Expired,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The operation is not permitted from the current phase. Callers
    /// recover by leaving state untouched and ignoring the request.
    InvalidTransition { from: Phase, op: &'static str },
    /// Configured duration outside `MIN_MINUTES..=MAX_MINUTES`.
    InvalidMinutes(i64),
}

impl std::fmt::Display for TimerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::InvalidTransition { from, op } => {
                write!(f, "cannot {op} while {}", from.as_str())
            }
            TimerError::InvalidMinutes(m) => {
                write!(f, "minutes must be {MIN_MINUTES}-{MAX_MINUTES}, got {m}")
            }
        }
    }
}

impl std::error::Error for TimerError {}

/// One observation of the countdown, as returned by [`CountdownTimer::poll`].
///
/// `just_expired` fires on the single poll that crosses the end instant;
/// every later poll of the same run reports `Expired` without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub phase: Phase,
    pub remaining_secs: i64,
    pub just_expired: bool,
    pub alert_flash: bool,
}

impl PollOutcome {
    pub fn remaining_hms(&self) -> String {
        format_hms(self.remaining_secs)
    }
}

/// Pausable countdown. All time-consulting operations take the current
/// instant as an argument; the HTTP layer passes `Utc::now()` and tests
/// pass fixed instants.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    running: bool,
    finished: bool,
    end_instant: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    configured_minutes: i64,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self {
            running: false,
            finished: false,
            end_instant: None,
            paused_at: None,
            configured_minutes: DEFAULT_MINUTES,
        }
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.running {
            Phase::Running
        } else if self.finished {
            Phase::Expired
        } else if self.end_instant.is_some() {
            Phase::Paused
        } else {
            Phase::Idle
        }
    }

    pub fn configured_minutes(&self) -> i64 {
        self.configured_minutes
    }

    /// Stores the duration for the next fresh start. An in-flight
    /// countdown keeps its current end instant.
    pub fn configure(&mut self, minutes: i64) -> Result<(), TimerError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            return Err(TimerError::InvalidMinutes(minutes));
        }
        self.configured_minutes = minutes;
        Ok(())
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        match self.phase() {
            Phase::Idle | Phase::Expired => {
                self.end_instant = Some(now + Duration::minutes(self.configured_minutes));
                self.paused_at = None;
                self.running = true;
                self.finished = false;
                Ok(())
            }
            from => Err(TimerError::InvalidTransition { from, op: "start" }),
        }
    }

    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        match self.phase() {
            Phase::Running => {
                self.paused_at = Some(now);
                self.running = false;
                Ok(())
            }
            from => Err(TimerError::InvalidTransition { from, op: "stop" }),
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        match (self.phase(), self.end_instant, self.paused_at) {
            (Phase::Paused, Some(end), Some(paused)) => {
                // The remaining duration was frozen at stop(); the pause
                // itself must not count against the countdown.
                let remaining = end - paused;
                self.end_instant = Some(now + remaining);
                self.paused_at = None;
                self.running = true;
                Ok(())
            }
            (from, _, _) => Err(TimerError::InvalidTransition { from, op: "resume" }),
        }
    }

    /// Valid from any phase; `configured_minutes` survives as a UI
    /// convenience.
    pub fn reset(&mut self) {
        self.running = false;
        self.finished = false;
        self.end_instant = None;
        self.paused_at = None;
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> PollOutcome {
        match (self.phase(), self.end_instant, self.paused_at) {
            (Phase::Running, Some(end), _) => {
                if now >= end {
                    self.running = false;
                    self.finished = true;
                    PollOutcome {
                        phase: Phase::Expired,
                        remaining_secs: 0,
                        just_expired: true,
                        alert_flash: false,
                    }
                } else {
                    let remaining_secs = (end - now).num_seconds().max(0);
                    let alert_flash = remaining_secs > 0
                        && remaining_secs <= NEAR_EXPIRY_SECS
                        && now.timestamp() % 2 == 0;
                    PollOutcome {
                        phase: Phase::Running,
                        remaining_secs,
                        just_expired: false,
                        alert_flash,
                    }
                }
            }
            (Phase::Paused, Some(end), Some(paused)) => PollOutcome {
                phase: Phase::Paused,
                remaining_secs: (end - paused).num_seconds().max(0),
                just_expired: false,
                alert_flash: false,
            },
            (Phase::Expired, _, _) => PollOutcome {
                phase: Phase::Expired,
                remaining_secs: 0,
                just_expired: false,
                alert_flash: false,
            },
            _ => PollOutcome {
                phase: Phase::Idle,
                remaining_secs: self.configured_minutes * 60,
                just_expired: false,
                alert_flash: false,
            },
        }
    }
}

/// Zero-padded "HH:MM:SS". Negative inputs clamp to zero.
pub fn format_hms(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
