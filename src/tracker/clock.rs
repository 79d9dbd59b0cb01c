use chrono::{DateTime, Duration, Utc};

use super::error::TrackerError;

/// Largest simulated time a single tick may cover.
pub const MAX_STEP: Duration = Duration::days(365);

/// Virtual timeline that moves forward a fixed step per tick.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    current: DateTime<Utc>,
    step: Duration,
}

impl SimulatedClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Result<Self, TrackerError> {
        if step <= Duration::zero() || step > MAX_STEP {
            return Err(TrackerError::InvalidClockStep(step));
        }
        Ok(Self {
            current: start,
            step,
        })
    }

    /// Seeds the timeline from wall-clock time.
    pub fn starting_now(step: Duration) -> Result<Self, TrackerError> {
        Self::new(Utc::now(), step)
    }

    pub fn current_time(&self) -> DateTime<Utc> {
        self.current
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Moves one step forward. The clock stops at the last representable
    /// instant instead of wrapping or failing.
    pub fn advance(&mut self) -> DateTime<Utc> {
        match self.current.checked_add_signed(self.step) {
            Some(next) => self.current = next,
            None => log::warn!("Simulated clock reached the end of time at {}", self.current),
        }
        self.current
    }
}
