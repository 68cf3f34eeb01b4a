/*
 * Phase durations for the traffic light.
 */

use core::fmt;
use embassy_time::Duration;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Timing {
    green: Duration,
    yellow: Duration,
    red_min: Duration,
    red_max: Duration,
    crossing_poll: Duration,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum TimingError {
    ZeroGreen,
    ZeroYellow,
    ZeroRedMinimum,
    ZeroCrossingPoll,
    RedMinimumAboveMaximum,
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingError::ZeroGreen => write!(f, "green time must be non-zero"),
            TimingError::ZeroYellow => write!(f, "yellow time must be non-zero"),
            TimingError::ZeroRedMinimum => write!(f, "minimum red time must be non-zero"),
            TimingError::ZeroCrossingPoll => write!(f, "crossing poll interval must be non-zero"),
            TimingError::RedMinimumAboveMaximum => {
                write!(f, "minimum red time exceeds maximum red time")
            }
        }
    }
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        green: Duration::from_millis(5000),
        yellow: Duration::from_millis(1500),
        red_min: Duration::from_millis(4000),
        red_max: Duration::from_millis(15000),
        crossing_poll: Duration::from_millis(100),
    };

    pub fn new(
        green: Duration,
        yellow: Duration,
        red_min: Duration,
        red_max: Duration,
        crossing_poll: Duration,
    ) -> Result<Self, TimingError> {
        if green.as_ticks() == 0 {
            return Err(TimingError::ZeroGreen);
        }
        if yellow.as_ticks() == 0 {
            return Err(TimingError::ZeroYellow);
        }
        if red_min.as_ticks() == 0 {
            return Err(TimingError::ZeroRedMinimum);
        }
        if crossing_poll.as_ticks() == 0 {
            return Err(TimingError::ZeroCrossingPoll);
        }
        if red_min > red_max {
            return Err(TimingError::RedMinimumAboveMaximum);
        }

        Ok(Timing {
            green,
            yellow,
            red_min,
            red_max,
            crossing_poll,
        })
    }

    /// How long green waits for a request before starting over.
    pub fn green(&self) -> Duration {
        self.green
    }

    pub fn yellow(&self) -> Duration {
        self.yellow
    }

    pub fn red_min(&self) -> Duration {
        self.red_min
    }

    pub fn red_max(&self) -> Duration {
        self.red_max
    }

    /// How often red looks at the crossed mailbox.
    pub fn crossing_poll(&self) -> Duration {
        self.crossing_poll
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}
