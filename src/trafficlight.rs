pub mod timing;
pub use timing::{Timing, TimingError};

use core::cmp::min;
use embassy_time::{Duration, Instant, Timer};

use crate::io::SignalLamps;
use crate::mailbox::{Crossed, Inbox, Request};
use crate::signal::{SignalColor, SignalWriter};
use crate::{log_debug, log_info, log_warn};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Phase {
    Green,
    Yellow,
    // `entered` anchors every red bound. `confirmed` is set once a crossed
    // token arrived before the minimum red time had passed.
    Red { entered: Instant, confirmed: bool },
}

/// What the traffic light waits for before it can move on.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Wait {
    /// A request token, or the deadline.
    Request { until: Instant },
    /// A crossed token, or the deadline.
    Crossed { until: Instant },
    /// Nothing but the deadline.
    Hold { until: Instant },
}

impl Wait {
    pub fn until(&self) -> Instant {
        match self {
            Wait::Request { until } | Wait::Crossed { until } | Wait::Hold { until } => *until,
        }
    }
}

/// How a wait ended.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Event {
    Request,
    Crossed,
    Timeout,
}

/// Why the traffic light is showing what it shows.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Reason {
    PowerOn,
    NoRequest,
    RequestReceived,
    YellowElapsed,
    AwaitingCrossing,
    CrossingConfirmed,
    CrossingConfirmedEarly,
    MinimumRedHeld,
    MaximumRedElapsed,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Step {
    pub color: SignalColor,
    pub wait: Wait,
    pub reason: Reason,
}

/// The pedestrian crossing state machine.
///
/// The machine itself never looks at a clock or a mailbox. It is told what
/// happened and when, and answers with the color to show and what to wait for
/// next. `run` does the waiting.
#[derive(Debug)]
pub struct TrafficLight {
    timing: Timing,
    phase: Phase,
    step: Step,
}

impl TrafficLight {
    pub fn new(timing: Timing, now: Instant) -> Self {
        TrafficLight {
            timing,
            phase: Phase::Green,
            step: Step {
                color: SignalColor::Green,
                wait: Wait::Request {
                    until: now + timing.green(),
                },
                reason: Reason::PowerOn,
            },
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn color(&self) -> SignalColor {
        self.step.color
    }

    /// Time spent in the current red phase, `None` outside red.
    pub fn red_elapsed(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            Phase::Red { entered, .. } => Some(now.saturating_duration_since(entered)),
            Phase::Green | Phase::Yellow => None,
        }
    }

    /*
     * Feed the outcome of the current wait into the machine. Events the
     * current wait does not listen for (a crossed token while green, say)
     * leave the machine where it is.
     */
    pub fn handle(&mut self, event: Event, now: Instant) -> Step {
        let next = match (self.phase, event) {
            (Phase::Green, Event::Request) => self.enter_yellow(now),
            (Phase::Green, Event::Timeout) => self.enter_green(now, Reason::NoRequest),
            (Phase::Yellow, Event::Timeout) => self.enter_red(now),
            (
                Phase::Red {
                    entered,
                    confirmed: false,
                },
                Event::Crossed,
            ) => {
                let min_end = entered + self.timing.red_min();
                if now >= min_end {
                    self.enter_green(now, Reason::CrossingConfirmed)
                } else {
                    self.phase = Phase::Red {
                        entered,
                        confirmed: true,
                    };
                    Step {
                        color: SignalColor::Red,
                        wait: Wait::Hold { until: min_end },
                        reason: Reason::CrossingConfirmedEarly,
                    }
                }
            }
            (
                Phase::Red {
                    entered,
                    confirmed: false,
                },
                Event::Timeout,
            ) => {
                if now >= entered + self.timing.red_max() {
                    self.enter_green(now, Reason::MaximumRedElapsed)
                } else {
                    Step {
                        color: SignalColor::Red,
                        wait: self.crossing_poll(entered, now),
                        reason: Reason::AwaitingCrossing,
                    }
                }
            }
            (Phase::Red { confirmed: true, .. }, Event::Timeout) => {
                self.enter_green(now, Reason::MinimumRedHeld)
            }
            (Phase::Green, Event::Crossed)
            | (Phase::Yellow, Event::Request | Event::Crossed)
            | (Phase::Red { .. }, Event::Request)
            | (Phase::Red { confirmed: true, .. }, Event::Crossed) => return self.step,
        };

        self.step = next;
        next
    }

    fn enter_green(&mut self, now: Instant, reason: Reason) -> Step {
        self.phase = Phase::Green;
        Step {
            color: SignalColor::Green,
            wait: Wait::Request {
                until: now + self.timing.green(),
            },
            reason,
        }
    }

    fn enter_yellow(&mut self, now: Instant) -> Step {
        self.phase = Phase::Yellow;
        Step {
            color: SignalColor::Yellow,
            wait: Wait::Hold {
                until: now + self.timing.yellow(),
            },
            reason: Reason::RequestReceived,
        }
    }

    fn enter_red(&mut self, now: Instant) -> Step {
        self.phase = Phase::Red {
            entered: now,
            confirmed: false,
        };
        Step {
            color: SignalColor::Red,
            wait: self.crossing_poll(now, now),
            reason: Reason::YellowElapsed,
        }
    }

    // Never poll past the maximum red time, so the timeout that ends red
    // lands exactly on it.
    fn crossing_poll(&self, entered: Instant, now: Instant) -> Wait {
        Wait::Crossed {
            until: min(
                now + self.timing.crossing_poll(),
                entered + self.timing.red_max(),
            ),
        }
    }

    pub async fn run<L: SignalLamps>(
        mut self,
        lamps: &mut L,
        mut signal: SignalWriter<'_>,
        requests: Inbox<'_, Request>,
        crossings: Inbox<'_, Crossed>,
    ) -> ! {
        let mut step = self.step;
        let mut shown: Option<SignalColor> = None;

        loop {
            if shown != Some(step.color) {
                lamps.show(step.color);
                signal.show(step.color);
                shown = Some(step.color);
            }
            report(&step);

            let event = match step.wait {
                Wait::Request { until } => match requests.receive_until(until).await {
                    Some(Request) => Event::Request,
                    None => Event::Timeout,
                },
                Wait::Crossed { until } => match crossings.receive_until(until).await {
                    Some(Crossed) => Event::Crossed,
                    None => Event::Timeout,
                },
                Wait::Hold { until } => {
                    Timer::at(until).await;
                    Event::Timeout
                }
            };

            let now = Instant::now();
            let red_for = self.red_elapsed(now);
            step = self.handle(event, now);
            if let (Some(red_for), SignalColor::Green) = (red_for, step.color) {
                log_info!("Signal: red lasted {} ms", red_for.as_millis());
            }
        }
    }
}

fn report(step: &Step) {
    match step.reason {
        Reason::PowerOn => log_info!("Signal: {:?}", step.color),
        Reason::NoRequest => log_info!("Signal: no pedestrian request, staying {:?}", step.color),
        Reason::RequestReceived => {
            log_info!("Pedestrian: request received, cutting green short");
            log_info!("Signal: {:?}", step.color);
        }
        Reason::YellowElapsed => {
            log_info!("Signal: {:?}, pedestrians may cross, awaiting confirmation", step.color)
        }
        Reason::AwaitingCrossing => log_debug!("Signal: still waiting for crossing confirmation"),
        Reason::CrossingConfirmed => {
            log_info!("Pedestrian: crossing confirmed, back to the cycle");
            log_info!("Signal: {:?}", step.color);
        }
        Reason::CrossingConfirmedEarly => log_info!(
            "Pedestrian: crossing confirmed, holding red until {} ms",
            step.wait.until().as_millis()
        ),
        Reason::MinimumRedHeld => {
            log_info!("Pedestrian: minimum red time held, back to the cycle");
            log_info!("Signal: {:?}", step.color);
        }
        Reason::MaximumRedElapsed => {
            log_warn!("Signal: maximum red time elapsed without confirmation");
            log_info!("Signal: {:?}", step.color);
        }
    }
}
