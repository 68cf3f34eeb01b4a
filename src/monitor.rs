/*
 * The pedestrian button monitor.
 *
 * Both buttons are sampled every debounce period. A button only counts when it
 * goes from released to pressed between two samples, so contact bounce shorter
 * than the period is ignored and holding a button down raises one event, not
 * one per sample.
 *
 * Button A posts a request, button B posts a crossed token. The monitor does
 * not care what the signal shows: a crossed token posted during green simply
 * waits in its mailbox, and the traffic light decides what it means.
 */

use embassy_time::{Duration, Timer};

use crate::io::{Button, Buttons};
use crate::mailbox::{Crossed, Outbox, Posted, Request};
use crate::{log_debug, log_info};

pub const DEBOUNCE_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        EdgeDetector { last: false }
    }

    /// Returns `true` when `pressed` is the first pressed sample after a release.
    pub fn rising(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.last;
        self.last = pressed;
        rising
    }
}

/// What one sample of both buttons posted, if anything.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct Sample {
    pub request: Option<Posted>,
    pub crossed: Option<Posted>,
}

pub struct PedestrianMonitor<'a> {
    requests: Outbox<'a, Request>,
    crossings: Outbox<'a, Crossed>,
    a: EdgeDetector,
    b: EdgeDetector,
}

impl<'a> PedestrianMonitor<'a> {
    pub fn new(requests: Outbox<'a, Request>, crossings: Outbox<'a, Crossed>) -> Self {
        PedestrianMonitor {
            requests,
            crossings,
            a: EdgeDetector::new(),
            b: EdgeDetector::new(),
        }
    }

    pub fn sample<B: Buttons>(&mut self, buttons: &mut B) -> Sample {
        // Read both before acting on either, so one sample is one instant.
        let a = buttons.is_pressed(Button::A);
        let b = buttons.is_pressed(Button::B);

        let mut sample = Sample::default();

        if self.a.rising(a) {
            log_info!("Button A: pedestrian request");
            let posted = self.requests.post(Request);
            if posted == Posted::Coalesced {
                log_debug!("Button A: a request is already pending");
            }
            sample.request = Some(posted);
        }

        if self.b.rising(b) {
            log_info!("Button B: pedestrian crossed");
            let posted = self.crossings.post(Crossed);
            if posted == Posted::Coalesced {
                log_debug!("Button B: a crossed token is already pending");
            }
            sample.crossed = Some(posted);
        }

        sample
    }

    pub async fn run<B: Buttons>(mut self, buttons: &mut B, period: Duration) -> ! {
        loop {
            self.sample(buttons);
            Timer::after(period).await;
        }
    }
}
