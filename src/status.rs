/*
 * Periodic status report for the console. Read-only: it peeks at the
 * mailboxes and the displayed color and never takes anything out.
 */

use embassy_time::{Duration, Timer};

use crate::context::CrossingContext;
use crate::log_info;
use crate::signal::{SignalColor, SignalReader};

pub const STATUS_PERIOD: Duration = Duration::from_millis(2000);

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct StatusReport {
    pub color: SignalColor,
    pub request_pending: bool,
    pub crossed_pending: bool,
}

pub struct StatusReporter<'a> {
    context: &'a CrossingContext,
    signal: SignalReader<'a>,
}

impl<'a> StatusReporter<'a> {
    pub fn new(context: &'a CrossingContext) -> Self {
        StatusReporter {
            context,
            signal: context.signal.reader(),
        }
    }

    pub fn snapshot(&self) -> StatusReport {
        StatusReport {
            color: self.signal.color(),
            request_pending: self.context.requests.is_pending(),
            crossed_pending: self.context.crossings.is_pending(),
        }
    }

    pub async fn run(self, period: Duration) -> ! {
        loop {
            let report = self.snapshot();
            log_info!(
                "Status: signal {:?}, request pending: {}, crossed pending: {}",
                report.color,
                report.request_pending,
                report.crossed_pending
            );
            Timer::after(period).await;
        }
    }
}
