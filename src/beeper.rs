/*
 * The walk beeper.
 *
 * The beeper only ever looks at the displayed signal color. While the signal
 * is red it pips on and off, otherwise it stays quiet and checks back after an
 * idle period. It knows nothing about mailboxes or red phase timing, so
 * whatever it does it cannot disturb the traffic light.
 *
 * As with the traffic light, the timing decisions are kept apart from the
 * waiting: `next` says whether to sound and for how long, `run` sleeps.
 */

use embassy_time::{Duration, Timer};

use crate::io::Buzzer;
use crate::signal::{SignalColor, SignalReader};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BeepPattern {
    pub on: Duration,
    pub off: Duration,
    pub idle: Duration,
}

impl BeepPattern {
    pub const WALK: BeepPattern = BeepPattern {
        on: Duration::from_millis(150),
        off: Duration::from_millis(150),
        idle: Duration::from_millis(100),
    };
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Beat {
    pub on: bool,
    pub hold: Duration,
}

pub struct Beeper {
    pattern: BeepPattern,
    sounding: bool,
}

impl Beeper {
    pub const fn new(pattern: BeepPattern) -> Self {
        Beeper {
            pattern,
            sounding: false,
        }
    }

    pub fn next(&mut self, color: SignalColor) -> Beat {
        match color {
            SignalColor::Red => {
                self.sounding = !self.sounding;
                Beat {
                    on: self.sounding,
                    hold: if self.sounding {
                        self.pattern.on
                    } else {
                        self.pattern.off
                    },
                }
            }
            SignalColor::Green | SignalColor::Yellow => {
                self.sounding = false;
                Beat {
                    on: false,
                    hold: self.pattern.idle,
                }
            }
        }
    }

    pub async fn run<Z: Buzzer>(mut self, buzzer: &mut Z, signal: SignalReader<'_>) -> ! {
        loop {
            let beat = self.next(signal.color());
            buzzer.sound(beat.on);
            Timer::after(beat.hold).await;
        }
    }
}
