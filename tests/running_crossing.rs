//! The whole crossing as the firmware runs it: the traffic light, the button
//! monitor, the beeper and the status reporter as concurrent tasks on an
//! embassy executor, with timings cut down to fractions of a second.

mod common;

use std::cell::Cell;

use common::run_on_executor;
use embassy_futures::select::{select, select4};
use embassy_time::{Duration, Instant, Timer};
use pedestrian_crossing::beeper::{BeepPattern, Beeper};
use pedestrian_crossing::io::{Button, Buttons, Buzzer, SignalLamps};
use pedestrian_crossing::monitor::PedestrianMonitor;
use pedestrian_crossing::signal::SignalReader;
use pedestrian_crossing::status::StatusReporter;
use pedestrian_crossing::trafficlight::{Timing, TrafficLight};
use pedestrian_crossing::{CrossingContext, SignalColor};

const GREEN: Duration = Duration::from_millis(500);
const YELLOW: Duration = Duration::from_millis(150);
const RED_MIN: Duration = Duration::from_millis(400);
const RED_MAX: Duration = Duration::from_millis(1500);
const CROSSING_POLL: Duration = Duration::from_millis(10);

const SAMPLE_PERIOD: Duration = Duration::from_millis(10);
const PRESS_LENGTH: Duration = Duration::from_millis(60);
const PIPS: BeepPattern = BeepPattern {
    on: Duration::from_millis(20),
    off: Duration::from_millis(20),
    idle: Duration::from_millis(10),
};

const REQUEST_AT: Duration = Duration::from_millis(100);

// Lamp timestamps are taken just after the machine reads the clock, so a phase
// can look a hair shorter than it was. Late is bounded by how busy the host is.
const EARLY: Duration = Duration::from_millis(5);
const LATE: Duration = Duration::from_millis(250);

#[derive(Default)]
struct RecordingLamps {
    shown: Vec<(Instant, SignalColor)>,
}

impl SignalLamps for RecordingLamps {
    fn show(&mut self, color: SignalColor) {
        self.shown.push((Instant::now(), color));
    }
}

struct PanelButtons<'a> {
    a: &'a Cell<bool>,
    b: &'a Cell<bool>,
}

impl Buttons for PanelButtons<'_> {
    fn is_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::A => self.a.get(),
            Button::B => self.b.get(),
        }
    }
}

/// Remembers every buzzer switch together with the color shown at that moment.
struct RecordingBuzzer<'a> {
    signal: SignalReader<'a>,
    switched: Vec<(bool, SignalColor)>,
}

impl Buzzer for RecordingBuzzer<'_> {
    fn sound(&mut self, on: bool) {
        self.switched.push((on, self.signal.color()));
    }
}

struct Recording {
    shown: Vec<(Instant, SignalColor)>,
    switched: Vec<(bool, SignalColor)>,
}

impl Recording {
    fn colors(&self) -> Vec<SignalColor> {
        self.shown.iter().map(|(_, color)| *color).collect()
    }

    fn durations(&self, color: SignalColor) -> Vec<Duration> {
        self.shown
            .windows(2)
            .filter(|pair| pair[0].1 == color)
            .map(|pair| pair[1].0 - pair[0].0)
            .collect()
    }
}

async fn press(button: &Cell<bool>, at: Instant) {
    Timer::at(at).await;
    button.set(true);
    Timer::after(PRESS_LENGTH).await;
    button.set(false);
}

/// Runs every task of the crossing for `length`. A pedestrian asks to cross
/// at `REQUEST_AT` and, when `confirm_after` is given, confirms that long
/// after asking.
async fn run_crossing(
    context: &CrossingContext,
    requested: bool,
    confirm_after: Option<Duration>,
    length: Duration,
) -> Recording {
    let timing = Timing::new(GREEN, YELLOW, RED_MIN, RED_MAX, CROSSING_POLL).unwrap();
    let a = Cell::new(false);
    let b = Cell::new(false);
    let mut lamps = RecordingLamps::default();
    let mut buttons = PanelButtons { a: &a, b: &b };
    let mut buzzer = RecordingBuzzer {
        signal: context.signal.reader(),
        switched: Vec::new(),
    };
    let writer = context.signal.writer().expect("signal writer is free");
    let start = Instant::now();

    let light = TrafficLight::new(timing, start).run(
        &mut lamps,
        writer,
        context.requests.inbox(),
        context.crossings.inbox(),
    );
    let monitor = PedestrianMonitor::new(context.requests.outbox(), context.crossings.outbox())
        .run(&mut buttons, SAMPLE_PERIOD);
    let beeper = Beeper::new(PIPS).run(&mut buzzer, context.signal.reader());
    let status = StatusReporter::new(context).run(Duration::from_millis(100));
    let pedestrian = async {
        if requested {
            press(&a, start + REQUEST_AT).await;
        }
        if let Some(after) = confirm_after {
            press(&b, start + REQUEST_AT + after).await;
        }
        Timer::at(start + length).await;
    };

    select(pedestrian, select4(light, monitor, beeper, status)).await;

    Recording {
        shown: lamps.shown,
        switched: buzzer.switched,
    }
}

fn assert_within(lasted: Duration, expected: Duration, what: &str) {
    assert!(
        lasted + EARLY >= expected && lasted <= expected + LATE,
        "{what} lasted {lasted:?}, expected {expected:?}"
    );
}

fn assert_beeps_only_on_red(recording: &Recording) {
    assert!(recording.switched.iter().any(|(on, _)| *on), "never beeped");
    for (on, color) in &recording.switched {
        if *on {
            assert_eq!(*color, SignalColor::Red);
        }
    }
    assert_eq!(recording.switched.last(), Some(&(false, SignalColor::Green)));
}

#[test]
fn confirmed_crossing_holds_red_for_the_minimum() {
    run_on_executor(|| async {
        let context = CrossingContext::new();
        // The green after red runs into its timeout once, which must not
        // show green a second time.
        let recording = run_crossing(
            &context,
            true,
            Some(Duration::from_millis(200)),
            Duration::from_millis(1400),
        )
        .await;

        assert_eq!(
            recording.colors(),
            [SignalColor::Green, SignalColor::Yellow, SignalColor::Red, SignalColor::Green]
        );
        assert_within(recording.durations(SignalColor::Yellow)[0], YELLOW, "yellow");
        assert_within(recording.durations(SignalColor::Red)[0], RED_MIN, "red");
        assert_beeps_only_on_red(&recording);

        let status = StatusReporter::new(&context).snapshot();
        assert_eq!(status.color, SignalColor::Green);
        assert!(!status.request_pending);
        assert!(!status.crossed_pending);
    });
}

#[test]
fn late_confirmation_ends_red_when_pressed() {
    run_on_executor(|| async {
        let context = CrossingContext::new();
        // Red starts at about 250 ms and the confirmation comes at 900 ms.
        let recording = run_crossing(
            &context,
            true,
            Some(Duration::from_millis(800)),
            Duration::from_millis(1400),
        )
        .await;

        assert_eq!(
            recording.colors(),
            [SignalColor::Green, SignalColor::Yellow, SignalColor::Red, SignalColor::Green]
        );
        let red = recording.durations(SignalColor::Red)[0];
        assert!(red > RED_MIN + Duration::from_millis(100), "red lasted {red:?}");
        assert!(red < RED_MAX, "red lasted {red:?}");
        assert_beeps_only_on_red(&recording);
    });
}

#[test]
fn unconfirmed_crossing_ends_red_at_the_maximum() {
    run_on_executor(|| async {
        let context = CrossingContext::new();
        let recording = run_crossing(&context, true, None, Duration::from_millis(2200)).await;

        assert_eq!(
            recording.colors(),
            [SignalColor::Green, SignalColor::Yellow, SignalColor::Red, SignalColor::Green]
        );
        assert_within(recording.durations(SignalColor::Red)[0], RED_MAX, "red");
        assert_beeps_only_on_red(&recording);
    });
}

#[test]
fn without_pedestrians_green_is_shown_once() {
    run_on_executor(|| async {
        let context = CrossingContext::new();
        let recording = run_crossing(&context, false, None, Duration::from_millis(1200)).await;

        assert_eq!(recording.colors(), [SignalColor::Green]);
        assert!(recording.switched.iter().all(|(on, _)| !on));
    });
}
