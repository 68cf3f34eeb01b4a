#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

// https://github.com/embassy-rs/embassy/blob/main/examples/stm32f4/src/bin/multiprio.rs

/*
 * Firmware entry point for the pedestrian crossing on a DESPI-M02 board.
 *
 * Three priority levels, highest first:
 *   - the button monitor, on an interrupt executor at P6, so a press is seen
 *     within one debounce period no matter what else is busy,
 *   - the traffic light and the beeper, on an interrupt executor at P7,
 *   - the status report, in thread mode as the main task.
 */
#[cfg(target_os = "none")]
mod firmware {
    use defmt_rtt as _;
    use embassy_executor::{InterruptExecutor, Spawner};
    use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
    use embassy_stm32::interrupt;
    use embassy_stm32::interrupt::{InterruptExt, Priority};
    use embassy_time::Instant;
    use panic_halt as _;

    use pedestrian_crossing::beeper::{BeepPattern, Beeper};
    use pedestrian_crossing::io::board::{PinBuzzer, PullUpButtons, RagLamps};
    use pedestrian_crossing::monitor::{DEBOUNCE_PERIOD, PedestrianMonitor};
    use pedestrian_crossing::signal::{SignalReader, SignalWriter};
    use pedestrian_crossing::status::{STATUS_PERIOD, StatusReporter};
    use pedestrian_crossing::trafficlight::{Timing, TrafficLight};
    use pedestrian_crossing::{CrossingContext, log_error, log_info};

    static CROSSING: CrossingContext = CrossingContext::new();

    static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
    static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();

    #[interrupt]
    unsafe fn UART4() {
        unsafe { EXECUTOR_HIGH.on_interrupt() }
    }

    #[interrupt]
    unsafe fn UART5() {
        unsafe { EXECUTOR_MED.on_interrupt() }
    }

    fn halt(what: &str) -> ! {
        log_error!("Boot: {}, halting", what);
        panic!();
    }

    #[embassy_executor::task]
    async fn monitor_task(mut buttons: PullUpButtons<'static>) -> ! {
        PedestrianMonitor::new(CROSSING.requests.outbox(), CROSSING.crossings.outbox())
            .run(&mut buttons, DEBOUNCE_PERIOD)
            .await
    }

    #[embassy_executor::task]
    async fn traffic_light_task(mut lamps: RagLamps<'static>, signal: SignalWriter<'static>) -> ! {
        TrafficLight::new(Timing::DEFAULT, Instant::now())
            .run(
                &mut lamps,
                signal,
                CROSSING.requests.inbox(),
                CROSSING.crossings.inbox(),
            )
            .await
    }

    #[embassy_executor::task]
    async fn beeper_task(mut buzzer: PinBuzzer<'static>, signal: SignalReader<'static>) -> ! {
        Beeper::new(BeepPattern::WALK).run(&mut buzzer, signal).await
    }

    #[embassy_executor::main]
    async fn main(_spawner: Spawner) {
        let peripherals = embassy_stm32::init(Default::default());

        let lamps = RagLamps::new(
            Output::new(peripherals.PB10, Level::Low, Speed::Low),
            Output::new(peripherals.PB12, Level::Low, Speed::Low),
            Output::new(peripherals.PB14, Level::Low, Speed::Low),
            false,
        );
        let buttons = PullUpButtons::new(
            Input::new(peripherals.PE11, Pull::Up),
            Input::new(peripherals.PE10, Pull::Up),
        );
        let buzzer = PinBuzzer::new(Output::new(peripherals.PB13, Level::Low, Speed::Low));

        let Some(signal) = CROSSING.signal.writer() else {
            halt("signal writer already taken");
        };

        interrupt::UART4.set_priority(Priority::P6);
        let high = EXECUTOR_HIGH.start(interrupt::UART4);
        if high.spawn(monitor_task(buttons)).is_err() {
            halt("cannot start the button monitor");
        }

        interrupt::UART5.set_priority(Priority::P7);
        let med = EXECUTOR_MED.start(interrupt::UART5);
        if med.spawn(traffic_light_task(lamps, signal)).is_err() {
            halt("cannot start the traffic light");
        }
        if med.spawn(beeper_task(buzzer, CROSSING.signal.reader())).is_err() {
            halt("cannot start the beeper");
        }

        log_info!("Boot: all tasks started");
        log_info!("Press button A to ask to cross");
        log_info!("Press button B while red once you have crossed");

        StatusReporter::new(&CROSSING).run(STATUS_PERIOD).await
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    println!("pedestrian-crossing is firmware, build it for thumbv7m-none-eabi.");
}
