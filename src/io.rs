/*
 * The I/O boundary of the crossing.
 *
 * The controller talks to the outside world through three small traits: the
 * vehicle lamps, the two pedestrian buttons and the buzzer. The `board` module
 * implements them on the STM32 pins and is the only device-specific code in the
 * library. Tests implement them with plain structs.
 *
 * All traits speak in logical terms: `true` means lit, pressed or sounding.
 * Active-low wiring is dealt with here and nowhere else.
 */

use crate::signal::SignalColor;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Button {
    /// Pedestrian asks to cross.
    A,
    /// Pedestrian has crossed.
    B,
}

pub trait SignalLamps {
    fn show(&mut self, color: SignalColor);
}

pub trait Buttons {
    fn is_pressed(&mut self, button: Button) -> bool;
}

pub trait Buzzer {
    fn sound(&mut self, on: bool);
}

/// Which of the red, amber and green lamps are lit.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Rag {
    pub red: bool,
    pub amber: bool,
    pub green: bool,
}

impl Rag {
    pub fn new(red: bool, amber: bool, green: bool) -> Self {
        Self { red, amber, green }
    }
}

impl From<SignalColor> for Rag {
    fn from(color: SignalColor) -> Self {
        match color {
            SignalColor::Green => Rag::new(false, false, true),
            SignalColor::Yellow => Rag::new(false, true, false),
            SignalColor::Red => Rag::new(true, false, false),
        }
    }
}

#[cfg(target_os = "none")]
pub mod board {
    use embassy_stm32::gpio::{Input, Level, Output};

    use super::{Button, Buttons, Buzzer, Rag, SignalLamps};
    use crate::signal::SignalColor;

    // `on` is the lamp's state, `active_low` says which level lights it.
    fn drive(pin: &mut Output, on: bool, active_low: bool) {
        pin.set_level(if on != active_low { Level::High } else { Level::Low });
    }

    pub struct RagLamps<'d> {
        red: Output<'d>,
        amber: Output<'d>,
        green: Output<'d>,
        active_low: bool,
    }

    impl<'d> RagLamps<'d> {
        pub fn new(red: Output<'d>, amber: Output<'d>, green: Output<'d>, active_low: bool) -> Self {
            Self {
                red,
                amber,
                green,
                active_low,
            }
        }
    }

    impl SignalLamps for RagLamps<'_> {
        fn show(&mut self, color: SignalColor) {
            let rag = Rag::from(color);
            // Everything off first, so two lamps are never lit together.
            drive(&mut self.red, false, self.active_low);
            drive(&mut self.amber, false, self.active_low);
            drive(&mut self.green, false, self.active_low);

            drive(&mut self.red, rag.red, self.active_low);
            drive(&mut self.amber, rag.amber, self.active_low);
            drive(&mut self.green, rag.green, self.active_low);
        }
    }

    /// Two push buttons to ground with pull-ups: a pressed button reads low.
    pub struct PullUpButtons<'d> {
        a: Input<'d>,
        b: Input<'d>,
    }

    impl<'d> PullUpButtons<'d> {
        pub fn new(a: Input<'d>, b: Input<'d>) -> Self {
            Self { a, b }
        }
    }

    impl Buttons for PullUpButtons<'_> {
        fn is_pressed(&mut self, button: Button) -> bool {
            match button {
                Button::A => self.a.is_low(),
                Button::B => self.b.is_low(),
            }
        }
    }

    pub struct PinBuzzer<'d> {
        pin: Output<'d>,
    }

    impl<'d> PinBuzzer<'d> {
        pub fn new(pin: Output<'d>) -> Self {
            Self { pin }
        }
    }

    impl Buzzer for PinBuzzer<'_> {
        fn sound(&mut self, on: bool) {
            drive(&mut self.pin, on, false);
        }
    }
}
