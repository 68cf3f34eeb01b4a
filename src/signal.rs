/*
 * The displayed vehicle signal color.
 *
 * The traffic light task is the only writer. The beeper and the status task
 * sample it whenever they like. A color fits in a single byte, so an atomic
 * store on one side and an atomic load on the other is all the coordination
 * needed: a reader may see the old color for one of its own polling periods,
 * never a torn one.
 */

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
#[repr(u8)]
pub enum SignalColor {
    Green,
    Yellow,
    Red,
}

pub struct SignalState {
    color: AtomicU8,
    writer_taken: AtomicBool,
}

impl SignalState {
    pub const fn new() -> Self {
        SignalState {
            color: AtomicU8::new(SignalColor::Green as u8),
            writer_taken: AtomicBool::new(false),
        }
    }

    /// Hands out the one and only writer. Later calls get `None`.
    pub fn writer(&self) -> Option<SignalWriter<'_>> {
        if self.writer_taken.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(SignalWriter { state: self })
        }
    }

    pub fn reader(&self) -> SignalReader<'_> {
        SignalReader { state: self }
    }

    fn load(&self) -> SignalColor {
        // Only the writer stores, and it only stores ordinals of real colors.
        SignalColor::from_ordinal(self.color.load(Ordering::Acquire)).unwrap_or(SignalColor::Red)
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SignalWriter<'a> {
    state: &'a SignalState,
}

impl SignalWriter<'_> {
    pub fn show(&mut self, color: SignalColor) {
        self.state.color.store(color.ordinal(), Ordering::Release);
    }
}

#[derive(Copy, Clone)]
pub struct SignalReader<'a> {
    state: &'a SignalState,
}

impl SignalReader<'_> {
    pub fn color(&self) -> SignalColor {
        self.state.load()
    }
}
