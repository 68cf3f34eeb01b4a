#![cfg_attr(not(test), no_std)]

//! A pedestrian crossing controller.
//!
//! One task cycles the vehicle signal, one samples the two pedestrian buttons
//! and one sounds the walk cue while the signal is red. They only talk to each
//! other through the two single-slot mailboxes and the displayed signal color
//! held in [`CrossingContext`].
//!
//! Everything in this crate builds for the host as well, so the controller can
//! be tested without a board. The board-specific parts live behind
//! `target_os = "none"`.

pub mod logging;

pub mod beeper;
pub mod context;
pub mod io;
pub mod mailbox;
pub mod monitor;
pub mod signal;
pub mod status;
pub mod trafficlight;

pub use context::CrossingContext;
pub use signal::SignalColor;
