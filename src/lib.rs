//! Platform-agnostic driver for the DS1307 battery-backed real-time clock,
//! built on the [`embedded-hal`] blocking I²C traits.
// https://datasheets.maximintegrated.com/en/ds/DS1307.pdf
//!
//! The driver keeps a decimal [`Datetime`] snapshot mirrored against the
//! device's BCD register file and exposes:
//!
//! - Reading and setting the clock/calendar, always in 24-hour mode
//!   (a device found in 12-hour mode is rewritten at initialization).
//! - Starting and stopping the oscillator without disturbing the stored
//!   time.
//! - Square wave output control: enable, disable, and the four datasheet
//!   rates (1 Hz, 4.096 kHz, 8.192 kHz, 32.768 kHz).
//! - The 56 bytes of battery-backed scratch RAM, bounds-checked.
//! - Raw register access for anything else.
//!
//! All operations are synchronous and blocking; one handle must not be
//! shared across execution contexts without external serialization (for
//! bus sharing, wrap the bus with something like `shared-bus`).
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal
#![cfg_attr(not(test), no_std)]

mod datetime;
mod rtc;

pub use crate::datetime::Datetime;
pub use crate::rtc::{Ds1307, Error, SquareWaveRate, DEVICE_ADDRESS};
