//! SHT1x Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Sensirion SHT1x
//! family (SHT10/SHT11/SHT15) of temperature and humidity sensors, spoken
//! over their two-wire synchronous serial interface on top of the
//! [`embedded-hal`] traits.
//!
//! Measurements run as a non-blocking cycle: a host-provided timer service
//! invokes [`Sht1x::tick`] and the driver reschedules itself between
//! protocol steps, so waiting for the sensor's internal conversion never
//! blocks the host. The last completed reading is available at any time
//! through the accessor methods.
//!
//! # Features
//! - Non-blocking, timer-driven measurement cycle
//! - Designed for `no_std` environments
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`OutputPin`] for the clock line
//! - [`DelayNs`] for the short inter-edge holds
//!
//! The bidirectional data line and the timer service are modeled by the
//! crate's own [`DataPin`] and [`Scheduler`] traits, implemented by the
//! host platform.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod convert;
pub mod error;
pub mod io;
pub mod sht1x;

#[cfg(test)]
mod testutil;

pub use bus::Bus;
pub use error::Error;
pub use io::{DataPin, Direction, Scheduler};
pub use sht1x::{CycleState, MIN_CYCLE_PERIOD_S, Reading, Sht1x};
