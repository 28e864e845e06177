//! Host-provided capabilities: the bidirectional data line and the
//! timer/scheduling service.
//!
//! The driver never touches hardware directly; it is wired to the target
//! platform through these two traits plus [`OutputPin`] for the clock line
//! and [`DelayNs`] for the short inter-edge holds.
//!
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

use embedded_hal::digital::{ErrorType, PinState};

/// Direction of the bidirectional DATA line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Line is sampled; the sensor may drive it.
    Input,
    /// Line is driven by the host.
    Output,
}

/// A GPIO line whose direction is switched explicitly.
///
/// The SHT1x DATA line alternates between host-driven (commands,
/// acknowledgements) and sensor-driven (response bytes, the
/// measurement-ready signal). Implementations must apply the direction
/// set by [`set_direction`] rather than inferring a mode from prior
/// `write`/`read` calls.
///
/// `write` is only meaningful in [`Direction::Output`], `read` in
/// [`Direction::Input`].
///
/// [`set_direction`]: DataPin::set_direction
pub trait DataPin: ErrorType {
    /// Switches the line direction.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Drives the line to the given level.
    fn write(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Samples the line; `true` means high.
    fn read(&mut self) -> Result<bool, Self::Error>;
}

/// Timer service invoking the driver's [`tick`] callback.
///
/// The driver uses both granularities: a recurring schedule for the
/// inter-cycle period and the measurement-ready poll, and one-shot
/// microsecond delays for protocol steps that follow back-to-back.
///
/// Contract:
/// - at most one schedule is outstanding per driver instance; arming a
///   new schedule replaces any pending one,
/// - [`cancel`] is idempotent — cancelling with nothing pending is a
///   no-op,
/// - each expiry invokes the driver's [`tick`] exactly once and runs it
///   to completion before the next expiry is dispatched.
///
/// [`tick`]: crate::Sht1x::tick
/// [`cancel`]: Scheduler::cancel
pub trait Scheduler {
    /// Arms a recurring schedule with the given period in seconds.
    fn schedule_recurring(&mut self, period_s: f32);

    /// Arms a one-shot schedule expiring after the given delay in
    /// microseconds.
    fn schedule_once_after(&mut self, delay_us: u32);

    /// Cancels the pending schedule, if any.
    fn cancel(&mut self);
}
