//! Test doubles shared by the module tests.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};
use embedded_hal_mock::eh1::digital::{Mock as PinMock, Transaction as PinTx};

use crate::io::{DataPin, Direction, Scheduler};

/// A [`DataPin`] double backed by an `embedded-hal-mock` pin.
///
/// Level transactions (`set`/`get`) are checked by the inner mock;
/// direction switches are recorded and checked in [`done`].
///
/// [`done`]: DataPinMock::done
#[derive(Clone)]
pub struct DataPinMock {
    pin: PinMock,
    directions: Rc<RefCell<Vec<Direction>>>,
}

impl DataPinMock {
    pub fn new(expected: &[PinTx]) -> Self {
        DataPinMock {
            pin: PinMock::new(expected),
            directions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Asserts that all expected level transactions were consumed and
    /// that the direction switches happened exactly as given.
    pub fn done(&mut self, expected_directions: &[Direction]) {
        self.pin.done();
        assert_eq!(self.directions.borrow().as_slice(), expected_directions);
    }
}

impl ErrorType for DataPinMock {
    type Error = <PinMock as ErrorType>::Error;
}

impl DataPin for DataPinMock {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        self.directions.borrow_mut().push(direction);
        Ok(())
    }

    fn write(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::High => self.pin.set_high(),
            PinState::Low => self.pin.set_low(),
        }
    }

    fn read(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}

/// The schedule a [`SharedScheduler`] currently holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pending {
    Recurring { period_s: f32 },
    OnceAfter { delay_us: u32 },
}

/// A [`Scheduler`] spy with shared state, so tests can observe the
/// pending schedule while the driver owns its own handle.
///
/// Arming replaces any pending schedule; `cancel` clears it. The
/// at-most-one-outstanding contract holds by construction.
#[derive(Clone, Default)]
pub struct SharedScheduler {
    pending: Rc<RefCell<Option<Pending>>>,
}

impl SharedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Pending> {
        *self.pending.borrow()
    }
}

impl Scheduler for SharedScheduler {
    fn schedule_recurring(&mut self, period_s: f32) {
        *self.pending.borrow_mut() = Some(Pending::Recurring { period_s });
    }

    fn schedule_once_after(&mut self, delay_us: u32) {
        *self.pending.borrow_mut() = Some(Pending::OnceAfter { delay_us });
    }

    fn cancel(&mut self) {
        *self.pending.borrow_mut() = None;
    }
}
