//! Bit-level signaling on the SHT1x two-wire serial interface.
//!
//! The interface is electrically similar to I2C but not compatible with
//! it: the start condition, acknowledgement rules and command format are
//! Sensirion-specific. DATA is bidirectional and switched explicitly
//! between host-driven and sensor-driven; CLOCK is always host-driven.
//! Edges are separated by short (≈1µs) inline holds.

use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};

use crate::error::Error;
use crate::io::{DataPin, Direction};

/// Hold time between signal edges, in microseconds.
const EDGE_HOLD_US: u32 = 1;

/// Number of clock pulses in the soft-reset sequence.
const SOFT_RESET_PULSES: usize = 9;

/// The two-wire bus, exclusively owned by one driver instance.
pub struct Bus<DATA, SCK, D> {
    data: DATA,
    sck: SCK,
    delay: D,
}

impl<DATA, SCK, D, E> Bus<DATA, SCK, D>
where
    DATA: DataPin<Error = E>,
    SCK: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Creates a bus over the given DATA and CLOCK lines.
    ///
    /// No signaling happens until the first operation; callers normally
    /// issue a [`soft_reset`](Bus::soft_reset) first.
    pub fn new(data: DATA, sck: SCK, delay: D) -> Self {
        Bus { data, sck, delay }
    }

    /// Issues the transmission-start condition.
    ///
    /// The sensor recognizes a specific figure on the two lines: DATA
    /// falls while CLOCK is high, CLOCK pulses low, then DATA rises while
    /// CLOCK is high again. The edge ordering below is exactly what the
    /// sensor expects; reordering it is a protocol violation.
    pub fn start_transmission(&mut self) -> Result<(), Error<E>> {
        self.data.set_direction(Direction::Output)?;
        self.data.write(PinState::High)?;
        self.sck.set_low()?;
        self.hold();
        self.sck.set_high()?;
        self.hold();
        self.data.write(PinState::Low)?;
        self.hold();
        self.sck.set_low()?;
        self.hold();
        self.sck.set_high()?;
        self.hold();
        self.data.write(PinState::High)?;
        self.hold();
        self.sck.set_low()?;
        self.hold();
        self.data.write(PinState::Low)?;
        Ok(())
    }

    /// Forces the sensor interface back to its idle state.
    ///
    /// With DATA driven high, 9 clock pulses; the sensor abandons any
    /// transfer in progress. Issued at construction and whenever the
    /// measurement cycle is reinitialized.
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.data.set_direction(Direction::Output)?;
        self.data.write(PinState::High)?;
        self.sck.set_low()?;
        for _ in 0..SOFT_RESET_PULSES {
            self.clock_pulse()?;
        }
        Ok(())
    }

    /// Shifts an 8-bit command onto DATA, MSB first, then samples the
    /// sensor's acknowledgement bit.
    ///
    /// The ACK value is sampled and discarded, never validated: a
    /// non-responding sensor is indistinguishable from a responding one
    /// at this stage.
    pub fn send_command(&mut self, opcode: u8) -> Result<(), Error<E>> {
        self.data.set_direction(Direction::Output)?;
        for i in 0..8 {
            let bit = opcode & (1 << (7 - i)) != 0;
            self.data.write(PinState::from(bit))?;
            self.hold();
            self.sck.set_high()?;
            self.hold();
            self.sck.set_low()?;
        }

        // Ninth clock pulse: the sensor pulls DATA low to acknowledge.
        self.data.set_direction(Direction::Input)?;
        self.hold();
        self.sck.set_high()?;
        self.hold();
        let _ack = self.data.read()?;
        self.sck.set_low()?;
        self.hold();

        // Release the line high before leaving it to the sensor.
        self.data.set_direction(Direction::Output)?;
        self.data.write(PinState::High)?;
        self.data.set_direction(Direction::Input)?;
        Ok(())
    }

    /// Samples whether the sensor signals measurement-ready.
    ///
    /// The sensor pulls DATA low once its internal conversion has
    /// finished. There is no upper bound on how long that takes.
    pub fn measurement_ready(&mut self) -> Result<bool, Error<E>> {
        self.data.set_direction(Direction::Input)?;
        Ok(!self.data.read()?)
    }

    /// Reads one byte from the sensor, MSB first.
    ///
    /// Bits are sampled while CLOCK is high. The caller decides how to
    /// close the byte: [`ack_byte`](Bus::ack_byte) to request the next
    /// one, or [`end_transfer`](Bus::end_transfer) to finish.
    pub fn read_byte(&mut self) -> Result<u8, Error<E>> {
        self.data.set_direction(Direction::Input)?;
        let mut byte: u8 = 0;
        for _ in 0..8 {
            self.sck.set_high()?;
            self.hold();
            byte = (byte << 1) | u8::from(self.data.read()?);
            self.sck.set_low()?;
            self.hold();
        }
        Ok(byte)
    }

    /// Acknowledges the byte just read, requesting the next one.
    pub fn ack_byte(&mut self) -> Result<(), Error<E>> {
        self.data.set_direction(Direction::Output)?;
        self.data.write(PinState::Low)?;
        self.clock_pulse()
    }

    /// Terminates the transfer by releasing DATA high during the
    /// acknowledge pulse; the sensor sends nothing further.
    ///
    /// The trailing CRC byte the sensor would offer is never clocked out.
    pub fn end_transfer(&mut self) -> Result<(), Error<E>> {
        self.data.set_direction(Direction::Output)?;
        self.data.write(PinState::High)?;
        self.clock_pulse()
    }

    fn clock_pulse(&mut self) -> Result<(), Error<E>> {
        self.sck.set_high()?;
        self.hold();
        self.sck.set_low()?;
        self.hold();
        Ok(())
    }

    fn hold(&mut self) {
        self.delay.delay_us(EDGE_HOLD_US);
    }
}
