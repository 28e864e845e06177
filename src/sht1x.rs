//! Non-blocking measurement driver for the SHT1x.
//!
//! A full cycle measures temperature first, then humidity, because the
//! humidity conversion is temperature-compensated. The cycle is cut into
//! six steps driven by timer callbacks; waiting for the sensor's internal
//! conversion never busy-waits the host.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::bus::Bus;
use crate::convert;
use crate::error::Error;
use crate::io::{DataPin, Scheduler};

/// Command opcode: start a temperature measurement.
const CMD_MEASURE_TEMPERATURE: u8 = 0x03;

/// Command opcode: start a relative-humidity measurement.
const CMD_MEASURE_HUMIDITY: u8 = 0x05;

/// Smallest accepted measurement cycle period, in seconds.
///
/// Shorter periods are clamped up to this value. Measuring more often
/// than every 2 seconds self-heats the sensor and skews the readings.
pub const MIN_CYCLE_PERIOD_S: f32 = 2.0;

/// Period of the recurring measurement-ready poll, in seconds.
const READY_POLL_PERIOD_S: f32 = 0.01;

/// One-shot delay between protocol steps that follow back-to-back, in
/// microseconds.
const STEP_DELAY_US: u32 = 1;

/// Position within the measurement cycle.
///
/// The cycle is circular while the driver is enabled; there is no
/// terminal state.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    /// Issue the start condition and the temperature command.
    RequestTemperature,
    /// Poll until the sensor signals the temperature conversion done.
    AwaitTemperature,
    /// Clock out the raw temperature count.
    ReadTemperature,
    /// Issue the start condition and the humidity command.
    RequestHumidity,
    /// Poll until the sensor signals the humidity conversion done.
    AwaitHumidity,
    /// Clock out the raw humidity count, convert, publish.
    ReadHumidity,
}

/// Reading published at the end of a measurement cycle.
///
/// Both values come from the same cycle; the pair is replaced wholesale,
/// never half-updated. Until the first cycle completes both fields are
/// `0.0`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

/// Driver for the SHT1x temperature and humidity sensor.
///
/// The driver owns the bus and a [`Scheduler`] handle; the host's timer
/// service calls [`tick`](Sht1x::tick) on every schedule expiry.
/// Construction soft-resets the sensor and arms the recurring cycle.
pub struct Sht1x<DATA, SCK, D, S> {
    bus: Bus<DATA, SCK, D>,
    scheduler: S,
    state: CycleState,
    raw_temperature: u16,
    reading: Reading,
    cycle_period_s: f32,
    enabled: bool,
}

impl<DATA, SCK, D, S, E> Sht1x<DATA, SCK, D, S>
where
    DATA: DataPin<Error = E>,
    SCK: OutputPin<Error = E>,
    D: DelayNs,
    S: Scheduler,
{
    /// Creates the driver and starts the measurement cycle.
    ///
    /// # Arguments
    ///
    /// * `data` - The bidirectional DATA line.
    /// * `sck` - The CLOCK line, always host-driven.
    /// * `delay` - Delay provider for the short inter-edge holds.
    /// * `scheduler` - Timer service that will invoke [`tick`](Sht1x::tick).
    /// * `cycle_period_s` - Measurement period in seconds, clamped to
    ///   [`MIN_CYCLE_PERIOD_S`].
    pub fn new(
        data: DATA,
        sck: SCK,
        delay: D,
        scheduler: S,
        cycle_period_s: f32,
    ) -> Result<Self, Error<E>> {
        let mut sht = Sht1x {
            bus: Bus::new(data, sck, delay),
            scheduler,
            state: CycleState::RequestTemperature,
            raw_temperature: 0,
            reading: Reading::default(),
            cycle_period_s: cycle_period_s.max(MIN_CYCLE_PERIOD_S),
            enabled: false,
        };
        sht.init()?;
        Ok(sht)
    }

    /// Soft-resets the sensor and (re)arms the measurement cycle.
    ///
    /// Any measurement in flight is abandoned: the cycle restarts at
    /// [`CycleState::RequestTemperature`] with a recurring schedule at
    /// the configured period.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.bus.soft_reset()?;
        self.state = CycleState::RequestTemperature;
        self.enabled = true;
        self.scheduler.schedule_recurring(self.cycle_period_s);
        Ok(())
    }

    /// Stops measuring: cancels the pending schedule.
    ///
    /// No further bus activity happens until [`init`](Sht1x::init) or
    /// [`set_cycle_period`](Sht1x::set_cycle_period) rearms the cycle.
    /// Idempotent.
    pub fn disable(&mut self) {
        self.scheduler.cancel();
        self.enabled = false;
    }

    /// Whether the measurement cycle is currently armed.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Changes the measurement period, clamped to [`MIN_CYCLE_PERIOD_S`].
    ///
    /// If the cycle is armed it is torn down and reinitialized at the
    /// new period; a measurement in flight is discarded, not completed.
    /// If the cycle is disabled only the stored period changes, taking
    /// effect at the next [`init`](Sht1x::init).
    pub fn set_cycle_period(&mut self, period_s: f32) -> Result<(), Error<E>> {
        self.cycle_period_s = period_s.max(MIN_CYCLE_PERIOD_S);
        if self.enabled {
            self.disable();
            self.init()?;
        }
        Ok(())
    }

    /// The effective measurement period in seconds.
    pub fn cycle_period(&self) -> f32 {
        self.cycle_period_s
    }

    /// Current position within the measurement cycle.
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Temperature of the last completed cycle, in degrees Celsius.
    pub fn last_temperature(&self) -> f32 {
        self.reading.temperature
    }

    /// Relative humidity of the last completed cycle, in %RH.
    pub fn last_humidity(&self) -> f32 {
        self.reading.relative_humidity
    }

    /// Temperature and humidity of the last completed cycle, as a pair.
    pub fn last_reading(&self) -> Reading {
        self.reading
    }

    /// Runs one step of the measurement cycle.
    ///
    /// The host's timer service must call this on every schedule expiry
    /// and run it to completion before dispatching the next one. Each
    /// invocation performs the bus work of the current state and leaves
    /// exactly one schedule pending. A tick on a disabled driver is a
    /// no-op.
    ///
    /// The await states poll a recurring ≈10ms schedule until the sensor
    /// pulls DATA low; a sensor that never becomes ready is polled
    /// forever. If a pin operation fails the cycle is left mid-step;
    /// recover with [`init`](Sht1x::init).
    pub fn tick(&mut self) -> Result<(), Error<E>> {
        if !self.enabled {
            return Ok(());
        }
        match self.state {
            CycleState::RequestTemperature => {
                self.scheduler.cancel();
                self.bus.start_transmission()?;
                self.bus.send_command(CMD_MEASURE_TEMPERATURE)?;
                self.state = CycleState::AwaitTemperature;
                self.scheduler.schedule_recurring(READY_POLL_PERIOD_S);
            }
            CycleState::AwaitTemperature => {
                if self.bus.measurement_ready()? {
                    self.scheduler.cancel();
                    self.state = CycleState::ReadTemperature;
                    self.scheduler.schedule_once_after(STEP_DELAY_US);
                }
            }
            CycleState::ReadTemperature => {
                self.scheduler.cancel();
                self.raw_temperature = self.receive_raw()?;
                self.state = CycleState::RequestHumidity;
                self.scheduler.schedule_once_after(STEP_DELAY_US);
            }
            CycleState::RequestHumidity => {
                self.scheduler.cancel();
                self.bus.start_transmission()?;
                self.bus.send_command(CMD_MEASURE_HUMIDITY)?;
                self.state = CycleState::AwaitHumidity;
                self.scheduler.schedule_recurring(READY_POLL_PERIOD_S);
            }
            CycleState::AwaitHumidity => {
                if self.bus.measurement_ready()? {
                    self.scheduler.cancel();
                    self.state = CycleState::ReadHumidity;
                    self.scheduler.schedule_once_after(STEP_DELAY_US);
                }
            }
            CycleState::ReadHumidity => {
                self.scheduler.cancel();
                let raw_humidity = self.receive_raw()?;
                let temperature = convert::temperature_celsius(self.raw_temperature);
                let relative_humidity = convert::relative_humidity(raw_humidity, temperature);
                self.reading = Reading {
                    temperature,
                    relative_humidity,
                };
                self.state = CycleState::RequestTemperature;
                self.scheduler.schedule_recurring(self.cycle_period_s);
            }
        }
        Ok(())
    }

    /// Receives a 16-bit raw count: two bytes MSB first, acknowledging
    /// the first and terminating after the second.
    fn receive_raw(&mut self) -> Result<u16, Error<E>> {
        let high = self.bus.read_byte()?;
        self.bus.ack_byte()?;
        let low = self.bus.read_byte()?;
        self.bus.end_transfer()?;
        Ok(u16::from_be_bytes([high, low]))
    }
}
