//! Register-level driver for the PCA9685 16-channel PWM controller.
//!
//! Provides [`Pca9685`], which owns the bus connection to one chip, and the
//! [`RegisterBus`] trait it talks through. The driver knows nothing about
//! colors; it only moves counter values into registers.
//!
//! Every operation takes `&mut self`, so a frequency change (sleep, prescale,
//! restore, restart) can never interleave with a channel write. Callers that
//! share one driver between contexts must put it behind their own lock.

use crate::registers::{self, DEFAULT_ADDRESS};
use crate::types::CHANNEL_COUNT;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, warn};

/// Byte-oriented register access on a shared bus.
///
/// Implemented for every [`embedded_hal::i2c::I2c`] bus. Implement it
/// directly for transports that are not I2C peripherals.
pub trait RegisterBus {
    /// Bus error type.
    type Error: core::fmt::Debug;

    /// Writes one byte to `register` of the device at `address`.
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Reads one byte from `register` of the device at `address`.
    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;
}

impl<T: I2c> RegisterBus for T {
    type Error = T::Error;

    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.write(address, &[register, value])
    }

    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8; 1];
        self.write_read(address, &[register], &mut buffer)?;
        Ok(buffer[0])
    }
}

/// Errors reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// A register read or write failed on the bus.
    Bus(E),

    /// `setup` has not been run yet.
    NotInitialized,

    /// Channel index is not one of the chip's outputs.
    ChannelOutOfRange(u8),

    /// The prescaler cannot produce this frequency.
    FrequencyOutOfRange(u32),
}

impl<E: core::fmt::Debug> core::fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::Bus(error) => write!(f, "bus error: {:?}", error),
            DriverError::NotInitialized => write!(f, "driver used before setup"),
            DriverError::ChannelOutOfRange(channel) => {
                write!(
                    f,
                    "channel {} is out of range (0-{})",
                    channel,
                    CHANNEL_COUNT - 1
                )
            }
            DriverError::FrequencyOutOfRange(hz) => {
                write!(f, "frequency {} Hz is outside the prescaler range", hz)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for DriverError<E> {}

/// Last on/off counter pair programmed into a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelCounters {
    /// Counter value at which the output switches on.
    pub on: u16,
    /// Counter value at which the output switches off.
    pub off: u16,
}

/// What the driver last told the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverState {
    frequency: Option<u32>,
    channels: [ChannelCounters; CHANNEL_COUNT as usize],
}

impl DriverState {
    const fn new() -> Self {
        Self {
            frequency: None,
            channels: [ChannelCounters { on: 0, off: 0 }; CHANNEL_COUNT as usize],
        }
    }

    /// Programmed output frequency in Hz, `None` before setup.
    pub fn frequency(&self) -> Option<u32> {
        self.frequency
    }

    /// Counters last written to `channel`.
    pub fn channel(&self, channel: u8) -> Option<ChannelCounters> {
        self.channels.get(usize::from(channel)).copied()
    }
}

/// PCA9685 PWM controller at a fixed bus address.
pub struct Pca9685<B: RegisterBus> {
    bus: B,
    address: u8,
    state: DriverState,
}

impl<B: RegisterBus> Pca9685<B> {
    /// Creates a driver for the chip at the default address `0x40`.
    ///
    /// No bus traffic happens until [`setup`](Self::setup).
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_ADDRESS)
    }

    /// Creates a driver for a chip with its address pins strapped.
    pub fn with_address(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            state: DriverState::new(),
        }
    }

    /// Brings the chip out of reset into normal operation.
    ///
    /// Turns every output off, enables totem-pole outputs and the all-call
    /// address, then wakes the oscillator. Must run before any other
    /// operation.
    pub fn setup<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DriverError<B::Error>> {
        self.write_all_unchecked(0, 0)?;
        self.write(registers::MODE2, registers::OUTDRV)?;
        self.write(registers::MODE1, registers::ALLCALL)?;
        delay.delay_ms(registers::SETTLE_MS);

        let mode = self.read(registers::MODE1)?;
        self.write(registers::MODE1, mode & !registers::SLEEP)?;
        delay.delay_ms(registers::SETTLE_MS);

        self.state.frequency = Some(registers::DEFAULT_FREQUENCY_HZ);
        debug!("pca9685 @ {:#04x} ready", self.address);
        Ok(())
    }

    /// Programs the PWM output frequency shared by all channels.
    ///
    /// The oscillator must sleep while the prescaler is written; the sleep,
    /// write, restore and restart steps run back to back.
    pub fn set_frequency<D: DelayNs>(
        &mut self,
        hz: u32,
        delay: &mut D,
    ) -> Result<(), DriverError<B::Error>> {
        self.ensure_initialized()?;
        let prescale = registers::prescale_for(hz).ok_or(DriverError::FrequencyOutOfRange(hz))?;

        let old_mode = self.read(registers::MODE1)?;
        let sleep_mode = (old_mode & !registers::RESTART) | registers::SLEEP;
        self.write(registers::MODE1, sleep_mode)?;
        self.write(registers::PRE_SCALE, prescale)?;
        self.write(registers::MODE1, old_mode)?;
        delay.delay_ms(registers::SETTLE_MS);
        self.write(registers::MODE1, old_mode | registers::RESTART)?;

        self.state.frequency = Some(hz);
        debug!("pwm frequency set to {} Hz (prescale {})", hz, prescale);
        Ok(())
    }

    /// Programs one channel's on and off counter points.
    pub fn write_channel(
        &mut self,
        channel: u8,
        on: u16,
        off: u16,
    ) -> Result<(), DriverError<B::Error>> {
        self.ensure_initialized()?;
        if channel >= CHANNEL_COUNT {
            return Err(DriverError::ChannelOutOfRange(channel));
        }

        self.write_counters(registers::channel_base(channel), on, off)?;
        self.state.channels[usize::from(channel)] = ChannelCounters {
            on: on & registers::COUNTER_MASK,
            off: off & registers::COUNTER_MASK,
        };
        Ok(())
    }

    /// Programs every channel at once through the all-call block.
    pub fn write_all(&mut self, on: u16, off: u16) -> Result<(), DriverError<B::Error>> {
        self.ensure_initialized()?;
        self.write_all_unchecked(on, off)
    }

    /// Reads a raw register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, DriverError<B::Error>> {
        self.read(register)
    }

    /// Programmed output frequency in Hz, `None` before setup.
    pub fn frequency(&self) -> Option<u32> {
        self.state.frequency
    }

    /// Bus address of the chip.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Snapshot of what has been programmed so far.
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Releases the bus.
    pub fn release(self) -> B {
        self.bus
    }

    fn ensure_initialized(&self) -> Result<(), DriverError<B::Error>> {
        if self.state.frequency.is_none() {
            return Err(DriverError::NotInitialized);
        }
        Ok(())
    }

    fn write_all_unchecked(&mut self, on: u16, off: u16) -> Result<(), DriverError<B::Error>> {
        self.write_counters(registers::ALL_LED_ON_L, on, off)?;
        let counters = ChannelCounters {
            on: on & registers::COUNTER_MASK,
            off: off & registers::COUNTER_MASK,
        };
        self.state.channels = [counters; CHANNEL_COUNT as usize];
        Ok(())
    }

    fn write_counters(&mut self, base: u8, on: u16, off: u16) -> Result<(), DriverError<B::Error>> {
        let [on_low, on_high] = registers::split_counter(on);
        let [off_low, off_high] = registers::split_counter(off);

        self.write(base, on_low)?;
        self.write(base + 1, on_high)?;
        self.write(base + 2, off_low)?;
        self.write(base + 3, off_high)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), DriverError<B::Error>> {
        self.bus
            .write_register(self.address, register, value)
            .map_err(|error| {
                warn!("write to register {:#04x} failed: {:?}", register, error);
                DriverError::Bus(error)
            })
    }

    fn read(&mut self, register: u8) -> Result<u8, DriverError<B::Error>> {
        self.bus
            .read_register(self.address, register)
            .map_err(|error| {
                warn!("read of register {:#04x} failed: {:?}", register, error);
                DriverError::Bus(error)
            })
    }
}
