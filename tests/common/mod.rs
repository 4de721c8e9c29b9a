//! Shared test infrastructure for pca9685-strip integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use pca9685_strip::registers::{CHANNEL_STRIDE, LED0_ON_L};
use pca9685_strip::{Pca9685, StopSignal};

// ============================================================================
// Mock I2C Bus
// ============================================================================

/// One data byte written to the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub address: u8,
    pub register: u8,
    pub value: u8,
}

/// One decoded `write_channel` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelWrite {
    pub channel: u8,
    pub on: u16,
    pub off: u16,
}

#[derive(Debug)]
struct BusState {
    registers: [u8; 256],
    writes: Vec<RegisterWrite>,
    write_count: usize,
    fail_at: Option<usize>,
}

/// Register-file backed I2C bus that records every data byte written.
///
/// Cloning shares the same state, so a test can keep a handle after the
/// bus has been moved into the driver.
#[derive(Debug, Clone)]
pub struct MockBus {
    state: Rc<RefCell<BusState>>,
}

impl MockBus {
    pub fn new() -> Self {
        let mut registers = [0u8; 256];
        // Power-on MODE1: sleeping, all-call enabled
        registers[0x00] = 0x11;
        registers[0xFE] = 0x1E;

        Self {
            state: Rc::new(RefCell::new(BusState {
                registers,
                writes: Vec::new(),
                write_count: 0,
                fail_at: None,
            })),
        }
    }

    /// Makes the `n`th data-byte write from now fail (0-based).
    pub fn fail_write(&self, n: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_at = Some(state.write_count + n);
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state.borrow().registers[usize::from(register)]
    }

    pub fn writes(&self) -> Vec<RegisterWrite> {
        self.state.borrow().writes.clone()
    }

    /// `(register, value)` pairs in write order.
    pub fn register_writes(&self) -> Vec<(u8, u8)> {
        self.writes()
            .iter()
            .map(|write| (write.register, write.value))
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Groups logged writes to channel register blocks into channel writes.
    pub fn channel_writes(&self) -> Vec<ChannelWrite> {
        let writes = self.writes();
        let first = LED0_ON_L;
        let last = LED0_ON_L + CHANNEL_STRIDE * 16;

        let mut decoded = Vec::new();
        let mut index = 0;
        while index + 3 < writes.len() {
            let register = writes[index].register;
            let aligned = register >= first
                && register < last
                && (register - first) % CHANNEL_STRIDE == 0;
            if !aligned {
                index += 1;
                continue;
            }

            let bytes: Vec<u8> = writes[index..index + 4].iter().map(|w| w.value).collect();
            decoded.push(ChannelWrite {
                channel: (register - first) / CHANNEL_STRIDE,
                on: u16::from(bytes[0]) | u16::from(bytes[1]) << 8,
                off: u16::from(bytes[2]) | u16::from(bytes[3]) << 8,
            });
            index += 4;
        }
        decoded
    }

    /// Off counters written to one channel, in order.
    pub fn offs_for(&self, channel: u8) -> Vec<u16> {
        self.channel_writes()
            .iter()
            .filter(|write| write.channel == channel)
            .map(|write| write.off)
            .collect()
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let mut pointer: Option<u8> = None;

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, data)) = bytes.split_first() else {
                        continue;
                    };
                    let mut register = register;
                    for &value in data {
                        if state.fail_at == Some(state.write_count) {
                            state.fail_at = None;
                            return Err(ErrorKind::Other);
                        }
                        state.write_count += 1;
                        state.registers[usize::from(register)] = value;
                        state.writes.push(RegisterWrite {
                            address,
                            register,
                            value,
                        });
                        register = register.wrapping_add(1);
                    }
                    pointer = Some(register);
                }
                Operation::Read(buffer) => {
                    let mut register = pointer.unwrap_or(0);
                    for byte in buffer.iter_mut() {
                        *byte = state.registers[usize::from(register)];
                        register = register.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

#[derive(Debug, Default)]
struct DelayState {
    delays_ns: Vec<u64>,
    stop_after: Option<(usize, &'static StopSignal)>,
}

/// Delay that returns immediately and records what was asked for.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    state: Rc<RefCell<DelayState>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises `signal` once `count` delays have been recorded.
    pub fn raise_after(&self, count: usize, signal: &'static StopSignal) {
        self.state.borrow_mut().stop_after = Some((count, signal));
    }

    /// Recorded delays in microseconds.
    pub fn delays_us(&self) -> Vec<u64> {
        self.state
            .borrow()
            .delays_ns
            .iter()
            .map(|ns| ns / 1_000)
            .collect()
    }

    /// Recorded delays in milliseconds.
    pub fn delays_ms(&self) -> Vec<u64> {
        self.state
            .borrow()
            .delays_ns
            .iter()
            .map(|ns| ns / 1_000_000)
            .collect()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().delays_ns.clear();
    }

    fn record(&mut self, ns: u64) {
        let mut state = self.state.borrow_mut();
        state.delays_ns.push(ns);
        if let Some((count, signal)) = state.stop_after {
            if state.delays_ns.len() >= count {
                signal.raise();
            }
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms) * 1_000_000);
    }
}

// ============================================================================
// Scripted Random Source
// ============================================================================

/// Random source that replays a fixed list of words, cycling.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    words: Vec<u32>,
    position: usize,
}

impl ScriptedRng {
    pub fn new(words: &[u32]) -> Self {
        assert!(!words.is_empty());
        Self {
            words: words.to_vec(),
            position: 0,
        }
    }
}

impl rand_core::RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let word = self.words[self.position % self.words.len()];
        self.position += 1;
        word
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32()) | u64::from(self.next_u32()) << 32
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Word that `random_color` turns into `(red, green, blue)`.
pub fn color_word(red: u8, green: u8, blue: u8) -> u32 {
    u32::from_le_bytes([red, green, blue, 0])
}

/// Word that picks index `index` out of `len` items.
pub fn index_word(index: u32, len: u32) -> u32 {
    // Centre of the bucket for `index`
    let bucket = (1u64 << 32) / u64::from(len);
    (bucket * u64::from(index) + bucket / 2) as u32
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Driver that has completed setup, with the setup traffic cleared.
pub fn ready_driver(bus: &MockBus) -> Pca9685<MockBus> {
    let mut driver = Pca9685::new(bus.clone());
    driver.setup(&mut MockDelay::new()).unwrap();
    bus.clear_log();
    driver
}

/// Off counter the strip uses for a color component.
pub fn duty(component: u8) -> u16 {
    pca9685_strip::to_duty(component).get()
}
