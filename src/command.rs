//! Start/stop control for running animations.

use core::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop flag shared between a running engine and whoever wants
/// to interrupt it.
///
/// The engine checks it before every frame and before every crossfade step.
/// Raising it from an interrupt handler or another thread is fine; it only
/// needs a shared reference.
#[derive(Debug, Default)]
pub struct StopSignal {
    raised: AtomicBool,
}

impl StopSignal {
    /// Creates a lowered signal.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Asks the running animation to stop.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Re-arms the signal for the next run.
    pub fn reset(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Returns true once a stop has been requested.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// Commands a remote trigger can send to a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripCommand {
    /// Run the configured animation.
    Start,
    /// Interrupt the running animation.
    Stop,
}

impl StripCommand {
    /// Parses a message payload; surrounding ASCII whitespace is ignored.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload.trim_ascii() {
            b"start" => Some(StripCommand::Start),
            b"stop" => Some(StripCommand::Stop),
            _ => None,
        }
    }
}
