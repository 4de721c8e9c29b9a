#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Pca9685`**: Register-level driver for the PWM controller
//! - **`RegisterBus`**: Byte-oriented register access, implemented for every `embedded_hal` I2C bus
//! - **`AnimationConfig`**: Validated options selecting one animation
//! - **`AnimationMode`**: The animation a configuration resolves to
//! - **`AnimationEngine`**: Runs the animation on three channels for a bounded number of frames
//! - **`ChannelAssignment`**: Which driver outputs carry red, green and blue
//! - **`DutyValue`**: Inverted 12-bit off-point of one channel
//! - **`StopSignal`**: Cooperative cancellation of a running animation
//!
//! Colors are `Srgb<u8>` (0-255 per component). The strip is wired active-low,
//! so a component of 255 becomes duty 0 and a component of 0 becomes duty 4095.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod colors;
pub mod command;
pub mod config;
pub mod driver;
pub mod duty;
pub mod engine;
pub mod mode;
pub mod registers;
pub mod types;

pub use colors::{BLACK, BLUE, GREEN, RED, WHITE};
pub use command::{StopSignal, StripCommand};
pub use config::{AnimationConfig, AnimationConfigBuilder, DEFAULT_FRAMES, DEFAULT_INTERVAL};
pub use driver::{ChannelCounters, DriverError, DriverState, Pca9685, RegisterBus};
pub use duty::{from_duty, to_duty, to_duty_clamped, to_duty_triple};
pub use engine::{AnimationEngine, RunOutcome, RunSummary, STROBE_HOLD};
pub use mode::AnimationMode;
pub use types::{CHANNEL_COUNT, ChannelAssignment, ConfigurationError, DutyValue, RgbColor};
