//! Core types shared by the driver and the animation engine.

use palette::Srgb;

/// A human-facing color with one 0-255 component per channel.
pub type RgbColor = Srgb<u8>;

/// Number of PWM outputs on the driver chip.
pub const CHANNEL_COUNT: u8 = 16;

/// Off-point of a single PWM channel in driver counter units.
///
/// The wiring is active-low, so `DutyValue::MAX` (4095) means the channel is
/// fully off and `0` means it is fully on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyValue(u16);

impl DutyValue {
    /// Full brightness.
    pub const MIN: Self = DutyValue(0);

    /// Channel off.
    pub const MAX: Self = DutyValue(4095);

    /// Creates a duty value, clamping anything above 4095.
    #[inline]
    pub const fn new(value: u16) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            DutyValue(value)
        }
    }

    /// Returns the raw 12-bit counter value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<DutyValue> for u16 {
    fn from(value: DutyValue) -> Self {
        value.0
    }
}

/// Which driver output each color channel is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelAssignment {
    red: u8,
    green: u8,
    blue: u8,
}

impl ChannelAssignment {
    /// Creates a validated channel assignment.
    ///
    /// # Errors
    /// * `ChannelOutOfRange` - An index is not a valid driver output
    /// * `DuplicateChannel` - Two colors share an output
    pub fn new(red: u8, green: u8, blue: u8) -> Result<Self, ConfigurationError> {
        for channel in [red, green, blue] {
            if channel >= CHANNEL_COUNT {
                return Err(ConfigurationError::ChannelOutOfRange(channel));
            }
        }

        if red == green {
            return Err(ConfigurationError::DuplicateChannel(red));
        }
        if red == blue || green == blue {
            return Err(ConfigurationError::DuplicateChannel(blue));
        }

        Ok(Self { red, green, blue })
    }

    /// Red output index.
    #[inline]
    pub fn red(&self) -> u8 {
        self.red
    }

    /// Green output index.
    #[inline]
    pub fn green(&self) -> u8 {
        self.green
    }

    /// Blue output index.
    #[inline]
    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Outputs in red, green, blue order.
    #[inline]
    pub fn as_array(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for ChannelAssignment {
    /// The stock strip harness: red on 12, green on 8, blue on 4.
    fn default() -> Self {
        Self {
            red: 12,
            green: 8,
            blue: 4,
        }
    }
}

/// Configuration validation errors.
///
/// Always reported while building, never while an animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// No sequence, color, random or chaos option was given.
    NoAnimationMode,

    /// A sequence was supplied but holds no colors.
    EmptySequence,

    /// An interval sequence was supplied but holds no intervals.
    EmptyIntervalSequence,

    /// Chaos mode cannot crossfade.
    ChaosWithSoft,

    /// Sequence capacity exceeded.
    CapacityExceeded,

    /// Channel index is not a valid driver output.
    ChannelOutOfRange(u8),

    /// The same output was assigned to more than one color.
    DuplicateChannel(u8),
}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigurationError::NoAnimationMode => {
                write!(
                    f,
                    "no animation mode: provide a sequence, a color, random or chaos"
                )
            }
            ConfigurationError::EmptySequence => {
                write!(f, "sequence must have at least one color")
            }
            ConfigurationError::EmptyIntervalSequence => {
                write!(f, "interval sequence must have at least one interval")
            }
            ConfigurationError::ChaosWithSoft => {
                write!(f, "chaos mode cannot be combined with soft transitions")
            }
            ConfigurationError::CapacityExceeded => {
                write!(f, "sequence capacity exceeded")
            }
            ConfigurationError::ChannelOutOfRange(channel) => {
                write!(
                    f,
                    "channel {} is out of range (0-{})",
                    channel,
                    CHANNEL_COUNT - 1
                )
            }
            ConfigurationError::DuplicateChannel(channel) => {
                write!(f, "channel {} is assigned to more than one color", channel)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigurationError {}
