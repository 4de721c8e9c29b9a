//! Animation configuration and its builder.

use crate::mode::AnimationMode;
use crate::types::{ConfigurationError, RgbColor};
use core::time::Duration;
use heapless::Vec;

/// Default hold time between color changes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Default frame budget; a run executes `frames + 1` frames.
pub const DEFAULT_FRAMES: u32 = 10;

/// Every option that selects and tunes an animation.
///
/// Built with [`AnimationConfig::builder`]; a built configuration always
/// resolves to exactly one [`AnimationMode`].
///
/// # Type Parameters
/// * `N` - Maximum number of colors in a sequence and of intervals in an
///   interval sequence
#[derive(Debug, Clone)]
pub struct AnimationConfig<const N: usize> {
    pub(crate) color: Option<RgbColor>,
    pub(crate) sequence: Option<Vec<RgbColor, N>>,
    pub(crate) intervals: Option<Vec<Duration, N>>,
    pub(crate) soft: bool,
    pub(crate) random_sequence: bool,
    pub(crate) random: bool,
    pub(crate) chaos: bool,
    pub(crate) interval: Duration,
    pub(crate) frames: u32,
    pub(crate) random_start: Option<RgbColor>,
}

impl<const N: usize> AnimationConfig<N> {
    /// Creates a new configuration builder.
    pub fn builder() -> AnimationConfigBuilder<N> {
        AnimationConfigBuilder::new()
    }

    /// Static color for the regular blink.
    pub fn color(&self) -> Option<RgbColor> {
        self.color
    }

    /// Colors to step or fade through.
    pub fn sequence(&self) -> Option<&[RgbColor]> {
        self.sequence.as_deref()
    }

    /// Per-frame delays for the random strobe.
    pub fn intervals(&self) -> Option<&[Duration]> {
        self.intervals.as_deref()
    }

    /// Whether color changes crossfade.
    pub fn soft(&self) -> bool {
        self.soft
    }

    /// Whether sequence colors are picked at random.
    pub fn random_sequence(&self) -> bool {
        self.random_sequence
    }

    /// Whether colors are generated at random.
    pub fn random(&self) -> bool {
        self.random
    }

    /// Whether both color and delay are random.
    pub fn chaos(&self) -> bool {
        self.chaos
    }

    /// Fixed hold time, also the per-step time of a crossfade.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frame budget. A run executes `frames + 1` frames.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// First color of a random crossfade.
    pub fn random_start(&self) -> Option<RgbColor> {
        self.random_start
    }
}

/// Builder for validated animation configurations.
#[derive(Debug)]
pub struct AnimationConfigBuilder<const N: usize> {
    config: AnimationConfig<N>,
}

impl<const N: usize> AnimationConfigBuilder<N> {
    /// Creates a builder with the default interval and frame budget.
    pub fn new() -> Self {
        Self {
            config: AnimationConfig {
                color: None,
                sequence: None,
                intervals: None,
                soft: false,
                random_sequence: false,
                random: false,
                chaos: false,
                interval: DEFAULT_INTERVAL,
                frames: DEFAULT_FRAMES,
                random_start: None,
            },
        }
    }

    /// Sets the color for the regular blink.
    pub fn color(mut self, color: RgbColor) -> Self {
        self.config.color = Some(color);
        self
    }

    /// Replaces the sequence with `colors`.
    ///
    /// An empty slice still counts as a supplied sequence and is rejected by
    /// [`build`](Self::build).
    pub fn sequence(mut self, colors: &[RgbColor]) -> Result<Self, ConfigurationError> {
        let sequence =
            Vec::from_slice(colors).map_err(|_| ConfigurationError::CapacityExceeded)?;
        self.config.sequence = Some(sequence);
        Ok(self)
    }

    /// Appends one color to the sequence, starting one if needed.
    pub fn sequence_color(mut self, color: RgbColor) -> Result<Self, ConfigurationError> {
        self.config
            .sequence
            .get_or_insert_with(Vec::new)
            .push(color)
            .map_err(|_| ConfigurationError::CapacityExceeded)?;
        Ok(self)
    }

    /// Sets the per-frame delays used by the random strobe.
    ///
    /// Only the plain random mode reads these; every other mode, chaos
    /// included, ignores them and uses [`interval`](Self::interval).
    pub fn intervals(mut self, intervals: &[Duration]) -> Result<Self, ConfigurationError> {
        let intervals =
            Vec::from_slice(intervals).map_err(|_| ConfigurationError::CapacityExceeded)?;
        self.config.intervals = Some(intervals);
        Ok(self)
    }

    /// Crossfade between colors instead of jumping.
    pub fn soft(mut self, soft: bool) -> Self {
        self.config.soft = soft;
        self
    }

    /// Pick sequence colors at random instead of in order.
    pub fn random_sequence(mut self, random_sequence: bool) -> Self {
        self.config.random_sequence = random_sequence;
        self
    }

    /// Generate colors at random.
    pub fn random(mut self, random: bool) -> Self {
        self.config.random = random;
        self
    }

    /// Randomize both color and delay every frame.
    pub fn chaos(mut self, chaos: bool) -> Self {
        self.config.chaos = chaos;
        self
    }

    /// Sets the hold time between color changes.
    ///
    /// Default is 100 ms.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Sets the frame budget. A run executes `frames + 1` frames.
    ///
    /// Default is 10.
    pub fn frames(mut self, frames: u32) -> Self {
        self.config.frames = frames;
        self
    }

    /// Sets the first color of a random crossfade.
    pub fn random_start(mut self, color: RgbColor) -> Self {
        self.config.random_start = Some(color);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `EmptySequence` - A sequence was set but is empty
    /// * `EmptyIntervalSequence` - An interval sequence was set but is empty
    /// * `ChaosWithSoft` - Chaos and soft were both enabled
    /// * `NoAnimationMode` - Nothing selects a mode
    pub fn build(self) -> Result<AnimationConfig<N>, ConfigurationError> {
        AnimationMode::resolve(&self.config)?;
        Ok(self.config)
    }
}

impl<const N: usize> Default for AnimationConfigBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
