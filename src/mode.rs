//! Animation mode selection.

use crate::config::AnimationConfig;
use crate::types::{ConfigurationError, RgbColor};
use core::time::Duration;
use heapless::Vec;
use log::debug;

/// The one animation an engine runs, resolved once from its configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationMode<const N: usize> {
    /// Crossfade between randomly picked sequence colors.
    SequenceSoftRandom { sequence: Vec<RgbColor, N> },

    /// Jump to a randomly picked sequence color each frame.
    SequenceRandom { sequence: Vec<RgbColor, N> },

    /// Crossfade through the sequence in order, wrapping.
    SequenceSoft { sequence: Vec<RgbColor, N> },

    /// Jump through the sequence in order, wrapping.
    Sequence { sequence: Vec<RgbColor, N> },

    /// Crossfade between random colors.
    RandomSoft { start: Option<RgbColor> },

    /// Jump to a random color, then strobe white.
    Random { intervals: Option<Vec<Duration, N>> },

    /// Random color held for a random delay.
    Chaos,

    /// Alternate between a color and black.
    Regular { color: RgbColor },
}

impl<const N: usize> AnimationMode<N> {
    /// Picks the mode a configuration asks for.
    ///
    /// Priority, first match wins: sequence, random, chaos, regular. Within
    /// the sequence family random-and-soft beats random beats soft; within
    /// the random family soft beats plain.
    ///
    /// # Errors
    /// * `EmptySequence` - A sequence was supplied but is empty
    /// * `EmptyIntervalSequence` - An interval sequence was supplied but is empty
    /// * `ChaosWithSoft` - Chaos and soft were both enabled
    /// * `NoAnimationMode` - Nothing selects a mode
    pub fn resolve(config: &AnimationConfig<N>) -> Result<Self, ConfigurationError> {
        let mode = Self::select(config)?;
        if config.intervals.is_some() && !matches!(mode, AnimationMode::Random { .. }) {
            debug!("interval sequence ignored by {} mode", mode.name());
        }
        Ok(mode)
    }

    fn select(config: &AnimationConfig<N>) -> Result<Self, ConfigurationError> {
        if config.chaos && config.soft {
            return Err(ConfigurationError::ChaosWithSoft);
        }
        if matches!(&config.intervals, Some(intervals) if intervals.is_empty()) {
            return Err(ConfigurationError::EmptyIntervalSequence);
        }

        if let Some(sequence) = &config.sequence {
            if sequence.is_empty() {
                return Err(ConfigurationError::EmptySequence);
            }
            let sequence = sequence.clone();
            return Ok(match (config.random_sequence, config.soft) {
                (true, true) => AnimationMode::SequenceSoftRandom { sequence },
                (true, false) => AnimationMode::SequenceRandom { sequence },
                (false, true) => AnimationMode::SequenceSoft { sequence },
                (false, false) => AnimationMode::Sequence { sequence },
            });
        }

        if config.random {
            return Ok(if config.soft {
                AnimationMode::RandomSoft {
                    start: config.random_start,
                }
            } else {
                AnimationMode::Random {
                    intervals: config.intervals.clone(),
                }
            });
        }

        if config.chaos {
            return Ok(AnimationMode::Chaos);
        }

        match config.color {
            Some(color) => Ok(AnimationMode::Regular { color }),
            None => Err(ConfigurationError::NoAnimationMode),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AnimationMode::SequenceSoftRandom { .. } => "sequence-soft-random",
            AnimationMode::SequenceRandom { .. } => "sequence-random",
            AnimationMode::SequenceSoft { .. } => "sequence-soft",
            AnimationMode::Sequence { .. } => "sequence",
            AnimationMode::RandomSoft { .. } => "random-soft",
            AnimationMode::Random { .. } => "random",
            AnimationMode::Chaos => "chaos",
            AnimationMode::Regular { .. } => "regular",
        }
    }

    /// Whether this mode crossfades.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            AnimationMode::SequenceSoftRandom { .. }
                | AnimationMode::SequenceSoft { .. }
                | AnimationMode::RandomSoft { .. }
        )
    }
}
