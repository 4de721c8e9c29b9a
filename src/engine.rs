//! Animation engine driving an RGB strip through a PCA9685.
//!
//! Provides [`AnimationEngine`], which owns the driver, the channel wiring
//! and the resolved [`AnimationMode`], and runs a bounded, blocking frame
//! loop on the caller's thread.

use crate::colors::{BLACK, WHITE};
use crate::command::{StopSignal, StripCommand};
use crate::config::AnimationConfig;
use crate::driver::{DriverError, Pca9685, RegisterBus};
use crate::duty::{to_duty, to_duty_triple};
use crate::mode::AnimationMode;
use crate::types::{ChannelAssignment, ConfigurationError, RgbColor};
use core::ops::ControlFlow;
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use log::{debug, info};
use rand_core::RngCore;

/// How long the random strobe shows its color before flashing white.
pub const STROBE_HOLD: Duration = Duration::from_millis(100);

/// Exclusive upper bound of a chaos delay, in milliseconds.
const CHAOS_DELAY_MS: u32 = 1000;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunOutcome {
    /// The whole frame budget was used.
    Completed,
    /// The stop signal was raised.
    Stopped,
}

/// Result of one call to [`AnimationEngine::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Frames that ran to completion.
    pub frames: u64,
    /// Why the run ended.
    pub outcome: RunOutcome,
}

/// Hardware side of the engine: everything a frame touches except the mode.
struct Strip<'s, B: RegisterBus, D: DelayNs, R: RngCore> {
    driver: Pca9685<B>,
    delay: D,
    rng: R,
    channels: ChannelAssignment,
    interval: Duration,
    stop: &'s StopSignal,
    current_color: Option<RgbColor>,
}

/// Per-run cursor through the mode's colors.
#[derive(Debug, Default)]
struct RunState {
    index: usize,
    interval_index: usize,
    source: Option<RgbColor>,
}

/// Runs one lighting animation on one RGB strip.
///
/// The mode is fixed at construction. Each [`start`](Self::start) re-arms
/// the frame budget and runs `frames + 1` frames, blocking for the delays in
/// between, unless the [`StopSignal`] is raised first.
///
/// # Type Parameters
/// * `'s` - Lifetime of the stop signal reference
/// * `B` - Register bus the driver talks through
/// * `D` - Blocking delay provider
/// * `R` - Random number source
/// * `N` - Maximum number of colors in a sequence
pub struct AnimationEngine<'s, B: RegisterBus, D: DelayNs, R: RngCore, const N: usize> {
    strip: Strip<'s, B, D, R>,
    mode: AnimationMode<N>,
    frames: u32,
}

impl<'s, B: RegisterBus, D: DelayNs, R: RngCore, const N: usize> AnimationEngine<'s, B, D, R, N> {
    /// Creates an engine for an initialized driver.
    ///
    /// # Errors
    /// Returns the [`ConfigurationError`] of a configuration that does not
    /// resolve to exactly one mode.
    pub fn new(
        driver: Pca9685<B>,
        channels: ChannelAssignment,
        config: &AnimationConfig<N>,
        delay: D,
        rng: R,
        stop: &'s StopSignal,
    ) -> Result<Self, ConfigurationError> {
        let mode = AnimationMode::resolve(config)?;
        info!(
            "animation engine on channels {:?} using {} mode",
            channels.as_array(),
            mode.name()
        );

        Ok(Self {
            strip: Strip {
                driver,
                delay,
                rng,
                channels,
                interval: config.interval(),
                stop,
                current_color: None,
            },
            mode,
            frames: config.frames(),
        })
    }

    /// Runs the animation until the frame budget is spent or the stop
    /// signal is raised.
    ///
    /// # Errors
    /// The first failed register write aborts the run and is returned.
    /// Writes that already succeeded are not repeated.
    pub fn start(&mut self) -> Result<RunSummary, DriverError<B::Error>> {
        info!(
            "starting {} animation for {} frames",
            self.mode.name(),
            u64::from(self.frames) + 1
        );

        if self.strip.stop.is_raised() {
            return Ok(self.finish(0, RunOutcome::Stopped));
        }

        let mut state = self.begin_run()?;
        let mut remaining = self.frames;
        let mut completed: u64 = 0;

        loop {
            if self.strip.stop.is_raised() {
                return Ok(self.finish(completed, RunOutcome::Stopped));
            }
            if self.frame(&mut state)?.is_break() {
                return Ok(self.finish(completed, RunOutcome::Stopped));
            }
            completed += 1;

            if remaining == 0 {
                return Ok(self.finish(completed, RunOutcome::Completed));
            }
            remaining -= 1;
        }
    }

    /// Applies a remote command.
    ///
    /// `Start` re-arms the stop signal and runs the animation. `Stop` raises
    /// the signal; it only has an effect on a run in another context.
    pub fn handle_command(
        &mut self,
        command: StripCommand,
    ) -> Result<Option<RunSummary>, DriverError<B::Error>> {
        match command {
            StripCommand::Start => {
                self.strip.stop.reset();
                self.start().map(Some)
            }
            StripCommand::Stop => {
                self.strip.stop.raise();
                Ok(None)
            }
        }
    }

    /// Fades from `from` to `to` one unit at a time.
    ///
    /// Red is walked completely, then green, then blue. Each step writes
    /// one channel and then waits one interval; a component that does not
    /// change is not written. Returns `Break` if the stop signal interrupted
    /// the fade.
    pub fn go_to_color(
        &mut self,
        from: RgbColor,
        to: RgbColor,
    ) -> Result<ControlFlow<()>, DriverError<B::Error>> {
        self.strip.go_to_color(from, to)
    }

    /// Sets all three channels to `color` at once.
    pub fn show(&mut self, color: RgbColor) -> Result<(), DriverError<B::Error>> {
        self.strip.show(color)
    }

    /// Turns the strip off.
    pub fn off(&mut self) -> Result<(), DriverError<B::Error>> {
        self.strip.show(BLACK)
    }

    /// The resolved animation mode.
    pub fn mode(&self) -> &AnimationMode<N> {
        &self.mode
    }

    /// The channel wiring.
    pub fn channels(&self) -> ChannelAssignment {
        self.strip.channels
    }

    /// Frame budget; a run executes this many frames plus one.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Last color written to the strip, if any.
    pub fn current_color(&self) -> Option<RgbColor> {
        self.strip.current_color
    }

    /// The underlying driver.
    pub fn driver(&self) -> &Pca9685<B> {
        &self.strip.driver
    }

    /// The underlying driver, e.g. to change the PWM frequency between runs.
    pub fn driver_mut(&mut self) -> &mut Pca9685<B> {
        &mut self.strip.driver
    }

    /// Gives back the driver, delay and random source.
    pub fn release(self) -> (Pca9685<B>, D, R) {
        (self.strip.driver, self.strip.delay, self.strip.rng)
    }

    /// Picks the first crossfade source and puts it on the strip.
    fn begin_run(&mut self) -> Result<RunState, DriverError<B::Error>> {
        let source = match &self.mode {
            AnimationMode::SequenceSoftRandom { sequence } => {
                Some(sequence[self.strip.random_index(sequence.len())])
            }
            AnimationMode::SequenceSoft { sequence } => Some(sequence[0]),
            AnimationMode::RandomSoft { start } => {
                Some(start.unwrap_or_else(|| self.strip.random_color()))
            }
            _ => None,
        };

        if let Some(color) = source {
            self.strip.show(color)?;
        }

        Ok(RunState {
            source,
            ..RunState::default()
        })
    }

    fn finish(&self, frames: u64, outcome: RunOutcome) -> RunSummary {
        match outcome {
            RunOutcome::Completed => info!("{} animation finished", self.mode.name()),
            RunOutcome::Stopped => info!(
                "{} animation stopped after {} frames",
                self.mode.name(),
                frames
            ),
        }
        RunSummary { frames, outcome }
    }

    fn frame(&mut self, state: &mut RunState) -> Result<ControlFlow<()>, DriverError<B::Error>> {
        let strip = &mut self.strip;

        match &self.mode {
            AnimationMode::SequenceSoftRandom { sequence } => {
                let source = state.source.unwrap_or(sequence[0]);
                let target = sequence[strip.random_index(sequence.len())];
                state.source = Some(target);
                strip.crossfade(source, target)
            }
            AnimationMode::SequenceRandom { sequence } => {
                let target = sequence[strip.random_index(sequence.len())];
                strip.show(target)?;
                strip.hold(strip.interval);
                Ok(ControlFlow::Continue(()))
            }
            AnimationMode::SequenceSoft { sequence } => {
                let next = (state.index + 1) % sequence.len();
                let (source, target) = (sequence[state.index], sequence[next]);
                state.index = next;
                strip.crossfade(source, target)
            }
            AnimationMode::Sequence { sequence } => {
                let target = sequence[state.index];
                state.index = (state.index + 1) % sequence.len();
                strip.show(target)?;
                strip.hold(strip.interval);
                Ok(ControlFlow::Continue(()))
            }
            AnimationMode::RandomSoft { .. } => {
                let source = match state.source {
                    Some(color) => color,
                    None => strip.random_color(),
                };
                let target = strip.random_color();
                state.source = Some(target);
                strip.crossfade(source, target)
            }
            AnimationMode::Random { intervals } => {
                let pause = match intervals {
                    Some(intervals) => {
                        let pause = intervals[state.interval_index % intervals.len()];
                        state.interval_index = (state.interval_index + 1) % intervals.len();
                        pause
                    }
                    None => strip.interval,
                };

                let color = strip.random_color();
                strip.show(color)?;
                strip.hold(STROBE_HOLD);
                strip.show(WHITE)?;
                strip.hold(pause);
                Ok(ControlFlow::Continue(()))
            }
            AnimationMode::Chaos => {
                let pause = Duration::from_millis(u64::from(strip.random_below(CHAOS_DELAY_MS)));
                let color = strip.random_color();
                strip.show(color)?;
                strip.hold(pause);
                Ok(ControlFlow::Continue(()))
            }
            AnimationMode::Regular { color } => {
                strip.show(*color)?;
                strip.hold(strip.interval);
                strip.show(BLACK)?;
                strip.hold(strip.interval);
                Ok(ControlFlow::Continue(()))
            }
        }
    }
}

impl<B: RegisterBus, D: DelayNs, R: RngCore> Strip<'_, B, D, R> {
    fn show(&mut self, color: RgbColor) -> Result<(), DriverError<B::Error>> {
        for (channel, duty) in self.channels.as_array().into_iter().zip(to_duty_triple(color)) {
            self.driver.write_channel(channel, 0, duty.get())?;
        }
        self.current_color = Some(color);
        Ok(())
    }

    /// One crossfade frame. A fade with nothing to change still holds the
    /// color for one interval.
    fn crossfade(
        &mut self,
        from: RgbColor,
        to: RgbColor,
    ) -> Result<ControlFlow<()>, DriverError<B::Error>> {
        if from == to {
            self.hold(self.interval);
            return Ok(ControlFlow::Continue(()));
        }
        self.go_to_color(from, to)
    }

    fn go_to_color(
        &mut self,
        from: RgbColor,
        to: RgbColor,
    ) -> Result<ControlFlow<()>, DriverError<B::Error>> {
        debug!(
            "fading ({}, {}, {}) -> ({}, {}, {})",
            from.red, from.green, from.blue, to.red, to.green, to.blue
        );

        let mut shown = from;
        let result = self.walk_components(&mut shown, to);
        self.current_color = Some(shown);
        result
    }

    fn walk_components(
        &mut self,
        shown: &mut RgbColor,
        to: RgbColor,
    ) -> Result<ControlFlow<()>, DriverError<B::Error>> {
        let [red, green, blue] = self.channels.as_array();
        let walks = [
            (red, &mut shown.red, to.red),
            (green, &mut shown.green, to.green),
            (blue, &mut shown.blue, to.blue),
        ];

        for (channel, component, target) in walks {
            if self.walk(channel, component, target)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Steps one channel to `target`, inclusive of both endpoints.
    fn walk(
        &mut self,
        channel: u8,
        component: &mut u8,
        target: u8,
    ) -> Result<ControlFlow<()>, DriverError<B::Error>> {
        if *component == target {
            return Ok(ControlFlow::Continue(()));
        }

        let mut value = *component;
        loop {
            if self.stop.is_raised() {
                return Ok(ControlFlow::Break(()));
            }

            self.driver.write_channel(channel, 0, to_duty(value).get())?;
            *component = value;
            self.hold(self.interval);

            if value == target {
                return Ok(ControlFlow::Continue(()));
            }
            value = if target > value { value + 1 } else { value - 1 };
        }
    }

    /// Blocks for `duration`, in chunks the delay provider can take.
    fn hold(&mut self, duration: Duration) {
        let mut micros = duration.as_micros();
        loop {
            let chunk = micros.min(u128::from(u32::MAX)) as u32;
            self.delay.delay_us(chunk);
            micros -= u128::from(chunk);
            if micros == 0 {
                break;
            }
        }
    }

    fn random_color(&mut self) -> RgbColor {
        let [red, green, blue, _] = self.rng.next_u32().to_le_bytes();
        RgbColor::new(red, green, blue)
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.random_below(len as u32) as usize
    }

    /// Uniform value in `0..bound`.
    fn random_below(&mut self, bound: u32) -> u32 {
        ((u64::from(self.rng.next_u32()) * u64::from(bound)) >> 32) as u32
    }
}
