//! The per-frame pipeline: the single owner of every piece of mutable state.
//!
//! ```text
//!  HandFrame ──▶ silhouette refresh ──▶ snap detector ──▶ effect machine
//!                                      (skipped while dusting)     │
//!  render tick ───────────────────────────────────────────▶ particle step
//! ```
//!
//! Frames and ticks are handled one at a time, each to completion, by
//! whoever owns the `SnapPipeline`.  Cooldowns are checked against the
//! `now` passed in, so there are no timers to coordinate.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PipelineConfig;
use crate::effect::{EffectMachine, EffectMode, ResetReason, TriggerSource};
use crate::error::EffectError;
use crate::gesture::{GestureState, SnapDetector};
use crate::landmarks::{HandFrame, HandSample};
use crate::particles::ParticleSet;
use crate::render::{dust_commands, tracking_commands, DrawCommand};
use crate::silhouette::{SilhouetteBuilder, SilhouetteMask};
use crate::status::{Status, StatusSink};

/// What one call to [`SnapPipeline::on_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub fired:    bool,
    /// Thumb-index gap when the detector measured one.
    pub distance: Option<f32>,
    pub mode:     EffectMode,
}

pub struct SnapPipeline {
    config:       PipelineConfig,
    silhouettes:  SilhouetteBuilder,
    detector:     SnapDetector,
    effect:       EffectMachine,
    rng:          StdRng,
    /// Hands from the latest frame, kept for drawing.
    hands:        Vec<HandSample>,
    hand_present: bool,
    /// Last source frame size seen, to report a mismatch once.
    source_size:  Option<(u32, u32)>,
}

impl SnapPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Reproducible particle seeding.
    pub fn with_seed(config: PipelineConfig, seed: u64) -> Self {
        SnapPipeline {
            silhouettes:  SilhouetteBuilder::new(config.silhouette),
            detector:     SnapDetector::new(config.thresholds),
            effect:       EffectMachine::new(config.dust.clone()),
            rng:          StdRng::seed_from_u64(seed),
            hands:        Vec::new(),
            hand_present: false,
            source_size:  None,
            config,
        }
    }

    // ── frame handling ────────────────────────────────────────────────────

    /// Process one estimator result taken at session time `now`.
    pub fn on_frame<S: StatusSink + ?Sized>(
        &mut self,
        frame: &HandFrame,
        now:   Duration,
        sink:  &mut S,
    ) -> FrameOutcome {
        self.check_source_size(frame, sink);

        let present = !frame.hands.is_empty();
        if present && !self.hand_present {
            sink.report(Status::HandDetected { hands: frame.hands.len() });
        } else if !present && self.hand_present {
            sink.report(Status::HandLost);
        }
        self.hand_present = present;
        self.hands.clone_from(&frame.hands);

        let canvas = self.config.canvas;
        self.silhouettes.update(frame.primary(), canvas);

        let mut outcome = FrameOutcome { fired: false, distance: None, mode: self.effect.mode() };
        if self.effect.is_dusting() {
            return outcome;
        }
        let Some(hand) = frame.primary() else { return outcome };

        let previous = self.detector.state().previous_distance;
        let detection = self.detector.observe(hand, now, canvas);
        outcome.distance = detection.distance;
        if let Some(d) = detection.distance {
            tracing::debug!(distance = d, "thumb-index gap");
            sink.report(Status::Distance(d));
        }

        if detection.fired {
            outcome.fired = true;
            sink.report(Status::SnapFired {
                previous,
                current: detection.distance.unwrap_or_default(),
            });
            // Refusal is already reported to the sink
            let _ = self.trigger(TriggerSource::Gesture, sink);
        }
        outcome.mode = self.effect.mode();
        outcome
    }

    /// Landmarks are normalized to the source frame, so a source whose size
    /// differs from the canvas is stretched.  Reported once per new size.
    fn check_source_size<S: StatusSink + ?Sized>(&mut self, frame: &HandFrame, sink: &mut S) {
        let size = (frame.width, frame.height);
        if self.source_size == Some(size) { return; }
        self.source_size = Some(size);

        let canvas = self.config.canvas;
        if size.0 > 0 && size.1 > 0 && size != (canvas.width, canvas.height) {
            tracing::warn!(width = size.0, height = size.1, "source frame differs from canvas");
            sink.report(Status::FrameSizeMismatch { width: size.0, height: size.1, canvas });
        }
    }

    /// Advance the dust effect by `dt` seconds of render time.
    pub fn tick<S: StatusSink + ?Sized>(&mut self, dt: f32, sink: &mut S) {
        if let Some(reason) = self.effect.tick(dt) {
            self.detector.reset();
            sink.report(Status::EffectReset(reason));
        }
    }

    // ── manual controls ───────────────────────────────────────────────────

    pub fn force_dust<S: StatusSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize, EffectError> {
        self.trigger(TriggerSource::Manual, sink)
    }

    pub fn force_reset<S: StatusSink + ?Sized>(&mut self, sink: &mut S) {
        self.reset(ResetReason::Manual, sink);
    }

    /// Input source went away: settle in idle tracking.
    pub fn stop<S: StatusSink + ?Sized>(&mut self, sink: &mut S) {
        self.reset(ResetReason::Stopped, sink);
        self.hands.clear();
        self.hand_present = false;
        self.source_size  = None;
    }

    fn trigger<S: StatusSink + ?Sized>(
        &mut self,
        source: TriggerSource,
        sink:   &mut S,
    ) -> Result<usize, EffectError> {
        match self.effect.trigger(source, self.silhouettes.current(), &mut self.rng) {
            Ok(particles) => {
                sink.report(Status::EffectTriggered { source, particles });
                Ok(particles)
            }
            Err(err) => {
                tracing::warn!(%source, "dust effect refused: {}", err);
                sink.report(Status::EffectRefused(err));
                Err(err)
            }
        }
    }

    fn reset<S: StatusSink + ?Sized>(&mut self, reason: ResetReason, sink: &mut S) {
        if self.effect.reset(reason) {
            self.detector.reset();
            sink.report(Status::EffectReset(reason));
        }
    }

    // ── rendering ─────────────────────────────────────────────────────────

    /// Draw intents for the current mode, in painter's order.
    pub fn draw_commands(&self) -> Vec<DrawCommand<'_>> {
        match self.effect.mode() {
            EffectMode::Tracking => tracking_commands(
                &self.hands,
                self.silhouettes.current(),
                &self.config.render,
                self.config.canvas,
            ),
            EffectMode::Dusting => dust_commands(self.effect.particles(), &self.config.render),
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn mode(&self)          -> EffectMode              { self.effect.mode() }
    pub fn gesture_state(&self) -> &GestureState           { self.detector.state() }
    pub fn silhouette(&self)    -> Option<&SilhouetteMask> { self.silhouettes.current() }
    pub fn particles(&self)     -> &ParticleSet            { self.effect.particles() }
    pub fn hands(&self)         -> &[HandSample]           { &self.hands }
    pub fn config(&self)        -> &PipelineConfig         { &self.config }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
