//! Effect state machine: `Tracking` ⇄ `Dusting`.
//!
//! ```text
//!            snap fired / manual trigger      (needs a silhouette)
//!  Tracking ───────────────────────────────▶ Dusting
//!     ▲                                          │
//!     └──────────────────────────────────────────┘
//!            particles dissipated / manual reset
//! ```
//!
//! The machine owns the active [`ParticleSet`].  It is idle while tracking
//! and stepped once per render tick while dusting.

use std::fmt;

use rand::Rng;

use crate::error::EffectError;
use crate::particles::{DustParams, ParticleSet};
use crate::silhouette::SilhouetteMask;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectMode {
    #[default]
    Tracking,
    Dusting,
}

/// What asked for the dust effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerSource {
    Gesture,
    Manual,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSource::Gesture => f.write_str("snap"),
            TriggerSource::Manual  => f.write_str("manual trigger"),
        }
    }
}

/// Why the machine went back to tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetReason {
    /// Every particle retired.
    Dissipated,
    Manual,
    /// The input source shut down.
    Stopped,
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetReason::Dissipated => f.write_str("dust settled"),
            ResetReason::Manual     => f.write_str("manual reset"),
            ResetReason::Stopped    => f.write_str("input stopped"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EffectMachine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct EffectMachine {
    mode:      EffectMode,
    particles: ParticleSet,
    params:    DustParams,
}

impl EffectMachine {
    pub fn new(params: DustParams) -> Self {
        EffectMachine { mode: EffectMode::Tracking, particles: ParticleSet::default(), params }
    }

    /// `Tracking → Dusting`, seeding particles from `silhouette`.
    /// Returns the number of particles seeded.
    pub fn trigger<R: Rng + ?Sized>(
        &mut self,
        source:     TriggerSource,
        silhouette: Option<&SilhouetteMask>,
        rng:        &mut R,
    ) -> Result<usize, EffectError> {
        if self.mode == EffectMode::Dusting {
            return Err(EffectError::AlreadyDusting);
        }
        let mask = silhouette.ok_or(EffectError::NoSilhouette)?;

        self.particles = ParticleSet::seed(mask, &self.params, rng);
        self.mode = EffectMode::Dusting;
        tracing::info!(%source, particles = self.particles.len(), "dust effect started");
        Ok(self.particles.len())
    }

    /// `Dusting → Tracking`.  Always clears the particle set; returns
    /// whether the mode actually changed.
    pub fn reset(&mut self, reason: ResetReason) -> bool {
        self.particles.clear();
        let was_dusting = self.mode == EffectMode::Dusting;
        self.mode = EffectMode::Tracking;
        if was_dusting {
            tracing::info!(%reason, "dust effect ended");
        }
        was_dusting
    }

    /// Advance the particles by `dt` seconds.  Returns `Some(Dissipated)`
    /// on the tick that empties the set and reverts to tracking.
    pub fn tick(&mut self, dt: f32) -> Option<ResetReason> {
        if self.mode != EffectMode::Dusting {
            return None;
        }
        let stepped = self.particles.step(dt);
        self.particles = stepped.set;
        tracing::trace!(remaining = self.particles.len(), "dust tick");
        if stepped.done {
            self.reset(ResetReason::Dissipated);
            return Some(ResetReason::Dissipated);
        }
        None
    }

    pub fn mode(&self)      -> EffectMode   { self.mode }
    pub fn is_dusting(&self) -> bool        { self.mode == EffectMode::Dusting }
    pub fn particles(&self) -> &ParticleSet { &self.particles }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CanvasSize;
    use crate::landmarks::{HandSample, Landmark, LANDMARK_COUNT};
    use crate::silhouette::SilhouetteStyle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mask() -> SilhouetteMask {
        let hand = HandSample::new([Landmark::new(0.5, 0.5); LANDMARK_COUNT]).unwrap();
        SilhouetteMask::from_hand(&hand, CanvasSize::new(120, 90), &SilhouetteStyle::default())
    }

    fn rng() -> StdRng { StdRng::seed_from_u64(11) }

    #[test]
    fn starts_tracking_and_idle() {
        let m = EffectMachine::default();
        assert_eq!(m.mode(), EffectMode::Tracking);
        assert!(m.particles().is_empty());
    }

    #[test]
    fn trigger_without_silhouette_is_refused() {
        let mut m = EffectMachine::default();
        assert_eq!(m.trigger(TriggerSource::Manual, None, &mut rng()), Err(EffectError::NoSilhouette));
        assert_eq!(m.mode(), EffectMode::Tracking);
    }

    #[test]
    fn trigger_seeds_and_enters_dusting() {
        let mut m = EffectMachine::default();
        let n = m.trigger(TriggerSource::Gesture, Some(&mask()), &mut rng()).unwrap();
        assert!(n > 0);
        assert_eq!(m.mode(), EffectMode::Dusting);
        assert_eq!(m.particles().len(), n);
    }

    #[test]
    fn second_trigger_while_dusting_is_refused() {
        let mut m = EffectMachine::default();
        m.trigger(TriggerSource::Gesture, Some(&mask()), &mut rng()).unwrap();
        let before = m.particles().len();
        assert_eq!(
            m.trigger(TriggerSource::Manual, Some(&mask()), &mut rng()),
            Err(EffectError::AlreadyDusting)
        );
        assert_eq!(m.particles().len(), before);
    }

    #[test]
    fn manual_reset_clears_particles() {
        let mut m = EffectMachine::default();
        m.trigger(TriggerSource::Manual, Some(&mask()), &mut rng()).unwrap();
        assert!(m.reset(ResetReason::Manual));
        assert_eq!(m.mode(), EffectMode::Tracking);
        assert!(m.particles().is_empty());
        assert!(!m.reset(ResetReason::Manual));
    }

    #[test]
    fn tick_is_idle_while_tracking() {
        let mut m = EffectMachine::default();
        assert_eq!(m.tick(0.1), None);
    }

    #[test]
    fn dissipation_reverts_to_tracking() {
        let mut m = EffectMachine::default();
        m.trigger(TriggerSource::Gesture, Some(&mask()), &mut rng()).unwrap();
        let mut reason = None;
        for _ in 0..300 {
            reason = m.tick(1.0 / 30.0);
            if reason.is_some() { break; }
        }
        assert_eq!(reason, Some(ResetReason::Dissipated));
        assert_eq!(m.mode(), EffectMode::Tracking);
        assert!(m.particles().is_empty());
    }

    #[test]
    fn empty_silhouette_finishes_on_first_tick() {
        let mut m = EffectMachine::default();
        let empty = SilhouetteMask::empty(CanvasSize::new(10, 10));
        assert_eq!(m.trigger(TriggerSource::Manual, Some(&empty), &mut rng()), Ok(0));
        assert!(m.is_dusting());
        assert_eq!(m.tick(0.016), Some(ResetReason::Dissipated));
    }
}
