//! Snap-gesture recognition.
//!
//! A snap is a *transition*: the thumb-tip/index-tip gap is wide open on one
//! frame and nearly closed on the very next.  Looking at the step rather
//! than a closed-distance snapshot keeps a hand that simply rests pinched
//! from firing.  After a fire the detector sleeps for a cooldown window so a
//! single physical snap spanning several frames yields one event.
//!
//! # Algorithm
//!
//! Each call with a hand and a timestamp `now`:
//!
//! 1. Cooldown active and `now < cooldown_until` → no fire, nothing updated.
//! 2. `d` = pixel distance thumb tip → index tip.
//! 3. Fire when the previous sample is valid (`> 0`), above `high` and
//!    `d < low`; arm the cooldown until `now + cooldown`.
//! 4. Remember `d` for the next frame.

use std::time::Duration;

use crate::geometry::{distance, CanvasSize};
use crate::landmarks::HandSample;

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Tunable snap thresholds, in the pixel units of [`distance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapThresholds {
    /// Previous-frame gap must exceed this ("open").
    pub high:     f32,
    /// Current-frame gap must fall below this ("closed").
    pub low:      f32,
    pub cooldown: Duration,
}

impl Default for SnapThresholds {
    fn default() -> Self {
        SnapThresholds {
            high:     50.0,
            low:      20.0,
            cooldown: Duration::from_millis(1000),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// Detector memory carried from frame to frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    /// Last measured gap; `0.0` means no prior sample.
    pub previous_distance: f32,
    pub cooldown_active:   bool,
    /// Session time at which the cooldown lapses.
    pub cooldown_until:    Duration,
}

impl GestureState {
    pub fn has_prior_sample(&self) -> bool { self.previous_distance > 0.0 }

    pub fn in_cooldown(&self, now: Duration) -> bool {
        self.cooldown_active && now < self.cooldown_until
    }
}

/// Result of one [`detect`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub state: GestureState,
    pub fired: bool,
    /// The measured gap, or `None` when the cooldown skipped measurement.
    pub distance: Option<f32>,
}

// ════════════════════════════════════════════════════════════════════════════
// detect
// ════════════════════════════════════════════════════════════════════════════

/// Classify one frame.  Pure: the new state is returned, never mutated
/// in place.
pub fn detect(
    hand:       &HandSample,
    state:      GestureState,
    now:        Duration,
    canvas:     CanvasSize,
    thresholds: &SnapThresholds,
) -> Detection {
    if state.in_cooldown(now) {
        return Detection { state, fired: false, distance: None };
    }

    let mut next = GestureState { cooldown_active: false, ..state };
    let d = distance(hand.thumb_tip(), hand.index_tip(), canvas);

    let fired = state.has_prior_sample()
        && state.previous_distance > thresholds.high
        && d < thresholds.low;

    if fired {
        next.cooldown_active = true;
        next.cooldown_until  = now + thresholds.cooldown;
    }
    next.previous_distance = d;

    Detection { state: next, fired, distance: Some(d) }
}

// ════════════════════════════════════════════════════════════════════════════
// SnapDetector — stateful wrapper
// ════════════════════════════════════════════════════════════════════════════

/// Owns a [`GestureState`] and feeds it through [`detect`] each frame.
#[derive(Clone, Debug, Default)]
pub struct SnapDetector {
    thresholds: SnapThresholds,
    state:      GestureState,
}

impl SnapDetector {
    pub fn new(thresholds: SnapThresholds) -> Self {
        SnapDetector { thresholds, state: GestureState::default() }
    }

    pub fn observe(&mut self, hand: &HandSample, now: Duration, canvas: CanvasSize) -> Detection {
        let detection = detect(hand, self.state, now, canvas, &self.thresholds);
        self.state = detection.state;
        if detection.fired {
            tracing::info!(
                previous = self.state.previous_distance,
                "snap detected; cooling down for {:?}",
                self.thresholds.cooldown
            );
        }
        detection
    }

    /// Back to "no prior sample, no cooldown".
    pub fn reset(&mut self) { self.state = GestureState::default(); }

    pub fn state(&self) -> &GestureState { &self.state }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT, INDEX_TIP, THUMB_TIP};

    const CANVAS: CanvasSize = CanvasSize::new(1000, 1000);

    /// A hand whose thumb and index tips are `gap` pixels apart horizontally.
    fn hand_with_gap(gap: f32) -> HandSample {
        let mut pts = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        pts[THUMB_TIP] = Landmark::new(0.4, 0.5);
        pts[INDEX_TIP] = Landmark::new(0.4 + gap / 1000.0, 0.5);
        HandSample::new(pts).unwrap()
    }

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    /// Feed a sequence of gaps, 33 ms apart; return which samples fired.
    fn run(gaps: &[f32]) -> Vec<bool> {
        let mut det = SnapDetector::default();
        gaps.iter().enumerate()
            .map(|(i, &g)| det.observe(&hand_with_gap(g), ms(33 * i as u64), CANVAS).fired)
            .collect()
    }

    #[test]
    fn open_then_closed_fires() {
        assert_eq!(run(&[60.0, 15.0]), vec![false, true]);
    }

    #[test]
    fn two_step_closing_does_not_fire() {
        assert_eq!(run(&[60.0, 30.0, 15.0]), vec![false, false, false]);
    }

    #[test]
    fn first_sample_never_fires() {
        let d = detect(&hand_with_gap(5.0), GestureState::default(), ms(0), CANVAS, &SnapThresholds::default());
        assert!(!d.fired);
        assert!(d.state.has_prior_sample());
    }

    #[test]
    fn resting_pinched_hand_does_not_fire() {
        assert!(run(&[10.0, 10.0, 12.0, 8.0]).iter().all(|f| !f));
    }

    #[test]
    fn gaps_just_inside_thresholds_do_not_fire() {
        assert_eq!(run(&[49.0, 10.0]), vec![false, false]);
        assert_eq!(run(&[60.0, 21.0]), vec![false, false]);
    }

    #[test]
    fn only_consecutive_frames_matter() {
        assert_eq!(run(&[60.0, 30.0, 70.0, 12.0]), vec![false, false, false, true]);
    }

    #[test]
    fn cooldown_blocks_refire_for_one_second() {
        let mut det = SnapDetector::default();
        assert!(!det.observe(&hand_with_gap(80.0), ms(0), CANVAS).fired);
        assert!(det.observe(&hand_with_gap(10.0), ms(30), CANVAS).fired);

        // Open and snap again inside the window: suppressed
        assert!(!det.observe(&hand_with_gap(80.0), ms(400), CANVAS).fired);
        assert!(!det.observe(&hand_with_gap(10.0), ms(430), CANVAS).fired);
        assert!(det.state().in_cooldown(ms(1029)));

        // After expiry the open/closed step is needed again
        assert!(!det.observe(&hand_with_gap(80.0), ms(1100), CANVAS).fired);
        assert!(det.observe(&hand_with_gap(10.0), ms(1130), CANVAS).fired);
    }

    #[test]
    fn cooldown_skips_distance_update() {
        let fired = detect(
            &hand_with_gap(10.0),
            GestureState { previous_distance: 90.0, ..Default::default() },
            ms(100), CANVAS, &SnapThresholds::default(),
        );
        assert!(fired.fired);
        let during = detect(&hand_with_gap(70.0), fired.state, ms(200), CANVAS, &SnapThresholds::default());
        assert!(!during.fired);
        assert_eq!(during.distance, None);
        assert_eq!(during.state, fired.state);
    }

    #[test]
    fn expired_cooldown_is_cleared() {
        let state = GestureState {
            previous_distance: 12.0,
            cooldown_active:   true,
            cooldown_until:    ms(1000),
        };
        let d = detect(&hand_with_gap(30.0), state, ms(1000), CANVAS, &SnapThresholds::default());
        assert!(!d.state.cooldown_active);
        assert_eq!(d.distance.map(|v| v.round()), Some(30.0));
    }

    #[test]
    fn reset_restores_sentinel() {
        let mut det = SnapDetector::default();
        det.observe(&hand_with_gap(80.0), ms(0), CANVAS);
        det.observe(&hand_with_gap(10.0), ms(30), CANVAS);
        det.reset();
        assert_eq!(*det.state(), GestureState::default());
    }
}
