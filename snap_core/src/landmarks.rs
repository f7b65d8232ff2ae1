//! Hand landmark types and the fixed 21-point anatomical layout.
//!
//! Landmarks are normalized to the source frame: `x` and `y` both run
//! 0.0–1.0, origin top-left.  A [`HandSample`] always carries exactly
//! [`LANDMARK_COUNT`] points in the order below.

use crate::error::LandmarkError;

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Finger bones plus the palm struts joining the knuckle bases.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, RING_MCP), (RING_MCP, PINKY_MCP),
];

/// Wrist plus the four knuckle bases, in winding order.
pub const PALM_POLYGON: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One normalized joint or fingertip position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, if the estimator reports one.  Unused by the core.
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    pub const fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSample
// ════════════════════════════════════════════════════════════════════════════

/// The 21 landmarks of one detected hand in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandSample {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandSample {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self, LandmarkError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(HandSample { points })
    }

    /// Build from an estimator's flat landmark list.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount { found: points.len() })?;
        Self::new(points)
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }

    pub fn thumb_tip(&self) -> Landmark { self.points[THUMB_TIP] }
    pub fn index_tip(&self) -> Landmark { self.points[INDEX_TIP] }
}

impl std::ops::Index<usize> for HandSample {
    type Output = Landmark;
    fn index(&self, i: usize) -> &Landmark { &self.points[i] }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One estimator result: every hand found in a single source frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandFrame {
    /// Source frame dimensions in pixels.
    pub width:  u32,
    pub height: u32,
    pub hands:  Vec<HandSample>,
}

impl HandFrame {
    pub fn new(width: u32, height: u32, hands: Vec<HandSample>) -> Self {
        HandFrame { width, height, hands }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        HandFrame { width, height, hands: Vec::new() }
    }

    /// The hand the silhouette and gesture logic follow.
    pub fn primary(&self) -> Option<&HandSample> { self.hands.first() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_short_lists() {
        let pts = vec![Landmark::new(0.5, 0.5); 20];
        assert_eq!(
            HandSample::from_slice(&pts),
            Err(LandmarkError::WrongCount { found: 20 })
        );
    }

    #[test]
    fn from_slice_accepts_exactly_21() {
        let pts: Vec<_> = (0..21).map(|i| Landmark::new(i as f32 / 21.0, 0.5)).collect();
        let hand = HandSample::from_slice(&pts).unwrap();
        assert_eq!(hand[INDEX_TIP], pts[8]);
        assert_eq!(hand.thumb_tip(), pts[4]);
    }

    #[test]
    fn non_finite_coordinates_rejected() {
        let mut pts = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        pts[7].y = f32::NAN;
        assert_eq!(HandSample::new(pts), Err(LandmarkError::NonFinite { index: 7 }));
    }

    #[test]
    fn connections_stay_in_range() {
        for &(a, b) in &HAND_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }

    #[test]
    fn primary_is_first_hand() {
        let a = HandSample::new([Landmark::new(0.1, 0.1); LANDMARK_COUNT]).unwrap();
        let b = HandSample::new([Landmark::new(0.9, 0.9); LANDMARK_COUNT]).unwrap();
        let frame = HandFrame::new(640, 480, vec![a.clone(), b]);
        assert_eq!(frame.primary(), Some(&a));
        assert!(HandFrame::empty(640, 480).primary().is_none());
    }
}
