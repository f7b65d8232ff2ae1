//! Hand silhouette — a filled raster mask of the tracked hand.
//!
//! The mask is drawn the way a 2D canvas would paint it: every connector
//! stroked with a wide round-capped pen, the palm polygon filled, and a disc
//! stamped on every joint so knuckles and fingertips come out rounded.
//! The result is the particle source for the dust effect.

use crate::geometry::{to_pixels, CanvasSize};
use crate::landmarks::{HandSample, HAND_CONNECTIONS, PALM_POLYGON};
use crate::raster;

pub const OPAQUE: u8 = 0xFF;

// ════════════════════════════════════════════════════════════════════════════
// SilhouetteStyle
// ════════════════════════════════════════════════════════════════════════════

/// Pen sizes, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilhouetteStyle {
    /// Full stroke width for finger bones and palm struts.
    pub bone_width:   f32,
    pub joint_radius: f32,
}

impl Default for SilhouetteStyle {
    fn default() -> Self {
        SilhouetteStyle { bone_width: 28.0, joint_radius: 12.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SilhouetteMask
// ════════════════════════════════════════════════════════════════════════════

/// Inclusive pixel bounds of the opaque region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskBounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

/// Opaque-on-transparent coverage raster, row-major, canvas resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct SilhouetteMask {
    canvas:   CanvasSize,
    coverage: Vec<u8>,
    bounds:   Option<MaskBounds>,
}

impl SilhouetteMask {
    /// A fully transparent mask.
    pub fn empty(canvas: CanvasSize) -> Self {
        SilhouetteMask {
            canvas,
            coverage: vec![0; canvas.pixel_count()],
            bounds:   None,
        }
    }

    /// Rasterize one hand.
    pub fn from_hand(hand: &HandSample, canvas: CanvasSize, style: &SilhouetteStyle) -> Self {
        let mut mask = SilhouetteMask::empty(canvas);
        let (w, h) = (canvas.width as usize, canvas.height as usize);
        let px: Vec<(f32, f32)> = hand.points().iter().map(|&l| to_pixels(l, canvas)).collect();

        for &(a, b) in &HAND_CONNECTIONS {
            raster::stroke_segment(w, h, px[a], px[b], style.bone_width * 0.5, |x, y| mask.paint(x, y));
        }

        let palm: Vec<(f32, f32)> = PALM_POLYGON.iter().map(|&i| px[i]).collect();
        raster::fill_polygon(w, h, &palm, |x, y| mask.paint(x, y));

        for &(cx, cy) in &px {
            raster::fill_disc(w, h, cx, cy, style.joint_radius, |x, y| mask.paint(x, y));
        }
        mask
    }

    fn paint(&mut self, x: usize, y: usize) {
        self.coverage[y * self.canvas.width as usize + x] = OPAQUE;
        self.bounds = Some(match self.bounds {
            None => MaskBounds { min_x: x, min_y: y, max_x: x, max_y: y },
            Some(b) => MaskBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    pub fn canvas(&self) -> CanvasSize { self.canvas }

    /// Tight bounds of the opaque region; `None` for an empty mask.
    pub fn bounds(&self) -> Option<MaskBounds> { self.bounds }

    pub fn is_empty(&self) -> bool { self.bounds.is_none() }

    /// Coverage at a pixel; out-of-range reads are transparent.
    pub fn coverage_at(&self, x: usize, y: usize) -> u8 {
        if x >= self.canvas.width as usize || y >= self.canvas.height as usize {
            return 0;
        }
        self.coverage[y * self.canvas.width as usize + x]
    }

    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        self.coverage_at(x, y) == OPAQUE
    }

    pub fn opaque_count(&self) -> usize {
        self.coverage.iter().filter(|&&c| c == OPAQUE).count()
    }

    /// Mean position of the opaque pixels.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        let b = self.bounds?;
        let (mut sx, mut sy, mut n) = (0.0_f64, 0.0_f64, 0_u64);
        for y in b.min_y..=b.max_y {
            for x in b.min_x..=b.max_x {
                if self.is_opaque(x, y) {
                    sx += x as f64 + 0.5;
                    sy += y as f64 + 0.5;
                    n  += 1;
                }
            }
        }
        (n > 0).then(|| ((sx / n as f64) as f32, (sy / n as f64) as f32))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SilhouetteBuilder
// ════════════════════════════════════════════════════════════════════════════

/// Keeps the single current silhouette, refreshed from each frame's hand.
#[derive(Debug, Default)]
pub struct SilhouetteBuilder {
    style:   SilhouetteStyle,
    current: Option<SilhouetteMask>,
}

impl SilhouetteBuilder {
    pub fn new(style: SilhouetteStyle) -> Self {
        SilhouetteBuilder { style, current: None }
    }

    /// Rebuild from `hand`, replacing the previous mask.  With no hand the
    /// previous mask is kept: it seeds the effect when the triggering frame
    /// lost the hand.
    pub fn update(&mut self, hand: Option<&HandSample>, canvas: CanvasSize) -> Option<&SilhouetteMask> {
        if let Some(hand) = hand {
            self.current = Some(SilhouetteMask::from_hand(hand, canvas, &self.style));
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&SilhouetteMask> { self.current.as_ref() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT, INDEX_TIP, WRIST, MIDDLE_MCP};

    /// An upright open hand centred around (0.5, 0.6).
    fn open_hand() -> HandSample {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[WRIST] = Landmark::new(0.50, 0.80);
        // Thumb out to the left
        for (k, i) in (1..=4).enumerate() {
            pts[i] = Landmark::new(0.46 - 0.04 * k as f32, 0.74 - 0.04 * k as f32);
        }
        // Four fingers fanned upward from the knuckles
        for f in 0..4 {
            let base_x = 0.44 + 0.04 * f as f32;
            for j in 0..4 {
                pts[5 + f * 4 + j] = Landmark::new(base_x, 0.64 - 0.06 * j as f32);
            }
        }
        HandSample::new(pts).unwrap()
    }

    #[test]
    fn mask_covers_palm_and_tips() {
        let canvas = CanvasSize::new(320, 240);
        let hand = open_hand();
        let mask = SilhouetteMask::from_hand(&hand, canvas, &SilhouetteStyle::default());

        let palm_x = ((hand[WRIST].x + hand[MIDDLE_MCP].x) * 0.5 * 320.0) as usize;
        let palm_y = ((hand[WRIST].y + hand[MIDDLE_MCP].y) * 0.5 * 240.0) as usize;
        assert!(mask.is_opaque(palm_x, palm_y));

        let tip = hand[INDEX_TIP];
        assert!(mask.is_opaque((tip.x * 320.0) as usize, (tip.y * 240.0) as usize));

        assert!(!mask.is_opaque(2, 2));
        assert!(!mask.is_opaque(318, 238));
    }

    #[test]
    fn bounds_enclose_every_opaque_pixel() {
        let canvas = CanvasSize::new(160, 120);
        let mask = SilhouetteMask::from_hand(&open_hand(), canvas, &SilhouetteStyle::default());
        let b = mask.bounds().unwrap();
        let mut inside = 0;
        for y in 0..120 {
            for x in 0..160 {
                if mask.is_opaque(x, y) {
                    assert!(x >= b.min_x && x <= b.max_x && y >= b.min_y && y <= b.max_y);
                    inside += 1;
                }
            }
        }
        assert_eq!(inside, mask.opaque_count());
        assert!(mask.centroid().is_some());
    }

    #[test]
    fn empty_mask_has_no_bounds() {
        let mask = SilhouetteMask::empty(CanvasSize::new(10, 10));
        assert!(mask.is_empty());
        assert_eq!(mask.opaque_count(), 0);
        assert!(mask.centroid().is_none());
        assert_eq!(mask.coverage_at(50, 50), 0);
    }

    #[test]
    fn builder_keeps_stale_mask_when_hand_missing() {
        let canvas = CanvasSize::new(160, 120);
        let mut builder = SilhouetteBuilder::default();
        assert!(builder.update(None, canvas).is_none());

        let first = builder.update(Some(&open_hand()), canvas).cloned().unwrap();
        let kept  = builder.update(None, canvas).cloned().unwrap();
        assert_eq!(first, kept);
    }

    #[test]
    fn builder_overwrites_with_newest_hand() {
        let canvas = CanvasSize::new(160, 120);
        let mut builder = SilhouetteBuilder::default();
        builder.update(Some(&open_hand()), canvas);
        let before = builder.current().cloned().unwrap();

        let shifted: Vec<Landmark> = open_hand().points().iter()
            .map(|l| Landmark::new(l.x - 0.2, l.y))
            .collect();
        let shifted = HandSample::from_slice(&shifted).unwrap();
        builder.update(Some(&shifted), canvas);

        assert_ne!(builder.current().unwrap(), &before);
        assert!(builder.current().unwrap().bounds().unwrap().min_x < before.bounds().unwrap().min_x);
    }
}
