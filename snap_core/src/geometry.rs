//! Distance and midpoint helpers over normalized landmarks.

use crate::landmarks::Landmark;

/// Pixel dimensions of the drawing surface.  Axes scale independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    pub width:  u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        CanvasSize { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for CanvasSize {
    fn default() -> Self { CanvasSize::new(960, 720) }
}

/// Map a normalized landmark onto canvas pixels.
pub fn to_pixels(l: Landmark, canvas: CanvasSize) -> (f32, f32) {
    (l.x * canvas.width as f32, l.y * canvas.height as f32)
}

/// Euclidean distance in pixels between two normalized landmarks.
pub fn distance(a: Landmark, b: Landmark, canvas: CanvasSize) -> f32 {
    let dx = (a.x - b.x) * canvas.width as f32;
    let dy = (a.y - b.y) * canvas.height as f32;
    (dx * dx + dy * dy).sqrt()
}

pub fn midpoint(a: Landmark, b: Landmark) -> Landmark {
    Landmark::with_depth((a.x + b.x) * 0.5, (a.y + b.y) * 0.5, (a.z + b.z) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_symmetric() {
        let canvas = CanvasSize::new(1280, 720);
        let a = Landmark::new(0.21, 0.73);
        let b = Landmark::new(0.64, 0.18);
        assert_eq!(distance(a, b, canvas), distance(b, a, canvas));
    }

    #[test]
    fn axes_scale_independently() {
        let canvas = CanvasSize::new(1000, 500);
        let origin = Landmark::new(0.0, 0.0);
        assert_relative_eq!(distance(origin, Landmark::new(0.1, 0.0), canvas), 100.0);
        assert_relative_eq!(distance(origin, Landmark::new(0.0, 0.1), canvas), 50.0);
        assert_relative_eq!(distance(origin, Landmark::new(0.03, 0.08), canvas), 50.0, epsilon = 1e-4);
    }

    #[test]
    fn midpoint_halves_each_axis() {
        let m = midpoint(Landmark::new(0.2, 0.4), Landmark::new(0.6, 0.0));
        assert_relative_eq!(m.x, 0.4);
        assert_relative_eq!(m.y, 0.2);
    }

    #[test]
    fn to_pixels_scales_by_canvas() {
        let (x, y) = to_pixels(Landmark::new(0.5, 0.25), CanvasSize::new(640, 480));
        assert_relative_eq!(x, 320.0);
        assert_relative_eq!(y, 120.0);
    }
}
