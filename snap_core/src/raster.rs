//! Scan-conversion primitives shared by the silhouette builder and the
//! software visualizer.
//!
//! Each primitive clips to a `width × height` surface and calls `plot(x, y)`
//! once per covered pixel (pixel centres are sampled at `+0.5`).

/// Fill a disc of radius `r` centred on `(cx, cy)`.
pub fn fill_disc(
    width: usize, height: usize,
    cx: f32, cy: f32, r: f32,
    mut plot: impl FnMut(usize, usize),
) {
    if r <= 0.0 { return; }
    let Some((x0, x1)) = clip_span(cx - r, cx + r, width)  else { return };
    let Some((y0, y1)) = clip_span(cy - r, cy + r, height) else { return };
    let r2 = r * r;
    for y in y0..y1 {
        let dy = y as f32 + 0.5 - cy;
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            if dx * dx + dy * dy <= r2 {
                plot(x, y);
            }
        }
    }
}

/// Stroke a segment with round caps: every pixel within `half_width` of it.
pub fn stroke_segment(
    width: usize, height: usize,
    (ax, ay): (f32, f32), (bx, by): (f32, f32), half_width: f32,
    mut plot: impl FnMut(usize, usize),
) {
    if half_width <= 0.0 { return; }
    let Some((x0, x1)) = clip_span(ax.min(bx) - half_width, ax.max(bx) + half_width, width)  else { return };
    let Some((y0, y1)) = clip_span(ay.min(by) - half_width, ay.max(by) + half_width, height) else { return };

    let (ex, ey) = (bx - ax, by - ay);
    let len2 = ex * ex + ey * ey;
    let hw2  = half_width * half_width;

    for y in y0..y1 {
        let py = y as f32 + 0.5;
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            // Closest point on the segment, parameter clamped to [0, 1]
            let t = if len2 > f32::EPSILON {
                (((px - ax) * ex + (py - ay) * ey) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dx = px - (ax + t * ex);
            let dy = py - (ay + t * ey);
            if dx * dx + dy * dy <= hw2 {
                plot(x, y);
            }
        }
    }
}

/// Fill a simple polygon using the even-odd rule, one scanline per row.
pub fn fill_polygon(
    width: usize, height: usize,
    vertices: &[(f32, f32)],
    mut plot: impl FnMut(usize, usize),
) {
    if vertices.len() < 3 { return; }
    let min_y = vertices.iter().map(|v| v.1).fold(f32::INFINITY, f32::min);
    let max_y = vertices.iter().map(|v| v.1).fold(f32::NEG_INFINITY, f32::max);
    let Some((y0, y1)) = clip_span(min_y, max_y, height) else { return };

    let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());
    for y in y0..y1 {
        let sy = y as f32 + 0.5;
        crossings.clear();
        for i in 0..vertices.len() {
            let (x_a, y_a) = vertices[i];
            let (x_b, y_b) = vertices[(i + 1) % vertices.len()];
            // Half-open rule so shared vertices are counted once
            if (y_a <= sy) != (y_b <= sy) {
                crossings.push(x_a + (sy - y_a) / (y_b - y_a) * (x_b - x_a));
            }
        }
        crossings.sort_by(f32::total_cmp);
        for pair in crossings.chunks_exact(2) {
            // Pixels whose centre lies in [left, right)
            let x0 = (pair[0] - 0.5).ceil().max(0.0);
            let x1 = (pair[1] - 0.5).ceil().min(width as f32);
            if x1 <= x0 { continue; }
            for x in x0 as usize..x1 as usize {
                plot(x, y);
            }
        }
    }
}

/// Integer pixel range `[lo, hi)` covering `[from, to]`, clipped to `0..limit`.
fn clip_span(from: f32, to: f32, limit: usize) -> Option<(usize, usize)> {
    if !from.is_finite() || !to.is_finite() || to < 0.0 || limit == 0 {
        return None;
    }
    // Clamp in float space; casting first would saturate far-away spans
    let lo = from.floor().max(0.0);
    let hi = (to.ceil() + 1.0).min(limit as f32);
    (lo < hi).then_some((lo as usize, hi as usize))
}
