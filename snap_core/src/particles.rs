//! Dust particles — seeded from a silhouette, then left to fall and fade.
//!
//! Seeding walks the mask's bounding box in `density × density` blocks and
//! drops one jittered particle in every block that touches the opaque
//! region.  Each particle flies outward from the silhouette's centroid with
//! a downward bias, picks a tint from the dust palette and a random lifetime.
//!
//! Stepping is a pure function of `(set, dt)`: gravity pulls down, a
//! per-particle sinusoidal drift sways sideways, alpha decays linearly with
//! `age / lifetime`, and anything expired, invisible or fallen off the
//! bottom of the canvas is retired.

use std::f32::consts::TAU;

use rand::Rng;

use crate::geometry::CanvasSize;
use crate::silhouette::SilhouetteMask;

// ════════════════════════════════════════════════════════════════════════════
// DustParams
// ════════════════════════════════════════════════════════════════════════════

/// Tunables for seeding and simulation.  Distances are canvas pixels,
/// times are seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct DustParams {
    /// Side of the sampling block; one particle per block.
    pub density:         usize,
    /// Downward acceleration, px/s².
    pub gravity:         f32,
    /// Peak sideways acceleration of the sway, px/s².
    pub drift:           f32,
    /// Sway angular frequency, rad/s.
    pub drift_frequency: f32,
    pub speed_min:       f32,
    pub speed_max:       f32,
    /// Extra initial downward velocity, px/s.
    pub downward_bias:   f32,
    pub lifetime_min:    f32,
    pub lifetime_max:    f32,
    pub particle_size:   f32,
    /// ARGB tints; one is picked per particle.
    pub palette:         Vec<u32>,
    pub max_particles:   usize,
    /// Particles this far below the canvas are retired.
    pub floor_margin:    f32,
}

impl Default for DustParams {
    fn default() -> Self {
        DustParams {
            density:         4,
            gravity:         240.0,
            drift:           60.0,
            drift_frequency: 6.0,
            speed_min:       40.0,
            speed_max:       160.0,
            downward_bias:   40.0,
            lifetime_min:    1.0,
            lifetime_max:    2.4,
            particle_size:   2.0,
            palette: vec![
                0xFF8C7B6B, // ash
                0xFFB09A82, // sand
                0xFF5E5249, // soot
                0xFFD2B48C, // tan
            ],
            max_particles:   20_000,
            floor_margin:    32.0,
        }
    }
}

const FALLBACK_TINT: u32 = 0xFF8C7B6B;

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x:          f32,
    pub y:          f32,
    pub vx:         f32,
    pub vy:         f32,
    pub color:      u32,
    /// Opacity at birth; `alpha` decays from here.
    pub base_alpha: f32,
    pub alpha:      f32,
    pub age:        f32,
    pub lifetime:   f32,
    /// Sway phase offset so neighbours don't move in lockstep.
    pub phase:      f32,
    pub size:       f32,
}

impl Particle {
    /// This particle `dt` seconds later, or `None` once it is retired.
    fn advanced(&self, dt: f32, physics: &DustPhysics) -> Option<Particle> {
        let mut p = *self;
        p.vy += physics.gravity * dt;
        p.vx += physics.drift * (p.phase + p.age * physics.drift_frequency).sin() * dt;
        p.x  += p.vx * dt;
        p.y  += p.vy * dt;
        p.age += dt;
        p.alpha = p.base_alpha * (1.0 - p.age / p.lifetime);

        let retired = p.age >= p.lifetime || p.alpha <= 0.0 || p.y > physics.floor_y;
        (!retired).then_some(p)
    }

    /// Fraction of life used, 0.0–1.0.
    pub fn life_fraction(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleSet
// ════════════════════════════════════════════════════════════════════════════

/// Physics constants frozen into a set when it is seeded.
#[derive(Clone, Copy, Debug, PartialEq)]
struct DustPhysics {
    gravity:         f32,
    drift:           f32,
    drift_frequency: f32,
    floor_y:         f32,
}

impl DustPhysics {
    fn new(params: &DustParams, canvas: CanvasSize) -> Self {
        DustPhysics {
            gravity:         params.gravity,
            drift:           params.drift,
            drift_frequency: params.drift_frequency,
            floor_y:         canvas.height as f32 + params.floor_margin,
        }
    }
}

/// The active particles of one dust effect.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    physics:   DustPhysics,
}

/// Result of [`ParticleSet::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Stepped {
    pub set:  ParticleSet,
    /// True once every particle has been retired.
    pub done: bool,
}

impl Default for ParticleSet {
    fn default() -> Self {
        ParticleSet::idle(&DustParams::default(), CanvasSize::default())
    }
}

impl ParticleSet {
    /// An empty set carrying the physics for `canvas`.
    pub fn idle(params: &DustParams, canvas: CanvasSize) -> Self {
        ParticleSet { particles: Vec::new(), physics: DustPhysics::new(params, canvas) }
    }

    /// Sample particles from the opaque region of `mask`.
    pub fn seed<R: Rng + ?Sized>(mask: &SilhouetteMask, params: &DustParams, rng: &mut R) -> Self {
        let mut set = ParticleSet::idle(params, mask.canvas());
        let Some(bounds) = mask.bounds() else { return set };
        let Some((cx, cy)) = mask.centroid() else { return set };

        let block = params.density.max(1);
        for by in (bounds.min_y..=bounds.max_y).step_by(block) {
            for bx in (bounds.min_x..=bounds.max_x).step_by(block) {
                let jittered = (bx + rng.random_range(0..block), by + rng.random_range(0..block));
                let hit = if mask.is_opaque(jittered.0, jittered.1) {
                    Some(jittered)
                } else {
                    first_opaque_in_block(mask, bx, by, block)
                };
                if let Some((x, y)) = hit {
                    set.particles.push(spawn(x as f32 + 0.5, y as f32 + 0.5, (cx, cy), params, rng));
                }
            }
        }

        thin_to(&mut set.particles, params.max_particles);
        tracing::debug!(
            particles = set.particles.len(),
            opaque = mask.opaque_count(),
            "seeded dust from silhouette"
        );
        set
    }

    /// Advance every particle by `dt` seconds.  `self` is left untouched.
    pub fn step(&self, dt: f32) -> Stepped {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let particles: Vec<Particle> = self.particles.iter()
            .filter_map(|p| p.advanced(dt, &self.physics))
            .collect();
        let done = particles.is_empty();
        Stepped { set: ParticleSet { particles, physics: self.physics }, done }
    }

    pub fn len(&self)      -> usize               { self.particles.len() }
    pub fn is_empty(&self) -> bool                { self.particles.is_empty() }
    pub fn iter(&self)     -> std::slice::Iter<'_, Particle> { self.particles.iter() }
    pub fn particles(&self) -> &[Particle]        { &self.particles }

    pub fn clear(&mut self) { self.particles.clear(); }
}

fn first_opaque_in_block(mask: &SilhouetteMask, bx: usize, by: usize, block: usize) -> Option<(usize, usize)> {
    (by..by + block)
        .flat_map(|y| (bx..bx + block).map(move |x| (x, y)))
        .find(|&(x, y)| mask.is_opaque(x, y))
}

fn spawn<R: Rng + ?Sized>(
    x: f32, y: f32,
    (cx, cy): (f32, f32),
    params: &DustParams,
    rng: &mut R,
) -> Particle {
    // Outward from the centroid, with some angular scatter
    let (dx, dy) = (x - cx, y - cy);
    let base_angle = if dx.abs() + dy.abs() > f32::EPSILON {
        dy.atan2(dx)
    } else {
        rng.random_range(0.0..TAU)
    };
    let angle = base_angle + rng.random_range(-0.6_f32..=0.6);
    let speed = random_between(rng, params.speed_min, params.speed_max);

    let color = if params.palette.is_empty() {
        FALLBACK_TINT
    } else {
        params.palette[rng.random_range(0..params.palette.len())]
    };
    let base_alpha: f32 = rng.random_range(0.7..=1.0);

    Particle {
        x,
        y,
        vx: angle.cos() * speed,
        vy: angle.sin() * speed + params.downward_bias,
        color,
        base_alpha,
        alpha: base_alpha,
        age: 0.0,
        lifetime: random_between(rng, params.lifetime_min, params.lifetime_max).max(f32::EPSILON),
        phase: rng.random_range(0.0..TAU),
        size: params.particle_size,
    }
}

/// Uniform in `[a, b]` regardless of argument order.
fn random_between<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}

/// Keep at most `max` particles, dropping by uniform stride.
fn thin_to(particles: &mut Vec<Particle>, max: usize) {
    if max == 0 || particles.len() <= max { return; }
    let stride = particles.len() as f64 / max as f64;
    let kept: Vec<Particle> = (0..max)
        .map(|i| particles[(i as f64 * stride) as usize])
        .collect();
    *particles = kept;
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
