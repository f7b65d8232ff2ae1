//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                                                          │
//! │   canvas: backdrop + skeleton while tracking,            │
//! │           dust particles on a paper overlay while dusting│
//! │                                                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  status headline            distance / mode              │
//! │  key legend                                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The visualizer owns no tracking state.  Each frame it is handed the
//! pipeline's [`DrawCommand`]s and paints them in order.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use snap_core::raster::{fill_disc, fill_polygon, stroke_segment};
use snap_core::{CanvasSize, DrawCommand, SilhouetteMask};

use crate::error::AppError;
use crate::source::{InputEvent, SimInput};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:      usize = 36;
const BACKDROP_TOP:  u32   = 0xFF2B2F3A;
const BACKDROP_LOW:  u32   = 0xFF14161C;
const TEXT_BG:       u32   = 0xFF0F3460;
const TEXT_COLOR:    u32   = 0xFFEEEEEE;
const DETAIL_COLOR:  u32   = 0xFFFFD700;
const LEGEND_COLOR:  u32   = 0xFF888888;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    /// Canvas width/height; the window is `STATUS_H` taller.
    w:        usize,
    h:        usize,
    buf:      Vec<u32>,
    /// Stand-in for the camera frame, painted on `CameraFrame`.
    backdrop: Vec<u32>,
    controls: Sender<InputEvent>,
    /// Present only when the simulated hand is in use.
    sim_tx:   Option<Sender<SimInput>>,
    hidden:   bool,
}

impl Visualizer {
    pub fn new(
        canvas:   CanvasSize,
        controls: Sender<InputEvent>,
        sim_tx:   Option<Sender<SimInput>>,
    ) -> Result<Self, AppError> {
        let (w, h) = (canvas.width as usize, canvas.height as usize);
        let mut window = Window::new(
            "Snap Dust — hand tracking",
            w, h + STATUS_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            w,
            h,
            buf: vec![BACKDROP_LOW; w * (h + STATUS_H)],
            backdrop: backdrop(w, h),
            controls,
            sim_tx,
            hidden: false,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse; manual controls go to the app loop, pointer
    /// state goes to the simulated hand.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            let _ = self.controls.send(InputEvent::Quit);
            return false;
        }
        if one_shot(Key::D) {
            let _ = self.controls.send(InputEvent::ForceDust);
        }
        if one_shot(Key::R) {
            let _ = self.controls.send(InputEvent::ForceReset);
        }
        if one_shot(Key::H) {
            self.hidden = !self.hidden;
        }

        if let Some(tx) = &self.sim_tx {
            let pinched = self.window.is_key_down(Key::Space)
                       || self.window.get_mouse_down(MouseButton::Left);
            let input = match self.window.get_mouse_pos(MouseMode::Discard) {
                Some((mx, my)) if !self.hidden && (my as usize) < self.h => SimInput::Pointer {
                    x: mx / self.w as f32,
                    y: my / self.h as f32,
                    pinched,
                },
                _ => SimInput::Hidden,
            };
            let _ = tx.send(input);
        }

        true
    }

    /// Paint one frame.
    pub fn render(&mut self, cmds: &[DrawCommand<'_>], headline: &str, detail: &str) -> Result<(), AppError> {
        for cmd in cmds {
            match *cmd {
                DrawCommand::CameraFrame => {
                    let n = self.w * self.h;
                    self.buf[..n].copy_from_slice(&self.backdrop);
                }
                DrawCommand::Connector { from, to, width, color } => {
                    let (w, h, buf) = (self.w, self.h, &mut self.buf);
                    stroke_segment(w, h, from, to, width / 2.0, |x, y| buf[y * w + x] = color);
                }
                DrawCommand::LandmarkMarker { at, radius, color } => {
                    let (w, h, buf) = (self.w, self.h, &mut self.buf);
                    fill_disc(w, h, at.0, at.1, radius, |x, y| buf[y * w + x] = color);
                }
                DrawCommand::Silhouette { mask, color, alpha } => {
                    self.draw_silhouette(mask, color, alpha);
                }
                DrawCommand::Particle { at, size, color, alpha } => {
                    self.draw_particle(at, size, color, alpha);
                }
                DrawCommand::Overlay { color, alpha } => {
                    let n = self.w * self.h;
                    for px in &mut self.buf[..n] {
                        *px = blend(*px, color, alpha);
                    }
                }
            }
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, self.h, self.w, STATUS_H, TEXT_BG);
        self.draw_label(headline, 10, self.h + 8, TEXT_COLOR);
        let dx = self.w.saturating_sub(text_width(detail) + 10);
        self.draw_label(detail, dx, self.h + 8, DETAIL_COLOR);

        // ── Key legend ────────────────────────────────────────────────────
        let legend = if self.sim_tx.is_some() {
            "mouse=move hand  space/click=pinch  H=hide  D=dust  R=reset  Q=quit"
        } else {
            "D=dust  R=reset  Q=quit"
        };
        self.draw_label(legend, 10, self.h + STATUS_H - 12, LEGEND_COLOR);

        self.window
            .update_with_buffer(&self.buf, self.w, self.h + STATUS_H)
            .map_err(|e| AppError::Window(e.to_string()))
    }

    // ── Silhouette preview ────────────────────────────────────────────────

    fn draw_silhouette(&mut self, mask: &SilhouetteMask, color: u32, alpha: f32) {
        let Some(b) = mask.bounds() else { return };
        for y in b.min_y..=b.max_y.min(self.h.saturating_sub(1)) {
            for x in b.min_x..=b.max_x.min(self.w.saturating_sub(1)) {
                if mask.is_opaque(x, y) {
                    let i = y * self.w + x;
                    self.buf[i] = blend(self.buf[i], color, alpha);
                }
            }
        }
    }

    // ── Dust ──────────────────────────────────────────────────────────────

    fn draw_particle(&mut self, (px, py): (f32, f32), size: f32, color: u32, alpha: f32) {
        let half = size.max(1.0) / 2.0;
        let quad = [
            (px - half, py - half),
            (px + half, py - half),
            (px + half, py + half),
            (px - half, py + half),
        ];
        let (w, h, buf) = (self.w, self.h, &mut self.buf);
        fill_polygon(w, h, &quad, |x, y| {
            let i = y * w + x;
            buf[i] = blend(buf[i], color, alpha);
        });
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let rows = self.h + STATUS_H;
        for row in y..(y + h).min(rows) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h + STATUS_H {
            self.buf[y * self.w + x] = color;
        }
    }

    /// One line of 3×5 text; clipped at the right edge.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        for (i, ch) in text.chars().enumerate() {
            let gx = x + i * GLYPH_ADVANCE;
            if gx + 3 > self.w { break; }
            let bits = glyph(ch);
            for bit in (0..15).filter(|b| bits & (1 << (14 - b)) != 0) {
                self.set_pixel(gx + bit % 3, y + bit / 3, color);
            }
        }
    }
}

/// Vertical gradient standing in for the camera image.
fn backdrop(w: usize, h: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        let row = blend(BACKDROP_TOP, BACKDROP_LOW, y as f32 / h.max(1) as f32);
        out.extend(std::iter::repeat(row).take(w));
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

/// Glyphs packed row-major into 15 bits, top-left pixel in bit 14.
/// Letters are stored upper case only.
const FONT: &[(char, u16)] = &[
    ('0', 0x7B6F), ('1', 0x2C97), ('2', 0x73E7), ('3', 0x73CF), ('4', 0x5BC9), ('5', 0x79CF),
    ('6', 0x79EF), ('7', 0x7249), ('8', 0x7BEF), ('9', 0x7BCF), ('A', 0x7BED), ('B', 0x6BAE),
    ('C', 0x7927), ('D', 0x6B6E), ('E', 0x79E7), ('F', 0x79E4), ('G', 0x796F), ('H', 0x5BED),
    ('I', 0x7497), ('J', 0x126F), ('K', 0x5BAD), ('L', 0x4927), ('M', 0x5F6D), ('N', 0x7B6D),
    ('O', 0x7B6F), ('P', 0x7BE4), ('Q', 0x7B79), ('R', 0x6BAD), ('S', 0x79CF), ('T', 0x7492),
    ('U', 0x5B6F), ('V', 0x5B52), ('W', 0x5B7D), ('X', 0x5AAD), ('Y', 0x5BD2), ('Z', 0x72A7),
    ('/', 0x12A4), ('-', 0x01C0), ('.', 0x0002), (',', 0x0014), (':', 0x0410), ('=', 0x0E38),
    ('+', 0x05D0), ('!', 0x2482), ('(', 0x1491), (')', 0x4494), ('>', 0x4454), ('\'', 0x2400),
    (';', 0x0414), (' ', 0x0000),
];

/// Unknown characters render as a centred dot.
const MISSING_GLYPH: u16 = 0x0080;

const GLYPH_ADVANCE: usize = 4;

fn glyph(c: char) -> u16 {
    let c = c.to_ascii_uppercase();
    FONT.iter().find(|&&(k, _)| k == c).map_or(MISSING_GLYPH, |&(_, bits)| bits)
}

fn text_width(text: &str) -> usize {
    text.chars().count() * GLYPH_ADVANCE
}

/// Mix `src` over `dst` with coverage `alpha`; the result is opaque.
fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let a = alpha.clamp(0.0, 1.0);
    [16u32, 8, 0].iter().fold(0xFF00_0000, |out, &shift| {
        let d = ((dst >> shift) & 0xFF) as f32;
        let s = ((src >> shift) & 0xFF) as f32;
        out | (((d + (s - d) * a).round() as u32).min(0xFF) << shift)
    })
}
