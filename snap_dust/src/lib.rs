//! # snap_dust
//!
//! Interactive snap-to-dust demo: a hand is tracked live, its skeleton drawn
//! over the camera view, and snapping thumb and index finger together turns
//! the hand's silhouette into drifting, fading dust.
//!
//! ## Event → Action mapping
//!
//! | Event | Action |
//! |---|---|
//! | Hand frame | Refresh silhouette, measure thumb-index gap, report status |
//! | Gap open (> 50 px) then closed (< 20 px) | Snap: seed dust from the silhouette |
//! | `D` | Force the dust effect (needs a silhouette) |
//! | `R` | Force a reset back to tracking |
//! | Dust fully settled | Automatic return to tracking |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse moves a synthetic hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse | Move the hand |
//! | `Space` / left click (held) | Pinch thumb and index together |
//! | `H` | Hide / show the hand |
//! | `Q` / `Escape` | Quit |
//!
//! Logging goes through `tracing`; set `RUST_LOG=snap_core=debug` to see
//! per-frame distances and particle counts.

pub mod app;
pub mod error;
pub mod source;
pub mod visualizer;
