//! # snap_core
//!
//! Hand-tracking core for the snap-to-dust demo: turns a stream of
//! 21-point hand landmarks into a debounced **snap** event and a
//! **dust** disintegration effect seeded from the hand's silhouette.
//!
//! ## Per-frame flow
//!
//! | Step | Module | Work |
//! |---|---|---|
//! | 1 | [`silhouette`] | Rasterize the primary hand into the cached mask (kept when the hand is missing) |
//! | 2 | [`gesture`] | Thumb-tip/index-tip gap: open (> 50 px) → closed (< 20 px) in one step fires a snap |
//! | 3 | [`effect`] | A snap (or manual trigger) switches `Tracking → Dusting` and seeds particles |
//! | 4 | [`particles`] | Each render tick steps gravity, sway and fade until the dust is gone |
//! | 5 | [`render`] | The pipeline emits [`DrawCommand`]s for whatever draws the frame |
//!
//! [`SnapPipeline`] owns all of the state and is driven from a single
//! consumer: one frame or tick at a time, each run to completion.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use snap_core::{HandFrame, PipelineConfig, SnapPipeline, Status};
//!
//! let mut pipeline = SnapPipeline::new(PipelineConfig::default());
//! let mut statuses: Vec<Status> = Vec::new();
//!
//! pipeline.on_frame(&HandFrame::empty(960, 720), Duration::ZERO, &mut statuses);
//! pipeline.tick(1.0 / 60.0, &mut statuses);
//! assert!(pipeline.force_dust(&mut statuses).is_err()); // no hand seen yet
//! ```

pub mod config;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod landmarks;
pub mod particles;
pub mod pipeline;
pub mod raster;
pub mod render;
pub mod silhouette;
pub mod status;

pub use config::PipelineConfig;
pub use effect::{EffectMachine, EffectMode, ResetReason, TriggerSource};
pub use error::{EffectError, LandmarkError};
pub use geometry::{distance, midpoint, to_pixels, CanvasSize};
pub use gesture::{detect, Detection, GestureState, SnapDetector, SnapThresholds};
pub use landmarks::{HandFrame, HandSample, Landmark, LANDMARK_COUNT};
pub use particles::{DustParams, Particle, ParticleSet, Stepped};
pub use pipeline::{FrameOutcome, SnapPipeline};
pub use render::{DrawCommand, RenderStyle};
pub use silhouette::{SilhouetteBuilder, SilhouetteMask, SilhouetteStyle};
pub use status::{Status, StatusSink};
