//! Pipeline configuration — every tunable in one place.

use crate::geometry::CanvasSize;
use crate::gesture::SnapThresholds;
use crate::particles::DustParams;
use crate::render::RenderStyle;
use crate::silhouette::SilhouetteStyle;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineConfig {
    /// Output surface; landmarks are scaled to it for distances and masks.
    pub canvas:     CanvasSize,
    pub thresholds: SnapThresholds,
    pub silhouette: SilhouetteStyle,
    pub dust:       DustParams,
    pub render:     RenderStyle,
}

impl PipelineConfig {
    pub fn with_canvas(width: u32, height: u32) -> Self {
        PipelineConfig { canvas: CanvasSize::new(width, height), ..Default::default() }
    }
}
