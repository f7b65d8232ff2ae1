//! Drawing intents.
//!
//! The core never touches pixels.  Each frame it emits a list of
//! [`DrawCommand`]s in painter's order; a render collaborator (the `minifb`
//! visualizer in `snap_dust`, or anything else) turns them into an image.

use crate::geometry::{to_pixels, CanvasSize};
use crate::landmarks::{HandSample, HAND_CONNECTIONS};
use crate::particles::ParticleSet;
use crate::silhouette::SilhouetteMask;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand<'a> {
    /// Blit the live camera frame as the background.
    CameraFrame,
    Connector      { from: (f32, f32), to: (f32, f32), width: f32, color: u32 },
    LandmarkMarker { at: (f32, f32), radius: f32, color: u32 },
    Silhouette     { mask: &'a SilhouetteMask, color: u32, alpha: f32 },
    Particle       { at: (f32, f32), size: f32, color: u32, alpha: f32 },
    /// Cover the whole surface.
    Overlay        { color: u32, alpha: f32 },
}

/// Colors and pen sizes for the emitted commands.  Colors are ARGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    pub connector_color:  u32,
    pub connector_width:  f32,
    pub marker_color:     u32,
    pub marker_radius:    f32,
    /// Draw the cached silhouette under the skeleton while tracking.
    pub show_silhouette:  bool,
    pub silhouette_color: u32,
    pub silhouette_alpha: f32,
    pub dust_background:  u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle {
            connector_color:  0xFF00FF00,
            connector_width:  4.0,
            marker_color:     0xFFFF0000,
            marker_radius:    4.0,
            show_silhouette:  false,
            silhouette_color: 0xFF000000,
            silhouette_alpha: 0.35,
            dust_background:  0xFFF4F1EA,
        }
    }
}

/// Camera frame, optional silhouette preview, then skeleton and joints for
/// every hand.
pub fn tracking_commands<'a>(
    hands:      &[HandSample],
    silhouette: Option<&'a SilhouetteMask>,
    style:      &RenderStyle,
    canvas:     CanvasSize,
) -> Vec<DrawCommand<'a>> {
    let mut cmds = vec![DrawCommand::CameraFrame];

    if style.show_silhouette {
        if let Some(mask) = silhouette {
            cmds.push(DrawCommand::Silhouette {
                mask,
                color: style.silhouette_color,
                alpha: style.silhouette_alpha,
            });
        }
    }

    for hand in hands {
        for &(a, b) in &HAND_CONNECTIONS {
            cmds.push(DrawCommand::Connector {
                from:  to_pixels(hand[a], canvas),
                to:    to_pixels(hand[b], canvas),
                width: style.connector_width,
                color: style.connector_color,
            });
        }
        for &l in hand.points() {
            cmds.push(DrawCommand::LandmarkMarker {
                at:     to_pixels(l, canvas),
                radius: style.marker_radius,
                color:  style.marker_color,
            });
        }
    }
    cmds
}

/// Opaque backdrop, then every live particle.
pub fn dust_commands<'a>(particles: &ParticleSet, style: &RenderStyle) -> Vec<DrawCommand<'a>> {
    let mut cmds = Vec::with_capacity(particles.len() + 1);
    cmds.push(DrawCommand::Overlay { color: style.dust_background, alpha: 1.0 });
    cmds.extend(particles.iter().map(|p| DrawCommand::Particle {
        at:    (p.x, p.y),
        size:  p.size,
        color: p.color,
        alpha: p.alpha.clamp(0.0, 1.0),
    }));
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT};

    fn hand() -> HandSample {
        let pts: Vec<Landmark> = (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(0.3 + 0.01 * i as f32, 0.5))
            .collect();
        HandSample::from_slice(&pts).unwrap()
    }

    #[test]
    fn tracking_without_hands_is_just_the_camera() {
        let cmds = tracking_commands(&[], None, &RenderStyle::default(), CanvasSize::default());
        assert_eq!(cmds, vec![DrawCommand::CameraFrame]);
    }

    #[test]
    fn each_hand_gets_connectors_and_markers() {
        let hands = [hand(), hand()];
        let cmds = tracking_commands(&hands, None, &RenderStyle::default(), CanvasSize::default());
        let connectors = cmds.iter().filter(|c| matches!(c, DrawCommand::Connector { .. })).count();
        let markers    = cmds.iter().filter(|c| matches!(c, DrawCommand::LandmarkMarker { .. })).count();
        assert_eq!(connectors, 2 * HAND_CONNECTIONS.len());
        assert_eq!(markers, 2 * LANDMARK_COUNT);
        assert_eq!(cmds[0], DrawCommand::CameraFrame);
    }

    #[test]
    fn silhouette_preview_is_opt_in() {
        let canvas = CanvasSize::new(100, 100);
        let mask = SilhouetteMask::empty(canvas);
        let hidden = tracking_commands(&[], Some(&mask), &RenderStyle::default(), canvas);
        assert_eq!(hidden.len(), 1);

        let style = RenderStyle { show_silhouette: true, ..Default::default() };
        let shown = tracking_commands(&[], Some(&mask), &style, canvas);
        assert!(matches!(shown[1], DrawCommand::Silhouette { .. }));
    }

    #[test]
    fn dust_frame_starts_with_overlay() {
        let cmds = dust_commands(&ParticleSet::default(), &RenderStyle::default());
        assert!(matches!(cmds[0], DrawCommand::Overlay { .. }));
        assert_eq!(cmds.len(), 1);
    }
}
