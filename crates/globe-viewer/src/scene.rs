//! CPU-side frame geometry: GPU data layouts and their per-frame assembly.

use geoarc::ArcPath;
use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::viz::entity::EntityKind;
use crate::viz::validators::{ValidatorNetwork, VALIDATOR_RADIUS};
use crate::viz::AnimationRegistry;

/// Line-strip sampling used for every arc.
pub const ARC_SEGMENTS: usize = 50;

/// Base alpha applied per kind on top of the fade envelope.
const BEAM_ALPHA: f32 = 0.3;
const MARKER_ALPHA: f32 = 0.8;
const CONNECTION_ALPHA: f32 = 0.3;

/// Shared scene uniform, respecting std140 layout.
/// Must match `Scene` in the WGSL shaders.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniformStd140 {
    pub view_proj: [[f32; 4]; 4],
    /// Globe spin; overlay geometry is authored globe-local and rotates
    /// with it.
    pub model: [[f32; 4]; 4],
    /// Camera right vector (xyz), for billboarding.
    pub cam_right: [f32; 4],
    /// Camera up vector (xyz), for billboarding.
    pub cam_up: [f32; 4],
}

impl SceneUniformStd140 {
    pub fn new(camera: &Camera, model: Mat4) -> Self {
        let (right, up) = camera.right_up();
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            cam_right: [right.x, right.y, right.z, 0.0],
            cam_up: [up.x, up.y, up.z, 0.0],
        }
    }
}

/// Per-instance data for the billboard sprite pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

/// One vertex of the line pipeline (pairs form segments).
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub color: [f32; 4],
}

/// Everything the renderer uploads for one frame.
#[derive(Default)]
pub struct FrameGeometry {
    pub sprites: Vec<SpriteInstance>,
    pub beam_vertices: Vec<LineVertex>,
}

fn push_arc(out: &mut Vec<LineVertex>, arc: &ArcPath, color: [f32; 4]) {
    let points = arc.sample(ARC_SEGMENTS);
    for pair in points.windows(2) {
        out.push(LineVertex {
            pos: pair[0].into(),
            color,
        });
        out.push(LineVertex {
            pos: pair[1].into(),
            color,
        });
    }
}

fn sprite(center: Vec3, radius: f32, rgb: [f32; 3], alpha: f32) -> SpriteInstance {
    SpriteInstance {
        center: center.into(),
        radius,
        color: [rgb[0], rgb[1], rgb[2], alpha],
    }
}

/// Assembles the dynamic overlay geometry for the current tick.
pub fn assemble(
    registry: &AnimationRegistry,
    validators: &ValidatorNetwork,
    now: f64,
) -> FrameGeometry {
    let mut frame = FrameGeometry::default();

    for marker in validators.markers() {
        let glow = marker.glow(now);
        let rgb = crate::viz::entity::COLOR_VALIDATOR;
        frame.sprites.push(sprite(
            marker.position,
            VALIDATOR_RADIUS * marker.scale(now),
            [rgb[0] * (0.7 + glow), rgb[1] * (0.7 + glow), rgb[2] * (0.7 + glow)],
            1.0,
        ));
    }

    for entity in registry.iter() {
        match entity.kind {
            EntityKind::Beam => {
                if let Some(path) = &entity.path {
                    let alpha = BEAM_ALPHA * entity.opacity;
                    push_arc(
                        &mut frame.beam_vertices,
                        path,
                        [entity.color[0], entity.color[1], entity.color[2], alpha],
                    );
                }
            }
            EntityKind::Marker => {
                frame.sprites.push(sprite(
                    entity.position,
                    entity.radius * entity.scale,
                    entity.color,
                    MARKER_ALPHA * entity.opacity,
                ));
            }
            EntityKind::MovingDot => {
                frame.sprites.push(sprite(
                    entity.position,
                    entity.radius * entity.scale,
                    entity.color,
                    entity.opacity,
                ));
            }
        }
    }

    frame
}

/// Builds the static validator-connection geometry once at startup.
pub fn connection_vertices(validators: &ValidatorNetwork) -> Vec<LineVertex> {
    let rgb = crate::viz::entity::COLOR_VALIDATOR;
    let color = [rgb[0], rgb[1], rgb[2], CONNECTION_ALPHA];

    let mut out = Vec::new();
    for arc in validators.connections() {
        push_arc(&mut out, arc, color);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::validators::ConnectionPolicy;
    use geoarc::GeoPoint;

    #[test]
    fn frame_counts_track_the_registry() {
        let validators = ValidatorNetwork::new(&ConnectionPolicy::default());
        let mut registry = AnimationRegistry::new();
        registry.spawn_beam(
            GeoPoint::new(37.7749, -122.4194),
            GeoPoint::new(35.6762, 139.6503),
            2_000_000,
            None,
            0.0,
        );
        registry.tick(0.1);

        let frame = assemble(&registry, &validators, 0.1);

        // 15 validators + 2 endpoint markers + 1 moving dot.
        assert_eq!(frame.sprites.len(), validators.markers().len() + 3);
        // One beam, 50 segments, 2 vertices each.
        assert_eq!(frame.beam_vertices.len(), ARC_SEGMENTS * 2);
    }

    #[test]
    fn connections_emit_fifty_segments_each() {
        let validators = ValidatorNetwork::new(&ConnectionPolicy::default());
        let verts = connection_vertices(&validators);
        assert_eq!(verts.len(), validators.connections().len() * ARC_SEGMENTS * 2);
    }
}
