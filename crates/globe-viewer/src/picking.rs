//! Cursor-ray intersection against validator markers.
//!
//! Markers live in globe-local coordinates and the globe spins, so rays are
//! pulled back through the inverse model transform before the sphere tests.

use glam::{Mat4, Vec3};

use crate::viz::validators::{ValidatorMarker, ValidatorNetwork, VALIDATOR_RADIUS};

/// Extra slop around a marker so clicks don't demand pixel precision.
const PICK_RADIUS: f32 = VALIDATOR_RADIUS * 1.2;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Distance along the ray to the nearest hit on the sphere, if any.
    pub fn sphere_hit(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }

    /// The same ray expressed in another frame.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            dir: matrix.transform_vector3(self.dir).normalize(),
        }
    }
}

/// Returns the closest marker the world-space ray hits, given the globe's
/// current model transform.
pub fn pick_validator<'a>(
    ray_world: &Ray,
    model: &Mat4,
    network: &'a ValidatorNetwork,
) -> Option<&'a ValidatorMarker> {
    let ray = ray_world.transformed(&model.inverse());

    network
        .markers()
        .iter()
        .filter_map(|m| ray.sphere_hit(m.position, PICK_RADIUS).map(|t| (t, m)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, m)| m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::validators::ConnectionPolicy;

    #[test]
    fn ray_hits_a_sphere_it_points_at() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let t = ray.sphere_hit(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-4);

        assert!(ray.sphere_hit(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn picking_respects_the_globe_rotation() {
        let network = ValidatorNetwork::new(&ConnectionPolicy::default());
        let marker = &network.markers()[0];

        // Rotate the globe, then aim straight at the rotated marker.
        let model = Mat4::from_rotation_y(1.2);
        let world_pos = model.transform_point3(marker.position);
        let origin = world_pos * 3.0;
        let ray = Ray {
            origin,
            dir: (world_pos - origin).normalize(),
        };

        let picked = pick_validator(&ray, &model, &network).unwrap();
        assert_eq!(picked.record.pubkey, marker.record.pubkey);
    }
}
