//! Geographic projection and arc geometry for globe overlays.
//!
//! - Maps lat/lon degrees onto a Y-up render sphere centered at the origin.
//! - Builds quadratic Bézier arcs lifted above the sphere surface, for
//!   connection lines and transaction beams.
//!
//! Everything in here is pure math over `glam` vectors; there is no I/O and
//! no hidden state. Callers own the geographic-domain validation: inputs
//! outside [-90, 90] / [-180, 180] still produce a well-defined point, it is
//! just not on the part of the sphere they meant.

use glam::Vec3;

/// Render-sphere radius used by the globe scene, in scene units.
pub const GLOBE_RADIUS: f32 = 5.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, north positive. Valid range [-90, 90].
    pub lat_deg: f32,
    /// Longitude in degrees, east positive. Valid range [-180, 180].
    pub lon_deg: f32,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat_deg: f32, lon_deg: f32) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// Projects this coordinate onto a sphere of `radius` centered at the
    /// origin.
    ///
    /// Uses the polar-angle form φ = (90 − lat)·π/180, θ = (lon + 180)·π/180
    /// with x = −r·sin φ·cos θ, y = r·cos φ, z = r·sin φ·sin θ, so the north
    /// pole lands on +Y and the result always has length `radius`.
    pub fn to_sphere(self, radius: f32) -> Vec3 {
        let phi = (90.0 - self.lat_deg).to_radians();
        let theta = (self.lon_deg + 180.0).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();

        Vec3::new(
            -(radius * sin_phi * cos_theta),
            radius * cos_phi,
            radius * sin_phi * sin_theta,
        )
    }
}

/// How far an arc is lifted off the sphere surface.
///
/// The arc's control point sits at `base_radius + min(chord · height_scale,
/// max_height)` from the origin, so short hops stay flat and long hauls get
/// a visible bow without ballooning.
#[derive(Debug, Clone, Copy)]
pub struct ArcLift {
    pub height_scale: f32,
    pub max_height: f32,
    pub base_radius: f32,
}

impl ArcLift {
    /// Lift used for persistent validator-to-validator connection lines.
    pub const CONNECTION: Self = Self {
        height_scale: 0.3,
        max_height: 2.5,
        base_radius: GLOBE_RADIUS,
    };

    /// Lift used for transaction beams; slightly taller than connections.
    pub const BEAM: Self = Self {
        height_scale: 0.4,
        max_height: 3.0,
        base_radius: GLOBE_RADIUS,
    };
}

/// A quadratic Bézier arc between two points on (or near) the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    start: Vec3,
    ctrl: Vec3,
    end: Vec3,
}

impl ArcPath {
    /// Midpoints shorter than this have no usable direction; the endpoints
    /// are antipodal up to float noise.
    const MIN_MIDPOINT_LEN: f32 = 1e-3;

    /// Builds an arc from `start` to `end`, lifted per `lift`.
    ///
    /// Returns `None` when the endpoint midpoint has no direction (antipodal
    /// endpoints, or both at the origin), since the control point would be
    /// undefined.
    pub fn between(start: Vec3, end: Vec3, lift: ArcLift) -> Option<Self> {
        let mid = (start + end) * 0.5;
        if mid.length_squared() < Self::MIN_MIDPOINT_LEN * Self::MIN_MIDPOINT_LEN {
            return None;
        }
        let dir = mid / mid.length();

        let chord = start.distance(end);
        let height = (chord * lift.height_scale).min(lift.max_height);
        let ctrl = dir * (lift.base_radius + height);

        Some(Self { start, ctrl, end })
    }

    /// Position along the arc for `t` in [0, 1]:
    /// B(t) = (1−t)²·start + 2(1−t)t·ctrl + t²·end.
    ///
    /// `point_at(0.0)` is exactly `start` and `point_at(1.0)` exactly `end`.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.ctrl * (2.0 * u * t) + self.end * (t * t)
    }

    /// Samples the arc into `segments` straight pieces (`segments + 1`
    /// points), for line-strip geometry.
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        let n = segments.max(1);
        (0..=n)
            .map(|i| self.point_at(i as f32 / n as f32))
            .collect()
    }

    #[inline]
    pub fn start(&self) -> Vec3 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Straight-line distance between the endpoints.
    #[inline]
    pub fn chord_len(&self) -> f32 {
        self.start.distance(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn north_pole_projects_to_plus_y() {
        let p = GeoPoint::new(90.0, 0.0).to_sphere(GLOBE_RADIUS);
        assert!(p.x.abs() < EPS && p.z.abs() < EPS);
        assert!((p.y - GLOBE_RADIUS).abs() < EPS);
    }

    #[test]
    fn south_pole_projects_to_minus_y() {
        let p = GeoPoint::new(-90.0, 0.0).to_sphere(GLOBE_RADIUS);
        assert!(p.x.abs() < EPS && p.z.abs() < EPS);
        assert!((p.y + GLOBE_RADIUS).abs() < EPS);
    }

    #[test]
    fn projection_stays_on_sphere_surface() {
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(30) {
                let p = GeoPoint::new(lat as f32, lon as f32).to_sphere(GLOBE_RADIUS);
                assert!(
                    (p.length() - GLOBE_RADIUS).abs() < EPS,
                    "({lat}, {lon}) left the sphere: |p| = {}",
                    p.length()
                );
            }
        }
    }

    #[test]
    fn arc_endpoints_are_exact() {
        let a = GeoPoint::new(37.7749, -122.4194).to_sphere(GLOBE_RADIUS);
        let b = GeoPoint::new(35.6762, 139.6503).to_sphere(GLOBE_RADIUS);
        let arc = ArcPath::between(a, b, ArcLift::BEAM).unwrap();

        assert_eq!(arc.point_at(0.0), a);
        assert_eq!(arc.point_at(1.0), b);
    }

    #[test]
    fn arc_midpoint_is_lifted_above_surface() {
        let a = GeoPoint::new(51.5074, -0.1278).to_sphere(GLOBE_RADIUS);
        let b = GeoPoint::new(40.7128, -74.0060).to_sphere(GLOBE_RADIUS);
        let arc = ArcPath::between(a, b, ArcLift::CONNECTION).unwrap();

        assert!(arc.point_at(0.5).length() > GLOBE_RADIUS);
    }

    #[test]
    fn arc_height_is_capped() {
        // Near-antipodal pair: a huge chord must still respect max_height.
        let a = GeoPoint::new(10.0, 0.0).to_sphere(GLOBE_RADIUS);
        let b = GeoPoint::new(-10.0, 175.0).to_sphere(GLOBE_RADIUS);
        let arc = ArcPath::between(a, b, ArcLift::BEAM).unwrap();

        // Control point radius is base + height; the curve itself stays below.
        let peak = arc.point_at(0.5).length();
        assert!(peak <= GLOBE_RADIUS + ArcLift::BEAM.max_height + EPS);
    }

    #[test]
    fn degenerate_arc_is_rejected() {
        let a = GeoPoint::new(0.0, 0.0).to_sphere(GLOBE_RADIUS);
        assert!(ArcPath::between(a, a * -1.0, ArcLift::BEAM).is_none());
        assert!(ArcPath::between(Vec3::ZERO, Vec3::ZERO, ArcLift::BEAM).is_none());
    }

    #[test]
    fn sample_has_segments_plus_one_points() {
        let a = GeoPoint::new(1.3521, 103.8198).to_sphere(GLOBE_RADIUS);
        let b = GeoPoint::new(53.3498, -6.2603).to_sphere(GLOBE_RADIUS);
        let arc = ArcPath::between(a, b, ArcLift::CONNECTION).unwrap();

        let pts = arc.sample(50);
        assert_eq!(pts.len(), 51);
        assert_eq!(pts[0], a);
        assert_eq!(pts[50], b);
    }
}
