//! Animated overlay entities and their display classification.

use geoarc::ArcPath;
use glam::Vec3;

/// Linear RGB used for sprite and line tinting.
pub type Rgb = [f32; 3];

pub const COLOR_TIER_NORMAL: Rgb = [0.0, 1.0, 0.533];
pub const COLOR_TIER_ELEVATED: Rgb = [1.0, 0.667, 0.0];
pub const COLOR_TIER_HIGH: Rgb = [1.0, 0.0, 0.533];
pub const COLOR_SENDER: Rgb = [1.0, 0.0, 0.0];
pub const COLOR_RECEIVER: Rgb = [0.0, 1.0, 0.0];
pub const COLOR_VALIDATOR: Rgb = [0.0, 1.0, 0.533];

/// Display tier for a transferred magnitude, in drops.
///
/// Purely a function of the value against two fixed thresholds; it picks a
/// color for beams and a color + size for moving dots. Not a financial
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeTier {
    Normal,
    Elevated,
    High,
}

impl MagnitudeTier {
    /// Strictly-greater comparisons: exactly 1_000_000 drops is still
    /// `Normal`, exactly 10_000_000 still `Elevated`.
    pub fn classify(drops: u64) -> Self {
        if drops > 10_000_000 {
            Self::High
        } else if drops > 1_000_000 {
            Self::Elevated
        } else {
            Self::Normal
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Normal => COLOR_TIER_NORMAL,
            Self::Elevated => COLOR_TIER_ELEVATED,
            Self::High => COLOR_TIER_HIGH,
        }
    }

    /// Sprite radius for the moving dot riding the beam.
    pub fn dot_radius(self) -> f32 {
        match self {
            Self::Normal => 0.05,
            Self::Elevated => 0.08,
            Self::High => 0.12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A short-lived pulse sphere at a projected point.
    Marker,
    /// A curved line between two projected points.
    Beam,
    /// A dot traveling along its beam's arc.
    MovingDot,
}

impl EntityKind {
    /// Markers and beams fade out over their last 30%; dots do not.
    pub fn fades(self) -> bool {
        matches!(self, Self::Marker | Self::Beam)
    }
}

/// One transient visual in the registry.
///
/// `opacity` is the fade envelope in [0, 1]; per-kind base alpha (dim beam
/// lines, brighter markers) is applied at draw time, not here.
#[derive(Debug, Clone)]
pub struct AnimatedEntity {
    pub kind: EntityKind,
    pub color: Rgb,
    /// Registry clock time at spawn, seconds.
    pub spawned_at: f64,
    /// Lifetime in seconds; the entity is pruned once age exceeds this.
    pub duration: f64,
    pub opacity: f32,
    pub scale: f32,
    /// Traversal cursor in [0, 1]; only advanced for `MovingDot`.
    pub progress: f32,
    /// Current position in globe-local coordinates.
    pub position: Vec3,
    /// Sprite radius (markers and dots).
    pub radius: f32,
    /// The arc this entity follows or draws (beams and dots).
    pub path: Option<ArcPath>,
    /// Transaction hash the entity was spawned for, if any.
    pub tx_hash: Option<String>,
}

impl AnimatedEntity {
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawned_at
    }

    pub fn expired(&self, now: f64) -> bool {
        self.age(now) > self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_strict() {
        assert_eq!(MagnitudeTier::classify(999_999), MagnitudeTier::Normal);
        assert_eq!(MagnitudeTier::classify(1_000_000), MagnitudeTier::Normal);
        assert_eq!(MagnitudeTier::classify(1_000_001), MagnitudeTier::Elevated);
        assert_eq!(MagnitudeTier::classify(10_000_000), MagnitudeTier::Elevated);
        assert_eq!(MagnitudeTier::classify(10_000_001), MagnitudeTier::High);
    }

    #[test]
    fn dot_size_follows_tier() {
        assert!(MagnitudeTier::Normal.dot_radius() < MagnitudeTier::Elevated.dot_radius());
        assert!(MagnitudeTier::Elevated.dot_radius() < MagnitudeTier::High.dot_radius());
    }

    #[test]
    fn only_markers_and_beams_fade() {
        assert!(EntityKind::Marker.fades());
        assert!(EntityKind::Beam.fades());
        assert!(!EntityKind::MovingDot.fades());
    }
}
