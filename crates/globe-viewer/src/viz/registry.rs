//! The animation registry: arena storage plus per-frame lifecycle.
//!
//! All transient visuals (pulse markers, transaction beams, moving dots)
//! live here, keyed by a monotonically increasing id. The registry is plain
//! data owned by the app and passed by reference into `tick`; nothing in
//! this module touches GPU resources or globals. Time is injected as `f64`
//! seconds from the app's monotonic clock so tests drive it directly.

use std::collections::HashMap;

use geoarc::{ArcLift, ArcPath, GeoPoint, GLOBE_RADIUS};

use super::entity::{
    AnimatedEntity, EntityKind, MagnitudeTier, Rgb, COLOR_RECEIVER, COLOR_SENDER,
};

/// Beam and moving-dot lifetime, seconds.
pub const BEAM_DURATION: f64 = 3.0;
/// Endpoint pulse-marker lifetime, seconds.
pub const MARKER_DURATION: f64 = 1.0;
/// Fraction of the lifetime after which fade-eligible entities start fading.
pub const FADE_START: f64 = 0.7;
/// Pulse-marker sprite radius.
pub const MARKER_RADIUS: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

#[derive(Default)]
pub struct AnimationRegistry {
    entities: HashMap<EntityId, AnimatedEntity>,
    next_id: u64,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, entity: AnimatedEntity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Spawns a short-lived pulse marker at a projected coordinate.
    pub fn spawn_marker(&mut self, geo: GeoPoint, color: Rgb, duration: f64, now: f64) -> EntityId {
        self.insert(AnimatedEntity {
            kind: EntityKind::Marker,
            color,
            spawned_at: now,
            duration,
            opacity: 1.0,
            scale: 1.0,
            progress: 0.0,
            position: geo.to_sphere(GLOBE_RADIUS),
            radius: MARKER_RADIUS,
            path: None,
            tx_hash: None,
        })
    }

    /// Spawns the full beam ensemble for one transfer: the arc line, a red
    /// sender marker, a green receiver marker, and the moving dot riding the
    /// same arc. Color and dot size come from the magnitude tier.
    ///
    /// Returns `None` (and spawns nothing) when the endpoints admit no arc
    /// (antipodal midpoint), which callers treat as "skip this transfer".
    pub fn spawn_beam(
        &mut self,
        from: GeoPoint,
        to: GeoPoint,
        drops: u64,
        tx_hash: Option<String>,
        now: f64,
    ) -> Option<EntityId> {
        let start = from.to_sphere(GLOBE_RADIUS);
        let end = to.to_sphere(GLOBE_RADIUS);
        let path = ArcPath::between(start, end, ArcLift::BEAM)?;

        let tier = MagnitudeTier::classify(drops);

        let beam_id = self.insert(AnimatedEntity {
            kind: EntityKind::Beam,
            color: tier.color(),
            spawned_at: now,
            duration: BEAM_DURATION,
            opacity: 1.0,
            scale: 1.0,
            progress: 0.0,
            position: start,
            radius: 0.0,
            path: Some(path),
            tx_hash: tx_hash.clone(),
        });

        self.spawn_marker(from, COLOR_SENDER, MARKER_DURATION, now);
        self.spawn_marker(to, COLOR_RECEIVER, MARKER_DURATION, now);

        self.insert(AnimatedEntity {
            kind: EntityKind::MovingDot,
            color: tier.color(),
            spawned_at: now,
            duration: BEAM_DURATION,
            opacity: 1.0,
            scale: 1.0,
            progress: 0.0,
            position: start,
            radius: tier.dot_radius(),
            path: Some(path),
            tx_hash,
        });

        Some(beam_id)
    }

    /// Advances every entity to `now` and prunes the expired.
    ///
    /// Ages are derived from absolute spawn times, never accumulated, so a
    /// repeated call with the same `now` is a no-op.
    pub fn tick(&mut self, now: f64) {
        self.entities.retain(|_, e| !e.expired(now));

        for entity in self.entities.values_mut() {
            let age = entity.age(now);

            match entity.kind {
                EntityKind::Marker | EntityKind::Beam => {
                    let fade_from = FADE_START * entity.duration;
                    entity.opacity = if age > fade_from {
                        let fade = (age - fade_from) / ((1.0 - FADE_START) * entity.duration);
                        (1.0 - fade).max(0.0) as f32
                    } else {
                        1.0
                    };
                }
                EntityKind::MovingDot => {
                    entity.progress = (age / entity.duration).min(1.0) as f32;
                    if let Some(path) = &entity.path {
                        entity.position = path.point_at(entity.progress);
                    }
                    // Cosmetic travel pulse; opacity stays at 1.
                    entity.scale =
                        1.0 + (entity.progress * std::f32::consts::TAU).sin() * 0.15;
                }
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&AnimatedEntity> {
        self.entities.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimatedEntity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Active beam count, for the HUD stat line.
    pub fn beam_count(&self) -> usize {
        self.count_kind(EntityKind::Beam)
    }

    /// Active moving-dot count, for the HUD stat line.
    pub fn dot_count(&self) -> usize {
        self.count_kind(EntityKind::MovingDot)
    }

    fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoarc::ArcLift;

    const SF: GeoPoint = GeoPoint::new(37.7749, -122.4194);
    const TOKYO: GeoPoint = GeoPoint::new(35.6762, 139.6503);

    /// Comparable snapshot of the mutable per-entity state.
    fn snapshot(registry: &AnimationRegistry) -> Vec<(f32, f32, [f32; 3], f32)> {
        let mut s: Vec<_> = registry
            .iter()
            .map(|e| (e.opacity, e.progress, e.position.to_array(), e.scale))
            .collect();
        s.sort_by(|a, b| a.partial_cmp(b).unwrap());
        s
    }

    #[test]
    fn beam_spawns_the_full_ensemble() {
        let mut registry = AnimationRegistry::new();
        registry.spawn_beam(SF, TOKYO, 500_000, None, 0.0).unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.beam_count(), 1);
        assert_eq!(registry.dot_count(), 1);
    }

    #[test]
    fn fade_envelope_matches_the_lifecycle() {
        let mut registry = AnimationRegistry::new();
        let id = registry.spawn_marker(SF, COLOR_SENDER, 1.0, 0.0);

        registry.tick(0.69);
        assert_eq!(registry.get(id).unwrap().opacity, 1.0);

        registry.tick(0.71);
        let faded = registry.get(id).unwrap().opacity;
        assert!(faded < 1.0 && faded > 0.9);

        registry.tick(1.0 + 1e-3);
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn dots_do_not_fade() {
        let mut registry = AnimationRegistry::new();
        registry.spawn_beam(SF, TOKYO, 2_000_000, None, 0.0);

        registry.tick(BEAM_DURATION * 0.9);
        let dot = registry
            .iter()
            .find(|e| e.kind == EntityKind::MovingDot)
            .unwrap();
        assert_eq!(dot.opacity, 1.0);
    }

    #[test]
    fn tick_is_idempotent_for_equal_now() {
        let mut registry = AnimationRegistry::new();
        registry.spawn_beam(SF, TOKYO, 12_000_000, Some("abc".into()), 0.0);
        registry.spawn_marker(TOKYO, COLOR_RECEIVER, 2.0, 0.25);

        registry.tick(1.5);
        let first = snapshot(&registry);
        registry.tick(1.5);
        assert_eq!(first, snapshot(&registry));
        assert_eq!(registry.len(), first.len());
    }

    #[test]
    fn entities_survive_to_exactly_their_duration() {
        let mut registry = AnimationRegistry::new();
        registry.spawn_beam(SF, TOKYO, 1, None, 1.0);

        // age == duration is the boundary: still present.
        registry.tick(1.0 + BEAM_DURATION);
        assert_eq!(registry.len(), 2); // markers (1 s) are gone, beam + dot remain

        registry.tick(1.0 + BEAM_DURATION + 1e-3);
        assert!(registry.is_empty());
    }

    #[test]
    fn dot_rides_the_beam_arc() {
        let mut registry = AnimationRegistry::new();
        registry
            .spawn_beam(SF, TOKYO, 2_000_000, Some("abc".into()), 0.0)
            .unwrap();

        registry.tick(BEAM_DURATION / 2.0);

        let expected_arc = ArcPath::between(
            SF.to_sphere(GLOBE_RADIUS),
            TOKYO.to_sphere(GLOBE_RADIUS),
            ArcLift::BEAM,
        )
        .unwrap();

        let dot = registry
            .iter()
            .find(|e| e.kind == EntityKind::MovingDot)
            .unwrap();
        assert_eq!(dot.progress, 0.5);
        assert_eq!(dot.position, expected_arc.point_at(0.5));
        assert_eq!(dot.color, MagnitudeTier::Elevated.color());
        assert_eq!(dot.radius, MagnitudeTier::Elevated.dot_radius());
    }

    #[test]
    fn antipodal_endpoints_spawn_nothing() {
        let mut registry = AnimationRegistry::new();
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        assert!(registry.spawn_beam(a, b, 1_000_000, None, 0.0).is_none());
        assert!(registry.is_empty());
    }
}
