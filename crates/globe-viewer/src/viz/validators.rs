//! The static validator directory and its on-globe network.
//!
//! Validator markers are persistent (unlike registry entities) and carry a
//! slow pulse plus a short glow when "activity" fires. The connection lines
//! between validators are a visual-clutter heuristic, not topology: nearby
//! pairs always link, distant pairs link with a small seeded probability.

use geoarc::{ArcLift, ArcPath, GeoPoint, GLOBE_RADIUS};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One known validator operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorRecord {
    pub name: &'static str,
    pub geo: GeoPoint,
    /// Unique key for the record; node public key in the real network.
    pub pubkey: &'static str,
    pub country: &'static str,
    pub city: &'static str,
}

/// The known validator set, loaded once at startup.
pub static VALIDATORS: [ValidatorRecord; 15] = [
    ValidatorRecord {
        name: "Ripple Lab (San Francisco)",
        geo: GeoPoint::new(37.7749, -122.4194),
        pubkey: "nHUPKoGr78vEFANjXfLpGYuBqPwXXq1dHgTaJrfGtQnZcFjFdJPR",
        country: "USA",
        city: "San Francisco",
    },
    ValidatorRecord {
        name: "Ripple Lab (Dublin)",
        geo: GeoPoint::new(53.3498, -6.2603),
        pubkey: "nHUTh2DRMx4TH8iNc3qYnFLzLXpqxoVZBJMUHNbxJEkQdLNSqpXH",
        country: "Ireland",
        city: "Dublin",
    },
    ValidatorRecord {
        name: "Ripple Lab (Singapore)",
        geo: GeoPoint::new(1.3521, 103.8198),
        pubkey: "nHUP3pWBaEHcfzTdDBdKj9yFfSTJUdJGz6PRAskLJCHtmLTDRKvH",
        country: "Singapore",
        city: "Singapore",
    },
    ValidatorRecord {
        name: "Coil (New York)",
        geo: GeoPoint::new(40.7128, -74.0060),
        pubkey: "nHUryiyDqEtyWVtFG24AAhaYjMf9FRLietQcQrcbdN5PjjWjCRKN",
        country: "USA",
        city: "New York",
    },
    ValidatorRecord {
        name: "Bithomp (Netherlands)",
        geo: GeoPoint::new(52.3676, 4.9041),
        pubkey: "nHULqGBkJtWeNFjhTzYeAsHA3qKKS7HoBh8CV3BAGTGMZuepEhWC",
        country: "Netherlands",
        city: "Amsterdam",
    },
    ValidatorRecord {
        name: "XRPL Labs (Netherlands)",
        geo: GeoPoint::new(52.3676, 4.9041),
        pubkey: "nHUn13jKRSvyRW5HGPqmMjvAJGELzSLVZpKAMBXTMKNcLnYtJSgH",
        country: "Netherlands",
        city: "Amsterdam",
    },
    ValidatorRecord {
        name: "Alloy Networks (USA)",
        geo: GeoPoint::new(39.0458, -76.6413),
        pubkey: "nHUDHXNKHtQnPn6pKfGpEcbSvw8VhGbBPQFhKWo4kqEYhpMqZwdh",
        country: "USA",
        city: "Baltimore",
    },
    ValidatorRecord {
        name: "Gatehub (UK)",
        geo: GeoPoint::new(51.5074, -0.1278),
        pubkey: "nHUkKNxGWFqM41U5YWDdBvhQmEUvNGmUqMGcFnfT4gRQdRPEpJcS",
        country: "UK",
        city: "London",
    },
    ValidatorRecord {
        name: "Sologenic (Canada)",
        geo: GeoPoint::new(43.6532, -79.3832),
        pubkey: "nHUBqFKgCsS7P6RmxXQyNVnVk2PVVvEMkjhXCJCk8kfmZtQJhDDd",
        country: "Canada",
        city: "Toronto",
    },
    ValidatorRecord {
        name: "Validator (Tokyo)",
        geo: GeoPoint::new(35.6762, 139.6503),
        pubkey: "nHUVFHTdJwdNUbUeUJFW5q4NQHxBYGfJsZNHdBrUnTNzQCpGHnLY",
        country: "Japan",
        city: "Tokyo",
    },
    ValidatorRecord {
        name: "Validator (Sydney)",
        geo: GeoPoint::new(-33.8688, 151.2093),
        pubkey: "nHUKVKfBmYdSVKuPRMKjmyDqBFZjKfxJbVtHDTM4TQEJ3RaKdVUH",
        country: "Australia",
        city: "Sydney",
    },
    ValidatorRecord {
        name: "Validator (Mumbai)",
        geo: GeoPoint::new(19.0760, 72.8777),
        pubkey: "nHUJunGYCLWqZFvxGBNFfBnpwYxBGJhKGQfFnJNqRSgEQJgHsVfv",
        country: "India",
        city: "Mumbai",
    },
    ValidatorRecord {
        name: "Validator (São Paulo)",
        geo: GeoPoint::new(-23.5505, -46.6333),
        pubkey: "nHUKoGrxnHwcKpJrVSgRSZBLFq8qmJGLdDxKLKgLJGSfGhLwRrxK",
        country: "Brazil",
        city: "São Paulo",
    },
    ValidatorRecord {
        name: "Validator (Frankfurt)",
        geo: GeoPoint::new(50.1109, 8.6821),
        pubkey: "nHUJbHBY7fGWMjJsTSjVmLGxPzhhqBbczK4ysBG1BNWPCqJgMjwS",
        country: "Germany",
        city: "Frankfurt",
    },
    ValidatorRecord {
        name: "Validator (Seoul)",
        geo: GeoPoint::new(37.5665, 126.9780),
        pubkey: "nHUKBvTyqfVMN3LXZNNfFYcnhqBCQHdLFLcqVNNWzBMSdQGGLjGD",
        country: "South Korea",
        city: "Seoul",
    },
];

/// Base sprite radius for a validator marker.
pub const VALIDATOR_RADIUS: f32 = 0.15;
/// How long an activity pulse keeps a marker glowing, seconds.
pub const ACTIVITY_GLOW_SECS: f64 = 0.5;
/// Chance that a given validator joins an activity round.
pub const ACTIVITY_CHANCE: f64 = 0.3;

/// Tunables for the connection-line heuristic.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionPolicy {
    /// Pairs closer than this (plain lat/lon degree distance) always link.
    pub max_degree_distance: f32,
    /// Chance that a distant pair links anyway.
    pub extra_link_probability: f64,
    /// Seed for the extra-link draws and marker pulse phases.
    pub seed: u64,
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            max_degree_distance: 50.0,
            extra_link_probability: 0.2,
            seed: 0x5852_5047,
        }
    }
}

/// A persistent on-globe validator marker.
#[derive(Debug, Clone)]
pub struct ValidatorMarker {
    pub record: &'static ValidatorRecord,
    /// Globe-local position.
    pub position: Vec3,
    /// Phase offset so the markers don't pulse in lockstep.
    pub pulse_phase: f32,
    /// Activity glow deadline; glowing while `now` is below it.
    glow_until: f64,
}

impl ValidatorMarker {
    /// Slow breathing animation, ±10% around the base radius.
    pub fn scale(&self, now: f64) -> f32 {
        1.0 + ((now as f32) * 3.0 + self.pulse_phase).sin() * 0.1
    }

    /// Emissive strength: raised while an activity pulse is live.
    pub fn glow(&self, now: f64) -> f32 {
        if now < self.glow_until {
            0.8
        } else {
            0.3
        }
    }
}

pub struct ValidatorNetwork {
    markers: Vec<ValidatorMarker>,
    connections: Vec<ArcPath>,
    rng: StdRng,
}

impl ValidatorNetwork {
    /// Places every validator marker and links pairs per `policy`.
    pub fn new(policy: &ConnectionPolicy) -> Self {
        let mut rng = StdRng::seed_from_u64(policy.seed);

        let markers = VALIDATORS
            .iter()
            .map(|record| ValidatorMarker {
                record,
                position: record.geo.to_sphere(GLOBE_RADIUS),
                pulse_phase: rng.gen_range(0.0..std::f32::consts::TAU),
                glow_until: f64::NEG_INFINITY,
            })
            .collect();

        let mut connections = Vec::new();
        for i in 0..VALIDATORS.len() {
            for j in (i + 1)..VALIDATORS.len() {
                let a = &VALIDATORS[i];
                let b = &VALIDATORS[j];

                let dlat = a.geo.lat_deg - b.geo.lat_deg;
                let dlon = a.geo.lon_deg - b.geo.lon_deg;
                let degree_distance = (dlat * dlat + dlon * dlon).sqrt();

                let linked = degree_distance < policy.max_degree_distance
                    || rng.gen_bool(policy.extra_link_probability);
                if !linked {
                    continue;
                }

                let start = a.geo.to_sphere(GLOBE_RADIUS);
                let end = b.geo.to_sphere(GLOBE_RADIUS);
                if let Some(arc) = ArcPath::between(start, end, ArcLift::CONNECTION) {
                    connections.push(arc);
                }
            }
        }

        Self {
            markers,
            connections,
            rng,
        }
    }

    /// One activity round: each validator glows with [`ACTIVITY_CHANCE`].
    /// Fired on every ledger close and by the periodic simulation timer.
    pub fn simulate_activity(&mut self, now: f64) {
        let rng = &mut self.rng;
        for marker in &mut self.markers {
            if rng.gen_bool(ACTIVITY_CHANCE) {
                marker.glow_until = now + ACTIVITY_GLOW_SECS;
            }
        }
    }

    pub fn markers(&self) -> &[ValidatorMarker] {
        &self.markers
    }

    pub fn connections(&self) -> &[ArcPath] {
        &self.connections
    }

    pub fn find(&self, pubkey: &str) -> Option<&ValidatorMarker> {
        self.markers.iter().find(|m| m.record.pubkey == pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pubkeys_are_unique() {
        for (i, a) in VALIDATORS.iter().enumerate() {
            for b in &VALIDATORS[i + 1..] {
                assert_ne!(a.pubkey, b.pubkey);
            }
        }
    }

    #[test]
    fn every_validator_gets_a_marker() {
        let network = ValidatorNetwork::new(&ConnectionPolicy::default());
        assert_eq!(network.markers().len(), VALIDATORS.len());
    }

    #[test]
    fn nearby_pairs_always_link() {
        // With the probabilistic extra links disabled, only degree-close
        // pairs remain; Amsterdam/Amsterdam (distance 0) is among them.
        let policy = ConnectionPolicy {
            extra_link_probability: 0.0,
            ..ConnectionPolicy::default()
        };
        let network = ValidatorNetwork::new(&policy);

        assert!(!network.connections().is_empty());

        // Each connection's chord must be shorter than the widest possible
        // degree-close pair could produce; spot-check none span the globe.
        for arc in network.connections() {
            assert!(arc.chord_len() < 2.0 * GLOBE_RADIUS);
        }
    }

    #[test]
    fn same_seed_builds_the_same_network() {
        let policy = ConnectionPolicy::default();
        let a = ValidatorNetwork::new(&policy);
        let b = ValidatorNetwork::new(&policy);

        assert_eq!(a.connections().len(), b.connections().len());
        for (x, y) in a.connections().iter().zip(b.connections()) {
            assert_eq!(x, y);
        }
    }

    #[test]
    fn activity_pulse_raises_then_drops_the_glow() {
        let mut network = ValidatorNetwork::new(&ConnectionPolicy::default());

        // Enough rounds that every marker has glowed at least once.
        for round in 0..64 {
            network.simulate_activity(round as f64 * 0.1);
        }
        let now = 6.35;
        let glowing = network.markers().iter().filter(|m| m.glow(now) > 0.5).count();
        assert!(glowing > 0, "no marker glowing right after activity rounds");

        // Long after the last pulse everything is back at base glow.
        assert!(network.markers().iter().all(|m| m.glow(now + 10.0) < 0.5));
    }
}
