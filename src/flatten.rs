//! Base flattening: levels the lowest ring of hubs so the dome stands on a
//! flat footprint.

use crate::filter::FilteredMesh;
use crate::math::Point3;

/// The lowest ring of surviving points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseRing {
    /// Representative indices in the ring, lowest first.
    pub indices: Vec<usize>,
    /// Lowest `z` in the ring; every ring point sits here after flattening.
    pub level: f64,
}

impl BaseRing {
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

/// Finds the base ring among `hubs`.
///
/// Hubs are walked in ascending `z`; each is absorbed while its height gap to
/// the previously absorbed hub is below a quarter of `reference_length`.
/// The walk stops at the first larger gap.
#[must_use]
pub fn find_base_ring(points: &[Point3], hubs: &[usize], reference_length: f64) -> BaseRing {
    let mut sorted = hubs.to_vec();
    sorted.sort_by(|&a, &b| points[a].z.total_cmp(&points[b].z));

    let Some(&lowest) = sorted.first() else {
        return BaseRing::default();
    };
    let max_gap = reference_length / 4.0;
    let mut indices = vec![lowest];
    let mut previous = points[lowest].z;
    for &i in &sorted[1..] {
        let z = points[i].z;
        if z - previous >= max_gap {
            break;
        }
        indices.push(i);
        previous = z;
    }

    BaseRing {
        indices,
        level: points[lowest].z,
    }
}

/// Moves the base ring onto a common level.
///
/// Each ring point keeps its horizontal direction from the center, takes
/// the ring's lowest `z`, and is pushed in or out horizontally until it is
/// `radius` from the center again. Points are edited in place, duplicates
/// included; no other point moves.
///
/// A ring whose level leaves less than half a reference strut of horizontal
/// room on the sphere (a ring gathered around the bottom pole) cannot be
/// leveled without leaving the sphere or merging hubs. Such a ring is left
/// untouched and no ring is returned.
pub struct FlattenBase<'a> {
    mesh: &'a FilteredMesh,
    center: Point3,
    radius: f64,
    reference_length: f64,
}

impl<'a> FlattenBase<'a> {
    /// Creates a new `FlattenBase` operation.
    #[must_use]
    pub fn new(mesh: &'a FilteredMesh, center: Point3, radius: f64, reference_length: f64) -> Self {
        Self {
            mesh,
            center,
            radius,
            reference_length,
        }
    }

    /// Executes the flattening and returns the ring that was leveled.
    pub fn execute(&self, points: &mut [Point3]) -> BaseRing {
        let ring = find_base_ring(points, &self.mesh.hubs, self.reference_length);

        if ring.indices.is_empty() {
            return ring;
        }
        let footprint = self.footprint_radius(ring.level);
        if footprint < self.reference_length / 2.0 {
            tracing::warn!(
                ring = ring.indices.len(),
                level = ring.level,
                footprint,
                "base ring too close to the pole, not flattened"
            );
            return BaseRing::default();
        }

        for &i in &ring.indices {
            points[i] = self.level_point(&points[i], ring.level);
        }

        for (raw, rep) in self.mesh.representative.iter().enumerate() {
            if let Some(rep) = *rep {
                if rep != raw && ring.contains(rep) {
                    points[raw] = points[rep];
                }
            }
        }

        tracing::debug!(ring = ring.indices.len(), level = ring.level, "flattened base");
        ring
    }

    /// Horizontal radius of the sphere's section at height `level`.
    fn footprint_radius(&self, level: f64) -> f64 {
        let dz = level - self.center.z;
        (self.radius * self.radius - dz * dz).max(0.0).sqrt()
    }

    /// Points on the vertical axis have no horizontal direction and stay put.
    fn level_point(&self, point: &Point3, level: f64) -> Point3 {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let horizontal = dx.hypot(dy);
        if horizontal < crate::math::TOLERANCE {
            return *point;
        }
        let scale = self.footprint_radius(level) / horizontal;
        Point3::new(self.center.x + dx * scale, self.center.y + dy * scale, level)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DomeConfig;
    use crate::filter::{FilterMesh, FilteredMesh};
    use crate::session::BuildSession;
    use crate::solid::{MakePlatonic, PlatonicSolid};
    use crate::tessellation::TessellateSolid;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn ring_stops_at_first_large_gap() {
        let points = vec![
            p(0.0, 0.0, 10.0),
            p(0.0, 0.0, 0.3),
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 12.0),
            p(0.0, 0.0, 0.5),
        ];
        let ring = find_base_ring(&points, &[0, 1, 2, 3, 4], 4.0);
        assert_eq!(ring.indices, vec![2, 1, 4]);
        assert_relative_eq!(ring.level, 0.0);
    }

    #[test]
    fn empty_hub_list_gives_empty_ring() {
        let ring = find_base_ring(&[], &[], 1.0);
        assert!(ring.indices.is_empty());
    }

    fn build(kind: PlatonicSolid, fraction: f64) -> (DomeConfig, BuildSession, FilteredMesh) {
        let config = DomeConfig::new(kind, 3, 150.0).with_fraction(fraction);
        let center = config.center();
        let solid = MakePlatonic::new(config.solid, config.radius, center).execute();
        let mut session = BuildSession::new();
        TessellateSolid::new(&solid, config.frequency, center, config.radius).execute(&mut session);
        let mesh = FilterMesh::new(&session, config.tolerance).execute();
        (config, session, mesh)
    }

    #[test]
    fn level_point_stays_on_sphere() {
        let mesh = FilteredMesh::default();
        let center = p(1.0, 2.0, 3.0);
        let op = FlattenBase::new(&mesh, center, 10.0, 1.0);

        let moved = op.level_point(&p(9.0, 2.0, -1.0), -3.0);
        assert_relative_eq!(moved.z, -3.0);
        assert_relative_eq!((moved - center).norm(), 10.0, epsilon = 1e-12);

        let pole = p(1.0, 2.0, -7.0);
        assert_eq!(op.level_point(&pole, -7.0), pole);
    }

    #[test]
    fn ring_around_the_pole_is_left_alone() {
        for kind in [PlatonicSolid::Octahedron, PlatonicSolid::Icosahedron] {
            let (config, mut session, mesh) = build(kind, 1.0);
            let center = config.center();
            let reference = session.reference_strut_length().unwrap();
            let before = session.points.clone();

            let ring = FlattenBase::new(&mesh, center, config.radius, reference).execute(&mut session.points);

            assert!(ring.indices.is_empty(), "{kind:?}");
            assert_eq!(session.points, before, "{kind:?}");
            for point in &session.points {
                assert_relative_eq!((point - center).norm(), config.radius, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn flattened_ring_is_level_and_on_sphere() {
        let (config, mut session, mesh) = build(PlatonicSolid::Icosahedron, 0.6);
        let center = config.center();
        let reference = session.reference_strut_length().unwrap();
        let before = session.points.clone();

        let ring = FlattenBase::new(&mesh, center, config.radius, reference).execute(&mut session.points);

        assert!(ring.indices.len() >= 3);
        for &i in &ring.indices {
            assert_relative_eq!(session.points[i].z, ring.level);
            assert_relative_eq!((session.points[i] - center).norm(), config.radius, epsilon = 1e-9);
        }
        for &h in &mesh.hubs {
            if !ring.contains(h) {
                assert_eq!(session.points[h], before[h]);
            }
        }
        for (raw, rep) in mesh.representative.iter().enumerate() {
            if let Some(rep) = rep {
                if ring.contains(*rep) {
                    assert_eq!(session.points[raw], session.points[*rep]);
                }
            }
        }
    }
}
