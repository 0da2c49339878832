//! Deduplication and kept-region filtering of the raw tessellation.
//!
//! Faces are tessellated independently, so points along shared polyhedron
//! edges appear once per face. The raw index space is left untouched; this
//! layer maps every raw index to a representative instead. Exactly one
//! representative survives per ε-cluster, and the first one encountered in
//! generation order wins.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::math::Point3;
use crate::session::{BuildSession, StrutEdge, TriangleFace};

/// Which part of the sphere is kept as the dome: everything above the
/// ground plane, allowing `tolerance` below it.
#[derive(Debug, Clone, Copy)]
pub struct KeptRegion {
    tolerance: f64,
}

impl KeptRegion {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// A point survives if `z > -ε`.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        point.z > -self.tolerance
    }

    /// An edge survives only if both endpoints survive.
    #[must_use]
    pub fn keeps_strut(&self, points: &[Point3], strut: StrutEdge) -> bool {
        strut.indices().iter().all(|&i| self.contains(&points[i]))
    }

    /// A triangle survives only if all three corners survive.
    #[must_use]
    pub fn keeps_triangle(&self, points: &[Point3], triangle: TriangleFace) -> bool {
        triangle.indices().iter().all(|&i| self.contains(&points[i]))
    }
}

/// Lookup structure for accepted representatives.
pub trait PointIndex {
    /// Returns the earliest-accepted representative within ε of `point`.
    fn find(&self, point: &Point3) -> Option<usize>;

    /// Accepts `point` as the representative with raw index `id`.
    ///
    /// Ids must be inserted in increasing order.
    fn insert(&mut self, point: Point3, id: usize);
}

/// O(n) equality scan over the accepted set.
#[derive(Debug, Clone)]
pub struct LinearScan {
    tolerance: f64,
    accepted: Vec<(Point3, usize)>,
}

impl LinearScan {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            accepted: Vec::new(),
        }
    }
}

impl PointIndex for LinearScan {
    fn find(&self, point: &Point3) -> Option<usize> {
        self.accepted
            .iter()
            .find(|(rep, _)| (rep - point).norm() < self.tolerance)
            .map(|&(_, id)| id)
    }

    fn insert(&mut self, point: Point3, id: usize) {
        self.accepted.push((point, id));
    }
}

/// Uniform grid keyed by `floor(coord / ε)`.
///
/// A query inspects the 27 cells around the point, so it finds the same
/// representative as [`LinearScan`].
#[derive(Debug, Clone)]
pub struct SpatialHash {
    tolerance: f64,
    cells: HashMap<[i64; 3], Vec<(Point3, usize)>>,
}

impl SpatialHash {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, point: &Point3) -> [i64; 3] {
        [
            (point.x / self.tolerance).floor() as i64,
            (point.y / self.tolerance).floor() as i64,
            (point.z / self.tolerance).floor() as i64,
        ]
    }
}

impl PointIndex for SpatialHash {
    fn find(&self, point: &Point3) -> Option<usize> {
        let [cx, cy, cz] = self.cell(point);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&[cx + dx, cy + dy, cz + dz]) else {
                        continue;
                    };
                    for &(rep, id) in bucket {
                        if (rep - point).norm() < self.tolerance && best.is_none_or(|b| id < b) {
                            best = Some(id);
                        }
                    }
                }
            }
        }
        best
    }

    fn insert(&mut self, point: Point3, id: usize) {
        let key = self.cell(&point);
        self.cells.entry(key).or_default().push((point, id));
    }
}

/// Selects the [`PointIndex`] implementation used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    #[default]
    LinearScan,
    SpatialHash,
}

impl DedupStrategy {
    fn index(self, tolerance: f64) -> Box<dyn PointIndex> {
        match self {
            Self::LinearScan => Box::new(LinearScan::new(tolerance)),
            Self::SpatialHash => Box::new(SpatialHash::new(tolerance)),
        }
    }
}

/// Surviving, deduplicated geometry. All indices are raw session indices of
/// representatives.
#[derive(Debug, Clone, Default)]
pub struct FilteredMesh {
    /// Representative of each raw index, `None` if the point was discarded.
    pub representative: Vec<Option<usize>>,
    /// One entry per distinct surviving point, in encounter order.
    pub hubs: Vec<usize>,
    /// Distinct surviving struts, in encounter order.
    pub struts: Vec<StrutEdge>,
    /// Surviving triangles.
    pub triangles: Vec<TriangleFace>,
}

/// Filters a build session to the kept region and resolves duplicates.
pub struct FilterMesh<'a> {
    session: &'a BuildSession,
    tolerance: f64,
    strategy: DedupStrategy,
}

impl<'a> FilterMesh<'a> {
    /// Creates a new `FilterMesh` operation.
    #[must_use]
    pub fn new(session: &'a BuildSession, tolerance: f64) -> Self {
        Self {
            session,
            tolerance,
            strategy: DedupStrategy::default(),
        }
    }

    /// Uses a different representative lookup.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DedupStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Executes the filter.
    #[must_use]
    pub fn execute(&self) -> FilteredMesh {
        let points = &self.session.points;
        let region = KeptRegion::new(self.tolerance);
        let mut index = self.strategy.index(self.tolerance);

        let mut representative = Vec::with_capacity(points.len());
        let mut hubs = Vec::new();
        for (i, point) in points.iter().enumerate() {
            if !region.contains(point) {
                representative.push(None);
                continue;
            }
            let rep = index.find(point).unwrap_or_else(|| {
                index.insert(*point, i);
                hubs.push(i);
                i
            });
            representative.push(Some(rep));
        }

        let mut seen = HashSet::new();
        let mut struts = Vec::new();
        for strut in self.session.struts.iter().filter(|s| region.keeps_strut(points, **s)) {
            let (Some(a), Some(b)) = (representative[strut.a], representative[strut.b]) else {
                continue;
            };
            let edge = StrutEdge::new(a, b);
            if a != b && seen.insert(edge) {
                struts.push(edge);
            }
        }

        let triangles: Vec<TriangleFace> = self
            .session
            .triangles
            .iter()
            .filter(|t| region.keeps_triangle(points, **t))
            .filter_map(|t| {
                let [a, b, c] = t.indices();
                let (a, b, c) = (representative[a]?, representative[b]?, representative[c]?);
                (a != b && b != c && a != c).then_some(TriangleFace([a, b, c]))
            })
            .collect();

        tracing::debug!(
            hubs = hubs.len(),
            struts = struts.len(),
            triangles = triangles.len(),
            "filtered tessellation"
        );

        FilteredMesh {
            representative,
            hubs,
            struts,
            triangles,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DomeConfig;
    use crate::solid::{MakePlatonic, PlatonicSolid};
    use crate::tessellation::TessellateSolid;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn session_for(kind: PlatonicSolid, frequency: u32, fraction: f64) -> BuildSession {
        let config = DomeConfig::new(kind, frequency, 150.0).with_fraction(fraction);
        let solid = MakePlatonic::new(kind, config.radius, config.center()).execute();
        let mut session = BuildSession::new();
        TessellateSolid::new(&solid, frequency, config.center(), config.radius).execute(&mut session);
        session
    }

    #[test]
    fn kept_region_boundary() {
        let region = KeptRegion::new(0.5);
        assert!(region.contains(&p(0.0, 0.0, -0.4)));
        assert!(!region.contains(&p(0.0, 0.0, -0.6)));
        assert!(region.contains(&p(10.0, 3.0, 0.0)));
    }

    #[test]
    fn strut_needs_both_endpoints() {
        let points = vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, -1.0), p(0.0, 1.0, 1.0)];
        let region = KeptRegion::new(0.5);
        assert!(!region.keeps_strut(&points, StrutEdge::new(0, 1)));
        assert!(region.keeps_strut(&points, StrutEdge::new(0, 2)));
        assert!(!region.keeps_triangle(&points, TriangleFace([0, 1, 2])));

        let mut session = BuildSession::new();
        session.points = points;
        session.struts = vec![StrutEdge::new(0, 1), StrutEdge::new(0, 2)];
        session.triangles = vec![TriangleFace([0, 1, 2])];
        let mesh = FilterMesh::new(&session, 0.5).execute();
        assert_eq!(mesh.struts, vec![StrutEdge::new(0, 2)]);
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn first_encountered_representative_wins() {
        let mut session = BuildSession::new();
        session.points = vec![p(0.0, 0.0, 1.0), p(5.0, 0.0, 1.0), p(0.2, 0.0, 1.0), p(5.1, 0.1, 1.0)];
        session.struts = vec![StrutEdge::new(0, 1), StrutEdge::new(3, 2)];

        let mesh = FilterMesh::new(&session, 0.5).execute();
        assert_eq!(mesh.hubs, vec![0, 1]);
        assert_eq!(mesh.representative, vec![Some(0), Some(1), Some(0), Some(1)]);
        // (3, 2) resolves to (1, 0), the same strut as (0, 1).
        assert_eq!(mesh.struts.len(), 1);
    }

    #[test]
    fn full_sphere_matches_closed_form_counts() {
        // Distinct vertices V = 2 + (F_solid/2)·f², edges E = (3/2)·F_solid·f².
        for (kind, faces) in [
            (PlatonicSolid::Tetrahedron, 4),
            (PlatonicSolid::Octahedron, 8),
            (PlatonicSolid::Icosahedron, 20),
        ] {
            for f in 1..=4_usize {
                let session = session_for(kind, u32::try_from(f).unwrap(), 1.0);
                let mesh = FilterMesh::new(&session, 0.5).execute();
                assert_eq!(mesh.hubs.len(), 2 + faces / 2 * f * f, "{kind:?} f={f} hubs");
                assert_eq!(mesh.struts.len(), 3 * faces / 2 * f * f, "{kind:?} f={f} struts");
                assert_eq!(mesh.triangles.len(), faces * f * f, "{kind:?} f={f} triangles");
            }
        }
    }

    #[test]
    fn spatial_hash_agrees_with_linear_scan() {
        let session = session_for(PlatonicSolid::Icosahedron, 4, 0.6);
        let linear = FilterMesh::new(&session, 0.5).execute();
        let hashed = FilterMesh::new(&session, 0.5)
            .with_strategy(DedupStrategy::SpatialHash)
            .execute();
        assert_eq!(linear.representative, hashed.representative);
        assert_eq!(linear.hubs, hashed.hubs);
        assert_eq!(linear.struts, hashed.struts);
    }

    #[test]
    fn survivors_are_above_cutoff() {
        let session = session_for(PlatonicSolid::Icosahedron, 3, 0.5);
        let mesh = FilterMesh::new(&session, 0.5).execute();
        assert!(mesh.hubs.len() < 92);
        for &h in &mesh.hubs {
            assert!(session.points[h].z > -0.5);
        }
        for s in &mesh.struts {
            assert!(mesh.hubs.contains(&s.a) && mesh.hubs.contains(&s.b));
        }
    }

    #[test]
    fn hubs_are_distinct() {
        let session = session_for(PlatonicSolid::Octahedron, 3, 0.7);
        let mesh = FilterMesh::new(&session, 0.5).execute();
        for (i, &a) in mesh.hubs.iter().enumerate() {
            for &b in &mesh.hubs[i + 1..] {
                assert!((session.points[a] - session.points[b]).norm() >= 0.5);
            }
        }
    }
}
