//! Per-build accumulators.
//!
//! A [`BuildSession`] owns the raw tessellation output of one dome build. It
//! is created empty for every build and never shared between builds.

use crate::math::Point3;

/// A structural edge between two entries of the point set.
///
/// Equality is unordered: `(i, j) == (j, i)`.
#[derive(Debug, Clone, Copy, Eq)]
pub struct StrutEdge {
    pub a: usize,
    pub b: usize,
}

impl StrutEdge {
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Endpoints in ascending index order.
    #[must_use]
    pub fn key(self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }

    #[must_use]
    pub fn indices(self) -> [usize; 2] {
        [self.a, self.b]
    }
}

impl PartialEq for StrutEdge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl std::hash::Hash for StrutEdge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A small triangle of the tessellated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleFace(pub [usize; 3]);

impl TriangleFace {
    #[must_use]
    pub fn indices(self) -> [usize; 3] {
        self.0
    }
}

/// Output of tessellating a single face, indexed locally from zero.
#[derive(Debug, Clone, Default)]
pub struct FaceLattice {
    pub points: Vec<Point3>,
    pub struts: Vec<StrutEdge>,
    pub triangles: Vec<TriangleFace>,
}

/// Point, edge and triangle accumulators for one build.
///
/// Indices are "as generated": coincident points from neighbouring faces
/// occupy different indices until the filtering layer resolves them.
#[derive(Debug, Clone, Default)]
pub struct BuildSession {
    pub points: Vec<Point3>,
    pub struts: Vec<StrutEdge>,
    pub triangles: Vec<TriangleFace>,
}

impl BuildSession {
    /// Creates a new, empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a face lattice, shifting its local indices past the points
    /// already in the session.
    pub fn append(&mut self, lattice: FaceLattice) {
        let offset = self.points.len();
        self.points.extend(lattice.points);
        self.struts.extend(
            lattice
                .struts
                .into_iter()
                .map(|s| StrutEdge::new(s.a + offset, s.b + offset)),
        );
        self.triangles.extend(lattice.triangles.into_iter().map(|t| {
            let [a, b, c] = t.0;
            TriangleFace([a + offset, b + offset, c + offset])
        }));
    }

    /// Length of the first recorded strut, used as the reference member length.
    #[must_use]
    pub fn reference_strut_length(&self) -> Option<f64> {
        self.struts
            .first()
            .map(|s| (self.points[s.b] - self.points[s.a]).norm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(n: usize) -> FaceLattice {
        FaceLattice {
            points: (0..n).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect(),
            struts: vec![StrutEdge::new(0, 1)],
            triangles: vec![TriangleFace([0, 1, 2])],
        }
    }

    #[test]
    fn strut_edge_is_unordered() {
        assert_eq!(StrutEdge::new(3, 7), StrutEdge::new(7, 3));
        assert_ne!(StrutEdge::new(3, 7), StrutEdge::new(3, 8));

        let mut set = std::collections::HashSet::new();
        set.insert(StrutEdge::new(1, 2));
        assert!(set.contains(&StrutEdge::new(2, 1)));
    }

    #[test]
    fn append_offsets_indices() {
        let mut session = BuildSession::new();
        session.append(lattice(3));
        session.append(lattice(3));

        assert_eq!(session.points.len(), 6);
        assert_eq!(session.struts[1].indices(), [3, 4]);
        assert_eq!(session.triangles[1].indices(), [3, 4, 5]);
    }

    #[test]
    fn reference_length_uses_first_strut() {
        let mut session = BuildSession::new();
        assert!(session.reference_strut_length().is_none());
        session.append(lattice(3));
        assert_eq!(session.reference_strut_length(), Some(1.0));
    }
}
