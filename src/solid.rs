//! Base polyhedra the dome is subdivided from.

use std::f64::consts::SQRT_2;

use nalgebra::{Rotation3, Translation3, Vector3 as NVector3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Point3;

/// Leveling rotation for the icosahedron, about the Y axis, so that a
/// hemisphere cut lies flat.
const ICOSAHEDRON_LEVELING_DEG: f64 = 31.7;

const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 3], [1, 2, 3], [2, 0, 3], [0, 1, 2]];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 1, 4],
    [1, 2, 4],
    [2, 3, 4],
    [3, 0, 4],
    [0, 1, 5],
    [1, 2, 5],
    [2, 3, 5],
    [3, 0, 5],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [1, 6, 9],
    [1, 2, 6],
    [2, 6, 8],
    [6, 7, 8],
    [6, 7, 9],
    [1, 9, 10],
    [1, 5, 10],
    [1, 2, 5],
    [2, 5, 11],
    [2, 8, 11],
    [4, 5, 10],
    [4, 5, 11],
    [0, 4, 10],
    [0, 9, 10],
    [0, 7, 9],
    [3, 7, 8],
    [0, 3, 7],
    [0, 3, 4],
    [3, 4, 11],
    [3, 8, 11],
];

/// The supported base polyhedra.
///
/// Serialized as its face count, the selector used by the configuration
/// dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PlatonicSolid {
    Tetrahedron,
    Octahedron,
    Icosahedron,
}

impl PlatonicSolid {
    /// Number of triangular faces.
    #[must_use]
    pub fn face_count(self) -> usize {
        self.faces().len()
    }

    /// Face index triples in canonical winding order.
    #[must_use]
    pub fn faces(self) -> &'static [[usize; 3]] {
        match self {
            Self::Tetrahedron => &TETRAHEDRON_FACES,
            Self::Octahedron => &OCTAHEDRON_FACES,
            Self::Icosahedron => &ICOSAHEDRON_FACES,
        }
    }

    /// Vertices of the solid inscribed in a sphere of `radius` at the origin,
    /// before leveling or translation.
    #[must_use]
    pub fn unit_vertices(self, radius: f64) -> Vec<Point3> {
        match self {
            Self::Tetrahedron => {
                // (0, ±1, 1/√2), (±1, 0, -1/√2) has circumradius √(3/2).
                let s = radius / 1.5_f64.sqrt();
                let h = s / SQRT_2;
                vec![
                    Point3::new(0.0, s, h),
                    Point3::new(0.0, -s, h),
                    Point3::new(s, 0.0, -h),
                    Point3::new(-s, 0.0, -h),
                ]
            }
            Self::Octahedron => {
                let a = radius * SQRT_2 / 2.0;
                vec![
                    Point3::new(-a, -a, 0.0),
                    Point3::new(a, -a, 0.0),
                    Point3::new(a, a, 0.0),
                    Point3::new(-a, a, 0.0),
                    Point3::new(0.0, 0.0, radius),
                    Point3::new(0.0, 0.0, -radius),
                ]
            }
            Self::Icosahedron => {
                // Three golden rectangles with half-sides a and b, a = b·φ.
                let golden = (1.0 + 5.0_f64.sqrt()) / 2.0;
                let b = (radius * radius / (golden * golden + 1.0)).sqrt();
                let a = b * golden;
                vec![
                    Point3::new(-a, -b, 0.0),
                    Point3::new(a, -b, 0.0),
                    Point3::new(a, b, 0.0),
                    Point3::new(-a, b, 0.0),
                    Point3::new(-b, 0.0, -a),
                    Point3::new(b, 0.0, -a),
                    Point3::new(b, 0.0, a),
                    Point3::new(-b, 0.0, a),
                    Point3::new(0.0, a, b),
                    Point3::new(0.0, -a, b),
                    Point3::new(0.0, -a, -b),
                    Point3::new(0.0, a, -b),
                ]
            }
        }
    }

    fn leveling(self) -> Rotation3<f64> {
        match self {
            Self::Icosahedron => Rotation3::from_axis_angle(
                &NVector3::y_axis(),
                ICOSAHEDRON_LEVELING_DEG.to_radians(),
            ),
            Self::Tetrahedron | Self::Octahedron => Rotation3::identity(),
        }
    }
}

impl TryFrom<u32> for PlatonicSolid {
    type Error = ConfigError;

    fn try_from(faces: u32) -> Result<Self, Self::Error> {
        match faces {
            4 => Ok(Self::Tetrahedron),
            8 => Ok(Self::Octahedron),
            20 => Ok(Self::Icosahedron),
            other => Err(ConfigError::UnsupportedSolid(other)),
        }
    }
}

impl From<PlatonicSolid> for u32 {
    fn from(solid: PlatonicSolid) -> Self {
        match solid {
            PlatonicSolid::Tetrahedron => 4,
            PlatonicSolid::Octahedron => 8,
            PlatonicSolid::Icosahedron => 20,
        }
    }
}

/// A placed platonic solid: world-space vertices plus face index triples.
#[derive(Debug, Clone)]
pub struct BaseSolid {
    pub kind: PlatonicSolid,
    pub vertices: Vec<Point3>,
    pub faces: &'static [[usize; 3]],
}

impl BaseSolid {
    /// Corner points of face `index`.
    #[must_use]
    pub fn face_corners(&self, index: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[index];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Iterates over the corner points of every face, in canonical order.
    pub fn face_corner_iter(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        (0..self.faces.len()).map(|i| self.face_corners(i))
    }
}

/// Builds a platonic solid of a given radius, leveled and moved to the
/// dome's sphere center.
pub struct MakePlatonic {
    kind: PlatonicSolid,
    radius: f64,
    center: Point3,
}

impl MakePlatonic {
    /// Creates a new `MakePlatonic` operation.
    #[must_use]
    pub fn new(kind: PlatonicSolid, radius: f64, center: Point3) -> Self {
        Self {
            kind,
            radius,
            center,
        }
    }

    /// Executes the operation.
    #[must_use]
    pub fn execute(&self) -> BaseSolid {
        let rotation = self.kind.leveling();
        let translation = Translation3::from(self.center.coords);
        let vertices = self
            .kind
            .unit_vertices(self.radius)
            .into_iter()
            .map(|p| translation * (rotation * p))
            .collect();

        BaseSolid {
            kind: self.kind,
            vertices,
            faces: self.kind.faces(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [PlatonicSolid; 3] = [
        PlatonicSolid::Tetrahedron,
        PlatonicSolid::Octahedron,
        PlatonicSolid::Icosahedron,
    ];

    #[test]
    fn vertex_and_face_counts() {
        assert_eq!(PlatonicSolid::Tetrahedron.unit_vertices(1.0).len(), 4);
        assert_eq!(PlatonicSolid::Octahedron.unit_vertices(1.0).len(), 6);
        assert_eq!(PlatonicSolid::Icosahedron.unit_vertices(1.0).len(), 12);
        assert_eq!(PlatonicSolid::Tetrahedron.face_count(), 4);
        assert_eq!(PlatonicSolid::Octahedron.face_count(), 8);
        assert_eq!(PlatonicSolid::Icosahedron.face_count(), 20);
    }

    #[test]
    fn vertices_lie_on_sphere() {
        for kind in ALL {
            let center = Point3::new(1.0, -2.0, 30.0);
            let solid = MakePlatonic::new(kind, 150.0, center).execute();
            for v in &solid.vertices {
                assert_relative_eq!((v - center).norm(), 150.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn faces_are_equilateral() {
        for kind in ALL {
            let solid = MakePlatonic::new(kind, 10.0, Point3::origin()).execute();
            let [a, b, _] = solid.face_corners(0);
            let edge = (b - a).norm();
            for [a, b, c] in solid.face_corner_iter() {
                assert_relative_eq!((b - a).norm(), edge, epsilon = 1e-9);
                assert_relative_eq!((c - b).norm(), edge, epsilon = 1e-9);
                assert_relative_eq!((a - c).norm(), edge, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn every_edge_shared_by_two_faces() {
        for kind in ALL {
            let mut counts = std::collections::HashMap::new();
            for face in kind.faces() {
                for k in 0..3 {
                    let (i, j) = (face[k], face[(k + 1) % 3]);
                    *counts.entry((i.min(j), i.max(j))).or_insert(0) += 1;
                }
            }
            assert!(counts.values().all(|&n| n == 2), "{kind:?} is not closed");
        }
    }

    #[test]
    fn icosahedron_is_leveled() {
        let solid = MakePlatonic::new(PlatonicSolid::Icosahedron, 1.0, Point3::origin()).execute();
        // The leveling rotation brings vertex 7 onto the top pole.
        assert!(solid.vertices[7].z > 0.9999);
    }

    #[test]
    fn selector_by_face_count() {
        assert_eq!(PlatonicSolid::try_from(20).unwrap(), PlatonicSolid::Icosahedron);
        assert_eq!(u32::from(PlatonicSolid::Octahedron), 8);
        assert!(matches!(
            PlatonicSolid::try_from(12),
            Err(ConfigError::UnsupportedSolid(12))
        ));
    }
}
