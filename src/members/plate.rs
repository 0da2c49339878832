use crate::error::GeometryError;
use crate::math::{with_length, Point3, Vector3};
use crate::sink::FaceLoop;

/// Face table shared by every eight-cornered member.
///
/// Corner index bits: bit 0 picks the side, bit 1 the end, bit 2 the
/// inner (center-facing) layer.
const HEX_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [0, 1, 5, 4],
    [0, 2, 6, 4],
    [2, 3, 7, 6],
    [1, 3, 7, 5],
    [4, 5, 7, 6],
];

/// Box-like member bounded by six quads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hexahedron(pub [Point3; 8]);

impl Hexahedron {
    /// The six face loops.
    #[must_use]
    pub fn faces(&self) -> Vec<FaceLoop> {
        HEX_FACES
            .iter()
            .map(|face| face.iter().map(|&i| self.0[i]).collect())
            .collect()
    }

    /// Corners of one long side face (`side` 0 or 1), outer edge first.
    #[must_use]
    pub fn side_plane(&self, side: usize) -> [Point3; 4] {
        let c = &self.0;
        [c[side], c[side + 2], c[side + 6], c[side + 4]]
    }
}

/// Cross-section of a rectangular member laid between two hubs.
///
/// The outer face straddles the hub-to-hub line, `thickness` wide and
/// perpendicular to both the line and the outward direction at each end.
/// The member then extends `depth` against the outward direction and stops
/// `inset` short of each hub.
#[derive(Debug, Clone, Copy)]
pub struct OffsetPlate {
    pub inset: f64,
    pub thickness: f64,
    pub depth: f64,
}

impl OffsetPlate {
    #[must_use]
    pub fn new(inset: f64, thickness: f64, depth: f64) -> Self {
        Self {
            inset,
            thickness,
            depth,
        }
    }

    /// Builds the member with outward directions taken radially from `center`.
    ///
    /// # Errors
    ///
    /// See [`OffsetPlate::build`].
    pub fn radial(&self, p1: &Point3, p2: &Point3, center: &Point3) -> Result<Hexahedron, GeometryError> {
        self.build(p1, p2, &(p1 - center), &(p2 - center))
    }

    /// Builds the member between `p1` and `p2` with explicit outward
    /// directions at each end.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the insets meet or cross, or
    /// [`GeometryError::ZeroVector`] if an outward direction is zero or
    /// parallel to the member.
    pub fn build(
        &self,
        p1: &Point3,
        p2: &Point3,
        out1: &Vector3,
        out2: &Vector3,
    ) -> Result<Hexahedron, GeometryError> {
        let along = p2 - p1;
        if 2.0 * self.inset >= along.norm() {
            return Err(GeometryError::Degenerate(format!(
                "member of length {:.3} is shorter than its insets",
                along.norm()
            )));
        }
        let v1 = with_length(&along, self.inset).ok_or(GeometryError::ZeroVector)?;
        let end1 = p1 + v1;
        let end2 = p2 - v1;

        let back = p1 - p2;
        let half = self.thickness / 2.0;
        let n1 = with_length(&out1.cross(&back), half).ok_or(GeometryError::ZeroVector)?;
        let n2 = with_length(&out2.cross(&back), half).ok_or(GeometryError::ZeroVector)?;
        let d1 = with_length(out1, self.depth).ok_or(GeometryError::ZeroVector)?;
        let d2 = with_length(out2, self.depth).ok_or(GeometryError::ZeroVector)?;

        let outer = [end1 + n1, end1 - n1, end2 + n2, end2 - n2];
        Ok(Hexahedron([
            outer[0],
            outer[1],
            outer[2],
            outer[3],
            outer[0] - d1,
            outer[1] - d1,
            outer[2] - d2,
            outer[3] - d2,
        ]))
    }

    /// Returns three points of the side face of the radial member `p1`-`p2`
    /// that lies nearer to `toward`.
    ///
    /// # Errors
    ///
    /// See [`OffsetPlate::build`].
    pub fn closest_side(
        &self,
        toward: &Point3,
        p1: &Point3,
        p2: &Point3,
        center: &Point3,
    ) -> Result<[Point3; 3], GeometryError> {
        let hex = self.radial(p1, p2, center)?;
        let side = usize::from((toward - hex.0[0]).norm() >= (toward - hex.0[1]).norm());
        let [a, b, c, _] = hex.side_plane(side);
        Ok([a, b, c])
    }
}
