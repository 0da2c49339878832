use crate::config::{FrameConfig, StrutConfig};
use crate::error::GeometryError;
use crate::math::intersect_3d::line_plane_intersect;
use crate::math::{centroid, extend_line, midpoint, with_length, Point3, Vector3};
use crate::session::TriangleFace;
use crate::sink::{GeneratedSolid, Material, SolidKind};

use super::plate::{Hexahedron, OffsetPlate};
use super::Generated;

/// Picks the apex corner of a triangle: the single corner above the
/// centroid if there is one, otherwise the first corner at or below it.
#[must_use]
pub fn orientate(corners: &[Point3; 3]) -> usize {
    let c = centroid(&corners[0], &corners[1], &corners[2]);
    let above: Vec<usize> = (0..3).filter(|&i| corners[i].z > c.z).collect();
    if let [single] = above[..] {
        return single;
    }
    (0..3).find(|i| !above.contains(i)).unwrap_or(0)
}

/// Distances from the midpoint of the base edge at which frame-strut pairs
/// are placed.
///
/// The first pair straddles the midpoint at half a separation; later pairs
/// step out by a full separation until the remaining half-span is used up.
#[must_use]
pub fn frame_offsets(half_span: f64, separation: f64, inset: f64, half_thickness: f64) -> Vec<f64> {
    let mut step = separation / 2.0;
    let mut remaining = half_span - step - inset;
    let mut offset = step;
    let mut offsets = Vec::new();
    while remaining > separation / 2.0 + half_thickness {
        offsets.push(offset);
        remaining -= step;
        step = separation;
        offset += step;
    }
    offsets
}

/// Braces every triangle with pairs of frame struts running from the base
/// edge toward the apex, clipped against the struts they meet.
pub struct MakeFrame<'a> {
    struts: &'a StrutConfig,
    frame: &'a FrameConfig,
    center: Point3,
}

/// Per-triangle construction data shared by all its frame struts.
struct TriangleFrame {
    base_mid: Point3,
    spine: Vector3,
    base_plane: [Point3; 3],
    ends: [(Point3, [Point3; 3]); 2],
    offsets: Vec<f64>,
}

impl<'a> MakeFrame<'a> {
    /// Creates a new `MakeFrame` operation.
    #[must_use]
    pub fn new(struts: &'a StrutConfig, frame: &'a FrameConfig, center: Point3) -> Self {
        Self { struts, frame, center }
    }

    /// Executes the operation for the given triangles.
    #[must_use]
    pub fn execute(&self, points: &[Point3], triangles: &[TriangleFace]) -> Generated {
        let mut out = Generated::default();
        for (i, triangle) in triangles.iter().enumerate() {
            let [a, b, c] = triangle.indices();
            let layout = match self.layout(&[points[a], points[b], points[c]]) {
                Ok(layout) => layout,
                Err(err) => {
                    tracing::warn!(triangle = i, %err, "skipping frame for degenerate triangle");
                    out.skipped += 1;
                    continue;
                }
            };
            for &offset in &layout.offsets {
                for (toward, end_plane) in &layout.ends {
                    let solid = self
                        .member(&layout, toward, end_plane, offset)
                        .map(|hex| GeneratedSolid::new(SolidKind::FrameStrut, hex.faces(), Material::WOOD));
                    out.push_or_skip(SolidKind::FrameStrut, i, solid);
                }
            }
        }
        out
    }

    fn layout(&self, corners: &[Point3; 3]) -> Result<TriangleFrame, GeometryError> {
        let apex = orientate(corners);
        let pp0 = corners[apex];
        let pp1 = corners[(apex + 1) % 3];
        let pp2 = corners[(apex + 2) % 3];

        let half = self.struts.thickness / 2.0;
        let v1 = pp1 - self.center;
        let v2 = pp2 - self.center;
        let v3 = pp1 - pp2;
        let n1 = with_length(&v1.cross(&v3), half).ok_or(GeometryError::ZeroVector)?;
        let n2 = with_length(&v2.cross(&v3), half).ok_or(GeometryError::ZeroVector)?;
        let d1 = with_length(&v1, self.struts.depth).ok_or(GeometryError::ZeroVector)?;

        // Side face of the base strut that looks toward the apex.
        let base_plane = if (pp0 - (pp1 + n1)).norm() < (pp0 - (pp1 - n1)).norm() {
            [pp1 + n1, pp2 + n2, pp2 + n2 - d1]
        } else {
            [pp1 - n1, pp2 - n2, pp2 - n2 - d1]
        };

        let base_mid = midpoint(&pp1, &pp2);
        let center = centroid(&pp0, &pp1, &pp2);
        let spine = with_length(&(center - base_mid), (base_mid - pp0).norm()).ok_or(GeometryError::ZeroVector)?;

        let plate = OffsetPlate::new(self.struts.inset, self.struts.thickness, self.struts.depth);
        let end1 = plate.closest_side(&center, &pp0, &pp1, &self.center)?;
        let end2 = plate.closest_side(&center, &pp0, &pp2, &self.center)?;

        let offsets = frame_offsets(
            (base_plane[0] - base_plane[1]).norm() / 2.0,
            self.frame.separation,
            self.struts.inset,
            half,
        );

        Ok(TriangleFrame {
            base_mid,
            spine,
            base_plane,
            ends: [(pp1, end1), (pp2, end2)],
            offsets,
        })
    }

    fn member(
        &self,
        layout: &TriangleFrame,
        toward: &Point3,
        end_plane: &[Point3; 3],
        offset: f64,
    ) -> Result<Hexahedron, GeometryError> {
        let half = self.struts.thickness / 2.0;
        let spine = &layout.spine;
        let near = extend_line(&layout.base_mid, toward, offset - half).ok_or(GeometryError::ZeroVector)?;
        let far = extend_line(&layout.base_mid, toward, offset + half).ok_or(GeometryError::ZeroVector)?;

        let outer_near = clip(&near, spine, &layout.base_plane)?;
        let outer_far = clip(&far, spine, &layout.base_plane)?;
        let d = with_length(&(outer_near - self.center), self.struts.depth).ok_or(GeometryError::ZeroVector)?;
        let inner_near = outer_near - d;
        let inner_far = outer_far - d;

        Ok(Hexahedron([
            outer_near,
            clip(&outer_near, spine, end_plane)?,
            outer_far,
            clip(&outer_far, spine, end_plane)?,
            inner_near,
            clip(&inner_near, spine, end_plane)?,
            inner_far,
            clip(&inner_far, spine, end_plane)?,
        ]))
    }
}

/// Runs the line through `from` along `direction` into `plane`.
fn clip(from: &Point3, direction: &Vector3, plane: &[Point3; 3]) -> Result<Point3, GeometryError> {
    let hit = line_plane_intersect([*from, from + direction], *plane);
    hit.point().ok_or(GeometryError::NoIntersection(hit.status))
}
