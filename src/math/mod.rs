pub mod intersect_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Numeric tolerance for floating-point degeneracy checks.
///
/// Not to be confused with the dome's merge tolerance (ε), which is a
/// configured length in model units.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `v` rescaled to `length`, or `None` when `v` has no direction.
#[must_use]
pub fn with_length(v: &Vector3, length: f64) -> Option<Vector3> {
    let norm = v.norm();
    if norm < TOLERANCE {
        None
    } else {
        Some(v * (length / norm))
    }
}

/// Returns the point `distance` away from `from` in the direction of `toward`.
#[must_use]
pub fn extend_line(from: &Point3, toward: &Point3, distance: f64) -> Option<Point3> {
    with_length(&(toward - from), distance).map(|v| from + v)
}

/// Midpoint of a segment.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Centroid of a triangle, found as the crossing of two medians.
///
/// Falls back to the vertex average when the medians do not cross, which
/// only happens for collapsed triangles.
#[must_use]
pub fn centroid(a: &Point3, b: &Point3, c: &Point3) -> Point3 {
    let m_bc = midpoint(b, c);
    let m_ab = midpoint(a, b);
    intersect_3d::line_line_intersect(a, &m_bc, c, &m_ab)
        .unwrap_or_else(|| Point3::from((a.coords + b.coords + c.coords) / 3.0))
}
