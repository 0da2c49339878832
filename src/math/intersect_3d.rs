use super::{Point3, TOLERANCE};

/// How a segment relates to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePlaneStatus {
    /// The line is parallel to the plane and never meets it.
    Parallel,
    /// The line lies in the plane.
    Coincident,
    /// The finite segment crosses the plane.
    Segment,
    /// Only the infinite extension of the segment crosses the plane.
    Ray,
}

/// Result of [`line_plane_intersect`].
///
/// `point` is always filled in. For [`Parallel`](LinePlaneStatus::Parallel)
/// and [`Coincident`](LinePlaneStatus::Coincident) it is the origin and
/// carries no meaning; check `status` (or use [`Self::point`]) first.
#[derive(Debug, Clone, Copy)]
pub struct LinePlaneIntersection {
    pub status: LinePlaneStatus,
    pub point: Point3,
    /// Line parameter of `point`: 0 at the line's first point, 1 at its second.
    pub t: f64,
}

impl LinePlaneIntersection {
    /// Returns the crossing point when one exists, on the segment or its extension.
    #[must_use]
    pub fn point(&self) -> Option<Point3> {
        match self.status {
            LinePlaneStatus::Segment | LinePlaneStatus::Ray => Some(self.point),
            LinePlaneStatus::Parallel | LinePlaneStatus::Coincident => None,
        }
    }
}

/// Intersects the line through `line[0]`, `line[1]` with the plane through
/// the three points of `plane`.
///
/// The plane normal is `(Q1 - Q0) x (Q2 - Q0)`. The parallel test is relative
/// to the lengths of the normal and the line direction rather than an exact
/// zero comparison; the four-way classification is unchanged.
#[must_use]
pub fn line_plane_intersect(line: [Point3; 2], plane: [Point3; 3]) -> LinePlaneIntersection {
    let [p0, p1] = line;
    let [q0, q1, q2] = plane;

    let normal = (q1 - q0).cross(&(q2 - q0));
    let dir = p1 - p0;
    let denom = normal.dot(&dir);

    let n_len = normal.norm();
    if denom.abs() <= TOLERANCE * n_len * dir.norm() {
        let offset = p0 - q0;
        let status = if normal.dot(&offset).abs() <= TOLERANCE * n_len * offset.norm().max(1.0) {
            LinePlaneStatus::Coincident
        } else {
            LinePlaneStatus::Parallel
        };
        return LinePlaneIntersection {
            status,
            point: Point3::origin(),
            t: f64::NAN,
        };
    }

    let t = normal.dot(&(q0 - p0)) / denom;
    let status = if (0.0..=1.0).contains(&t) {
        LinePlaneStatus::Segment
    } else {
        LinePlaneStatus::Ray
    };
    let point = Point3::from(p1.coords * t + p0.coords * (1.0 - t));

    LinePlaneIntersection { status, point, t }
}

/// Intersects two infinite lines, each given by two points.
///
/// Returns the crossing point, or `None` when the lines are parallel,
/// degenerate, or skew.
#[must_use]
pub fn line_line_intersect(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Option<Point3> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    if a < TOLERANCE || e < TOLERANCE {
        return None;
    }

    let b = d1.dot(&d2);
    let c = d1.dot(&r);
    let f = d2.dot(&r);
    let denom = a * e - b * b;
    if denom <= TOLERANCE * a * e {
        return None;
    }

    let s = (b * f - c * e) / denom;
    let t = (a * f - b * c) / denom;
    let on_a = a0 + d1 * s;
    let on_b = b0 + d2 * t;

    let scale = a.sqrt().max(e.sqrt()).max(1.0);
    if (on_a - on_b).norm() > 1e-9 * scale {
        return None;
    }
    Some(on_a)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn xy_plane() -> [Point3; 3] {
        [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]
    }

    // ── line_plane_intersect ──

    #[test]
    fn segment_crosses_plane() {
        let hit = line_plane_intersect([p(0.0, 0.0, -1.0), p(0.0, 0.0, 1.0)], xy_plane());
        assert_eq!(hit.status, LinePlaneStatus::Segment);
        assert_relative_eq!(hit.point, p(0.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(hit.t, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn parallel_line_misses_plane() {
        let hit = line_plane_intersect([p(0.0, 0.0, 1.0), p(1.0, 0.0, 1.0)], xy_plane());
        assert_eq!(hit.status, LinePlaneStatus::Parallel);
        assert!(hit.point().is_none());
    }

    #[test]
    fn line_in_plane_is_coincident() {
        let hit = line_plane_intersect([p(2.0, 3.0, 0.0), p(5.0, -1.0, 0.0)], xy_plane());
        assert_eq!(hit.status, LinePlaneStatus::Coincident);
        assert!(hit.point().is_none());
    }

    #[test]
    fn ray_only_intersection_still_reports_point() {
        let hit = line_plane_intersect([p(1.0, 1.0, 2.0), p(1.0, 1.0, 3.0)], xy_plane());
        assert_eq!(hit.status, LinePlaneStatus::Ray);
        assert_relative_eq!(hit.point, p(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(hit.t, -2.0, epsilon = 1e-12);
        assert!(hit.point().is_some());
    }

    #[test]
    fn oblique_segment_hits_tilted_plane() {
        // Plane x + y + z = 3
        let plane = [p(3.0, 0.0, 0.0), p(0.0, 3.0, 0.0), p(0.0, 0.0, 3.0)];
        let hit = line_plane_intersect([p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0)], plane);
        assert_eq!(hit.status, LinePlaneStatus::Segment);
        assert_relative_eq!(hit.point, p(1.0, 1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn segment_endpoint_on_plane_counts_as_segment() {
        let hit = line_plane_intersect([p(0.0, 0.0, 0.0), p(0.0, 0.0, 4.0)], xy_plane());
        assert_eq!(hit.status, LinePlaneStatus::Segment);
        assert_relative_eq!(hit.t, 0.0, epsilon = 1e-12);
    }

    // ── line_line_intersect ──

    #[test]
    fn crossing_lines_meet() {
        let x = line_line_intersect(
            &p(-1.0, 0.0, 2.0),
            &p(1.0, 0.0, 2.0),
            &p(0.0, -3.0, 2.0),
            &p(0.0, 5.0, 2.0),
        )
        .unwrap();
        assert_relative_eq!(x, p(0.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines_do_not_meet() {
        let x = line_line_intersect(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(1.0, 1.0, 0.0),
        );
        assert!(x.is_none());
    }

    #[test]
    fn skew_lines_do_not_meet() {
        let x = line_line_intersect(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 0.0, 1.0),
            &p(0.0, 1.0, 1.0),
        );
        assert!(x.is_none());
    }
}
