use crate::math::{with_length, Point3};
use crate::session::{FaceLattice, StrutEdge, TriangleFace};

/// Number of lattice points produced for one face at `frequency`.
#[must_use]
pub fn points_per_face(frequency: u32) -> usize {
    let f = frequency as usize;
    (f + 1) * (f + 2) / 2
}

/// Subdivides one triangular face into a triangular lattice projected onto
/// the sphere.
///
/// Rows run from the first edge (`corners[0]`..`corners[1]`) toward the
/// opposite corner, each row one point shorter than the last. Within a row,
/// columns advance from the `corners[0]` side toward the `corners[1]` side.
/// The iteration order is fixed, so identical input gives identical output.
pub struct TessellateFace {
    corners: [Point3; 3],
    frequency: u32,
    center: Point3,
    radius: f64,
}

impl TessellateFace {
    /// Creates a new `TessellateFace` operation.
    #[must_use]
    pub fn new(corners: [Point3; 3], frequency: u32, center: Point3, radius: f64) -> Self {
        Self {
            corners,
            frequency,
            center,
            radius,
        }
    }

    /// Executes the tessellation.
    ///
    /// Every new point is linked to its row predecessor and to the two
    /// points below it in the previous row; each new point also closes one
    /// upward triangle and, past the first column, one downward triangle.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn execute(&self) -> FaceLattice {
        let [p1, p2, p3] = self.corners;
        let mut lattice = FaceLattice::default();

        if self.frequency == 0 {
            lattice.points.push(self.project(&p1));
            return lattice;
        }

        let f = self.frequency as usize;
        lattice.points.reserve(points_per_face(self.frequency));
        lattice.struts.reserve(3 * f * (f + 1) / 2);
        lattice.triangles.reserve(f * f);

        for row in 0..=f {
            let order = f + 1 - row;
            let rf = row as f64 / f as f64;
            let row_start = self.project(&lerp(&p1, &p3, rf));
            let row_end = self.project(&lerp(&p2, &p3, rf));

            for col in 0..order {
                let point = if order == 1 {
                    row_start
                } else {
                    let cf = col as f64 / (order - 1) as f64;
                    self.project(&lerp(&row_start, &row_end, cf))
                };
                let idx = lattice.points.len();
                lattice.points.push(point);

                if col > 0 {
                    lattice.struts.push(StrutEdge::new(idx - 1, idx));
                }
                if row > 0 {
                    // Previous row is `order + 1` long: the points at the same
                    // and next column sit `order + 1` and `order` back.
                    let below_left = idx - order - 1;
                    let below_right = idx - order;
                    lattice.struts.push(StrutEdge::new(below_right, idx));
                    lattice.struts.push(StrutEdge::new(below_left, idx));
                    lattice
                        .triangles
                        .push(TriangleFace([below_right, below_left, idx]));
                    if col > 0 {
                        lattice
                            .triangles
                            .push(TriangleFace([below_left, idx, idx - 1]));
                    }
                }
            }
        }

        lattice
    }

    fn project(&self, point: &Point3) -> Point3 {
        with_length(&(point - self.center), self.radius).map_or(*point, |v| self.center + v)
    }
}

fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    Point3::from(a.coords.lerp(&b.coords, t))
}
