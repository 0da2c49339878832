#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::math::Point3;
use crate::session::{BuildSession, FaceLattice};
use crate::solid::BaseSolid;

use super::TessellateFace;

/// Tessellates every face of a base solid into a build session.
///
/// Faces are appended in the solid's canonical face order. With the
/// `parallel` feature the faces are subdivided concurrently, but the append
/// order is the same, so the session contents do not change.
pub struct TessellateSolid<'a> {
    solid: &'a BaseSolid,
    frequency: u32,
    center: Point3,
    radius: f64,
}

impl<'a> TessellateSolid<'a> {
    /// Creates a new `TessellateSolid` operation.
    #[must_use]
    pub fn new(solid: &'a BaseSolid, frequency: u32, center: Point3, radius: f64) -> Self {
        Self {
            solid,
            frequency,
            center,
            radius,
        }
    }

    /// Executes the tessellation, appending to `session`.
    pub fn execute(&self, session: &mut BuildSession) {
        for lattice in self.lattices() {
            session.append(lattice);
        }
        tracing::debug!(
            faces = self.solid.faces.len(),
            points = session.points.len(),
            struts = session.struts.len(),
            triangles = session.triangles.len(),
            "tessellated base solid"
        );
    }

    #[cfg(not(feature = "parallel"))]
    fn lattices(&self) -> Vec<FaceLattice> {
        self.solid
            .face_corner_iter()
            .map(|corners| self.tessellate(corners))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn lattices(&self) -> Vec<FaceLattice> {
        let corners: Vec<[Point3; 3]> = self.solid.face_corner_iter().collect();
        corners
            .into_par_iter()
            .map(|corners| self.tessellate(corners))
            .collect()
    }

    fn tessellate(&self, corners: [Point3; 3]) -> FaceLattice {
        tracing::trace!(?corners, "tessellating face");
        TessellateFace::new(corners, self.frequency, self.center, self.radius).execute()
    }
}
