use crate::config::{BaseFrameConfig, StrutConfig};
use crate::flatten::BaseRing;
use crate::math::{Point3, Vector3};
use crate::session::StrutEdge;
use crate::sink::{GeneratedSolid, Material, SolidKind};

use super::plate::OffsetPlate;
use super::Generated;

/// Hangs a vertical member below every strut of the base ring.
///
/// Members share the strut width and inset, face straight up, and reach
/// `height` below the ring.
pub struct MakeBaseFrame<'a> {
    struts: &'a StrutConfig,
    base: &'a BaseFrameConfig,
}

impl<'a> MakeBaseFrame<'a> {
    /// Creates a new `MakeBaseFrame` operation.
    #[must_use]
    pub fn new(struts: &'a StrutConfig, base: &'a BaseFrameConfig) -> Self {
        Self { struts, base }
    }

    /// Executes the operation for the struts joining two ring hubs.
    #[must_use]
    pub fn execute(&self, points: &[Point3], struts: &[StrutEdge], ring: &BaseRing) -> Generated {
        let plate = OffsetPlate::new(self.struts.inset, self.struts.thickness, self.base.height);
        let up = Vector3::z();
        let mut out = Generated::default();
        for (i, strut) in struts
            .iter()
            .enumerate()
            .filter(|(_, s)| ring.contains(s.a) && ring.contains(s.b))
        {
            let solid = plate
                .build(&points[strut.a], &points[strut.b], &up, &up)
                .map(|hex| GeneratedSolid::new(SolidKind::BaseFrame, hex.faces(), Material::WOOD));
            out.push_or_skip(SolidKind::BaseFrame, i, solid);
        }
        out
    }
}
