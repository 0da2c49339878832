use crate::config::StrutConfig;
use crate::math::Point3;
use crate::session::StrutEdge;
use crate::sink::{GeneratedSolid, Material, SolidKind};

use super::plate::OffsetPlate;
use super::Generated;

/// Builds one wooden strut per surviving edge.
///
/// Struts stop `inset` short of both hubs, are `thickness` wide across the
/// sphere surface, and reach `depth` toward the sphere center.
pub struct MakeStruts<'a> {
    config: &'a StrutConfig,
    center: Point3,
}

impl<'a> MakeStruts<'a> {
    /// Creates a new `MakeStruts` operation.
    #[must_use]
    pub fn new(config: &'a StrutConfig, center: Point3) -> Self {
        Self { config, center }
    }

    /// Executes the operation for the given edges.
    #[must_use]
    pub fn execute(&self, points: &[Point3], struts: &[StrutEdge]) -> Generated {
        let plate = OffsetPlate::new(self.config.inset, self.config.thickness, self.config.depth);
        let mut out = Generated::default();
        for (i, strut) in struts.iter().enumerate() {
            let solid = plate
                .radial(&points[strut.a], &points[strut.b], &self.center)
                .map(|hex| GeneratedSolid::new(SolidKind::Strut, hex.faces(), Material::WOOD));
            out.push_or_skip(SolidKind::Strut, i, solid);
        }
        out
    }
}
