use crate::config::PanelConfig;
use crate::math::Point3;
use crate::session::TriangleFace;
use crate::solid::BaseSolid;
use crate::sink::{GeneratedSolid, Material, SolidKind};

use super::Generated;

/// Emits flat reference panels: the faces of the base polyhedron and the
/// surviving tessellated triangles, each as a single-face solid.
pub struct MakePanels<'a> {
    config: &'a PanelConfig,
}

impl<'a> MakePanels<'a> {
    /// Creates a new `MakePanels` operation.
    #[must_use]
    pub fn new(config: &'a PanelConfig) -> Self {
        Self { config }
    }

    /// Executes the operation.
    #[must_use]
    pub fn execute(&self, base: &BaseSolid, points: &[Point3], triangles: &[TriangleFace]) -> Generated {
        let mut out = Generated::default();
        if self.config.primitive_faces {
            out.solids.extend(base.face_corner_iter().map(|corners| {
                GeneratedSolid::new(SolidKind::Panel, vec![corners.to_vec()], Material::PRIMITIVE_PANEL)
            }));
        }
        if self.config.tessellated_faces {
            out.solids.extend(triangles.iter().map(|t| {
                let face = t.indices().iter().map(|&i| points[i]).collect();
                GeneratedSolid::new(SolidKind::Panel, vec![face], Material::TESSELLATED_PANEL)
            }));
        }
        out
    }
}
