//! Geometry sinks: where generated solids go.
//!
//! The generator core only produces [`GeneratedSolid`] values. A
//! [`GeometrySink`] takes ownership of each one and realizes it: the
//! [`MemorySink`] keeps them in an arena, the [`ObjSink`] streams them out as
//! Wavefront OBJ.

use std::collections::HashMap;
use std::io::Write;

use slotmap::SlotMap;

use crate::error::SinkError;
use crate::math::Point3;

/// An ordered loop of 3 or more points bounding one planar face.
pub type FaceLoop = Vec<Point3>;

/// What a generated solid represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolidKind {
    Hub,
    Strut,
    FrameStrut,
    BaseFrame,
    /// A single reference face (base polyhedron or tessellated triangle).
    Panel,
}

impl SolidKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Strut => "strut",
            Self::FrameStrut => "frame_strut",
            Self::BaseFrame => "base_frame",
            Self::Panel => "panel",
        }
    }
}

/// Named surface colour, applied to both sides of every face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    pub name: &'static str,
    pub color: [u8; 3],
}

impl Material {
    pub const WOOD: Self = Self {
        name: "wood",
        color: [255, 215, 0],
    };
    pub const METAL: Self = Self {
        name: "metal",
        color: [160, 160, 170],
    };
    pub const PRIMITIVE_PANEL: Self = Self {
        name: "primitive_face",
        color: [90, 140, 200],
    };
    pub const TESSELLATED_PANEL: Self = Self {
        name: "tessellated_face",
        color: [200, 120, 90],
    };
}

/// One member, described as a list of face loops plus a material.
#[derive(Debug, Clone)]
pub struct GeneratedSolid {
    pub kind: SolidKind,
    pub faces: Vec<FaceLoop>,
    pub material: Material,
}

impl GeneratedSolid {
    #[must_use]
    pub fn new(kind: SolidKind, faces: Vec<FaceLoop>, material: Material) -> Self {
        Self {
            kind,
            faces,
            material,
        }
    }

    /// Distinct corner points across all faces.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point3> {
        let mut seen = HashMap::new();
        let mut out = Vec::new();
        for p in self.faces.iter().flatten() {
            seen.entry(point_key(p)).or_insert_with(|| {
                out.push(*p);
            });
        }
        out
    }

    /// Whether every face edge is shared by exactly two faces.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        let mut edges: HashMap<([u64; 3], [u64; 3]), usize> = HashMap::new();
        for face in &self.faces {
            for (i, a) in face.iter().enumerate() {
                let b = &face[(i + 1) % face.len()];
                let (ka, kb) = (point_key(a), point_key(b));
                let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
                *edges.entry(key).or_insert(0) += 1;
            }
        }
        !edges.is_empty() && edges.values().all(|&n| n == 2)
    }
}

fn point_key(p: &Point3) -> [u64; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Receiver of generated solids. There is no feedback channel into the
/// generator; an error aborts the build.
pub trait GeometrySink {
    /// Takes ownership of one complete solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the solid.
    fn emit_solid(&mut self, solid: GeneratedSolid) -> Result<(), SinkError>;
}

slotmap::new_key_type! {
    /// Unique identifier for a solid held by a [`MemorySink`].
    pub struct SolidId;
}

/// Keeps every emitted solid in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    solids: SlotMap<SolidId, GeneratedSolid>,
    order: Vec<SolidId>,
}

impl MemorySink {
    /// Creates a new, empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the solid with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not belong to this sink.
    pub fn solid(&self, id: SolidId) -> Result<&GeneratedSolid, SinkError> {
        self.solids
            .get(id)
            .ok_or_else(|| SinkError::Rejected("unknown solid id".into()))
    }

    /// Ids of all solids, in emission order.
    #[must_use]
    pub fn ids(&self) -> &[SolidId] {
        &self.order
    }

    /// Iterates over all solids in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &GeneratedSolid> + '_ {
        self.order.iter().filter_map(|id| self.solids.get(*id))
    }

    /// Number of solids of a given kind.
    #[must_use]
    pub fn count(&self, kind: SolidKind) -> usize {
        self.iter().filter(|s| s.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl GeometrySink for MemorySink {
    fn emit_solid(&mut self, solid: GeneratedSolid) -> Result<(), SinkError> {
        let id = self.solids.insert(solid);
        self.order.push(id);
        Ok(())
    }
}

/// Writes `materials` as a Wavefront MTL library, one `newmtl` per entry
/// with its colour as diffuse `Kd`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_mtl<M: Write>(materials: &[Material], mut out: M) -> Result<(), SinkError> {
    writeln!(out, "# geodome materials")?;
    for material in materials {
        let [r, g, b] = material.color.map(|c| f64::from(c) / 255.0);
        writeln!(out)?;
        writeln!(out, "newmtl {}", material.name)?;
        writeln!(out, "Kd {r:.6} {g:.6} {b:.6}")?;
    }
    out.flush()?;
    Ok(())
}

/// Streams solids to a writer as Wavefront OBJ.
///
/// Each solid becomes one `o` object with its own `usemtl`; shared corners
/// within a solid are written once. OBJ indices are global and 1-based.
/// Colours live in a companion MTL library, see [`ObjSink::with_mtllib`]
/// and [`write_mtl`].
pub struct ObjSink<W: Write> {
    writer: W,
    next_vertex: usize,
    counts: HashMap<SolidKind, usize>,
    materials: Vec<Material>,
    mtllib: Option<String>,
    header_written: bool,
}

impl<W: Write> ObjSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_vertex: 1,
            counts: HashMap::new(),
            materials: Vec::new(),
            mtllib: None,
            header_written: false,
        }
    }

    /// References the MTL library `name` from the OBJ header.
    #[must_use]
    pub fn with_mtllib(mut self, name: impl Into<String>) -> Self {
        self.mtllib = Some(name.into());
        self
    }

    /// Materials used so far, in first-use order.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> GeometrySink for ObjSink<W> {
    fn emit_solid(&mut self, solid: GeneratedSolid) -> Result<(), SinkError> {
        if solid.faces.iter().any(|f| f.len() < 3) {
            return Err(SinkError::Rejected(format!(
                "{} has a face with fewer than 3 points",
                solid.kind.name()
            )));
        }
        if !self.header_written {
            writeln!(self.writer, "# geodome OBJ export")?;
            if let Some(lib) = &self.mtllib {
                writeln!(self.writer, "mtllib {lib}")?;
            }
            self.header_written = true;
        }
        if !self.materials.contains(&solid.material) {
            self.materials.push(solid.material);
        }

        let n = self.counts.entry(solid.kind).or_insert(0);
        *n += 1;
        writeln!(self.writer, "o {}_{}", solid.kind.name(), n)?;
        writeln!(self.writer, "usemtl {}", solid.material.name)?;

        let mut local: HashMap<[u64; 3], usize> = HashMap::new();
        let mut face_indices = Vec::with_capacity(solid.faces.len());
        for face in &solid.faces {
            let mut indices = Vec::with_capacity(face.len());
            for p in face {
                let idx = match local.get(&point_key(p)) {
                    Some(&idx) => idx,
                    None => {
                        writeln!(self.writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
                        let idx = self.next_vertex;
                        self.next_vertex += 1;
                        local.insert(point_key(p), idx);
                        idx
                    }
                };
                indices.push(idx.to_string());
            }
            face_indices.push(indices.join(" "));
        }
        for face in face_indices {
            writeln!(self.writer, "f {face}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tetra() -> GeneratedSolid {
        let (a, b, c, d) = (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0));
        GeneratedSolid::new(
            SolidKind::Hub,
            vec![vec![a, c, b], vec![a, b, d], vec![b, c, d], vec![c, a, d]],
            Material::METAL,
        )
    }

    fn triangle() -> GeneratedSolid {
        GeneratedSolid::new(
            SolidKind::Panel,
            vec![vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]],
            Material::TESSELLATED_PANEL,
        )
    }

    #[test]
    fn closed_and_open_solids() {
        assert!(tetra().is_closed());
        assert!(!triangle().is_closed());
        assert_eq!(tetra().vertices().len(), 4);
    }

    #[test]
    fn memory_sink_keeps_emission_order() {
        let mut sink = MemorySink::new();
        sink.emit_solid(triangle()).unwrap();
        sink.emit_solid(tetra()).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(SolidKind::Hub), 1);
        let first = sink.solid(sink.ids()[0]).unwrap();
        assert_eq!(first.kind, SolidKind::Panel);
        let kinds: Vec<_> = sink.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SolidKind::Panel, SolidKind::Hub]);
    }

    #[test]
    fn obj_shares_vertices_within_a_solid() {
        let mut sink = ObjSink::new(Vec::new());
        sink.emit_solid(tetra()).unwrap();
        sink.emit_solid(triangle()).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();

        let v_count = text.lines().filter(|l| l.starts_with("v ")).count();
        let f_count = text.lines().filter(|l| l.starts_with("f ")).count();
        assert_eq!(v_count, 7);
        assert_eq!(f_count, 5);
        assert!(text.contains("o hub_1"));
        assert!(text.contains("o panel_1"));
        assert!(text.contains("usemtl metal"));
    }

    #[test]
    fn obj_indices_are_global_and_one_based() {
        let mut sink = ObjSink::new(Vec::new());
        sink.emit_solid(triangle()).unwrap();
        sink.emit_solid(triangle()).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1 2 3", "f 4 5 6"]);
    }

    #[test]
    fn obj_references_material_library() {
        let mut sink = ObjSink::new(Vec::new()).with_mtllib("dome.mtl");
        sink.emit_solid(tetra()).unwrap();
        sink.emit_solid(triangle()).unwrap();
        sink.emit_solid(tetra()).unwrap();
        assert_eq!(sink.materials(), &[Material::METAL, Material::TESSELLATED_PANEL]);

        let materials = sink.materials().to_vec();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(text.lines().nth(1), Some("mtllib dome.mtl"));

        let mut mtl = Vec::new();
        write_mtl(&materials, &mut mtl).unwrap();
        let mtl = String::from_utf8(mtl).unwrap();
        assert!(mtl.contains("newmtl metal\nKd 0.627451 0.627451 0.666667"));
        assert!(mtl.contains("newmtl tessellated_face\n"));
        assert_eq!(mtl.lines().filter(|l| l.starts_with("newmtl ")).count(), 2);
    }

    #[test]
    fn wood_is_golden() {
        let mut mtl = Vec::new();
        write_mtl(&[Material::WOOD], &mut mtl).unwrap();
        assert!(String::from_utf8(mtl).unwrap().contains("Kd 1.000000 0.843137 0.000000"));
    }

    #[test]
    fn obj_rejects_degenerate_face() {
        let mut sink = ObjSink::new(Vec::new());
        let bad = GeneratedSolid::new(
            SolidKind::Strut,
            vec![vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]],
            Material::WOOD,
        );
        assert!(matches!(sink.emit_solid(bad), Err(SinkError::Rejected(_))));
    }
}
