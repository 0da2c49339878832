//! Dome build orchestration and statistics.

use std::fmt;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::config::DomeConfig;
use crate::error::{Result, SinkError};
use crate::filter::{FilterMesh, FilteredMesh};
use crate::flatten::{find_base_ring, BaseRing, FlattenBase};
use crate::math::Point3;
use crate::members::{Generated, MakeBaseFrame, MakeFrame, MakeHubs, MakePanels, MakeStruts};
use crate::session::BuildSession;
use crate::sink::GeometrySink;
use crate::solid::{BaseSolid, MakePlatonic, PlatonicSolid};
use crate::tessellation::TessellateSolid;

/// Everything known about the dome before members are generated.
#[derive(Debug, Clone)]
pub struct DomeMesh {
    pub center: Point3,
    pub base: BaseSolid,
    /// Raw tessellation; base ring points are leveled in place when
    /// flattening is enabled.
    pub session: BuildSession,
    pub filtered: FilteredMesh,
    /// Lowest ring of hubs, when flattening or the base frame asked for it.
    pub base_ring: Option<BaseRing>,
}

/// A configured geodesic dome.
///
/// Every call to [`Dome::mesh`] or [`Dome::generate`] starts from a fresh
/// [`BuildSession`], so repeated builds of the same configuration are
/// bit-identical.
#[derive(Debug, Clone)]
pub struct Dome {
    config: DomeConfig,
}

impl Dome {
    #[must_use]
    pub fn new(config: DomeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DomeConfig {
        &self.config
    }

    /// Validates the configuration and builds the filtered mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::error::ConfigError) if the
    /// configuration is invalid.
    pub fn mesh(&self) -> Result<DomeMesh> {
        let config = &self.config;
        config.validate()?;

        let center = config.center();
        let base = MakePlatonic::new(config.solid, config.radius, center).execute();
        let mut session = BuildSession::new();
        TessellateSolid::new(&base, config.frequency, center, config.radius).execute(&mut session);
        let filtered = FilterMesh::new(&session, config.tolerance)
            .with_strategy(config.dedup)
            .execute();

        let base_ring = if config.flatten_base || config.base_frame.enabled {
            match session.reference_strut_length() {
                Some(reference) if config.flatten_base => {
                    Some(FlattenBase::new(&filtered, center, config.radius, reference).execute(&mut session.points))
                }
                Some(reference) => Some(find_base_ring(&session.points, &filtered.hubs, reference)),
                None => {
                    tracing::warn!("no struts recorded, base ring unavailable");
                    None
                }
            }
        } else {
            None
        };

        Ok(DomeMesh {
            center,
            base,
            session,
            filtered,
            base_ring,
        })
    }

    /// Builds the dome and streams every enabled member into `sink`.
    ///
    /// Members are emitted grouped by kind: hubs, struts, frame struts, base
    /// frame, then panels.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before anything is emitted, or the
    /// first error reported by the sink.
    pub fn generate(&self, sink: &mut dyn GeometrySink) -> Result<DomeStatistics> {
        let start = Instant::now();
        let config = &self.config;
        tracing::info!(
            solid = config.solid.face_count(),
            frequency = config.frequency,
            radius = config.radius,
            fraction = config.fraction,
            "building dome"
        );

        let mesh = self.mesh()?;
        let points = &mesh.session.points;
        let filtered = &mesh.filtered;
        let mut stats = DomeStatistics::new(config, &mesh);

        if config.hubs.enabled {
            let generated = MakeHubs::new(&config.hubs, mesh.center).execute(points, &filtered.hubs);
            stats.hub_solids = emit(sink, generated, &mut stats.skipped)?;
        }
        if config.struts.enabled {
            let generated = MakeStruts::new(&config.struts, mesh.center).execute(points, &filtered.struts);
            stats.strut_solids = emit(sink, generated, &mut stats.skipped)?;
        }
        if config.frame.enabled {
            let generated =
                MakeFrame::new(&config.struts, &config.frame, mesh.center).execute(points, &filtered.triangles);
            stats.frame_struts = emit(sink, generated, &mut stats.skipped)?;
        }
        if let (true, Some(ring)) = (config.base_frame.enabled, &mesh.base_ring) {
            let generated = MakeBaseFrame::new(&config.struts, &config.base_frame).execute(points, &filtered.struts, ring);
            stats.base_frame_members = emit(sink, generated, &mut stats.skipped)?;
        }
        let generated = MakePanels::new(&config.panels).execute(&mesh.base, points, &filtered.triangles);
        stats.panels = emit(sink, generated, &mut stats.skipped)?;

        stats.elapsed = start.elapsed();
        tracing::info!(
            hubs = stats.hubs,
            struts = stats.struts,
            frame_struts = stats.frame_struts,
            skipped = stats.skipped,
            elapsed = ?stats.elapsed,
            "dome complete"
        );
        Ok(stats)
    }
}

fn emit(sink: &mut dyn GeometrySink, generated: Generated, skipped: &mut usize) -> std::result::Result<usize, SinkError> {
    *skipped += generated.skipped;
    let count = generated.solids.len();
    for solid in generated.solids {
        sink.emit_solid(solid)?;
    }
    Ok(count)
}

/// Read-only summary of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct DomeStatistics {
    pub solid: PlatonicSolid,
    pub frequency: u32,
    pub fraction: f64,
    pub radius: f64,
    /// Raw tessellation sizes, before deduplication.
    pub raw_points: usize,
    pub raw_struts: usize,
    pub raw_triangles: usize,
    /// Distinct surviving hub positions.
    pub hubs: usize,
    /// Distinct surviving struts.
    pub struts: usize,
    pub triangles: usize,
    pub base_ring: usize,
    pub hub_solids: usize,
    pub strut_solids: usize,
    pub frame_struts: usize,
    pub base_frame_members: usize,
    pub panels: usize,
    /// Members dropped because their geometry was degenerate.
    pub skipped: usize,
    pub elapsed: Duration,
}

impl DomeStatistics {
    fn new(config: &DomeConfig, mesh: &DomeMesh) -> Self {
        Self {
            solid: config.solid,
            frequency: config.frequency,
            fraction: config.fraction,
            radius: config.radius,
            raw_points: mesh.session.points.len(),
            raw_struts: mesh.session.struts.len(),
            raw_triangles: mesh.session.triangles.len(),
            hubs: mesh.filtered.hubs.len(),
            struts: mesh.filtered.struts.len(),
            triangles: mesh.filtered.triangles.len(),
            base_ring: mesh.base_ring.as_ref().map_or(0, |r| r.indices.len()),
            hub_solids: 0,
            strut_solids: 0,
            frame_struts: 0,
            base_frame_members: 0,
            panels: 0,
            skipped: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Total number of solids handed to the sink.
    #[must_use]
    pub fn solids(&self) -> usize {
        self.hub_solids + self.strut_solids + self.frame_struts + self.base_frame_members + self.panels
    }
}

impl fmt::Display for DomeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics")?;
        writeln!(f, "^^^^^^^^^^")?;
        writeln!(f)?;
        writeln!(f, "Frequency: {}", self.frequency)?;
        writeln!(f, "Platonic Solid: {}", self.solid.face_count())?;
        writeln!(f, "Sphere Fraction: {:.2}", self.fraction * 100.0)?;
        writeln!(f, "Radius: {}", self.radius)?;
        writeln!(f)?;
        writeln!(f, "Number of Hubs: \t{}", self.hub_solids)?;
        writeln!(f, "Number of Struts:\t{}", self.strut_solids)?;
        writeln!(f, "Number of Frame Struts:\t{}", self.frame_struts)?;
        if self.base_frame_members > 0 {
            writeln!(f, "Number of Base Frame Members:\t{}", self.base_frame_members)?;
        }
        if self.skipped > 0 {
            writeln!(f, "Skipped Members:\t{}", self.skipped)?;
        }
        writeln!(f)?;
        write!(f, "Processing Time: {}", format_elapsed(self.elapsed))
    }
}

/// Splits a duration into `hrs`, `mins` and `secs`, omitting empty leading units.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let mut secs = elapsed.as_secs_f64();
    let mut out = String::new();
    for (unit, label) in [(3600.0, "hrs"), (60.0, "mins")] {
        let mut whole = 0_u64;
        while secs > unit {
            secs -= unit;
            whole += 1;
        }
        if whole > 0 {
            let _ = write!(out, "{whole} {label} ");
        }
    }
    let _ = write!(out, "{secs:.3} secs");
    out
}
