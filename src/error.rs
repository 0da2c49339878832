use thiserror::Error;

use crate::math::intersect_3d::LinePlaneStatus;

/// Top-level error type for dome generation.
#[derive(Debug, Error)]
pub enum GeodomeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors in the dome configuration. Always fatal, raised before any geometry
/// is produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported platonic solid with {0} faces (expected 4, 8 or 20)")]
    UnsupportedSolid(u32),

    #[error("{parameter} must be positive, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid fraction {numerator}/{denominator}")]
    InvalidRatio { numerator: u32, denominator: u32 },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while deriving member geometry.
///
/// These never abort a build: the affected member is skipped.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("line does not cross the clipping plane ({0:?})")]
    NoIntersection(LinePlaneStatus),
}

/// Errors reported by a [`GeometrySink`](crate::sink::GeometrySink).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink rejected solid: {0}")]
    Rejected(String),
}

/// Convenience type alias for results using [`GeodomeError`].
pub type Result<T> = std::result::Result<T, GeodomeError>;
