//! Dome configuration.
//!
//! A [`DomeConfig`] is filled in by a configuration source (builder calls or a
//! JSON document), validated once, and read-only for the whole build.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::DedupStrategy;
use crate::math::Point3;
use crate::solid::PlatonicSolid;

/// Full set of parameters for one dome build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomeConfig {
    /// Base polyhedron, selected by face count (4, 8 or 20).
    pub solid: PlatonicSolid,
    /// Number of segments each polyhedron edge is split into.
    pub frequency: u32,
    /// Sphere radius in model units.
    pub radius: f64,
    /// Portion of the sphere kept as the dome, in `(0, 1]`.
    pub fraction: f64,
    /// Merge distance (ε) for coincident points and the ground cutoff.
    pub tolerance: f64,
    /// Representative lookup used when merging coincident points.
    pub dedup: DedupStrategy,
    /// Re-project the lowest ring of hubs onto a common level.
    pub flatten_base: bool,
    pub hubs: HubConfig,
    pub struts: StrutConfig,
    pub frame: FrameConfig,
    pub base_frame: BaseFrameConfig,
    pub panels: PanelConfig,
}

/// Shape of the joint pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubStyle {
    /// Open tube sunk along the radial direction.
    #[default]
    Tube,
    /// Ball centered on the vertex.
    Sphere,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub enabled: bool,
    pub style: HubStyle,
    pub outer_radius: f64,
    /// Tube wall thickness; the inner radius is `outer_radius - wall_thickness`.
    pub wall_thickness: f64,
    /// Tube length, measured inward from the vertex.
    pub depth: f64,
    /// Number of facets around the circumference.
    pub segments: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: HubStyle::Tube,
            outer_radius: 2.25,
            wall_thickness: 0.25,
            depth: 4.0,
            segments: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrutConfig {
    pub enabled: bool,
    /// Distance each strut end stops short of the hub center.
    pub inset: f64,
    /// Width across the strut, tangent to the sphere.
    pub thickness: f64,
    /// Extent of the strut toward the sphere center.
    pub depth: f64,
}

impl Default for StrutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inset: 3.0,
            thickness: 1.5,
            depth: 3.5,
        }
    }
}

/// Frame struts brace each triangle; they share the strut cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub enabled: bool,
    /// Spacing between neighbouring frame struts.
    pub separation: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            separation: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseFrameConfig {
    pub enabled: bool,
    /// How far the base members hang below the base ring.
    pub height: f64,
}

impl Default for BaseFrameConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            height: 6.0,
        }
    }
}

/// Optional reference panels: the base polyhedron and the tessellated triangles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub primitive_faces: bool,
    pub tessellated_faces: bool,
}

impl Default for DomeConfig {
    fn default() -> Self {
        Self {
            solid: PlatonicSolid::Icosahedron,
            frequency: 3,
            radius: 150.0,
            fraction: 0.6,
            tolerance: 0.5,
            dedup: DedupStrategy::LinearScan,
            flatten_base: false,
            hubs: HubConfig::default(),
            struts: StrutConfig::default(),
            frame: FrameConfig::default(),
            base_frame: BaseFrameConfig::default(),
            panels: PanelConfig::default(),
        }
    }
}

impl DomeConfig {
    /// Creates a configuration with default member dimensions.
    #[must_use]
    pub fn new(solid: PlatonicSolid, frequency: u32, radius: f64) -> Self {
        Self {
            solid,
            frequency,
            radius,
            ..Self::default()
        }
    }

    /// Sets the kept fraction of the sphere.
    #[must_use]
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    /// Sets the kept fraction from a numerator/denominator pair, e.g. `5/8`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRatio`] for a zero denominator or a
    /// numerator that is zero or larger than the denominator.
    pub fn with_fraction_ratio(self, numerator: u32, denominator: u32) -> Result<Self, ConfigError> {
        if denominator == 0 || numerator == 0 || numerator > denominator {
            return Err(ConfigError::InvalidRatio {
                numerator,
                denominator,
            });
        }
        Ok(self.with_fraction(f64::from(numerator) / f64::from(denominator)))
    }

    /// Sets the merge tolerance (ε).
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enables or disables base flattening.
    #[must_use]
    pub fn with_flatten_base(mut self, flatten: bool) -> Self {
        self.flatten_base = flatten;
        self
    }

    /// Center of the sphere. Placed so that the ground plane `z = 0` cuts off
    /// everything outside the kept fraction.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::new(0.0, 0.0, -self.radius + 2.0 * self.radius * self.fraction)
    }

    /// Parses a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or an unsupported
    /// solid selector.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every parameter the enabled features depend on.
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::NonPositive {
                parameter: "frequency",
                value: 0.0,
            });
        }
        positive("radius", self.radius)?;
        positive("tolerance", self.tolerance)?;
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(ConfigError::OutOfRange {
                parameter: "fraction",
                value: self.fraction,
                min: 0.0,
                max: 1.0,
            });
        }

        if self.hubs.enabled {
            positive("hubs.outer_radius", self.hubs.outer_radius)?;
            positive("hubs.depth", self.hubs.depth)?;
            if !(self.hubs.wall_thickness > 0.0 && self.hubs.wall_thickness <= self.hubs.outer_radius) {
                return Err(ConfigError::OutOfRange {
                    parameter: "hubs.wall_thickness",
                    value: self.hubs.wall_thickness,
                    min: 0.0,
                    max: self.hubs.outer_radius,
                });
            }
            if self.hubs.segments < 3 {
                return Err(ConfigError::OutOfRange {
                    parameter: "hubs.segments",
                    value: f64::from(self.hubs.segments),
                    min: 3.0,
                    max: f64::from(u32::MAX),
                });
            }
        }

        if self.struts.enabled || self.frame.enabled || self.base_frame.enabled {
            positive("struts.thickness", self.struts.thickness)?;
            positive("struts.depth", self.struts.depth)?;
            if self.struts.inset < 0.0 {
                return Err(ConfigError::OutOfRange {
                    parameter: "struts.inset",
                    value: self.struts.inset,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        if self.frame.enabled {
            positive("frame.separation", self.frame.separation)?;
        }
        if self.base_frame.enabled {
            positive("base_frame.height", self.base_frame.height)?;
        }
        Ok(())
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { parameter, value })
    }
}
