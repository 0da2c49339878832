use std::f64::consts::PI;

use crate::config::{HubConfig, HubStyle};
use crate::math::Point3;
use crate::sink::{GeneratedSolid, Material, SolidKind};

use super::revolve::RevolveProfile;
use super::Generated;

/// Builds one joint piece at every surviving hub.
///
/// A tube hub is a ring of `outer_radius` and wall `wall_thickness`, centered
/// on the hub and sunk `depth` along the radial direction toward the sphere
/// center. A sphere hub is a ball of `outer_radius` around the hub.
pub struct MakeHubs<'a> {
    config: &'a HubConfig,
    center: Point3,
}

impl<'a> MakeHubs<'a> {
    /// Creates a new `MakeHubs` operation.
    #[must_use]
    pub fn new(config: &'a HubConfig, center: Point3) -> Self {
        Self { config, center }
    }

    /// Executes the operation for the given hub indices.
    #[must_use]
    pub fn execute(&self, points: &[Point3], hubs: &[usize]) -> Generated {
        let mut out = Generated::default();
        let profile = self.profile();
        for &h in hubs {
            let solid = profile
                .execute(&points[h], &(points[h] - self.center), self.config.segments)
                .map(|faces| GeneratedSolid::new(SolidKind::Hub, faces, Material::METAL));
            out.push_or_skip(SolidKind::Hub, h, solid);
        }
        out
    }

    fn profile(&self) -> RevolveProfile {
        let outer = self.config.outer_radius;
        match self.config.style {
            HubStyle::Tube => {
                let inner = outer - self.config.wall_thickness;
                let depth = self.config.depth;
                RevolveProfile::closed(vec![(outer, 0.0), (outer, -depth), (inner, -depth), (inner, 0.0)])
            }
            HubStyle::Sphere => {
                let steps = (self.config.segments / 2).max(2);
                let profile = (0..=steps)
                    .map(|i| {
                        if i == 0 || i == steps {
                            let h = if i == 0 { -outer } else { outer };
                            return (0.0, h);
                        }
                        let phi = -PI / 2.0 + PI * f64::from(i) / f64::from(steps);
                        (outer * phi.cos(), outer * phi.sin())
                    })
                    .collect();
                RevolveProfile::open(profile)
            }
        }
    }
}
