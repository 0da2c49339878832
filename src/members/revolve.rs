use std::f64::consts::TAU;

use crate::error::GeometryError;
use crate::math::{with_length, Point3, Vector3, TOLERANCE};
use crate::sink::FaceLoop;

/// A planar profile swept a full turn around an axis, approximated by
/// `segments` flat facets.
///
/// Profile points are `(radius, height)` pairs measured from the axis
/// origin. Points with zero radius lie on the axis and collapse to a single
/// apex, so their adjacent facets become triangles.
#[derive(Debug, Clone)]
pub struct RevolveProfile {
    profile: Vec<(f64, f64)>,
    closed: bool,
}

impl RevolveProfile {
    /// A profile whose last point joins back to the first.
    #[must_use]
    pub fn closed(profile: Vec<(f64, f64)>) -> Self {
        Self { profile, closed: true }
    }

    /// A profile with two free ends; only watertight if both ends sit on the axis.
    #[must_use]
    pub fn open(profile: Vec<(f64, f64)>) -> Self {
        Self {
            profile,
            closed: false,
        }
    }

    /// Sweeps the profile around `axis` through `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is zero, there are fewer than 3
    /// segments, or every profile point lies on the axis.
    pub fn execute(&self, origin: &Point3, axis: &Vector3, segments: u32) -> Result<Vec<FaceLoop>, GeometryError> {
        if segments < 3 || self.profile.len() < 2 {
            return Err(GeometryError::Degenerate("revolution needs 3 segments and 2 profile points".into()));
        }
        if self.profile.iter().all(|&(r, _)| r < TOLERANCE) {
            return Err(GeometryError::Degenerate("all profile points lie on the revolution axis".into()));
        }
        let axis = with_length(axis, 1.0).ok_or(GeometryError::ZeroVector)?;
        let ref_dir = perpendicular_dir(&axis);
        let binormal = axis.cross(&ref_dir);

        let rings: Vec<Vec<Point3>> = self
            .profile
            .iter()
            .map(|&(radius, height)| {
                let foot = origin + axis * height;
                if radius < TOLERANCE {
                    return vec![foot];
                }
                (0..segments)
                    .map(|k| {
                        let angle = TAU * f64::from(k) / f64::from(segments);
                        foot + (ref_dir * angle.cos() + binormal * angle.sin()) * radius
                    })
                    .collect()
            })
            .collect();

        let spans = if self.closed { rings.len() } else { rings.len() - 1 };
        let n = segments as usize;
        let mut faces = Vec::with_capacity(spans * n);
        for i in 0..spans {
            let (a, b) = (&rings[i], &rings[(i + 1) % rings.len()]);
            for k in 0..n {
                let k1 = (k + 1) % n;
                match (a.len(), b.len()) {
                    (1, 1) => {}
                    (1, _) => faces.push(vec![a[0], b[k1], b[k]]),
                    (_, 1) => faces.push(vec![a[k], a[k1], b[0]]),
                    _ => faces.push(vec![a[k], a[k1], b[k1], b[k]]),
                }
            }
        }
        Ok(faces)
    }
}

/// Unit vector perpendicular to a unit `axis`.
fn perpendicular_dir(axis: &Vector3) -> Vector3 {
    let candidate = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let perp = axis.cross(&candidate);
    perp / perp.norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sink::{GeneratedSolid, Material, SolidKind};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn closed(faces: Vec<FaceLoop>) -> bool {
        GeneratedSolid::new(SolidKind::Hub, faces, Material::METAL).is_closed()
    }

    #[test]
    fn rectangle_sweeps_to_closed_tube() {
        let profile = RevolveProfile::closed(vec![(2.0, 0.0), (2.0, -4.0), (1.5, -4.0), (1.5, 0.0)]);
        let faces = profile.execute(&p(1.0, 2.0, 3.0), &Vector3::new(0.0, 1.0, 1.0), 12).unwrap();
        assert_eq!(faces.len(), 48);
        assert!(closed(faces));
    }

    #[test]
    fn ring_points_keep_their_radius() {
        let profile = RevolveProfile::closed(vec![(2.0, 0.0), (2.0, -4.0), (1.0, -4.0), (1.0, 0.0)]);
        let origin = p(0.0, 0.0, 10.0);
        let faces = profile.execute(&origin, &Vector3::z(), 8).unwrap();
        for pt in faces.iter().flatten() {
            let r = (pt.x * pt.x + pt.y * pt.y).sqrt();
            assert!((r - 2.0).abs() < 1e-9 || (r - 1.0).abs() < 1e-9);
            assert!(pt.z <= 10.0 + 1e-9 && pt.z >= 6.0 - 1e-9);
        }
    }

    #[test]
    fn apex_profile_makes_triangles() {
        let profile = RevolveProfile::open(vec![(0.0, -1.0), (1.0, 0.0), (0.0, 1.0)]);
        let faces = profile.execute(&Point3::origin(), &Vector3::x(), 6).unwrap();
        assert_eq!(faces.len(), 12);
        assert!(faces.iter().all(|f| f.len() == 3));
        assert!(closed(faces));
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        for axis in [Vector3::x(), Vector3::y(), Vector3::new(1.0, 1.0, 1.0).normalize()] {
            let d = perpendicular_dir(&axis);
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(d.dot(&axis), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_inputs_rejected() {
        let on_axis = RevolveProfile::open(vec![(0.0, 0.0), (0.0, 1.0)]);
        assert!(on_axis.execute(&Point3::origin(), &Vector3::z(), 8).is_err());
        let ok = RevolveProfile::open(vec![(1.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            ok.execute(&Point3::origin(), &Vector3::zeros(), 8),
            Err(GeometryError::ZeroVector)
        ));
        assert!(ok.execute(&Point3::origin(), &Vector3::z(), 2).is_err());
    }
}
