//! Spherical coordinate projection and the small vector toolkit the scene needs

use serde::Serialize;
use std::ops::{Add, Mul, Sub};

/// A point (or direction) in globe space. Y is up, the camera looks down -Z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if len < 1e-6 {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    /// Rotate around the Y axis (spin).
    pub fn rotate_y(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    /// Rotate around the X axis (tilt).
    pub fn rotate_x(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Map latitude/longitude (degrees) onto a sphere of `radius` centred at the origin.
///
/// Polar angle comes from latitude, azimuth from longitude shifted by 180 degrees.
/// Out-of-range inputs are not validated; they wrap around the sphere.
pub fn project(lat: f32, lng: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`project`]: returns `(lat, lng)` in degrees for a non-zero point.
pub fn unproject(p: Vec3) -> (f32, f32) {
    let r = p.length();
    if r < 1e-6 {
        return (0.0, 0.0);
    }
    let lat = 90.0 - (p.y / r).clamp(-1.0, 1.0).acos().to_degrees();
    let theta = p.z.atan2(-p.x).to_degrees();
    let mut lng = theta - 180.0;
    if lng < -180.0 {
        lng += 360.0;
    }
    (lat, lng)
}

/// Quadratic Bezier through `p0` and `p2` pulled toward `control`.
pub fn quadratic_bezier(p0: Vec3, control: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u) + control * (2.0 * u * t) + p2 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < EPS
    }

    #[test]
    fn poles_and_prime_meridian() {
        assert!(close(project(90.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(project(-90.0, 0.0, 1.0), Vec3::new(0.0, -1.0, 0.0)));
        // theta = 180deg puts lng 0 on +X
        assert!(close(project(0.0, 0.0, 2.0), Vec3::new(2.0, 0.0, 0.0)));
        assert!(close(project(0.0, 90.0, 1.0), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn project_is_bit_identical_on_repeat() {
        let a = project(55.75, 37.62, 1.0);
        let b = project(55.75, 37.62, 1.0);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }

    #[test]
    fn unproject_inverts_project() {
        let (lat, lng) = unproject(project(40.71, -74.01, 1.3));
        assert!((lat - 40.71).abs() < 1e-3);
        assert!((lng + 74.01).abs() < 1e-3);
    }

    #[test]
    fn bezier_endpoints_and_midpoint() {
        let p0 = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 2.0, 0.0);
        let p2 = Vec3::new(-1.0, 0.0, 0.0);
        assert!(close(quadratic_bezier(p0, c, p2, 0.0), p0));
        assert!(close(quadratic_bezier(p0, c, p2, 1.0), p2));
        assert!(close(quadratic_bezier(p0, c, p2, 0.5), Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn rotations_preserve_length() {
        let p = Vec3::new(0.3, -0.7, 0.2);
        assert!((p.rotate_y(1.1).length() - p.length()).abs() < EPS);
        assert!((p.rotate_x(-0.4).length() - p.length()).abs() < EPS);
    }

    proptest! {
        #[test]
        fn projected_points_lie_on_sphere(
            lat in -90.0f32..=90.0,
            lng in -180.0f32..=180.0,
            radius in 0.01f32..100.0,
        ) {
            let p = project(lat, lng, radius);
            prop_assert!((p.length() - radius).abs() <= radius * 1e-5);
        }
    }
}
