//! Core value types shared across the engine

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::Deserialize;

/// One of the four faces of a floor layer. Face `i` is the footprint edge `i -> i+1 mod 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum FaceId {
    A,
    B,
    C,
    D,
}

impl FaceId {
    pub const ALL: [FaceId; 4] = [FaceId::A, FaceId::B, FaceId::C, FaceId::D];

    /// Index of the footprint edge this face maps to
    pub fn index(self) -> usize {
        match self {
            FaceId::A => 0,
            FaceId::B => 1,
            FaceId::C => 2,
            FaceId::D => 3,
        }
    }

    /// Face for a footprint edge index (taken mod 4)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaceId::A => "A",
            FaceId::B => "B",
            FaceId::C => "C",
            FaceId::D => "D",
        };
        f.write_str(name)
    }
}

/// A point on the horizontal plane (world x, z), in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, z: 0.0 };

    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.z * other.z
    }

    /// z-component of the 3D cross product (signed parallelogram area)
    pub fn cross(self, other: Point2) -> f64 {
        self.x * other.z - self.z * other.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.z)
    }

    pub fn distance(self, other: Point2) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector
    pub fn normalized(self) -> Option<Point2> {
        let len = self.length();
        if len > f64::EPSILON && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    pub fn lerp(self, other: Point2, t: f64) -> Point2 {
        self + (other - self) * t
    }

    pub fn midpoint(self, other: Point2) -> Point2 {
        self.lerp(other, 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, z]: [f64; 2]) -> Self {
        Self { x, z }
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.z * rhs)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a bay, unique within its facade
    BayId
);
string_id!(
    /// Identifier of a bay group, unique within its facade
    GroupId
);
string_id!(
    /// Identifier of a floor layer
    LayerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_neighbours_wrap() {
        assert_eq!(FaceId::A.prev(), FaceId::D);
        assert_eq!(FaceId::D.next(), FaceId::A);
        assert_eq!(FaceId::from_index(6), FaceId::C);
    }

    #[test]
    fn test_point_cross_sign() {
        let x = Point2::new(1.0, 0.0);
        let z = Point2::new(0.0, 1.0);
        assert_eq!(x.cross(z), 1.0);
        assert_eq!(z.cross(x), -1.0);
    }

    #[test]
    fn test_normalized_zero_is_none() {
        assert!(Point2::ZERO.normalized().is_none());
        let n = Point2::new(3.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_from_pair() {
        #[derive(Deserialize)]
        struct Wrapper {
            p: Point2,
        }

        let w: Wrapper = toml::from_str("p = [1.5, -2.0]").unwrap();
        assert_eq!(w.p, Point2::new(1.5, -2.0));
    }
}
