//! Axis-aligned bounding boxes.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Vec3,
    pub upper: Vec3,
}

impl Bounds {
    /// A box containing nothing; extending it by a point yields that point.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lower: Vec3::splat(f32::INFINITY),
            upper: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Creates a box from two corners.
    #[must_use]
    pub fn new(lower: Vec3, upper: Vec3) -> Self {
        Self { lower, upper }
    }

    /// The box of a structured grid anchored at the origin: `dims * spacing`.
    #[must_use]
    pub fn from_dims_spacing(dims: UVec3, spacing: Vec3) -> Self {
        Self::new(Vec3::ZERO, dims.as_vec3() * spacing)
    }

    /// Grows the box to contain `p`.
    pub fn extend(&mut self, p: Vec3) {
        self.lower = self.lower.min(p);
        self.upper = self.upper.max(p);
    }

    /// Returns true if no point has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.cmpgt(self.upper).any()
    }

    /// Returns the extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.upper - self.lower
        }
    }

    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.lower + self.upper) * 0.5
    }

    /// Returns the length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Vec3> for Bounds {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        let mut bounds = Bounds::empty();
        for p in iter {
            bounds.extend(p);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dims_spacing() {
        let b = Bounds::from_dims_spacing(UVec3::new(4, 2, 8), Vec3::new(0.5, 1.0, 2.0));
        assert_eq!(b.lower, Vec3::ZERO);
        assert_eq!(b.upper, Vec3::new(2.0, 2.0, 16.0));
        assert_eq!(b.center(), Vec3::new(1.0, 1.0, 8.0));
    }

    #[test]
    fn test_extend() {
        let mut b = Bounds::empty();
        assert!(b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
        b.extend(Vec3::new(1.0, -1.0, 0.0));
        b.extend(Vec3::new(-2.0, 3.0, 0.5));
        assert!(!b.is_empty());
        assert_eq!(b.lower, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.upper, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_diagonal() {
        let b: Bounds = [Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)].into_iter().collect();
        assert!((b.diagonal() - 5.0).abs() < 1e-6);
    }
}
