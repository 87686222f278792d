//! Representation of spheres.

use crate::{axis_aligned_box::AxisAlignedBox, num::Float};
use nalgebra::{self as na, Point3};

/// A sphere represented by the center point and the radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere<F: Float> {
    center: Point3<F>,
    radius: F,
}

impl<F: Float> Sphere<F> {
    /// Creates a new sphere with the given center and radius.
    ///
    /// # Panics
    /// If `radius` is negative.
    pub fn new(center: Point3<F>, radius: F) -> Self {
        assert!(radius >= F::ZERO);
        Self { center, radius }
    }

    /// Creates the sphere centered on the given axis-aligned box whose radius
    /// is the magnitude of the box's half extents. This is the conservative
    /// sphere-vs-box bound: the sphere touches the box corners and encloses
    /// the whole box.
    pub fn bounding_sphere_for_box(aabb: &AxisAlignedBox<F>) -> Self {
        Self::new(aabb.center(), aabb.half_extents().magnitude())
    }

    /// Returns the center point of the sphere.
    pub fn center(&self) -> &Point3<F> {
        &self.center
    }

    /// Returns the radius of the sphere.
    pub fn radius(&self) -> F {
        self.radius
    }

    /// Returns the square of the radius of the sphere.
    pub fn radius_squared(&self) -> F {
        self.radius * self.radius
    }

    /// Whether the given point is inside this sphere. A point exactly on the
    /// surface of the sphere is considered inside.
    pub fn contains_point(&self, point: &Point3<F>) -> bool {
        na::distance_squared(self.center(), point) <= self.radius_squared()
    }

    /// Whether the given axis-aligned box is fully inside this sphere. A box
    /// whose corners lie exactly on the surface is considered inside.
    pub fn encloses_box(&self, aabb: &AxisAlignedBox<F>) -> bool {
        self.contains_point(&aabb.compute_farthest_corner(self.center()))
    }
}
