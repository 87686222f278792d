//! Representation of axis-aligned boxes.

use crate::num::Float;
use nalgebra::{self as na, Point3, Vector3, point};

use Corner::{Lower, Upper};

/// A box with orientation aligned with the coordinate system axes. The width,
/// height and depth axes are aligned with the x-, y- and z-axis respectively.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisAlignedBox<F: Float> {
    corners: [Point3<F>; 2],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Corner {
    Lower = 0,
    Upper = 1,
}

const ALL_CORNER_COMPONENTS: [[Corner; 3]; 8] = [
    [Lower, Lower, Lower],
    [Lower, Lower, Upper],
    [Lower, Upper, Lower],
    [Lower, Upper, Upper],
    [Upper, Lower, Lower],
    [Upper, Lower, Upper],
    [Upper, Upper, Lower],
    [Upper, Upper, Upper],
];

impl<F: Float> AxisAlignedBox<F> {
    /// Creates a new box with the given lower and upper corner points.
    ///
    /// # Panics
    /// If any component of `upper_corner` is smaller than the corresponding
    /// component of `lower_corner`.
    pub fn new(lower_corner: Point3<F>, upper_corner: Point3<F>) -> Self {
        assert!(
            (upper_corner - lower_corner).iter().all(|&diff| diff >= F::ZERO),
            "Tried to create axis-aligned box with negative extent"
        );
        Self {
            corners: [lower_corner, upper_corner],
        }
    }

    /// Creates a new box with the given center point and half extents along
    /// each axis.
    ///
    /// # Panics
    /// If any of the half extents is negative.
    pub fn from_center_and_half_extents(center: Point3<F>, half_extents: Vector3<F>) -> Self {
        assert!(
            half_extents.iter().all(|&half_extent| half_extent >= F::ZERO),
            "Tried to create axis-aligned box with negative half extent"
        );
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates the axis-aligned box bounding both the given axis-aligned
    /// boxes.
    pub fn aabb_from_pair(aabb_1: &Self, aabb_2: &Self) -> Self {
        Self::new(
            aabb_1.lower_corner().inf(aabb_2.lower_corner()),
            aabb_1.upper_corner().sup(aabb_2.upper_corner()),
        )
    }

    /// Creates the axis-aligned box bounding every box in the given slice by
    /// iterative pairwise union, or [`None`] if the slice is empty. The first
    /// box seeds the union, so the result encloses every input exactly, with
    /// no added slack.
    pub fn aabb_bounding_all(aabbs: &[Self]) -> Option<Self> {
        let (first, rest) = aabbs.split_first()?;
        Some(
            rest.iter()
                .fold(first.clone(), |bounding, aabb| {
                    Self::aabb_from_pair(&bounding, aabb)
                }),
        )
    }

    /// Returns a reference to the lower corner of the box.
    pub fn lower_corner(&self) -> &Point3<F> {
        &self.corners[0]
    }

    /// Returns a reference to the upper corner of the box.
    pub fn upper_corner(&self) -> &Point3<F> {
        &self.corners[1]
    }

    /// Calculates and returns the center point of the box.
    pub fn center(&self) -> Point3<F> {
        na::center(self.lower_corner(), self.upper_corner())
    }

    /// Calculates and returns the half extents of the box along the three
    /// axes.
    pub fn half_extents(&self) -> Vector3<F> {
        (self.upper_corner() - self.lower_corner()) * F::ONE_HALF
    }

    /// Returns the box corner with the given index. The corners are ordered
    /// from smaller to larger coordinates, with the z-component varying
    /// fastest.
    ///
    /// # Panics
    /// If the given index exceeds 7.
    pub fn corner(&self, corner_idx: usize) -> Point3<F> {
        let corner_components = &ALL_CORNER_COMPONENTS[corner_idx];
        point![
            self.corners[corner_components[0] as usize].x,
            self.corners[corner_components[1] as usize].y,
            self.corners[corner_components[2] as usize].z
        ]
    }

    /// Whether the given point is inside this box. A point exactly on a face
    /// of the box is considered inside.
    pub fn contains_point(&self, point: &Point3<F>) -> bool {
        (0..3).all(|dim| {
            point[dim] >= self.lower_corner()[dim] && point[dim] <= self.upper_corner()[dim]
        })
    }

    /// Computes the corner of the box that is farthest from the given point.
    pub fn compute_farthest_corner(&self, point: &Point3<F>) -> Point3<F> {
        let mut farthest_corner = Point3::origin();
        for dim in 0..3 {
            if (self.lower_corner()[dim] - point[dim]).abs()
                > (self.upper_corner()[dim] - point[dim]).abs()
            {
                farthest_corner[dim] = self.lower_corner()[dim];
            } else {
                farthest_corner[dim] = self.upper_corner()[dim];
            }
        }
        farthest_corner
    }
}
