//! Orthographic projection transformations.

use crate::num::Float;
use approx::assert_abs_diff_ne;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3};

/// An orthographic projection for a viewer looking down the negative z-axis,
/// mapping the view box spanned by the left/right, bottom/top and near/far
/// planes into the cube spanning from -1 to 1 along every axis in normalized
/// device coordinates.
///
/// The near and far plane distances are positive and measured along the
/// viewing direction, so a point at view-space depth `-near` maps to a
/// z-coordinate of -1 and a point at `-far` maps to 1: clip-space depth
/// increases with distance from the viewer. The remap from the clip cube to
/// shadow-map texture space is a separate concern handled by
/// [`ShadowTransform`](crate::ShadowTransform).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrthographicProjection<F: Float> {
    matrix: Matrix4<F>,
}

impl<F: Float> OrthographicProjection<F> {
    /// Creates a new orthographic projection with the given view box planes.
    ///
    /// # Panics
    /// If the extent of the view box along any axis is zero.
    pub fn new(left: F, right: F, bottom: F, top: F, near: F, far: F) -> Self {
        let mut projection = Self {
            matrix: Matrix4::identity(),
        };

        projection.set_left_and_right(left, right);
        projection.set_bottom_and_top(bottom, top);
        projection.set_near_and_far(near, far);

        projection
    }

    /// Creates a new orthographic projection symmetric about the viewing
    /// direction, spanning `[-half_extent, half_extent]` horizontally and
    /// vertically.
    ///
    /// # Panics
    /// If `half_extent` is zero or `near` equals `far`.
    pub fn symmetric(half_extent: F, near: F, far: F) -> Self {
        Self::new(-half_extent, half_extent, -half_extent, half_extent, near, far)
    }

    /// Returns a reference to the projection matrix.
    pub fn matrix(&self) -> &Matrix4<F> {
        &self.matrix
    }

    /// Returns the left plane coordinate of the view box.
    pub fn left(&self) -> F {
        -(F::ONE + self.matrix.m14) / self.matrix.m11
    }

    /// Returns the right plane coordinate of the view box.
    pub fn right(&self) -> F {
        (F::ONE - self.matrix.m14) / self.matrix.m11
    }

    /// Returns the bottom plane coordinate of the view box.
    pub fn bottom(&self) -> F {
        -(F::ONE + self.matrix.m24) / self.matrix.m22
    }

    /// Returns the top plane coordinate of the view box.
    pub fn top(&self) -> F {
        (F::ONE - self.matrix.m24) / self.matrix.m22
    }

    /// Returns the near plane distance of the view box.
    pub fn near(&self) -> F {
        (F::ONE + self.matrix.m34) / self.matrix.m33
    }

    /// Returns the far plane distance of the view box.
    pub fn far(&self) -> F {
        (self.matrix.m34 - F::ONE) / self.matrix.m33
    }

    /// Applies the projection to the given point.
    pub fn transform_point(&self, point: &Point3<F>) -> Point3<F> {
        Point3::new(
            self.matrix.m11 * point.x + self.matrix.m14,
            self.matrix.m22 * point.y + self.matrix.m24,
            self.matrix.m33 * point.z + self.matrix.m34,
        )
    }

    /// Sets the left and right plane coordinates of the view box.
    ///
    /// # Panics
    /// If `left` equals `right`.
    pub fn set_left_and_right(&mut self, left: F, right: F) {
        assert_abs_diff_ne!(left, right);
        self.matrix.m11 = F::TWO / (right - left);
        self.matrix.m14 = -(right + left) / (right - left);
    }

    /// Sets the bottom and top plane coordinates of the view box.
    ///
    /// # Panics
    /// If `bottom` equals `top`.
    pub fn set_bottom_and_top(&mut self, bottom: F, top: F) {
        assert_abs_diff_ne!(bottom, top);
        self.matrix.m22 = F::TWO / (top - bottom);
        self.matrix.m24 = -(top + bottom) / (top - bottom);
    }

    /// Sets the near and far plane distances of the view box.
    ///
    /// # Panics
    /// If `near` equals `far`.
    pub fn set_near_and_far(&mut self, near: F, far: F) {
        assert_abs_diff_ne!(near, far);
        self.matrix.m33 = -F::TWO / (far - near);
        self.matrix.m34 = -(far + near) / (far - near);
    }
}

unsafe impl<F: Float> Zeroable for OrthographicProjection<F> {}
unsafe impl<F: Float + Pod> Pod for OrthographicProjection<F> {}
