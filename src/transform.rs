//! World-to-shadow-map transforms.

use crate::{num::Float, projection::OrthographicProjection};
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3};

/// The depth convention of the render target the shadow map is sampled
/// against. With `Reversed`, the near plane maps to depth 1 and the far
/// plane to 0, which improves depth precision on floating point depth
/// buffers. The convention is a property of the host's render target setup
/// and is supplied by the caller, never derived here.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DepthConvention {
    /// Depth grows from 0 at the near plane to 1 at the far plane.
    #[default]
    Forward,
    /// Depth shrinks from 1 at the near plane to 0 at the far plane.
    Reversed,
}

/// The composed transform mapping a world-space position into shadow-map
/// sampling coordinates: texture u and v in [0, 1] and a comparison depth in
/// [0, 1].
///
/// Computed once per frame when shadows are active and consumed read-only by
/// the rendering step, typically uploaded directly as a shader uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadowTransform<F: Float> {
    matrix: Matrix4<F>,
}

impl<F: Float> ShadowTransform<F> {
    /// Composes the shadow transform from the given projection and view
    /// matrix: the clip cube spanning -1 to 1 along every axis is remapped
    /// to the unit cube, after negating the projection's depth row when the
    /// target uses reversed depth.
    pub fn for_view_projection(
        projection: &OrthographicProjection<F>,
        view: &Matrix4<F>,
        depth_convention: DepthConvention,
    ) -> Self {
        let mut projection_matrix = *projection.matrix();

        if depth_convention == DepthConvention::Reversed {
            for col in 0..4 {
                projection_matrix[(2, col)] = -projection_matrix[(2, col)];
            }
        }

        Self {
            matrix: Self::clip_to_texture_matrix() * projection_matrix * view,
        }
    }

    /// Returns a reference to the transform matrix.
    pub fn matrix(&self) -> &Matrix4<F> {
        &self.matrix
    }

    /// Maps the given world-space point to shadow-map UV + depth
    /// coordinates.
    pub fn map_point(&self, point: &Point3<F>) -> Point3<F> {
        self.matrix.transform_point(point)
    }

    /// The remap from the clip cube spanning -1 to 1 to the unit cube used
    /// for texture sampling.
    fn clip_to_texture_matrix() -> Matrix4<F> {
        let half = F::ONE_HALF;
        Matrix4::new(
            half,
            F::ZERO,
            F::ZERO,
            half,
            F::ZERO,
            half,
            F::ZERO,
            half,
            F::ZERO,
            F::ZERO,
            half,
            half,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ONE,
        )
    }
}

unsafe impl<F: Float> Zeroable for ShadowTransform<F> {}
unsafe impl<F: Float + Pod> Pod for ShadowTransform<F> {}
