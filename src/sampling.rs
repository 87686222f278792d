//! Shadow-map sampling and bias constants.

use crate::{num::Float, projection::OrthographicProjection};
use bytemuck::{Pod, Zeroable};
use nalgebra::{Vector4, vector};

/// Radius in texels of the PCF kernel the shadow biases are widened by when
/// soft shadows are enabled.
pub const SOFT_SHADOW_KERNEL_RADIUS: f64 = 2.5;

/// Depth and normal bias offsets applied when rendering into the shadow map,
/// expressed in light-space units.
///
/// Both are derived from the size of a shadow-map texel projected into light
/// space, so a wider frustum or a smaller shadow map yields proportionally
/// larger offsets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadowBias<F: Float> {
    /// Offset applied along the light direction.
    pub depth: F,
    /// Offset applied along the surface normal.
    pub normal: F,
}

/// The constants a renderer binds for comparison-sampling the shadow map:
/// the shadow-map size vector, the four half-texel sample offsets and the
/// shadow strength.
///
/// The layout matches a GPU uniform: the size is a multiple of 16 bytes and
/// the vector fields are aligned to 16-byte boundaries (for `f32`).
///
/// # Warning
/// The fields must not be reordered, as this ordering is expected by the
/// shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadowMapSampling<F: Float> {
    size: Vector4<F>,
    sample_offsets: [Vector4<F>; 4],
    strength: F,
    // Padding to make size multiple of 16-bytes
    _padding: [F; 3],
}

impl<F: Float> ShadowBias<F> {
    /// Computes the bias offsets for rendering into a shadow map with the
    /// given resolution through the given directional-light projection.
    ///
    /// The configured `depth_bias` and `normal_bias` are in multiples of the
    /// projected texel size and are negated, since the offsets push
    /// positions away from the light. With `soft_shadows`, both offsets are
    /// widened by the PCF kernel radius so the kernel's outermost taps stay
    /// bias-covered.
    pub fn for_directional_projection(
        projection: &OrthographicProjection<F>,
        shadow_map_resolution: u32,
        depth_bias: F,
        normal_bias: F,
        soft_shadows: bool,
    ) -> Self {
        let frustum_width = projection.right() - projection.left();
        let texel_size = frustum_width / F::from_u32(shadow_map_resolution).unwrap();

        let mut depth = -depth_bias * texel_size;
        let mut normal = -normal_bias * texel_size;

        if soft_shadows {
            let kernel_radius = F::from_f64(SOFT_SHADOW_KERNEL_RADIUS).unwrap();
            depth *= kernel_radius;
            normal *= kernel_radius;
        }

        Self { depth, normal }
    }
}

impl<F: Float> ShadowMapSampling<F> {
    /// Creates the sampling constants for a shadow map with the given texel
    /// dimensions and the given shadow strength.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn new(width: u32, height: u32, strength: F) -> Self {
        assert!(width > 0 && height > 0);

        let width = F::from_u32(width).unwrap();
        let height = F::from_u32(height).unwrap();

        let inverse_width = F::ONE / width;
        let inverse_height = F::ONE / height;
        let half_texel_u = F::ONE_HALF * inverse_width;
        let half_texel_v = F::ONE_HALF * inverse_height;

        Self {
            size: vector![inverse_width, inverse_height, width, height],
            sample_offsets: [
                vector![-half_texel_u, -half_texel_v, F::ZERO, F::ZERO],
                vector![half_texel_u, -half_texel_v, F::ZERO, F::ZERO],
                vector![-half_texel_u, half_texel_v, F::ZERO, F::ZERO],
                vector![half_texel_u, half_texel_v, F::ZERO, F::ZERO],
            ],
            strength,
            _padding: [F::ZERO; 3],
        }
    }

    /// Returns the shadow-map size vector: the reciprocal width and height
    /// followed by the width and height in texels.
    pub fn size(&self) -> &Vector4<F> {
        &self.size
    }

    /// Returns the four half-texel offsets used for neighboring comparison
    /// samples.
    pub fn sample_offsets(&self) -> &[Vector4<F>; 4] {
        &self.sample_offsets
    }

    /// Returns the shadow strength.
    pub fn strength(&self) -> F {
        self.strength
    }
}

unsafe impl<F: Float> Zeroable for ShadowMapSampling<F> {}
unsafe impl<F: Float + Pod> Pod for ShadowMapSampling<F> {}
