//! Per-frame shadow pass preparation.

use crate::{
    caster::CasterBoundsProvider,
    fitting::{FrustumFitConfig, ShadowFrustum},
    num::Float,
    sampling::{ShadowBias, ShadowMapSampling},
    transform::{DepthConvention, ShadowTransform},
};
use anyhow::bail;
use nalgebra::UnitQuaternion;

/// Configuration options for the focused shadow pass.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct ShadowPassConfig<F: Float> {
    /// Whether the shadow pass is enabled at all.
    pub enabled: bool,
    /// The width of the shadow map in number of texels.
    pub shadow_map_width: u32,
    /// The height of the shadow map in number of texels.
    pub shadow_map_height: u32,
    /// Depth bias in multiples of the projected shadow-map texel size.
    pub depth_bias: F,
    /// Normal bias in multiples of the projected shadow-map texel size.
    pub normal_bias: F,
    /// Whether the biases account for a soft-shadow PCF kernel.
    pub soft_shadows: bool,
    /// How strongly sampled shadows darken the receiver, from 0 (no
    /// darkening) to 1.
    pub shadow_strength: F,
    /// The depth convention of the host's render target.
    pub depth_convention: DepthConvention,
    /// How the frustum is fitted to the caster bounds.
    pub fitting: FrustumFitConfig<F>,
}

/// Everything the host needs to render and sample the shadow map for one
/// frame: the fitted frustum to render depth through, the composed
/// world-to-shadow transform and the bias and sampling constants to bind.
#[derive(Clone, Debug)]
pub struct ShadowPassResources<F: Float> {
    /// The fitted light-space frustum.
    pub frustum: ShadowFrustum<F>,
    /// The world-to-shadow-map transform.
    pub shadow_transform: ShadowTransform<F>,
    /// The caster-side bias offsets.
    pub bias: ShadowBias<F>,
    /// The receiver-side sampling constants.
    pub sampling: ShadowMapSampling<F>,
}

impl<F: Float> Default for ShadowPassConfig<F> {
    fn default() -> Self {
        Self {
            enabled: true,
            shadow_map_width: 1024,
            shadow_map_height: 1024,
            depth_bias: F::ONE,
            normal_bias: F::ONE,
            soft_shadows: false,
            shadow_strength: F::ONE,
            depth_convention: DepthConvention::default(),
            fitting: FrustumFitConfig::default(),
        }
    }
}

impl<F: Float> ShadowPassConfig<F> {
    /// Checks that the configuration describes a valid shadow pass.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.shadow_map_width == 0 || self.shadow_map_height == 0 {
            bail!("Shadow map dimensions must be non-zero");
        }
        if !(self.depth_bias.is_finite() && self.normal_bias.is_finite()) {
            bail!("Non-finite shadow bias");
        }
        if self.shadow_strength < F::ZERO || self.shadow_strength > F::ONE {
            bail!("Shadow strength must lie between 0 and 1");
        }
        self.fitting.validate()
    }
}

/// Computes everything the shadow pass needs for the current frame, or
/// [`None`] if the pass should be skipped this frame (shadows disabled, no
/// active casters or a degenerate bounding volume).
///
/// This is a pure per-frame recomputation: nothing is cached across calls,
/// and a skipped frame is simply retried fresh the next frame with whatever
/// the caster set becomes.
pub fn prepare_shadow_pass<F: Float>(
    caster_bounds_provider: &(impl CasterBoundsProvider<F> + ?Sized),
    light_orientation: &UnitQuaternion<F>,
    config: &ShadowPassConfig<F>,
) -> Option<ShadowPassResources<F>> {
    if !config.enabled {
        return None;
    }

    let mut caster_bounds = Vec::new();
    caster_bounds_provider.collect_caster_bounds(&mut caster_bounds);

    let frustum = match ShadowFrustum::fit(light_orientation, &caster_bounds, &config.fitting) {
        Ok(frustum) => frustum,
        Err(reason) => {
            log::trace!("Skipping shadow pass this frame: {reason}");
            return None;
        }
    };

    let shadow_transform = frustum.shadow_transform(config.depth_convention);

    let bias = ShadowBias::for_directional_projection(
        frustum.projection(),
        config.shadow_map_width,
        config.depth_bias,
        config.normal_bias,
        config.soft_shadows,
    );

    let sampling = ShadowMapSampling::new(
        config.shadow_map_width,
        config.shadow_map_height,
        config.shadow_strength,
    );

    Some(ShadowPassResources {
        frustum,
        shadow_transform,
        bias,
        sampling,
    })
}
