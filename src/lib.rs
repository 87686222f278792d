//! Light-space frustum fitting and shadow transforms for focused shadow
//! maps.
//!
//! Given a directional light's orientation and the world-space bounds of a
//! tracked set of shadow casters, this crate computes a view matrix and a
//! symmetric orthographic projection that tightly frame the casters, the
//! composed world-to-shadow-map transform used for comparison sampling, and
//! the bias and sampling constants a renderer binds alongside the shadow
//! map. Everything is a pure function of its inputs, recomputed per frame;
//! rendering the depth map itself is the host's job.

mod axis_aligned_box;
mod caster;
mod fitting;
mod light_frame;
mod num;
mod pass;
mod projection;
mod sampling;
mod sphere;
mod transform;

pub use axis_aligned_box::AxisAlignedBox;
pub use caster::{CasterBoundsProvider, ShadowCaster};
pub use fitting::{FrustumFitConfig, FrustumFitError, ShadowFrustum};
pub use light_frame::LightFrame;
pub use num::Float;
pub use pass::{ShadowPassConfig, ShadowPassResources, prepare_shadow_pass};
pub use projection::OrthographicProjection;
pub use sampling::{SOFT_SHADOW_KERNEL_RADIUS, ShadowBias, ShadowMapSampling};
pub use sphere::Sphere;
pub use transform::{DepthConvention, ShadowTransform};
