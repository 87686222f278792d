//! Fitting a shadow frustum to a set of casters.

use crate::{
    axis_aligned_box::AxisAlignedBox,
    light_frame::LightFrame,
    num::Float,
    projection::OrthographicProjection,
    sphere::Sphere,
    transform::{DepthConvention, ShadowTransform},
};
use anyhow::bail;
use nalgebra::{Matrix4, UnitQuaternion};
use std::{error::Error, fmt};

/// Configuration options for fitting a shadow frustum to a bounding volume.
///
/// The default factors are empirical; in particular the pull-back factor is
/// not the mathematically minimal offset keeping the volume in front of the
/// near plane, but a slightly generous one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct FrustumFitConfig<F: Float> {
    /// Distance the virtual light position is pulled back from the bounding
    /// volume center, as a multiple of the volume radius.
    pub pull_back_factor: F,
    /// Near plane distance as a multiple of the volume radius.
    pub near_factor: F,
    /// Far plane distance as a multiple of the volume radius.
    pub far_factor: F,
    /// Radius the bounding volume is clamped up to before fitting. With a
    /// zero floor, a degenerate (zero-radius) volume fails the fit instead.
    pub min_radius: F,
}

/// Reason a shadow frustum could not be fitted for the current frame. Both
/// conditions are expected steady-state outcomes that mean the shadow pass
/// should simply be skipped this frame and retried fresh the next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrustumFitError {
    /// There are no caster bounds to frame, so no shadows are needed.
    NoCoverage,
    /// The bounding volume has zero radius, which would collapse the
    /// near/far range into a non-invertible projection.
    DegenerateVolume,
}

/// A light-space frustum framing a set of shadow casters: the world-to-light
/// view matrix and the orthographic projection sized to the casters'
/// bounding volume.
///
/// The view matrix places the bounding volume center on the viewing axis at
/// a depth of `pull_back_factor` times the volume radius, with depth
/// increasing away from the light. An immutable value recomputed from the
/// current light orientation and caster set every frame.
#[derive(Clone, Debug)]
pub struct ShadowFrustum<F: Float> {
    view: Matrix4<F>,
    projection: OrthographicProjection<F>,
    bounding_sphere: Sphere<F>,
}

impl<F: Float> Default for FrustumFitConfig<F> {
    fn default() -> Self {
        Self {
            pull_back_factor: F::from_f64(1.2).unwrap(),
            near_factor: F::from_f64(0.1).unwrap(),
            far_factor: F::from_f64(2.3).unwrap(),
            min_radius: F::ZERO,
        }
    }
}

impl<F: Float> FrustumFitConfig<F> {
    /// Checks that the configured factors describe a valid frustum.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.pull_back_factor.is_finite()
            && self.near_factor.is_finite()
            && self.far_factor.is_finite()
            && self.min_radius.is_finite())
        {
            bail!("Non-finite shadow frustum fitting factor");
        }
        if self.near_factor <= F::ZERO {
            bail!("Shadow frustum near factor must be positive");
        }
        if self.far_factor <= self.near_factor {
            bail!("Shadow frustum far factor must exceed the near factor");
        }
        if self.min_radius < F::ZERO {
            bail!("Shadow frustum radius floor must be non-negative");
        }
        Ok(())
    }
}

impl fmt::Display for FrustumFitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCoverage => write!(f, "no caster bounds to fit a shadow frustum to"),
            Self::DegenerateVolume => {
                write!(f, "caster bounding volume has zero radius")
            }
        }
    }
}

impl Error for FrustumFitError {}

impl<F: Float> ShadowFrustum<F> {
    /// Fits a shadow frustum to the given world-space caster bounds for a
    /// directional light with the given world-space orientation.
    ///
    /// The caster bounds are merged into a single bounding volume, the
    /// projection is sized symmetrically to the volume radius with the
    /// configured near/far factors, and the view translation pulls the
    /// virtual light position back from the volume center so the whole
    /// volume lies in front of the near plane.
    ///
    /// # Errors
    /// Returns [`FrustumFitError::NoCoverage`] if `world_bounds` is empty
    /// and [`FrustumFitError::DegenerateVolume`] if the merged volume has
    /// zero radius and the configured radius floor is zero. Neither is
    /// fatal: the caller skips the shadow pass for the frame.
    pub fn fit(
        orientation: &UnitQuaternion<F>,
        world_bounds: &[AxisAlignedBox<F>],
        config: &FrustumFitConfig<F>,
    ) -> Result<Self, FrustumFitError> {
        let merged_bounds =
            AxisAlignedBox::aabb_bounding_all(world_bounds).ok_or(FrustumFitError::NoCoverage)?;

        let mut bounding_sphere = Sphere::bounding_sphere_for_box(&merged_bounds);
        if bounding_sphere.radius() < config.min_radius {
            bounding_sphere = Sphere::new(*bounding_sphere.center(), config.min_radius);
        }

        let radius = bounding_sphere.radius();
        if radius == F::ZERO {
            return Err(FrustumFitError::DegenerateVolume);
        }

        let frame = LightFrame::from_orientation(orientation);
        let view_rotation = frame.depth_view_rotation();

        let mut view_translation = -(view_rotation * bounding_sphere.center().coords);
        view_translation.z -= config.pull_back_factor * radius;

        let mut view = Matrix4::identity();
        view.fixed_view_mut::<3, 3>(0, 0).copy_from(&view_rotation);
        view.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&view_translation);

        let projection = OrthographicProjection::symmetric(
            radius,
            config.near_factor * radius,
            config.far_factor * radius,
        );

        Ok(Self {
            view,
            projection,
            bounding_sphere,
        })
    }

    /// Returns a reference to the world-to-light view matrix.
    pub fn view(&self) -> &Matrix4<F> {
        &self.view
    }

    /// Returns a reference to the orthographic projection.
    pub fn projection(&self) -> &OrthographicProjection<F> {
        &self.projection
    }

    /// Returns a reference to the merged bounding volume the frustum was
    /// fitted to.
    pub fn bounding_sphere(&self) -> &Sphere<F> {
        &self.bounding_sphere
    }

    /// Composes the world-to-shadow-map transform for this frustum under the
    /// given depth convention.
    pub fn shadow_transform(&self, depth_convention: DepthConvention) -> ShadowTransform<F> {
        ShadowTransform::for_view_projection(&self.projection, &self.view, depth_convention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{UnitVector3, point, vector};
    use proptest::prelude::*;

    fn unit_box_at_origin() -> AxisAlignedBox<f64> {
        AxisAlignedBox::new(point![-1.0, -1.0, -1.0], point![1.0, 1.0, 1.0])
    }

    #[test]
    fn fitting_with_empty_bounds_signals_no_coverage() {
        let result = ShadowFrustum::<f64>::fit(
            &UnitQuaternion::identity(),
            &[],
            &FrustumFitConfig::default(),
        );
        assert_eq!(result.unwrap_err(), FrustumFitError::NoCoverage);
    }

    #[test]
    fn fitting_zero_size_bounds_signals_degenerate_volume() {
        let point_box = AxisAlignedBox::new(point![1.0, 2.0, 3.0], point![1.0, 2.0, 3.0]);
        let result = ShadowFrustum::fit(
            &UnitQuaternion::identity(),
            &[point_box],
            &FrustumFitConfig::default(),
        );
        assert_eq!(result.unwrap_err(), FrustumFitError::DegenerateVolume);
    }

    #[test]
    fn radius_floor_rescues_degenerate_volume() {
        let point_box = AxisAlignedBox::new(point![1.0, 2.0, 3.0], point![1.0, 2.0, 3.0]);
        let config = FrustumFitConfig {
            min_radius: 0.5,
            ..FrustumFitConfig::default()
        };
        let frustum =
            ShadowFrustum::fit(&UnitQuaternion::identity(), &[point_box], &config).unwrap();
        assert_abs_diff_eq!(frustum.bounding_sphere().radius(), 0.5);
        assert_abs_diff_eq!(frustum.projection().right(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn fitting_unit_box_with_identity_orientation_matches_expected_planes() {
        let frustum = ShadowFrustum::fit(
            &UnitQuaternion::identity(),
            &[unit_box_at_origin()],
            &FrustumFitConfig::default(),
        )
        .unwrap();

        let radius = f64::sqrt(3.0);
        assert_abs_diff_eq!(frustum.bounding_sphere().radius(), radius);
        assert_abs_diff_eq!(frustum.projection().left(), -radius, epsilon = 1e-9);
        assert_abs_diff_eq!(frustum.projection().right(), radius, epsilon = 1e-9);
        assert_abs_diff_eq!(frustum.projection().bottom(), -radius, epsilon = 1e-9);
        assert_abs_diff_eq!(frustum.projection().top(), radius, epsilon = 1e-9);
        assert_abs_diff_eq!(frustum.projection().near(), 0.1 * radius, epsilon = 1e-9);
        assert_abs_diff_eq!(frustum.projection().far(), 2.3 * radius, epsilon = 1e-7);
    }

    #[test]
    fn volume_center_sits_at_pull_back_depth_on_the_view_axis() {
        let orientation = UnitQuaternion::from_axis_angle(
            &UnitVector3::new_normalize(vector![1.0, 1.0, 0.0]),
            1.1,
        );
        let aabb = AxisAlignedBox::from_center_and_half_extents(
            point![5.0, -3.0, 2.0],
            vector![1.0, 2.0, 0.5],
        );
        let frustum =
            ShadowFrustum::fit(&orientation, &[aabb], &FrustumFitConfig::default()).unwrap();

        let radius = frustum.bounding_sphere().radius();
        let center_in_view = frustum
            .view()
            .transform_point(frustum.bounding_sphere().center());

        assert_abs_diff_eq!(center_in_view.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center_in_view.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center_in_view.z, -1.2 * radius, epsilon = 1e-9);
    }

    #[test]
    fn default_config_validates() {
        FrustumFitConfig::<f64>::default().validate().unwrap();
    }

    #[test]
    fn config_with_inverted_depth_factors_fails_validation() {
        let config = FrustumFitConfig::<f64> {
            near_factor: 2.3,
            far_factor: 0.1,
            ..FrustumFitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_with_negative_radius_floor_fails_validation() {
        let config = FrustumFitConfig::<f64> {
            min_radius: -1.0,
            ..FrustumFitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    prop_compose! {
        fn orientation_strategy()(
            axis_phi in 0.0..std::f64::consts::TAU,
            axis_theta in 0.0..std::f64::consts::PI,
            angle in -std::f64::consts::PI..std::f64::consts::PI,
        ) -> UnitQuaternion<f64> {
            let axis = UnitVector3::new_normalize(vector![
                axis_phi.cos() * axis_theta.sin(),
                axis_phi.sin() * axis_theta.sin(),
                axis_theta.cos()
            ]);
            UnitQuaternion::from_axis_angle(&axis, angle)
        }
    }

    prop_compose! {
        fn aabb_strategy()(
            center_x in -100.0..100.0,
            center_y in -100.0..100.0,
            center_z in -100.0..100.0,
            half_extent_x in 0.01..10.0,
            half_extent_y in 0.01..10.0,
            half_extent_z in 0.01..10.0,
        ) -> AxisAlignedBox<f64> {
            AxisAlignedBox::from_center_and_half_extents(
                point![center_x, center_y, center_z],
                vector![half_extent_x, half_extent_y, half_extent_z],
            )
        }
    }

    proptest! {
        #[test]
        fn merged_volume_contains_every_input_box(
            aabbs in prop::collection::vec(aabb_strategy(), 1..8),
        ) {
            let frustum = ShadowFrustum::fit(
                &UnitQuaternion::identity(),
                &aabbs,
                &FrustumFitConfig::default(),
            )
            .unwrap();
            for aabb in &aabbs {
                prop_assert!(frustum.bounding_sphere().encloses_box(aabb));
            }
        }

        #[test]
        fn every_caster_corner_projects_inside_the_clip_cube(
            orientation in orientation_strategy(),
            aabbs in prop::collection::vec(aabb_strategy(), 1..8),
        ) {
            let frustum =
                ShadowFrustum::fit(&orientation, &aabbs, &FrustumFitConfig::default()).unwrap();
            for aabb in &aabbs {
                for corner_idx in 0..8 {
                    let corner_in_view = frustum.view().transform_point(&aabb.corner(corner_idx));
                    let corner_in_clip = frustum.projection().transform_point(&corner_in_view);
                    for dim in 0..3 {
                        prop_assert!(corner_in_clip[dim].abs() <= 1.0 + 1e-9);
                    }
                }
            }
        }

        #[test]
        fn view_rotation_determinant_is_negative_one(orientation in orientation_strategy()) {
            let frustum = ShadowFrustum::fit(
                &orientation,
                &[unit_box_at_origin()],
                &FrustumFitConfig::default(),
            )
            .unwrap();
            let rotation = frustum.view().fixed_view::<3, 3>(0, 0).into_owned();
            prop_assert!((rotation.determinant() + 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn frustum_contains_volume_center_pulled_back_along_view_axis() {
        let frustum = ShadowFrustum::fit(
            &UnitQuaternion::identity(),
            &[unit_box_at_origin()],
            &FrustumFitConfig::default(),
        )
        .unwrap();

        let radius = frustum.bounding_sphere().radius();
        let near = frustum.projection().near();
        let far = frustum.projection().far();

        // The volume spans [0.2r, 2.2r] in view depth, strictly inside the
        // [0.1r, 2.3r] near/far range.
        assert!(near < 1.2 * radius - radius);
        assert!(far > 1.2 * radius + radius);
    }
}
