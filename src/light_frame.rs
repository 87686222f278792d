//! Light-space reference frames for directional lights.

use crate::num::Float;
use nalgebra::{Matrix3, UnitQuaternion, UnitVector3};

/// The orthonormal basis of a directional light's local coordinate system,
/// expressed in world space. The light shines along its forward axis.
///
/// The axes are re-extracted from the light's orientation on every
/// computation and re-normalized to guard against scale drift accumulated in
/// the orientation; nothing in the frame is persisted across frames.
#[derive(Clone, Debug)]
pub struct LightFrame<F: Float> {
    right: UnitVector3<F>,
    up: UnitVector3<F>,
    forward: UnitVector3<F>,
}

impl<F: Float> LightFrame<F> {
    /// Derives the light's basis from the given world-space orientation. The
    /// right, up and forward axes are the images of the world x-, y- and
    /// z-axes under the orientation.
    pub fn from_orientation(orientation: &UnitQuaternion<F>) -> Self {
        let rotation = orientation.to_rotation_matrix();
        let matrix = rotation.matrix();
        Self {
            right: UnitVector3::new_normalize(matrix.column(0).into_owned()),
            up: UnitVector3::new_normalize(matrix.column(1).into_owned()),
            forward: UnitVector3::new_normalize(matrix.column(2).into_owned()),
        }
    }

    /// Returns the light's right axis in world space.
    pub fn right(&self) -> &UnitVector3<F> {
        &self.right
    }

    /// Returns the light's up axis in world space.
    pub fn up(&self) -> &UnitVector3<F> {
        &self.up
    }

    /// Returns the light's forward axis (the direction it shines) in world
    /// space.
    pub fn forward(&self) -> &UnitVector3<F> {
        &self.forward
    }

    /// Returns the rotation taking world-space directions into the light's
    /// local coordinate system.
    pub fn world_to_light_rotation(&self) -> Matrix3<F> {
        Matrix3::from_rows(&[
            self.right.transpose(),
            self.up.transpose(),
            self.forward.transpose(),
        ])
    }

    /// Returns the world-to-light rotation with the forward axis negated, so
    /// that the light looks down the negative z-axis of the resulting space
    /// and depth increases with distance from the light.
    pub fn depth_view_rotation(&self) -> Matrix3<F> {
        Matrix3::from_rows(&[
            self.right.transpose(),
            self.up.transpose(),
            (-self.forward.into_inner()).transpose(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::{Vector3, vector};
    use proptest::prelude::*;

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

    fn assert_orthonormal(matrix: &Matrix3<f64>) {
        for i in 0..3 {
            assert_relative_eq!(matrix.row(i).norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(matrix.column(i).norm(), 1.0, epsilon = 1e-9);
            for j in (i + 1)..3 {
                assert_abs_diff_eq!(matrix.row(i).dot(&matrix.row(j)), 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn identity_orientation_yields_world_axes() {
        let frame = LightFrame::<f64>::from_orientation(&UnitQuaternion::identity());
        assert_abs_diff_eq!(frame.right().into_inner(), Vector3::x());
        assert_abs_diff_eq!(frame.up().into_inner(), Vector3::y());
        assert_abs_diff_eq!(frame.forward().into_inner(), Vector3::z());
    }

    #[test]
    fn depth_view_rotation_negates_forward_row() {
        let frame = LightFrame::from_orientation(&UnitQuaternion::from_axis_angle(
            &Vector3::y_axis(),
            0.7,
        ));
        let view_rotation = frame.depth_view_rotation();
        assert_abs_diff_eq!(
            view_rotation.row(2).transpose(),
            -frame.forward().into_inner(),
            epsilon = 1e-9
        );
    }

    proptest! {
        #[test]
        fn world_to_light_rotation_is_orthonormal(orientation in orientation_strategy()) {
            let frame = LightFrame::from_orientation(&orientation);
            assert_orthonormal(&frame.world_to_light_rotation());
        }

        #[test]
        fn depth_view_rotation_is_orthonormal(orientation in orientation_strategy()) {
            let frame = LightFrame::from_orientation(&orientation);
            assert_orthonormal(&frame.depth_view_rotation());
        }

        #[test]
        fn axes_are_mutually_orthogonal(orientation in orientation_strategy()) {
            let frame = LightFrame::from_orientation(&orientation);
            prop_assert!(frame.right().dot(frame.up()).abs() < 1e-9);
            prop_assert!(frame.right().dot(frame.forward()).abs() < 1e-9);
            prop_assert!(frame.up().dot(frame.forward()).abs() < 1e-9);
        }
    }
}
