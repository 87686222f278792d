//! Shadow casters and caster bounds providers.

use crate::{axis_aligned_box::AxisAlignedBox, num::Float};

/// A tracked object that may cast shadows: its current world-space bounds
/// and the flags deciding whether it participates in the shadow pass this
/// frame.
#[derive(Clone, Debug)]
pub struct ShadowCaster<F: Float> {
    /// The world-space bounds of the object.
    pub bounds: AxisAlignedBox<F>,
    /// Whether the object is currently active in the scene.
    pub enabled: bool,
    /// Whether the object is allowed to cast shadows.
    pub casts_shadows: bool,
}

/// A source of world-space bounds for the objects to fit the shadow frustum
/// to. The frustum calculation never depends on a specific scene-query
/// mechanism; the host injects whatever enumeration it uses.
pub trait CasterBoundsProvider<F: Float> {
    /// Appends the bounds of every object that should be framed by the
    /// shadow frustum this frame.
    fn collect_caster_bounds(&self, bounds: &mut Vec<AxisAlignedBox<F>>);
}

impl<F: Float> ShadowCaster<F> {
    /// Creates an enabled, shadow-casting caster with the given bounds.
    pub fn new(bounds: AxisAlignedBox<F>) -> Self {
        Self {
            bounds,
            enabled: true,
            casts_shadows: true,
        }
    }

    /// Whether the caster participates in the shadow pass.
    pub fn is_active(&self) -> bool {
        self.enabled && self.casts_shadows
    }
}

impl<F: Float> CasterBoundsProvider<F> for [ShadowCaster<F>] {
    fn collect_caster_bounds(&self, bounds: &mut Vec<AxisAlignedBox<F>>) {
        bounds.extend(
            self.iter()
                .filter(|caster| caster.is_active())
                .map(|caster| caster.bounds.clone()),
        );
    }
}

impl<F: Float> CasterBoundsProvider<F> for [AxisAlignedBox<F>] {
    fn collect_caster_bounds(&self, bounds: &mut Vec<AxisAlignedBox<F>>) {
        bounds.extend_from_slice(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::point;

    fn unit_box() -> AxisAlignedBox<f64> {
        AxisAlignedBox::new(point![0.0, 0.0, 0.0], point![1.0, 1.0, 1.0])
    }

    #[test]
    fn new_caster_is_active() {
        assert!(ShadowCaster::new(unit_box()).is_active());
    }

    #[test]
    fn disabled_and_non_casting_casters_are_filtered_out() {
        let casters = [
            ShadowCaster::new(unit_box()),
            ShadowCaster {
                enabled: false,
                ..ShadowCaster::new(unit_box())
            },
            ShadowCaster {
                casts_shadows: false,
                ..ShadowCaster::new(unit_box())
            },
        ];

        let mut bounds = Vec::new();
        casters.collect_caster_bounds(&mut bounds);
        assert_eq!(bounds.len(), 1);
    }

    #[test]
    fn bare_bounds_slice_provides_every_box() {
        let boxes = [unit_box(), unit_box()];
        let mut bounds = Vec::new();
        boxes.collect_caster_bounds(&mut bounds);
        assert_eq!(bounds.len(), 2);
    }
}
