//! Generic floating point abstraction.

use nalgebra as na;
use num_traits as nt;

/// Floating point type usable for all geometric quantities in this crate.
///
/// Bundles the numeric traits the fitting math relies on together with the
/// literal constants that crop up in matrix construction, so generic code
/// never has to go through fallible conversions for them.
pub trait Float: Copy + nt::FloatConst + nt::FromPrimitive + na::RealField + na::Scalar {
    const ZERO: Self;
    const ONE_HALF: Self;
    const ONE: Self;
    const TWO: Self;
}

macro_rules! impl_float {
    ($f:ty) => {
        impl Float for $f {
            const ZERO: Self = 0.0;
            const ONE_HALF: Self = 0.5;
            const ONE: Self = 1.0;
            const TWO: Self = 2.0;
        }
    };
}

impl_float!(f32);
impl_float!(f64);
