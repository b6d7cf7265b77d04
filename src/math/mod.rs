use num_traits::Zero;

macro_rules! num {
    ($numer:expr, $denom:expr) => {
        $crate::math::Num::new(
            $crate::math::NumComponent::from($numer),
            $crate::math::NumComponent::from($denom),
        )
    };
}

pub mod collection;
pub mod equation;
pub mod error;
pub mod exponent;
pub mod parsefmt;

pub type Num = num_rational::BigRational;
pub type NumComponent = num_bigint::BigInt;

pub use error::{Error, Result};

/// Builds `numer / denom` in lowest terms, or `None` if `denom` is zero.
pub fn ratio(numer: NumComponent, denom: NumComponent) -> Option<Num> {
    if denom.is_zero() {
        return None;
    }
    Some(Num::new(numer, denom))
}

#[test]
fn ratio_test() {
    assert_eq!(ratio(NumComponent::from(6), NumComponent::from(-4)), Some(num!(-3, 2)));
    assert_eq!(ratio(NumComponent::from(1), NumComponent::from(0)), None);
}
