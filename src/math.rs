use num_traits::{Float, NumCast};

/// Convert a primitive number into the working float type
///
/// # Panics
///
/// Panics if `value` cannot be represented in `E`. Sample counts and the literal constants used in
/// this crate always fit in `f32` and `f64`, so this is not expected to occur.
pub(crate) fn cast<T: NumCast, E: Float>(value: T) -> E {
    num_traits::cast(value).expect("value must be representable in `E`")
}

pub(crate) fn sum<E: Float>(values: &[E]) -> E {
    values.iter().fold(E::zero(), |acc, &value| acc + value)
}

/// Compute the inner product of two equal-length slices
pub(crate) fn dot<E: Float>(u: &[E], v: &[E]) -> E {
    debug_assert_eq!(u.len(), v.len());
    u.iter()
        .zip(v)
        .fold(E::zero(), |acc, (&ui, &vi)| acc + ui * vi)
}

pub(crate) fn mean<E: Float>(values: &[E]) -> E {
    sum(values) / cast(values.len())
}

/// Root-sum-square of the terms, the combination rule for independent uncertainties
///
/// $$
///     \sqrt{\sum_i t_i^2}
/// $$
pub(crate) fn root_sum_square<E: Float>(terms: &[E]) -> E {
    terms
        .iter()
        .fold(E::zero(), |acc, &term| acc + term * term)
        .sqrt()
}
