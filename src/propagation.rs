//! Propagation of independent measurement uncertainties through elementary operations
//!
//! Both rules combine contributions in quadrature. For a product or quotient
//! $z = x^{\pm 1} y^{\pm 1} w^{\pm 1}$ the relative uncertainties combine
//!
//! $$
//!     \delta z = |z| \sqrt{\left(\frac{\delta x}{x}\right)^2 + \left(\frac{\delta y}{y}\right)^2
//!     + \left(\frac{\delta w}{w}\right)^2}
//! $$
//!
//! while for a sum or difference $z = x \pm y \pm w$ the absolute uncertainties combine
//!
//! $$
//!     \delta z = \sqrt{\delta x^2 + \delta y^2 + \delta w^2}
//! $$
//!
//! Operands which take no part in an operation are passed as neutral elements: unity with nil
//! uncertainty for products, nil uncertainty for sums.
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use num_traits::Float;

use crate::error::{check_shape, Error, Operand};
use crate::margin::{Measurement, Measurements};
use crate::math::root_sum_square;

fn relative_variance<E: Float>(
    value: E,
    uncertainty: E,
    operand: Operand,
    position: usize,
) -> Result<E, Error> {
    if value.is_zero() {
        return Err(Error::InvalidOperand { operand, position });
    }
    Ok((uncertainty / value).powi(2))
}

fn scale<E: Float>(rx: E, ry: E, rw: E, z: E) -> E {
    (rx + ry + rw).sqrt() * z.abs()
}

/// Uncertainty of `z`, a product or quotient of `x`, `y` and `w`
///
/// `z` is the already computed result and only scales the combined relative uncertainty. Pass
/// [`Measurement::neutral`] for an operand the computation does not use.
///
/// # Errors
/// Returns [`Error::InvalidOperand`] if any operand value is zero, as its relative uncertainty is
/// undefined.
pub fn product_or_quotient<E: Float>(
    x: &Measurement<E>,
    y: &Measurement<E>,
    w: &Measurement<E>,
    z: E,
) -> Result<E, Error> {
    let rx = relative_variance(x.value, x.uncertainty, Operand::X, 0)?;
    let ry = relative_variance(y.value, y.uncertainty, Operand::Y, 0)?;
    let rw = relative_variance(w.value, w.uncertainty, Operand::W, 0)?;
    Ok(scale(rx, ry, rw, z))
}

/// Uncertainty of a sum or difference of three quantities with absolute uncertainties `dx`, `dy`
/// and `dw`
///
/// The sign of each term in the operation does not enter. Pass zero for unused operands.
pub fn sum_or_difference<E: Float>(dx: E, dy: E, dw: E) -> E {
    root_sum_square(&[dx, dy, dw])
}

fn relative_variances<E: Float, D: Dimension>(
    operand: &Measurements<E, D>,
    label: Operand,
) -> Result<Array<E, D>, Error> {
    let mut variances = Array::zeros(operand.values.raw_dim());
    for (position, ((variance, &value), &uncertainty)) in variances
        .iter_mut()
        .zip(operand.values.iter())
        .zip(operand.uncertainties.iter())
        .enumerate()
    {
        *variance = relative_variance(value, uncertainty, label, position)?;
    }
    Ok(variances)
}

/// Element-wise [`product_or_quotient`]
///
/// Every position is computed exactly as the scalar rule would compute it. Use
/// [`Measurements::neutral`] for an unused operand.
///
/// # Errors
/// - [`Error::ShapeMismatch`] if the operands and `z` do not share one shape
/// - [`Error::InvalidOperand`] if any operand value is zero, reporting the first offending
///   position in logical order
pub fn product_or_quotient_elementwise<E, S, D>(
    x: &Measurements<E, D>,
    y: &Measurements<E, D>,
    w: &Measurements<E, D>,
    z: &ArrayBase<S, D>,
) -> Result<Array<E, D>, Error>
where
    E: Float,
    S: Data<Elem = E>,
    D: Dimension,
{
    check_shape(x.shape(), y.shape())?;
    check_shape(x.shape(), w.shape())?;
    check_shape(x.shape(), z.shape())?;

    let rx = relative_variances(x, Operand::X)?;
    let ry = relative_variances(y, Operand::Y)?;
    let rw = relative_variances(w, Operand::W)?;

    Ok(Zip::from(&rx)
        .and(&ry)
        .and(&rw)
        .and(z)
        .map_collect(|&rx, &ry, &rw, &z| scale(rx, ry, rw, z)))
}

/// Element-wise [`sum_or_difference`]
///
/// # Errors
/// Returns [`Error::ShapeMismatch`] if the three arrays do not share one shape.
pub fn sum_or_difference_elementwise<E, S, D>(
    dx: &ArrayBase<S, D>,
    dy: &ArrayBase<S, D>,
    dw: &ArrayBase<S, D>,
) -> Result<Array<E, D>, Error>
where
    E: Float,
    S: Data<Elem = E>,
    D: Dimension,
{
    check_shape(dx.shape(), dy.shape())?;
    check_shape(dx.shape(), dw.shape())?;

    Ok(Zip::from(dx)
        .and(dy)
        .and(dw)
        .map_collect(|&dx, &dy, &dw| sum_or_difference(dx, dy, dw)))
}
