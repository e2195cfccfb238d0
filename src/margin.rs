use std::fmt;

use ndarray::{Array, Dimension, Ix1, ShapeBuilder, Zip};
use num_traits::Float;

use crate::error::{check_shape, Error};
use crate::math::mean;
use crate::propagation::{
    product_or_quotient, product_or_quotient_elementwise, sum_or_difference,
    sum_or_difference_elementwise,
};

/// A measured value with its absolute uncertainty
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement<E> {
    pub(crate) value: E,
    pub(crate) uncertainty: E,
}

fn validate_uncertainty<E: Float>(uncertainty: E, position: usize) -> Result<(), Error> {
    if uncertainty.is_nan() || uncertainty.is_infinite() {
        return Err(Error::InvalidUncertainty {
            position,
            reason: "uncertainty must be finite",
        });
    }
    if uncertainty < E::zero() {
        return Err(Error::InvalidUncertainty {
            position,
            reason: "uncertainty must be non-negative",
        });
    }
    Ok(())
}

impl<E: Float> Measurement<E> {
    /// # Errors
    /// Returns [`Error::InvalidUncertainty`] if `uncertainty` is negative or not finite.
    pub fn new(value: E, uncertainty: E) -> Result<Self, Error> {
        validate_uncertainty(uncertainty, 0)?;
        Ok(Self { value, uncertainty })
    }

    /// A value known without error
    pub fn exact(value: E) -> Self {
        Self {
            value,
            uncertainty: E::zero(),
        }
    }

    /// The neutral operand of a product or quotient: unity, known exactly
    ///
    /// Its relative uncertainty is nil, so it drops out of the RMS combination.
    pub fn neutral() -> Self {
        Self::exact(E::one())
    }

    pub const fn value(&self) -> E {
        self.value
    }

    pub const fn uncertainty(&self) -> E {
        self.uncertainty
    }

    /// Uncertainty as a fraction of the value
    pub fn relative_uncertainty(&self) -> E {
        self.uncertainty / self.value.abs()
    }

    /// # Errors
    /// Returns [`Error::InvalidOperand`] if either factor is zero.
    pub fn product(&self, other: &Self) -> Result<Self, Error> {
        let value = self.value * other.value;
        let uncertainty = product_or_quotient(self, other, &Self::neutral(), value)?;
        Ok(Self { value, uncertainty })
    }

    /// # Errors
    /// Returns [`Error::InvalidOperand`] if either operand is zero.
    pub fn quotient(&self, divisor: &Self) -> Result<Self, Error> {
        let value = self.value / divisor.value;
        let uncertainty = product_or_quotient(self, divisor, &Self::neutral(), value)?;
        Ok(Self { value, uncertainty })
    }

    pub fn sum(&self, other: &Self) -> Self {
        Self {
            value: self.value + other.value,
            uncertainty: sum_or_difference(self.uncertainty, other.uncertainty, E::zero()),
        }
    }

    pub fn difference(&self, other: &Self) -> Self {
        Self {
            value: self.value - other.value,
            uncertainty: sum_or_difference(self.uncertainty, other.uncertainty, E::zero()),
        }
    }
}

impl<E: Float + fmt::Display> fmt::Display for Measurement<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(
                f,
                "{:.*} ± {:.*}",
                precision, self.value, precision, self.uncertainty
            )
        } else {
            write!(f, "{} ± {}", self.value, self.uncertainty)
        }
    }
}

/// Element-wise measurements: an array of values and an equal-shaped array of uncertainties
#[derive(Clone, Debug, PartialEq)]
pub struct Measurements<E, D: Dimension = Ix1> {
    pub(crate) values: Array<E, D>,
    pub(crate) uncertainties: Array<E, D>,
}

impl<E: Float, D: Dimension> Measurements<E, D> {
    /// # Errors
    /// - [`Error::ShapeMismatch`] if the arrays differ in shape
    /// - [`Error::InvalidUncertainty`] if any uncertainty is negative or not finite
    pub fn new(values: Array<E, D>, uncertainties: Array<E, D>) -> Result<Self, Error> {
        check_shape(values.shape(), uncertainties.shape())?;
        for (position, &uncertainty) in uncertainties.iter().enumerate() {
            validate_uncertainty(uncertainty, position)?;
        }
        Ok(Self {
            values,
            uncertainties,
        })
    }

    /// Values known without error
    pub fn exact(values: Array<E, D>) -> Self {
        let uncertainties = Array::zeros(values.raw_dim());
        Self {
            values,
            uncertainties,
        }
    }

    /// Ones with zero uncertainty, the element-wise neutral operand of a product or quotient
    pub fn neutral<Sh: ShapeBuilder<Dim = D>>(shape: Sh) -> Self {
        Self::exact(Array::ones(shape))
    }

    pub const fn values(&self) -> &Array<E, D> {
        &self.values
    }

    pub const fn uncertainties(&self) -> &Array<E, D> {
        &self.uncertainties
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Iterate the elements as scalar measurements in logical order
    pub fn iter(&self) -> impl Iterator<Item = Measurement<E>> + '_ {
        self.values
            .iter()
            .zip(self.uncertainties.iter())
            .map(|(&value, &uncertainty)| Measurement { value, uncertainty })
    }

    /// Average value and average uncertainty over all elements
    ///
    /// This is the summary reported for a set of repeated determinations. Returns `None` when
    /// there are no elements.
    pub fn mean(&self) -> Option<Measurement<E>> {
        if self.is_empty() {
            return None;
        }
        let values = self.values.iter().copied().collect::<Vec<_>>();
        let uncertainties = self.uncertainties.iter().copied().collect::<Vec<_>>();
        Some(Measurement {
            value: mean(&values),
            uncertainty: mean(&uncertainties),
        })
    }

    /// # Errors
    /// - [`Error::ShapeMismatch`] if the operands differ in shape
    /// - [`Error::InvalidOperand`] if any element of either operand is zero
    pub fn product(&self, other: &Self) -> Result<Self, Error> {
        check_shape(self.shape(), other.shape())?;
        let values = Zip::from(&self.values)
            .and(&other.values)
            .map_collect(|&a, &b| a * b);
        let uncertainties = product_or_quotient_elementwise(
            self,
            other,
            &Self::neutral(self.values.raw_dim()),
            &values,
        )?;
        Ok(Self {
            values,
            uncertainties,
        })
    }

    /// # Errors
    /// - [`Error::ShapeMismatch`] if the operands differ in shape
    /// - [`Error::InvalidOperand`] if any element of either operand is zero
    pub fn quotient(&self, divisor: &Self) -> Result<Self, Error> {
        check_shape(self.shape(), divisor.shape())?;
        let values = Zip::from(&self.values)
            .and(&divisor.values)
            .map_collect(|&a, &b| a / b);
        let uncertainties = product_or_quotient_elementwise(
            self,
            divisor,
            &Self::neutral(self.values.raw_dim()),
            &values,
        )?;
        Ok(Self {
            values,
            uncertainties,
        })
    }

    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if the operands differ in shape.
    pub fn sum(&self, other: &Self) -> Result<Self, Error> {
        self.combine_additive(other, |a, b| a + b)
    }

    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if the operands differ in shape.
    pub fn difference(&self, other: &Self) -> Result<Self, Error> {
        self.combine_additive(other, |a, b| a - b)
    }

    fn combine_additive(&self, other: &Self, op: impl Fn(E, E) -> E) -> Result<Self, Error> {
        check_shape(self.shape(), other.shape())?;
        let values = Zip::from(&self.values)
            .and(&other.values)
            .map_collect(|&a, &b| op(a, b));
        let uncertainties = sum_or_difference_elementwise(
            &self.uncertainties,
            &other.uncertainties,
            &Array::zeros(self.values.raw_dim()),
        )?;
        Ok(Self {
            values,
            uncertainties,
        })
    }
}

impl<E: Float> FromIterator<Measurement<E>> for Measurements<E, Ix1> {
    fn from_iter<I: IntoIterator<Item = Measurement<E>>>(iter: I) -> Self {
        let (values, uncertainties): (Vec<E>, Vec<E>) = iter
            .into_iter()
            .map(|measurement| (measurement.value, measurement.uncertainty))
            .unzip();
        Self {
            values: Array::from(values),
            uncertainties: Array::from(uncertainties),
        }
    }
}
