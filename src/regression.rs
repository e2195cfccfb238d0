//! Straight line least squares fitting and chi-squared goodness of fit
//!
//! The line $y = m x + b$ is fitted by ordinary least squares. The per-sample uncertainties in
//! $y$ do not weight the estimate, they enter only the chi-squared statistic
//!
//! $$
//!     \chi^2 = \sum_i \left(\frac{y_i - (b + m x_i)}{\delta y_i}\right)^2
//! $$
use std::fmt;

use itertools::izip;
use ndarray::Array1;
use num_traits::Float;

use crate::distributions::{ChiSquaredCdf, PValue, RegularizedGamma};
use crate::error::{check_shape, Error};
use crate::margin::Measurement;
use crate::math::{cast, dot, mean, sum};

/// The number of parameters in a straight line
const LINE_PARAMETERS: usize = 2;

/// Chi-squared statistic of a set of samples against a model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoodnessOfFit<E> {
    pub(crate) chi_squared: E,
    pub(crate) reduced_chi_squared: E,
    pub(crate) p_value: PValue<E>,
    pub(crate) degrees_of_freedom: usize,
}

impl<E: Copy> GoodnessOfFit<E> {
    pub const fn chi_squared(&self) -> E {
        self.chi_squared
    }

    /// Chi-squared per degree of freedom, near unity when the uncertainties describe the scatter
    pub const fn reduced_chi_squared(&self) -> E {
        self.reduced_chi_squared
    }

    pub const fn p_value(&self) -> PValue<E> {
        self.p_value
    }

    pub const fn degrees_of_freedom(&self) -> usize {
        self.degrees_of_freedom
    }
}

fn goodness_of_fit<E: Float, C: ChiSquaredCdf<E>>(
    chi_squared: E,
    degrees_of_freedom: usize,
    cdf: &C,
) -> GoodnessOfFit<E> {
    GoodnessOfFit {
        chi_squared,
        reduced_chi_squared: chi_squared / cast(degrees_of_freedom),
        p_value: cdf.upper_tail(chi_squared, degrees_of_freedom),
        degrees_of_freedom,
    }
}

fn check_positive_uncertainties<E: Float>(uncertainties: &[E]) -> Result<(), Error> {
    let invalid = uncertainties
        .iter()
        .position(|&uncertainty| uncertainty.is_nan() || uncertainty <= E::zero());
    match invalid {
        Some(position) => Err(Error::InvalidUncertainty {
            position,
            reason: "uncertainty weights a chi-squared term and must be positive",
        }),
        None => Ok(()),
    }
}

fn sum_of_squared_pulls<E: Float>(observed: &[E], expected: &[E], uncertainties: &[E]) -> E {
    izip!(observed, expected, uncertainties)
        .map(|(&o, &e, &sigma)| ((o - e) / sigma).powi(2))
        .fold(E::zero(), |acc, pull| acc + pull)
}

/// Interpretation of a reduced chi-squared value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitQuality {
    /// The scatter about the line agrees with the stated uncertainties
    Consistent,
    /// Larger scatter than the uncertainties allow, either the model is poor or the
    /// uncertainties are too small
    PoorFitOrUnderestimatedUncertainty,
    /// Smaller scatter than the uncertainties allow, the uncertainties are too large
    OverestimatedUncertainty,
}

impl FitQuality {
    /// A fit is consistent when $|\chi^2_\nu - 1| < 0.5$
    pub fn assess<E: Float>(reduced_chi_squared: E) -> Self {
        let tolerance: E = cast(0.5);
        if (reduced_chi_squared - E::one()).abs() < tolerance {
            Self::Consistent
        } else if reduced_chi_squared > E::one() {
            Self::PoorFitOrUnderestimatedUncertainty
        } else {
            Self::OverestimatedUncertainty
        }
    }
}

impl fmt::Display for FitQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consistent => write!(f, "good fit: reduced chi-squared ≈ 1"),
            Self::PoorFitOrUnderestimatedUncertainty => {
                write!(f, "poor fit or underestimated uncertainties")
            }
            Self::OverestimatedUncertainty => {
                write!(f, "overestimated uncertainties or overfitting")
            }
        }
    }
}

/// The best fit line with its statistics
#[derive(Clone, Debug, PartialEq)]
pub struct FitResult<E> {
    pub(crate) slope: E,
    pub(crate) intercept: E,
    pub(crate) slope_stderr: E,
    pub(crate) intercept_stderr: E,
    /// Standard error of the fit, $\sqrt{\sum r_i^2 / (N - 2)}$
    pub(crate) y_variance: E,
    pub(crate) coefficient_of_determination: Option<E>,
    pub(crate) residuals: Array1<E>,
    pub(crate) goodness_of_fit: GoodnessOfFit<E>,
}

impl<E: Float> FitResult<E> {
    /// Slope with its standard error
    pub const fn slope(&self) -> Measurement<E> {
        Measurement {
            value: self.slope,
            uncertainty: self.slope_stderr,
        }
    }

    /// Intercept with its standard error
    pub const fn intercept(&self) -> Measurement<E> {
        Measurement {
            value: self.intercept,
            uncertainty: self.intercept_stderr,
        }
    }

    pub const fn y_variance(&self) -> E {
        self.y_variance
    }

    /// $R^2$, present when it was requested and the samples in $y$ are not all equal
    pub const fn coefficient_of_determination(&self) -> Option<E> {
        self.coefficient_of_determination
    }

    /// $y_i - (b + m x_i)$ for each sample, in input order
    pub const fn residuals(&self) -> &Array1<E> {
        &self.residuals
    }

    pub const fn goodness_of_fit(&self) -> &GoodnessOfFit<E> {
        &self.goodness_of_fit
    }

    pub const fn chi_squared(&self) -> E {
        self.goodness_of_fit.chi_squared
    }

    pub const fn reduced_chi_squared(&self) -> E {
        self.goodness_of_fit.reduced_chi_squared
    }

    pub const fn p_value(&self) -> PValue<E> {
        self.goodness_of_fit.p_value
    }

    /// $N - 2$
    pub const fn degrees_of_freedom(&self) -> usize {
        self.goodness_of_fit.degrees_of_freedom
    }

    pub fn quality(&self) -> FitQuality {
        FitQuality::assess(self.goodness_of_fit.reduced_chi_squared)
    }

    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: E) -> E {
        self.intercept + self.slope * x
    }
}

impl<E: Float + fmt::Display> fmt::Display for FitResult<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slope: {:.3}", self.slope())?;
        writeln!(f, "Intercept: {:.3}", self.intercept())?;
        if let Some(r_squared) = self.coefficient_of_determination {
            writeln!(f, "R²: {r_squared:.4}")?;
        }
        writeln!(f, "Chi-squared: {:.3}", self.chi_squared())?;
        writeln!(f, "Reduced chi-squared: {:.3}", self.reduced_chi_squared())?;
        match self.p_value() {
            PValue::Exact(p) => writeln!(f, "p-value: {p:.4}")?,
            PValue::Approximate(p) => writeln!(f, "p-value: {p:.4} (approximate)")?,
        }
        write!(f, "{}", self.quality())
    }
}

/// Configurable straight line fitter
///
/// By default the coefficient of determination is computed and p-values come from the exact
/// chi-squared distribution.
#[derive(Clone, Copy, Debug)]
pub struct LineFitter<C = RegularizedGamma> {
    coefficient_of_determination: bool,
    cdf: C,
}

impl Default for LineFitter<RegularizedGamma> {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFitter<RegularizedGamma> {
    pub const fn new() -> Self {
        Self {
            coefficient_of_determination: true,
            cdf: RegularizedGamma,
        }
    }
}

impl<C> LineFitter<C> {
    #[must_use]
    pub fn with_coefficient_of_determination(mut self, compute: bool) -> Self {
        self.coefficient_of_determination = compute;
        self
    }

    /// Replace the chi-squared distribution used for p-values
    pub fn with_cdf<D>(self, cdf: D) -> LineFitter<D> {
        LineFitter {
            coefficient_of_determination: self.coefficient_of_determination,
            cdf,
        }
    }

    /// Fit $y = m x + b$ to the samples
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`Error::ShapeMismatch`] if `x`, `y` and `y_uncertainty` differ in length
    /// - [`Error::InsufficientData`] for fewer than three samples, as the fit has no degrees of
    ///   freedom left
    /// - [`Error::InvalidUncertainty`] if any `y_uncertainty` is not positive
    /// - [`Error::DegenerateFit`] if the `x` values have no spread
    pub fn fit<E: Float>(
        &self,
        x: &[E],
        y: &[E],
        y_uncertainty: &[E],
    ) -> Result<FitResult<E>, Error>
    where
        C: ChiSquaredCdf<E>,
    {
        check_shape(&[x.len()], &[y.len()])?;
        check_shape(&[x.len()], &[y_uncertainty.len()])?;
        if x.len() <= LINE_PARAMETERS {
            return Err(Error::InsufficientData {
                samples: x.len(),
                required: LINE_PARAMETERS + 1,
            });
        }
        check_positive_uncertainties(y_uncertainty)?;

        let n: E = cast(x.len());
        let sum_x = sum(x);
        let sum_y = sum(y);
        let sum_x2 = dot(x, x);
        let sum_xy = dot(x, y);

        let delta = n * sum_x2 - sum_x * sum_x;
        // Equal x values only cancel to within the rounding of the sums
        if delta.is_nan() || delta.abs() <= n * E::epsilon() * n * sum_x2 {
            return Err(Error::DegenerateFit);
        }

        let slope = (n * sum_xy - sum_x * sum_y) / delta;
        let intercept = (sum_y - slope * sum_x) / n;

        let predicted = x
            .iter()
            .map(|&xi| intercept + slope * xi)
            .collect::<Vec<_>>();
        let residuals = y
            .iter()
            .zip(&predicted)
            .map(|(&yi, &pi)| yi - pi)
            .collect::<Array1<_>>();
        let residual_sum_of_squares = residuals
            .iter()
            .fold(E::zero(), |acc, &residual| acc + residual * residual);

        let degrees_of_freedom = x.len() - LINE_PARAMETERS;
        let y_variance = (residual_sum_of_squares / cast(degrees_of_freedom)).sqrt();
        let slope_stderr = (y_variance.powi(2) * n / delta).sqrt();
        let intercept_stderr = (y_variance.powi(2) * sum_x2 / delta).sqrt();

        let coefficient_of_determination = if self.coefficient_of_determination {
            let y_mean = mean(y);
            let total_sum_of_squares = y
                .iter()
                .fold(E::zero(), |acc, &yi| acc + (yi - y_mean).powi(2));
            (!total_sum_of_squares.is_zero())
                .then(|| E::one() - residual_sum_of_squares / total_sum_of_squares)
        } else {
            None
        };

        let chi_squared = sum_of_squared_pulls(y, &predicted, y_uncertainty);

        Ok(FitResult {
            slope,
            intercept,
            slope_stderr,
            intercept_stderr,
            y_variance,
            coefficient_of_determination,
            residuals,
            goodness_of_fit: goodness_of_fit(chi_squared, degrees_of_freedom, &self.cdf),
        })
    }

    /// [`chi_squared_goodness_of_fit`] using this fitter's distribution
    ///
    /// # Errors
    /// As [`chi_squared_goodness_of_fit`].
    pub fn goodness_of_fit<E: Float>(
        &self,
        observed: &[E],
        expected: &[E],
        uncertainties: &[E],
    ) -> Result<GoodnessOfFit<E>, Error>
    where
        C: ChiSquaredCdf<E>,
    {
        check_shape(&[observed.len()], &[expected.len()])?;
        check_shape(&[observed.len()], &[uncertainties.len()])?;
        if observed.len() < 2 {
            return Err(Error::InsufficientData {
                samples: observed.len(),
                required: 2,
            });
        }
        check_positive_uncertainties(uncertainties)?;

        let chi_squared = sum_of_squared_pulls(observed, expected, uncertainties);
        // One constraint only. Callers comparing against fitted models must account for the
        // fitted parameters themselves.
        let degrees_of_freedom = observed.len() - 1;

        Ok(goodness_of_fit(chi_squared, degrees_of_freedom, &self.cdf))
    }
}

/// Fit $y = m x + b$ with the default [`LineFitter`]
///
/// # Errors
/// See [`LineFitter::fit`].
pub fn fit_line<E: Float>(x: &[E], y: &[E], y_uncertainty: &[E]) -> Result<FitResult<E>, Error> {
    LineFitter::new().fit(x, y, y_uncertainty)
}

/// Chi-squared test of `observed` against `expected`, weighted by the uncertainties of the
/// observations
///
/// The degrees of freedom are the number of samples less one.
///
/// # Errors
/// - [`Error::ShapeMismatch`] if the three slices differ in length
/// - [`Error::InsufficientData`] for fewer than two samples
/// - [`Error::InvalidUncertainty`] if any uncertainty is not positive
pub fn chi_squared_goodness_of_fit<E: Float>(
    observed: &[E],
    expected: &[E],
    uncertainties: &[E],
) -> Result<GoodnessOfFit<E>, Error> {
    LineFitter::new().goodness_of_fit(observed, expected, uncertainties)
}

#[cfg(test)]
mod tests {
    use ndarray_rand::rand::{Rng, SeedableRng};
    use ndarray_rand::rand_distr::{Distribution, Normal};
    use proptest::prelude::*;
    use rand_isaac::Isaac64Rng;

    use crate::distributions::{ExponentialTail, PValue};
    use crate::error::Error;

    use super::{chi_squared_goodness_of_fit, fit_line, FitQuality, LineFitter};

    const X: [f64; 5] = [1., 2., 3., 4., 5.];

    #[test]
    fn perfectly_linear_data_is_fitted_exactly() -> Result<(), Error> {
        let y = [2., 4., 6., 8., 10.];
        let dy = [0.1; 5];

        let fit = fit_line(&X, &y, &dy)?;

        approx::assert_relative_eq!(fit.slope().value(), 2.0, max_relative = 1e-12);
        approx::assert_abs_diff_eq!(fit.intercept().value(), 0.0, epsilon = 1e-12);
        for residual in fit.residuals() {
            approx::assert_abs_diff_eq!(*residual, 0.0, epsilon = 1e-12);
        }
        approx::assert_abs_diff_eq!(fit.chi_squared(), 0.0, epsilon = 1e-20);
        approx::assert_abs_diff_eq!(fit.reduced_chi_squared(), 0.0, epsilon = 1e-20);
        approx::assert_relative_eq!(fit.coefficient_of_determination().unwrap(), 1.0);
        Ok(())
    }

    #[test]
    fn noisy_data_matches_hand_computed_statistics() -> Result<(), Error> {
        let y = [2.1, 3.9, 6.2, 8.1, 9.8];
        let dy = [0.2; 5];

        let fit = fit_line(&X, &y, &dy)?;

        approx::assert_relative_eq!(fit.slope().value(), 1.96, max_relative = 1e-10);
        approx::assert_relative_eq!(fit.intercept().value(), 0.14, max_relative = 1e-10);
        approx::assert_relative_eq!(
            fit.slope().uncertainty(),
            0.055_377_492_419_453_93,
            max_relative = 1e-10
        );
        approx::assert_relative_eq!(
            fit.intercept().uncertainty(),
            0.183_666_364_186_079_15,
            max_relative = 1e-10
        );
        approx::assert_relative_eq!(
            fit.y_variance(),
            0.175_119_007_154_182_94,
            max_relative = 1e-10
        );
        approx::assert_relative_eq!(
            fit.coefficient_of_determination().unwrap(),
            0.997_610_886_049_652,
            max_relative = 1e-10
        );
        approx::assert_relative_eq!(fit.chi_squared(), 2.3, max_relative = 1e-10);
        approx::assert_relative_eq!(fit.reduced_chi_squared(), 2.3 / 3., max_relative = 1e-10);
        approx::assert_relative_eq!(
            fit.p_value().value(),
            0.512_520_906_977_144_1,
            max_relative = 1e-8
        );
        assert_eq!(fit.degrees_of_freedom(), 3);
        assert_eq!(fit.quality(), FitQuality::Consistent);

        let expected_residuals = [0.0, -0.16, 0.18, 0.12, -0.14];
        for (expected, calculated) in expected_residuals.iter().zip(fit.residuals()) {
            approx::assert_abs_diff_eq!(expected, calculated, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn two_samples_are_insufficient() {
        let result = fit_line(&[1., 2.], &[1., 2.], &[0.1, 0.1]);
        assert_eq!(
            result,
            Err(Error::InsufficientData {
                samples: 2,
                required: 3
            })
        );
    }

    #[test]
    fn equal_x_values_are_degenerate() {
        let result = fit_line(&[0.1; 4], &[1., 2., 3., 4.], &[0.1; 4]);
        assert_eq!(result, Err(Error::DegenerateFit));

        let result = fit_line(&[3.; 3], &[1., 2., 3.], &[0.1; 3]);
        assert_eq!(result, Err(Error::DegenerateFit));
    }

    #[test]
    fn zero_y_uncertainty_is_rejected() {
        let result = fit_line(&X, &[1., 2., 3., 4., 5.], &[0.1, 0.1, 0.0, 0.1, 0.1]);
        assert!(matches!(
            result,
            Err(Error::InvalidUncertainty { position: 2, .. })
        ));
    }

    #[test]
    fn negative_and_nan_y_uncertainties_are_rejected() {
        let result = fit_line(&[1., 2., 3.], &[1., 2., 3.], &[-0.1; 3]);
        assert!(matches!(
            result,
            Err(Error::InvalidUncertainty { position: 0, .. })
        ));

        let uncertainties = [0.1, f64::NAN, 0.1];
        let result = chi_squared_goodness_of_fit(&[1., 2., 3.], &[1., 2., 3.], &uncertainties);
        assert!(matches!(
            result,
            Err(Error::InvalidUncertainty { position: 1, .. })
        ));
    }

    #[test]
    fn fitted_line_reproduces_samples_with_residuals() -> Result<(), Error> {
        let y = [2.1, 3.9, 6.2, 8.1, 9.8];
        let fit = fit_line(&X, &y, &[0.2; 5])?;

        for ((&x, &y), &residual) in X.iter().zip(&y).zip(fit.residuals()) {
            approx::assert_relative_eq!(fit.predict(x) + residual, y, max_relative = 1e-12);
        }
        approx::assert_relative_eq!(fit.predict(0.0), fit.intercept().value());
        approx::assert_relative_eq!(fit.predict(10.0), 19.74, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = fit_line(&X, &[1., 2., 3., 4.], &[0.1; 5]);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
        let result = fit_line(&X, &[1., 2., 3., 4., 5.], &[0.1; 4]);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn coefficient_of_determination_can_be_omitted() -> Result<(), Error> {
        let fit = LineFitter::new()
            .with_coefficient_of_determination(false)
            .fit(&X, &[2.1, 3.9, 6.2, 8.1, 9.8], &[0.2; 5])?;
        assert!(fit.coefficient_of_determination().is_none());
        Ok(())
    }

    #[test]
    fn constant_y_has_no_coefficient_of_determination() -> Result<(), Error> {
        let fit = fit_line(&X, &[3.; 5], &[0.2; 5])?;
        assert!(fit.coefficient_of_determination().is_none());
        approx::assert_abs_diff_eq!(fit.slope().value(), 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn approximate_distribution_is_flagged() -> Result<(), Error> {
        let fit = LineFitter::new()
            .with_cdf(ExponentialTail)
            .fit(&X, &[2.1, 3.9, 6.2, 8.1, 9.8], &[0.2; 5])?;
        assert!(fit.p_value().is_approximate());
        approx::assert_relative_eq!(
            fit.p_value().value(),
            (-1.15_f64).exp(),
            max_relative = 1e-10
        );
        Ok(())
    }

    #[test]
    fn fitting_is_deterministic() -> Result<(), Error> {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let num_samples = rng.gen_range(3..64);
        let x = (0..num_samples).map(|_| rng.gen::<f64>()).collect::<Vec<_>>();
        let y = (0..num_samples).map(|_| rng.gen::<f64>()).collect::<Vec<_>>();
        let dy = vec![0.05; num_samples];

        assert_eq!(fit_line(&x, &y, &dy)?, fit_line(&x, &y, &dy)?);
        Ok(())
    }

    #[test]
    fn noisy_lines_recover_their_parameters() -> Result<(), Error> {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let slope = rng.gen_range(-5.0..5.0);
        let intercept = rng.gen_range(-5.0..5.0);
        let noise = Normal::new(0.0, 1e-3).unwrap();
        let num_samples = 200;

        let x = (0..num_samples).map(f64::from).collect::<Vec<_>>();
        let y = x
            .iter()
            .map(|x| intercept + slope * x + noise.sample(&mut rng))
            .collect::<Vec<_>>();
        let dy = vec![1e-3; x.len()];

        let fit = fit_line(&x, &y, &dy)?;

        assert!((fit.slope().value() - slope).abs() < 5. * fit.slope().uncertainty());
        assert!((fit.intercept().value() - intercept).abs() < 5. * fit.intercept().uncertainty());
        assert_eq!(fit.degrees_of_freedom(), 198);
        Ok(())
    }

    #[test]
    fn identical_observations_have_unit_p_value() -> Result<(), Error> {
        let observed = [1.2, 3.4, 5.6, 7.8];

        let result = chi_squared_goodness_of_fit(&observed, &observed, &[0.1; 4])?;

        assert_eq!(result.chi_squared(), 0.0);
        assert_eq!(result.p_value(), PValue::Exact(1.0));
        assert_eq!(result.degrees_of_freedom(), 3);

        let result = LineFitter::new()
            .with_cdf(ExponentialTail)
            .goodness_of_fit(&observed, &observed, &[0.1; 4])?;
        assert_eq!(result.p_value(), PValue::Approximate(1.0));
        Ok(())
    }

    #[test]
    fn goodness_of_fit_uses_one_constraint() -> Result<(), Error> {
        let observed = [2.1, 3.9, 6.2, 8.1, 9.8];
        let expected = [2.1, 4.06, 6.02, 7.98, 9.94];

        let result = chi_squared_goodness_of_fit(&observed, &expected, &[0.2; 5])?;

        assert_eq!(result.degrees_of_freedom(), 4);
        approx::assert_relative_eq!(result.chi_squared(), 2.3, max_relative = 1e-10);
        approx::assert_relative_eq!(result.reduced_chi_squared(), 2.3 / 4., max_relative = 1e-10);
        Ok(())
    }

    #[test]
    fn goodness_of_fit_validates_inputs() {
        assert!(matches!(
            chi_squared_goodness_of_fit(&[1., 2.], &[1., 2., 3.], &[0.1; 2]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            chi_squared_goodness_of_fit(&[1., 2.], &[1., 2.], &[0.1, 0.0]),
            Err(Error::InvalidUncertainty { position: 1, .. })
        ));
        assert_eq!(
            chi_squared_goodness_of_fit(&[1.], &[1.], &[0.1]),
            Err(Error::InsufficientData {
                samples: 1,
                required: 2
            })
        );
    }

    #[test]
    fn fit_quality_bands() {
        assert_eq!(FitQuality::assess(1.2), FitQuality::Consistent);
        assert_eq!(
            FitQuality::assess(3.0),
            FitQuality::PoorFitOrUnderestimatedUncertainty
        );
        assert_eq!(FitQuality::assess(0.1), FitQuality::OverestimatedUncertainty);
    }

    #[test]
    fn summary_flags_approximate_p_values() -> Result<(), Error> {
        let fit = LineFitter::new()
            .with_cdf(ExponentialTail)
            .fit(&X, &[2.1, 3.9, 6.2, 8.1, 9.8], &[0.2; 5])?;

        let summary = fit.to_string();

        assert!(summary.contains("Slope: 1.960 ± 0.055"));
        assert!(summary.contains("Intercept: 0.140 ± 0.184"));
        assert!(summary.contains("(approximate)"));
        Ok(())
    }

    proptest! {
        #[test]
        // Residuals of a least squares line always sum to zero
        fn residuals_sum_to_zero(
            y in prop::collection::vec(-100.0..100.0f64, 5),
        ) {
            let fit = fit_line(&X, &y, &[1.0; 5]).unwrap();
            let total: f64 = fit.residuals().sum();
            prop_assert!(total.abs() < 1e-9);
        }
    }
}
