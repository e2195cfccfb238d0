use std::fmt;

use num_traits::Float;

use crate::error::{check_shape, Error};
use crate::margin::{Measurement, Measurements};

/// Simultaneous voltmeter and ammeter readings, one per reference resistor
#[derive(Clone, Debug, PartialEq)]
pub struct MeterReadings<E> {
    pub(crate) voltage: Measurements<E>,
    pub(crate) current: Measurements<E>,
}

impl<E: Float> MeterReadings<E> {
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if there are not as many current readings as voltage
    /// readings.
    pub fn new(voltage: Measurements<E>, current: Measurements<E>) -> Result<Self, Error> {
        check_shape(voltage.shape(), current.shape())?;
        Ok(Self { voltage, current })
    }

    pub const fn voltage(&self) -> &Measurements<E> {
        &self.voltage
    }

    pub const fn current(&self) -> &Measurements<E> {
        &self.current
    }
}

/// Readings from both circuit arrangements across a set of reference resistors
///
/// In the ammeter circuit the voltmeter spans the ammeter and the reference resistor, so the
/// apparent resistance $V / I$ carries the ammeter resistance in series. In the voltmeter circuit
/// the ammeter carries the current through the reference resistor and the voltmeter in parallel.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitReadings<E> {
    pub(crate) reference_resistance: Measurements<E>,
    pub(crate) ammeter_circuit: MeterReadings<E>,
    pub(crate) voltmeter_circuit: MeterReadings<E>,
}

impl<E: Float> CircuitReadings<E> {
    /// # Errors
    /// - [`Error::InsufficientData`] if there are no reference resistors
    /// - [`Error::ShapeMismatch`] if either circuit has a different number of readings to the
    ///   number of reference resistors
    pub fn new(
        reference_resistance: Measurements<E>,
        ammeter_circuit: MeterReadings<E>,
        voltmeter_circuit: MeterReadings<E>,
    ) -> Result<Self, Error> {
        if reference_resistance.is_empty() {
            return Err(Error::InsufficientData {
                samples: 0,
                required: 1,
            });
        }
        check_shape(reference_resistance.shape(), ammeter_circuit.voltage.shape())?;
        check_shape(reference_resistance.shape(), voltmeter_circuit.voltage.shape())?;
        Ok(Self {
            reference_resistance,
            ammeter_circuit,
            voltmeter_circuit,
        })
    }

    pub const fn reference_resistance(&self) -> &Measurements<E> {
        &self.reference_resistance
    }

    /// Ammeter resistance determined against each reference resistor
    ///
    /// $$
    ///     R_A = \frac{V}{I} - R
    /// $$
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperand`] if any voltage or current reading is zero.
    pub fn ammeter_resistance(&self) -> Result<Measurements<E>, Error> {
        let apparent = self
            .ammeter_circuit
            .voltage
            .quotient(&self.ammeter_circuit.current)?;
        apparent.difference(&self.reference_resistance)
    }

    /// Voltmeter resistance determined against each reference resistor
    ///
    /// $$
    ///     R_V = \frac{V R}{I R - V}
    /// $$
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperand`] if any reading is zero, or if the current through the
    /// voltmeter $I - V / R$ vanishes.
    pub fn voltmeter_resistance(&self) -> Result<Measurements<E>, Error> {
        let readings = &self.voltmeter_circuit;
        let numerator = readings.voltage.product(&self.reference_resistance)?;
        let denominator = readings
            .current
            .product(&self.reference_resistance)?
            .difference(&readings.voltage)?;
        numerator.quotient(&denominator)
    }
}

/// Per-reading meter resistances and their average
#[derive(Clone, Debug, PartialEq)]
pub struct MeterResistance<E> {
    pub(crate) readings: Measurements<E>,
    pub(crate) average: Measurement<E>,
}

impl<E: Float> MeterResistance<E> {
    /// # Errors
    /// Returns [`Error::InsufficientData`] if `readings` is empty.
    pub fn summarise(readings: Measurements<E>) -> Result<Self, Error> {
        let average = readings.mean().ok_or(Error::InsufficientData {
            samples: 0,
            required: 1,
        })?;
        Ok(Self { readings, average })
    }

    pub const fn readings(&self) -> &Measurements<E> {
        &self.readings
    }

    /// Mean resistance with the mean of the per-reading uncertainties
    pub const fn average(&self) -> Measurement<E> {
        self.average
    }
}

impl<E: Float + fmt::Display> fmt::Display for MeterResistance<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ii, reading) in self.readings.iter().enumerate() {
            writeln!(f, "  [{ii}] {reading:.3} Ω")?;
        }
        write!(f, "  average {:.1} Ω", self.average)
    }
}

/// Remove the loading of a meter of resistance `meter` in parallel with the resistor under test
///
/// `apparent` is the resistance inferred from a voltage-current sweep, typically a fitted slope.
///
/// $$
///     R = \frac{m R_{meter}}{R_{meter} - m}
/// $$
///
/// # Errors
/// Returns [`Error::InvalidOperand`] if either resistance is zero or they are equal.
pub fn unload<E: Float>(
    apparent: &Measurement<E>,
    meter: &Measurement<E>,
) -> Result<Measurement<E>, Error> {
    let product = apparent.product(meter)?;
    let difference = meter.difference(apparent);
    product.quotient(&difference)
}
