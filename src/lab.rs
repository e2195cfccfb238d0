use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use ndarray::Array1;
use num_traits::{Float, One};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::circuit::{unload, CircuitReadings, MeterReadings, MeterResistance};
use crate::margin::{Measurement, Measurements};
use crate::math::cast;
use crate::regression::{fit_line, FitQuality, FitResult};
use crate::Result;

const CONFIG_FILE: &str = "lab.toml";
const CIRCUITS_FILE: &str = "circuits.csv";
const SWEEPS_DIRECTORY: &str = "sweeps";

/// Which meter loads the resistor under test in a sweep
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Correction {
    Voltmeter,
    Ammeter,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct SweepConfig {
    pub correction: Option<Correction>,
}

fn unity<E: One>() -> E {
    E::one()
}

#[derive(Deserialize, Serialize)]
#[serde(bound(deserialize = "E: Deserialize<'de> + One"))]
pub struct LabConfig<E> {
    /// Multiplies every current column, `1e-3` when currents are tabulated in milliampere
    #[serde(default = "unity")]
    pub current_scale: E,
    #[serde(default)]
    pub sweeps: HashMap<String, SweepConfig>,
}

/// Build a lab from a working directory
///
/// The directory holds `lab.toml`, the circuit readings in `circuits.csv` and one csv file per
/// voltage-current sweep under `sweeps/`.
///
/// # Errors
/// Returns an error if a file is missing or malformed, if the readings are inconsistent, or if
/// `lab.toml` configures a sweep with no data.
pub fn build<E: Float + DeserializeOwned>(working_directory: &Path) -> Result<Lab<E>> {
    let config_file = working_directory.join(CONFIG_FILE);
    println!("reading {config_file:?}");
    let config = fs::read_to_string(&config_file)?;
    let config: LabConfig<E> = toml::from_str(&config)?;

    let mut builder: LabBuilder<E, Unset> = LabBuilder::new(config.current_scale);

    let sweeps_directory = working_directory.join(SWEEPS_DIRECTORY);
    if sweeps_directory.is_dir() {
        let mut sweep_file_paths = fs::read_dir(&sweeps_directory)?
            .map(|dir_entry| dir_entry.map(|dir_entry| dir_entry.path()))
            .collect::<::std::result::Result<Vec<_>, _>>()?;
        sweep_file_paths.retain(|path| path.extension().map_or(false, |ext| ext == "csv"));
        sweep_file_paths.sort();

        for sweep_file_path in sweep_file_paths {
            println!("reading {sweep_file_path:?}");
            let mut sweep = Sweep::from_file(&sweep_file_path)?;
            sweep.correction = config
                .sweeps
                .get(&sweep.name)
                .and_then(|sweep_config| sweep_config.correction);
            builder = builder.with_sweep(sweep);
        }
    }

    for name in config.sweeps.keys() {
        if !builder.sweeps.iter().any(|sweep| &sweep.name == name) {
            return Err(format!("sweep {name} is configured in {CONFIG_FILE} without data").into());
        }
    }

    let circuits_file = working_directory.join(CIRCUITS_FILE);
    println!("reading {circuits_file:?}");
    let readings = read_circuits(&circuits_file, config.current_scale)?;

    Ok(builder.with_circuits(readings).build())
}

#[derive(Deserialize)]
struct CircuitRow<E>(E, E, E, E, E, E, E, E, E, E);

#[derive(Deserialize)]
struct SweepRow<E>(E, E, E);

fn read_rows<R: DeserializeOwned>(filepath: &Path) -> Result<Vec<R>> {
    if !filepath.exists() {
        return Err(format!("requested file {filepath:?} not found").into());
    }
    let file = fs::read(filepath)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(&file[..]);

    let mut rows = vec![];
    for result in rdr.deserialize() {
        let record: R = result?;
        rows.push(record);
    }
    Ok(rows)
}

fn measurements<E: Float>(
    values: Vec<E>,
    uncertainties: Vec<E>,
    scale: E,
) -> Result<Measurements<E>> {
    let values = Array1::from(values).mapv(|value| value * scale);
    let uncertainties = Array1::from(uncertainties).mapv(|value| value * scale.abs());
    Ok(Measurements::new(values, uncertainties)?)
}

fn read_circuits<E: Float + DeserializeOwned>(
    filepath: &Path,
    current_scale: E,
) -> Result<CircuitReadings<E>> {
    let rows: Vec<CircuitRow<E>> = read_rows(filepath)?;

    let column = |select: fn(&CircuitRow<E>) -> E| rows.iter().map(select).collect::<Vec<_>>();
    let one = E::one();

    let reference = measurements(column(|row| row.0), column(|row| row.1), one)?;
    let ammeter_circuit = MeterReadings::new(
        measurements(column(|row| row.2), column(|row| row.3), one)?,
        measurements(column(|row| row.4), column(|row| row.5), current_scale)?,
    )?;
    let voltmeter_circuit = MeterReadings::new(
        measurements(column(|row| row.6), column(|row| row.7), one)?,
        measurements(column(|row| row.8), column(|row| row.9), current_scale)?,
    )?;

    Ok(CircuitReadings::new(
        reference,
        ammeter_circuit,
        voltmeter_circuit,
    )?)
}

/// A voltage-current sweep across one resistor under test
#[derive(Clone, Debug, PartialEq)]
pub struct Sweep<E> {
    pub(crate) name: String,
    pub(crate) current: Vec<E>,
    pub(crate) voltage: Vec<E>,
    pub(crate) voltage_uncertainty: Vec<E>,
    pub(crate) correction: Option<Correction>,
}

impl<E: Float> Sweep<E> {
    pub const fn new(
        name: String,
        current: Vec<E>,
        voltage: Vec<E>,
        voltage_uncertainty: Vec<E>,
    ) -> Self {
        Self {
            name,
            current,
            voltage,
            voltage_uncertainty,
            correction: None,
        }
    }

    #[must_use]
    pub fn with_correction(mut self, correction: Correction) -> Self {
        self.correction = Some(correction);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn scaled(mut self, current_scale: E) -> Self {
        for current in &mut self.current {
            *current = *current * current_scale;
        }
        self
    }

    /// Fit voltage against current, the slope is the apparent resistance
    ///
    /// # Errors
    /// Returns the fitting error if the sweep cannot be fitted.
    pub fn fit(&self) -> Result<FitResult<E>> {
        Ok(fit_line(
            &self.current,
            &self.voltage,
            &self.voltage_uncertainty,
        )?)
    }
}

impl<E: Float + DeserializeOwned> Sweep<E> {
    /// Create a `Sweep` from an on-disk representation, named after the file stem
    fn from_file(filepath: &Path) -> Result<Self> {
        let name = filepath
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or("sweep file name is not valid unicode")?
            .to_owned();

        let rows: Vec<SweepRow<E>> = read_rows(filepath)?;

        let mut current = vec![];
        let mut voltage = vec![];
        let mut voltage_uncertainty = vec![];
        for row in rows {
            current.push(row.0);
            voltage.push(row.1);
            voltage_uncertainty.push(row.2);
        }

        Ok(Self::new(name, current, voltage, voltage_uncertainty))
    }
}

pub enum Set {}
pub enum Unset {}

/// Assembles a [`Lab`], which cannot be built until circuit readings are supplied
pub struct LabBuilder<E, N> {
    current_scale: E,
    readings: Option<CircuitReadings<E>>,
    sweeps: Vec<Sweep<E>>,
    phantom_data: PhantomData<N>,
}

impl<E: Float, N> LabBuilder<E, N> {
    /// Add a sweep, its currents are multiplied by the builder's current scale
    #[must_use]
    pub fn with_sweep(mut self, sweep: Sweep<E>) -> Self {
        self.sweeps.push(sweep.scaled(self.current_scale));
        self
    }
}

impl<E: Float> LabBuilder<E, Unset> {
    pub const fn new(current_scale: E) -> Self {
        Self {
            current_scale,
            readings: None,
            sweeps: vec![],
            phantom_data: PhantomData,
        }
    }

    /// Supply readings which are already in base units
    pub fn with_circuits(self, readings: CircuitReadings<E>) -> LabBuilder<E, Set> {
        LabBuilder {
            current_scale: self.current_scale,
            readings: Some(readings),
            sweeps: self.sweeps,
            phantom_data: PhantomData,
        }
    }
}

impl<E: Float> LabBuilder<E, Set> {
    /// # Panics
    /// Never, the `Set` state is only reachable through [`LabBuilder::with_circuits`].
    pub fn build(self) -> Lab<E> {
        Lab {
            readings: self
                .readings
                .expect("circuit readings are always present in the `Set` state"),
            sweeps: self.sweeps,
        }
    }
}

/// Readings and sweeps for one lab session
pub struct Lab<E> {
    readings: CircuitReadings<E>,
    sweeps: Vec<Sweep<E>>,
}

impl<E: Float> Lab<E> {
    pub const fn readings(&self) -> &CircuitReadings<E> {
        &self.readings
    }

    pub fn sweeps(&self) -> &[Sweep<E>] {
        &self.sweeps
    }

    /// Determine the meter resistances, fit every sweep and correct the fitted resistances for
    /// meter loading where configured
    ///
    /// # Errors
    /// Returns the first propagation or fitting error encountered.
    pub fn analyse(&self) -> Result<LabReport<E>> {
        let ammeter = MeterResistance::summarise(self.readings.ammeter_resistance()?)?;
        let voltmeter = MeterResistance::summarise(self.readings.voltmeter_resistance()?)?;

        let sweeps = self
            .sweeps
            .iter()
            .map(|sweep| -> Result<SweepReport<E>> {
                let fit = sweep.fit()?;
                let corrected = match sweep.correction {
                    Some(Correction::Voltmeter) => {
                        Some(unload(&fit.slope(), &voltmeter.average())?)
                    }
                    Some(Correction::Ammeter) => Some(unload(&fit.slope(), &ammeter.average())?),
                    None => None,
                };
                Ok(SweepReport {
                    name: sweep.name.clone(),
                    fit,
                    corrected,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LabReport {
            ammeter,
            voltmeter,
            sweeps,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepReport<E> {
    pub(crate) name: String,
    pub(crate) fit: FitResult<E>,
    pub(crate) corrected: Option<Measurement<E>>,
}

impl<E: Float> SweepReport<E> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn fit(&self) -> &FitResult<E> {
        &self.fit
    }

    pub fn quality(&self) -> FitQuality {
        self.fit.quality()
    }

    /// Resistance after removing meter loading, when a correction is configured
    pub const fn corrected(&self) -> Option<Measurement<E>> {
        self.corrected
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabReport<E> {
    pub(crate) ammeter: MeterResistance<E>,
    pub(crate) voltmeter: MeterResistance<E>,
    pub(crate) sweeps: Vec<SweepReport<E>>,
}

impl<E: Float> LabReport<E> {
    pub const fn ammeter(&self) -> &MeterResistance<E> {
        &self.ammeter
    }

    pub const fn voltmeter(&self) -> &MeterResistance<E> {
        &self.voltmeter
    }

    pub fn sweeps(&self) -> &[SweepReport<E>] {
        &self.sweeps
    }

    pub fn sweep(&self, name: &str) -> Option<&SweepReport<E>> {
        self.sweeps.iter().find(|sweep| sweep.name == name)
    }
}

impl<E: Float + fmt::Display> fmt::Display for LabReport<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ammeter resistance R_A:")?;
        writeln!(f, "{}", self.ammeter)?;
        writeln!(f, "Voltmeter resistance R_V:")?;
        writeln!(f, "{}", self.voltmeter)?;
        for sweep in &self.sweeps {
            writeln!(f)?;
            writeln!(f, "Sweep {}:", sweep.name)?;
            writeln!(f, "{}", sweep.fit)?;
            if let Some(corrected) = sweep.corrected {
                let percentage = corrected.relative_uncertainty() * cast::<_, E>(100.0);
                writeln!(f, "Corrected resistance: {corrected:.3} Ω ({percentage:.2} %)")?;
            }
        }
        Ok(())
    }
}
