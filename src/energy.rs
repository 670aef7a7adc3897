//! Energy-based fatigue life prediction.
//!
//! A power-law plasticity curve `ε = σ/E + (σ/K)^n` is fitted to the tensile
//! constants, the plastic work per cycle (hysteresis energy) is integrated in
//! closed form, and a life-scaling constant is calibrated so that a known
//! strain amplitude reproduces a known life. Sweeping the stress amplitude then
//! yields a (strain amplitude, life) curve comparable to a strain-life curve.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, FatigueError, FatigueResult};
use crate::material::MaterialConstants;
use crate::solver::{arange, bisect_monotonic, linspace, scan_nearest, MAX_GRID_POINTS};

/// Plastic strain that defines the yield point (0.2 % offset).
pub const YIELD_PLASTIC_STRAIN: f64 = 0.002;

/// Width of the final bisection bracket on stress.
const STRESS_TOLERANCE: f64 = 1e-9;

/// How the stress-strain curve is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InversionMethod {
    /// Monotonic bisection on the search bracket.
    #[default]
    Bisection,
    /// Nearest point on a dense linear stress grid.
    Scan,
}

impl std::str::FromStr for InversionMethod {
    type Err = FatigueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bisection" => Ok(InversionMethod::Bisection),
            "scan" => Ok(InversionMethod::Scan),
            _ => Err(FatigueError::invalid_input("inversion", s, "must be bisection or scan")),
        }
    }
}

/// Calibration and sweep settings for the energy method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergySettings {
    /// Strain amplitude of the calibration test.
    pub calibration_strain: f64,
    /// Measured life (cycles) at [`Self::calibration_strain`].
    pub reference_life: f64,
    /// First stress amplitude of the sweep.
    pub stress_start: f64,
    /// Increment between swept stress amplitudes.
    pub stress_step: f64,
    /// Sweep stops before this stress amplitude.
    pub stress_end: f64,
    /// Lower bound of the stress search bracket.
    pub search_min: f64,
    /// Upper bound of the stress search bracket.
    pub search_max: f64,
    /// Grid size used by [`InversionMethod::Scan`].
    pub scan_points: usize,
    /// How strain is inverted to stress during calibration.
    pub inversion: InversionMethod,
}

impl Default for EnergySettings {
    fn default() -> Self {
        EnergySettings {
            calibration_strain: 0.012,
            reference_life: 1030.0,
            stress_start: 0.0,
            stress_step: 50.0,
            stress_end: 900.0,
            search_min: 1.0,
            search_max: 2000.0,
            scan_points: 20000,
            inversion: InversionMethod::Bisection,
        }
    }
}

impl EnergySettings {
    /// Validates the calibration point, the sweep range and the search bracket.
    ///
    /// # Examples
    ///
    /// ```
    /// use strainlife::energy::EnergySettings;
    ///
    /// assert!(EnergySettings::default().validate().is_ok());
    ///
    /// let backwards = EnergySettings { search_min: 10.0, search_max: 1.0, ..Default::default() };
    /// assert!(backwards.validate().is_err());
    /// ```
    pub fn validate(&self) -> FatigueResult<()> {
        if !(self.calibration_strain > 0.0) {
            return Err(FatigueError::invalid_input("calibration_strain", self.calibration_strain, "must be greater than 0.0"));
        }
        if !(self.reference_life > 0.0) {
            return Err(FatigueError::invalid_input("reference_life", self.reference_life, "must be greater than 0.0"));
        }
        if !(self.stress_start >= 0.0 && self.stress_start.is_finite()) {
            return Err(FatigueError::invalid_input("stress_start", self.stress_start, "must be finite and not negative"));
        }
        if !(self.stress_step > 0.0 && self.stress_step.is_finite()) {
            return Err(FatigueError::invalid_input("stress_step", self.stress_step, "must be finite and greater than 0.0"));
        }
        if !(self.stress_end > self.stress_start && self.stress_end.is_finite()) {
            return Err(FatigueError::invalid_input(
                "stress_end",
                self.stress_end,
                format!("must be finite and greater than stress_start ({})", self.stress_start),
            ));
        }
        let levels = ((self.stress_end - self.stress_start) / self.stress_step).ceil();
        if !(levels <= MAX_GRID_POINTS as f64) {
            return Err(FatigueError::invalid_input(
                "stress_step",
                self.stress_step,
                format!("sweep would have {} levels, at most {} allowed", levels, MAX_GRID_POINTS),
            ));
        }
        if !(self.search_min > 0.0) {
            return Err(FatigueError::invalid_input("search_min", self.search_min, "must be greater than 0.0"));
        }
        if !(self.search_max > self.search_min) {
            return Err(FatigueError::invalid_input(
                "search_max",
                self.search_max,
                format!("must be greater than search_min ({})", self.search_min),
            ));
        }
        if !(2..=MAX_GRID_POINTS).contains(&self.scan_points) {
            return Err(FatigueError::invalid_input(
                "scan_points",
                self.scan_points,
                format!("must be between 2 and {}", MAX_GRID_POINTS),
            ));
        }
        Ok(())
    }
}

/// Strain-hardening exponent and strength coefficient of `ε_p = (σ/K)^n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    pub n: f64,
    pub k: f64,
}

impl PowerLawFit {
    /// Fits the power law through the yield point and the ultimate point.
    ///
    /// The yield point sits at plastic strain [`YIELD_PLASTIC_STRAIN`], the
    /// ultimate point at `εf_true - σu/E`.
    ///
    /// # Arguments
    ///
    /// * `yield_stress` - σy.
    /// * `ultimate_stress` - σu.
    /// * `true_fracture_strain` - εf_true.
    /// * `youngs_modulus` - E.
    ///
    /// # Errors
    ///
    /// * `Domain` when either strain or stress ratio is not positive.
    /// * `DivideByZero` when `σu == σy`.
    /// * `Calibration` when `n` or `K` comes out non-finite or non-positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use strainlife::energy::PowerLawFit;
    ///
    /// let fit = PowerLawFit::fit(470.0, 745.0, 1.22f64.ln(), 210e3).unwrap();
    /// assert!(fit.n > 0.0 && fit.k > 0.0);
    /// assert!(PowerLawFit::fit(470.0, 470.0, 1.22f64.ln(), 210e3).is_err());
    /// ```
    pub fn fit(yield_stress: f64, ultimate_stress: f64, true_fracture_strain: f64, youngs_modulus: f64) -> FatigueResult<Self> {
        let ultimate_plastic_strain = true_fracture_strain - ultimate_stress / youngs_modulus;
        let strain_ratio = ultimate_plastic_strain / YIELD_PLASTIC_STRAIN;
        if !(strain_ratio > 0.0) {
            return Err(FatigueError::domain(
                "ultimate_plastic_strain",
                ultimate_plastic_strain,
                "plastic strain at the ultimate point must be positive",
            ));
        }
        let stress_ratio = ultimate_stress / yield_stress;
        if !(stress_ratio > 0.0) {
            return Err(FatigueError::domain("stress_ratio", stress_ratio, "ultimate/yield stress ratio must be positive"));
        }
        let log_stress_ratio = stress_ratio.ln();
        if log_stress_ratio == 0.0 {
            return Err(FatigueError::divide_by_zero("hardening exponent n (ultimate stress equals yield stress)"));
        }

        let n = strain_ratio.ln() / log_stress_ratio;
        if !(n.is_finite() && n > 0.0) {
            return Err(FatigueError::calibration("n", n));
        }
        let k = yield_stress / YIELD_PLASTIC_STRAIN.powf(1.0 / n);
        if !(k.is_finite() && k > 0.0) {
            return Err(FatigueError::calibration("K", k));
        }
        debug!("power-law fit: n = {:.6}, K = {:.3}", n, k);
        Ok(PowerLawFit { n, k })
    }
}

/// One-point calibration of the energy-life relation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyCalibration {
    /// Hysteresis energy at fracture, Wf.
    pub fracture_work: f64,
    /// Stress amplitude matching the calibration strain.
    pub calibration_stress: f64,
    /// Hysteresis energy at the calibration point, Wh_cal.
    pub calibration_energy: f64,
    /// Life-scaling constant, K_life.
    pub life_constant: f64,
}

impl EnergyCalibration {
    /// Life for a hysteresis energy, `Nf = K_life · Wf / Wh`.
    ///
    /// # Errors
    ///
    /// `DivideByZero` when `energy == 0`; `Domain` for negative or non-finite energy.
    pub fn life(&self, energy: f64) -> FatigueResult<f64> {
        if energy == 0.0 {
            return Err(FatigueError::divide_by_zero("fatigue life (zero hysteresis energy)"));
        }
        if !(energy.is_finite() && energy > 0.0) {
            return Err(FatigueError::domain("hysteresis_energy", energy, "must be positive and finite"));
        }
        ensure_finite("fatigue life", self.life_constant * self.fracture_work / energy)
    }
}

/// Predicted life at one stress amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Life {
    /// Finite number of cycles to failure.
    Cycles(f64),
    /// No plastic work per cycle, so no finite life.
    Unbounded,
}

impl Life {
    pub fn cycles(&self) -> Option<f64> {
        match self {
            Life::Cycles(n) => Some(*n),
            Life::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Life::Unbounded)
    }
}

/// A point of the energy-method curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyLifePoint {
    pub stress: f64,
    pub strain: f64,
    pub hysteresis_energy: f64,
    pub life: Life,
}

/// Fit, calibration and swept curve of one energy-method run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyResult {
    pub fit: PowerLawFit,
    pub calibration: EnergyCalibration,
    pub points: Vec<EnergyLifePoint>,
}

/// Energy method bound to one material.
#[derive(Debug, Clone)]
pub struct EnergyModel {
    youngs_modulus: f64,
    yield_stress: f64,
    ultimate_stress: f64,
    true_fracture_strain: f64,
    fit: PowerLawFit,
    settings: EnergySettings,
}

impl EnergyModel {
    /// Derives the true fracture strain and fits the power law.
    pub fn new(material: &MaterialConstants, settings: &EnergySettings) -> FatigueResult<Self> {
        material.validate()?;
        settings.validate()?;
        let true_fracture_strain = material.true_fracture_strain()?;
        let fit = PowerLawFit::fit(
            material.yield_stress,
            material.ultimate_stress,
            true_fracture_strain,
            material.youngs_modulus,
        )?;
        Ok(EnergyModel {
            youngs_modulus: material.youngs_modulus,
            yield_stress: material.yield_stress,
            ultimate_stress: material.ultimate_stress,
            true_fracture_strain,
            fit,
            settings: settings.clone(),
        })
    }

    pub fn fit(&self) -> &PowerLawFit {
        &self.fit
    }

    pub fn true_fracture_strain(&self) -> f64 {
        self.true_fracture_strain
    }

    pub fn settings(&self) -> &EnergySettings {
        &self.settings
    }

    fn strain(&self, stress: f64) -> f64 {
        stress / self.youngs_modulus + (stress / self.fit.k).powf(self.fit.n)
    }

    /// Total strain for a stress amplitude, `σ/E + (σ/K)^n`.
    ///
    /// # Errors
    ///
    /// `Domain` for negative or non-finite stress.
    pub fn strain_from_stress(&self, stress: f64) -> FatigueResult<f64> {
        if !(stress.is_finite() && stress >= 0.0) {
            return Err(FatigueError::domain("stress", stress, "must be finite and non-negative"));
        }
        Ok(self.strain(stress))
    }

    /// Stress amplitude producing `target` strain, searched on `[search_min, search_max]`.
    ///
    /// Targets outside the bracket's strain range return the nearest bound.
    ///
    /// # Errors
    ///
    /// `Domain` for a negative or non-finite target strain.
    pub fn stress_from_strain(&self, target: f64) -> FatigueResult<f64> {
        self.stress_from_strain_with(target, self.settings.inversion)
    }

    /// As [`Self::stress_from_strain`] with an explicit inversion method.
    pub fn stress_from_strain_with(&self, target: f64, method: InversionMethod) -> FatigueResult<f64> {
        if !(target.is_finite() && target >= 0.0) {
            return Err(FatigueError::domain("strain", target, "must be finite and non-negative"));
        }
        let (lo, hi) = (self.settings.search_min, self.settings.search_max);
        let stress = match method {
            InversionMethod::Bisection => bisect_monotonic(|s| self.strain(s), target, lo, hi, STRESS_TOLERANCE),
            InversionMethod::Scan => {
                let grid = linspace(lo, hi, self.settings.scan_points);
                scan_nearest(|s| self.strain(s), target, &grid).unwrap_or(lo)
            }
        };
        Ok(stress)
    }

    /// Plastic work per cycle for a stress/strain amplitude.
    ///
    /// `Wh = σε - σ²/(2E) - 0.002·σ^(n+1) / ((n+1)·σy^n)`; zero at `σ = ε = 0`.
    ///
    /// # Errors
    ///
    /// `Domain` for negative or non-finite stress.
    pub fn hysteresis_energy(&self, stress: f64, strain: f64) -> FatigueResult<f64> {
        if !(stress.is_finite() && stress >= 0.0) {
            return Err(FatigueError::domain("stress", stress, "must be finite and non-negative"));
        }
        let n = self.fit.n;
        let plastic = YIELD_PLASTIC_STRAIN * stress.powf(n + 1.0) / ((n + 1.0) * self.yield_stress.powf(n));
        Ok(stress * strain - stress * stress / (2.0 * self.youngs_modulus) - plastic)
    }

    /// Calibrates the life-scaling constant against the reference test.
    ///
    /// # Errors
    ///
    /// `DivideByZero` when the fracture work is zero; `Calibration` when any
    /// derived quantity is non-finite.
    pub fn calibrate(&self) -> FatigueResult<EnergyCalibration> {
        let fracture_work = ensure_finite(
            "fracture work",
            self.hysteresis_energy(self.ultimate_stress, self.true_fracture_strain)?,
        )?;
        if fracture_work == 0.0 {
            return Err(FatigueError::divide_by_zero("life constant (zero fracture work)"));
        }

        let strain = self.settings.calibration_strain;
        let calibration_stress = self.stress_from_strain(strain)?;
        let calibration_energy = ensure_finite("calibration energy", self.hysteresis_energy(calibration_stress, strain)?)?;
        let life_constant = ensure_finite(
            "life constant",
            self.settings.reference_life * calibration_energy / fracture_work,
        )?;

        info!(
            "energy calibration: Wf = {:.4}, sigma_cal = {:.3}, Wh_cal = {:.5}, K_life = {:.4}",
            fracture_work, calibration_stress, calibration_energy, life_constant
        );
        Ok(EnergyCalibration {
            fracture_work,
            calibration_stress,
            calibration_energy,
            life_constant,
        })
    }

    /// Stress amplitudes of the configured sweep, ascending.
    pub fn stress_levels(&self) -> Vec<f64> {
        arange(self.settings.stress_start, self.settings.stress_step, self.settings.stress_end)
    }

    /// Predicts strain and life at each stress amplitude, in input order.
    ///
    /// A level with zero hysteresis energy (notably `σ = 0`) is kept with
    /// [`Life::Unbounded`]; any other numeric failure aborts the sweep.
    pub fn sweep(&self, calibration: &EnergyCalibration, stress_levels: &[f64]) -> FatigueResult<Vec<EnergyLifePoint>> {
        stress_levels
            .iter()
            .map(|&stress| {
                let strain = self.strain_from_stress(stress)?;
                let energy = self.hysteresis_energy(stress, strain)?;
                let life = match calibration.life(energy) {
                    Ok(cycles) => Life::Cycles(cycles),
                    Err(e) if e.is_divide_by_zero() => {
                        warn!("stress {} has zero hysteresis energy, life flagged as unbounded", stress);
                        Life::Unbounded
                    }
                    Err(e) => return Err(e),
                };
                Ok(EnergyLifePoint {
                    stress,
                    strain,
                    hysteresis_energy: energy,
                    life,
                })
            })
            .collect()
    }

    /// Calibrates and sweeps the configured stress levels.
    pub fn run(&self) -> FatigueResult<EnergyResult> {
        let calibration = self.calibrate()?;
        let points = self.sweep(&calibration, &self.stress_levels())?;
        info!("energy method: {} stress levels evaluated", points.len());
        Ok(EnergyResult {
            fit: self.fit,
            calibration,
            points,
        })
    }
}
