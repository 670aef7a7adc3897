//! Coffin-Manson-Basquin strain-life curve.
//!
//! `εa = (σf'/E)·(2Nf)^b + εf'·(2Nf)^c`, the elastic (Basquin) term plus the
//! plastic (Coffin-Manson) term, evaluated over a log-spaced range of
//! reversals to failure.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, FatigueError, FatigueResult};
use crate::material::StrainLifeParams;
use crate::solver::{bisect_monotonic, logspace, MAX_GRID_POINTS};

/// Bracket width, in decades, for inverting the curve.
const LOG_REVERSALS_TOLERANCE: f64 = 1e-12;

/// Range and resolution of the reversals-to-failure axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReversalSettings {
    /// log10 of the first reversal count.
    pub from_exponent: f64,
    /// log10 of the last reversal count.
    pub to_exponent: f64,
    /// Number of reversal counts sampled between the two exponents.
    pub count: usize,
}

impl Default for ReversalSettings {
    fn default() -> Self {
        ReversalSettings {
            from_exponent: 1.0,
            to_exponent: 8.0,
            count: 1000,
        }
    }
}

impl ReversalSettings {
    pub fn validate(&self) -> FatigueResult<()> {
        if !self.from_exponent.is_finite() {
            return Err(FatigueError::invalid_input("from_exponent", self.from_exponent, "must be finite"));
        }
        if !(self.to_exponent > self.from_exponent && self.to_exponent.is_finite()) {
            return Err(FatigueError::invalid_input(
                "to_exponent",
                self.to_exponent,
                format!("must be finite and greater than from_exponent ({})", self.from_exponent),
            ));
        }
        if !(2..=MAX_GRID_POINTS).contains(&self.count) {
            return Err(FatigueError::invalid_input("count", self.count, format!("must be between 2 and {}", MAX_GRID_POINTS)));
        }
        Ok(())
    }
}

/// A point of the strain-life curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrainLifePoint {
    /// Reversals to failure, 2Nf.
    pub reversals: f64,
    /// Cycles to failure, Nf.
    pub life: f64,
    /// Total strain amplitude εa.
    pub strain_amplitude: f64,
    pub elastic_strain: f64,
    pub plastic_strain: f64,
}

/// Strain-life model for one set of Coffin-Manson-Basquin parameters.
#[derive(Debug, Clone)]
pub struct StrainLifeModel {
    params: StrainLifeParams,
    reversals: ReversalSettings,
}

impl StrainLifeModel {
    pub fn new(params: &StrainLifeParams, reversals: &ReversalSettings) -> FatigueResult<Self> {
        params.validate()?;
        reversals.validate()?;
        Ok(StrainLifeModel {
            params: params.clone(),
            reversals: reversals.clone(),
        })
    }

    pub fn params(&self) -> &StrainLifeParams {
        &self.params
    }

    /// Log-spaced reversals over the configured range, ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use strainlife::material::StrainLifeParams;
    /// use strainlife::strain_life::{ReversalSettings, StrainLifeModel};
    ///
    /// let model = StrainLifeModel::new(&StrainLifeParams::default(), &ReversalSettings::default()).unwrap();
    /// let reversals = model.generate_reversals();
    /// assert_eq!(reversals.len(), 1000);
    /// assert!(reversals.windows(2).all(|w| w[1] > w[0]));
    /// ```
    pub fn generate_reversals(&self) -> Vec<f64> {
        logspace(self.reversals.from_exponent, self.reversals.to_exponent, self.reversals.count)
    }

    fn check_reversals(reversals: f64) -> FatigueResult<()> {
        if !(reversals.is_finite() && reversals > 0.0) {
            return Err(FatigueError::domain("reversals", reversals, "must be positive and finite"));
        }
        Ok(())
    }

    /// Basquin term `(σf'/E)·(2Nf)^b`.
    pub fn elastic_strain(&self, reversals: f64) -> FatigueResult<f64> {
        Self::check_reversals(reversals)?;
        let p = &self.params;
        Ok(p.fatigue_strength_coefficient / p.youngs_modulus * reversals.powf(p.fatigue_strength_exponent))
    }

    /// Coffin-Manson term `εf'·(2Nf)^c`.
    pub fn plastic_strain(&self, reversals: f64) -> FatigueResult<f64> {
        Self::check_reversals(reversals)?;
        let p = &self.params;
        Ok(p.fatigue_ductility_coefficient * reversals.powf(p.fatigue_ductility_exponent))
    }

    /// Total strain amplitude at `reversals` (2Nf).
    ///
    /// # Errors
    ///
    /// `Domain` when `reversals` is not positive and finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use strainlife::material::StrainLifeParams;
    /// use strainlife::strain_life::{ReversalSettings, StrainLifeModel};
    ///
    /// let params = StrainLifeParams::default();
    /// let model = StrainLifeModel::new(&params, &ReversalSettings::default()).unwrap();
    /// let at_one = model.evaluate(1.0).unwrap();
    /// let expected = params.fatigue_strength_coefficient / params.youngs_modulus
    ///     + params.fatigue_ductility_coefficient;
    /// assert!((at_one - expected).abs() < 1e-15);
    /// ```
    pub fn evaluate(&self, reversals: f64) -> FatigueResult<f64> {
        Ok(self.elastic_strain(reversals)? + self.plastic_strain(reversals)?)
    }

    /// Reversals at which the elastic and plastic terms are equal.
    ///
    /// `2Nt = (εf'·E / σf')^(1 / (b - c))`
    ///
    /// # Errors
    ///
    /// `DivideByZero` when `b == c`.
    pub fn transition_reversals(&self) -> FatigueResult<f64> {
        let p = &self.params;
        let exponent_gap = p.fatigue_strength_exponent - p.fatigue_ductility_exponent;
        if exponent_gap == 0.0 {
            return Err(FatigueError::divide_by_zero("transition life (b equals c)"));
        }
        let ratio = p.fatigue_ductility_coefficient * p.youngs_modulus / p.fatigue_strength_coefficient;
        ensure_finite("transition reversals", ratio.powf(1.0 / exponent_gap))
    }

    /// Reversals to failure for a strain amplitude, inverted on the configured range.
    ///
    /// The curve decreases with reversals, so amplitudes above the curve at the
    /// first reversal return the lower bound and amplitudes below the curve at
    /// the last reversal return the upper bound.
    pub fn reversals_from_strain(&self, strain_amplitude: f64) -> FatigueResult<f64> {
        if !(strain_amplitude.is_finite() && strain_amplitude > 0.0) {
            return Err(FatigueError::domain("strain_amplitude", strain_amplitude, "must be positive and finite"));
        }
        let p = &self.params;
        let curve = |log_reversals: f64| {
            let reversals = 10f64.powf(log_reversals);
            p.fatigue_strength_coefficient / p.youngs_modulus * reversals.powf(p.fatigue_strength_exponent)
                + p.fatigue_ductility_coefficient * reversals.powf(p.fatigue_ductility_exponent)
        };
        let log_reversals = bisect_monotonic(
            curve,
            strain_amplitude,
            self.reversals.from_exponent,
            self.reversals.to_exponent,
            LOG_REVERSALS_TOLERANCE,
        );
        Ok(10f64.powf(log_reversals))
    }

    /// Evaluates the curve on [`Self::generate_reversals`].
    pub fn curve(&self) -> FatigueResult<Vec<StrainLifePoint>> {
        let points = self
            .generate_reversals()
            .into_iter()
            .map(|reversals| {
                let elastic_strain = self.elastic_strain(reversals)?;
                let plastic_strain = self.plastic_strain(reversals)?;
                Ok(StrainLifePoint {
                    reversals,
                    life: life_from_reversals(reversals),
                    strain_amplitude: elastic_strain + plastic_strain,
                    elastic_strain,
                    plastic_strain,
                })
            })
            .collect::<FatigueResult<Vec<_>>>()?;
        info!("strain-life method: {} reversal points evaluated", points.len());
        Ok(points)
    }
}

/// Cycles from reversals, `Nf = 2Nf / 2`.
pub fn life_from_reversals(reversals: f64) -> f64 {
    reversals / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_model() -> StrainLifeModel {
        StrainLifeModel::new(&StrainLifeParams::default(), &ReversalSettings::default()).unwrap()
    }

    #[test]
    fn test_generate_reversals_span() {
        let reversals = reference_model().generate_reversals();
        assert_eq!(reversals.len(), 1000);
        assert!(reversals.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(reversals[0], 10.0, max_relative = 1e-12);
        assert_relative_eq!(reversals[999], 1e8, max_relative = 1e-12);
    }

    #[test]
    fn test_evaluate_reference_point() {
        let model = reference_model();
        let expected = (745.0 / 210000.0) * 1000f64.powf(-0.095) + 0.563 * 1000f64.powf(-0.563);
        assert_relative_eq!(model.evaluate(1000.0).unwrap(), expected, max_relative = 1e-6);
        assert_relative_eq!(model.evaluate(1000.0).unwrap(), 0.013361988204769804, max_relative = 1e-9);
    }

    #[test]
    fn test_evaluate_rejects_non_positive_reversals() {
        let model = reference_model();
        assert!(matches!(model.evaluate(0.0), Err(FatigueError::Domain { .. })));
        assert!(model.evaluate(-10.0).is_err());
        assert!(model.evaluate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_life_is_half_of_reversals() {
        let model = reference_model();
        for reversals in model.generate_reversals() {
            assert_eq!(life_from_reversals(reversals), reversals / 2.0);
        }
        let curve = model.curve().unwrap();
        assert_eq!(curve.len(), 1000);
        assert!(curve.iter().all(|p| p.life * 2.0 == p.reversals));
        assert!(curve.windows(2).all(|w| w[1].strain_amplitude < w[0].strain_amplitude));
    }

    #[test]
    fn test_transition_reversals_balances_terms() {
        let model = reference_model();
        let transition = model.transition_reversals().unwrap();
        assert_relative_eq!(
            model.elastic_strain(transition).unwrap(),
            model.plastic_strain(transition).unwrap(),
            max_relative = 1e-9
        );

        let params = StrainLifeParams {
            fatigue_ductility_exponent: -0.095,
            ..Default::default()
        };
        let flat = StrainLifeModel::new(&params, &ReversalSettings::default()).unwrap();
        assert!(flat.transition_reversals().unwrap_err().is_divide_by_zero());
    }

    #[test]
    fn test_reversals_from_strain_inverts_evaluate() {
        let model = reference_model();
        for &reversals in &[20.0, 1000.0, 123456.0, 5e7] {
            let strain = model.evaluate(reversals).unwrap();
            assert_relative_eq!(model.reversals_from_strain(strain).unwrap(), reversals, max_relative = 1e-8);
        }
        // saturation at both ends of the range
        assert_relative_eq!(model.reversals_from_strain(1.0).unwrap(), 10.0, max_relative = 1e-12);
        assert_relative_eq!(model.reversals_from_strain(1e-6).unwrap(), 1e8, max_relative = 1e-12);
        assert!(model.reversals_from_strain(0.0).is_err());
    }

    #[test]
    fn test_reversal_settings_validation() {
        assert!(ReversalSettings::default().validate().is_ok());
        let bad = ReversalSettings { count: 1, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = ReversalSettings { from_exponent: 8.0, to_exponent: 1.0, count: 10 };
        assert!(bad.validate().is_err());
    }
}
