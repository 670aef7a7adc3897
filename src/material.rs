//! Material properties feeding the two fatigue models.

use serde::{Deserialize, Serialize};

use crate::error::{FatigueError, FatigueResult};

/// Converts engineering fracture strain to true fracture strain, `ln(1 + ε)`.
///
/// # Errors
///
/// Returns a `Domain` error when `engineering_strain <= -1`.
///
/// # Examples
///
/// ```
/// use strainlife::material::true_fracture_strain;
///
/// let eps = true_fracture_strain(0.22).unwrap();
/// assert!((eps - 1.22f64.ln()).abs() < 1e-15);
/// assert!(true_fracture_strain(-1.0).is_err());
/// ```
pub fn true_fracture_strain(engineering_strain: f64) -> FatigueResult<f64> {
    if !(engineering_strain > -1.0) {
        return Err(FatigueError::domain(
            "fracture_strain",
            engineering_strain,
            "engineering fracture strain must exceed -1",
        ));
    }
    Ok((1.0 + engineering_strain).ln())
}

/// Monotonic tensile properties used by the energy method.
///
/// Defaults describe the AISI 4340 steel reference case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConstants {
    /// Name used in the plot legend.
    pub name: String,
    /// Young's modulus E (MPa).
    pub youngs_modulus: f64,
    /// Yield stress σy (MPa).
    pub yield_stress: f64,
    /// Ultimate stress σu (MPa).
    pub ultimate_stress: f64,
    /// Engineering strain at fracture.
    pub fracture_strain: f64,
}

impl Default for MaterialConstants {
    fn default() -> Self {
        MaterialConstants {
            name: String::from("4340"),
            youngs_modulus: 210e3,
            yield_stress: 470.0,
            ultimate_stress: 745.0,
            fracture_strain: 0.22,
        }
    }
}

impl MaterialConstants {
    /// True fracture strain εf_true derived from [`Self::fracture_strain`].
    pub fn true_fracture_strain(&self) -> FatigueResult<f64> {
        true_fracture_strain(self.fracture_strain)
    }

    /// Validates the tensile constants.
    ///
    /// Checks positivity of the modulus and both strengths, that the ultimate
    /// stress exceeds the yield stress, and that the fracture strain lies in
    /// the domain of the logarithm.
    ///
    /// # Examples
    ///
    /// ```
    /// use strainlife::material::MaterialConstants;
    ///
    /// assert!(MaterialConstants::default().validate().is_ok());
    ///
    /// let flat = MaterialConstants { ultimate_stress: 470.0, ..Default::default() };
    /// assert!(flat.validate().is_err());
    /// ```
    pub fn validate(&self) -> FatigueResult<()> {
        if self.name.trim().is_empty() {
            return Err(FatigueError::invalid_input("name", &self.name, "must not be empty"));
        }
        if !(self.youngs_modulus > 0.0) {
            return Err(FatigueError::invalid_input("youngs_modulus", self.youngs_modulus, "must be greater than 0.0"));
        }
        if !(self.yield_stress > 0.0) {
            return Err(FatigueError::invalid_input("yield_stress", self.yield_stress, "must be greater than 0.0"));
        }
        if !(self.ultimate_stress > self.yield_stress) {
            return Err(FatigueError::invalid_input(
                "ultimate_stress",
                self.ultimate_stress,
                format!("must be greater than yield_stress ({})", self.yield_stress),
            ));
        }
        if !(self.fracture_strain > -1.0) {
            return Err(FatigueError::invalid_input("fracture_strain", self.fracture_strain, "must be greater than -1.0"));
        }
        Ok(())
    }
}

/// Coffin-Manson-Basquin strain-life parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrainLifeParams {
    /// Young's modulus E (MPa).
    pub youngs_modulus: f64,
    /// Fatigue strength coefficient σf' (MPa).
    pub fatigue_strength_coefficient: f64,
    /// Fatigue ductility coefficient εf'.
    pub fatigue_ductility_coefficient: f64,
    /// Fatigue strength exponent b.
    pub fatigue_strength_exponent: f64,
    /// Fatigue ductility exponent c.
    pub fatigue_ductility_exponent: f64,
}

impl Default for StrainLifeParams {
    fn default() -> Self {
        StrainLifeParams {
            youngs_modulus: 210000.0,
            fatigue_strength_coefficient: 745.0,
            fatigue_ductility_coefficient: 0.563,
            fatigue_strength_exponent: -0.095,
            fatigue_ductility_exponent: -0.563,
        }
    }
}

impl StrainLifeParams {
    /// Validates the strain-life parameters.
    ///
    /// Both coefficients and the modulus must be positive and both exponents finite.
    pub fn validate(&self) -> FatigueResult<()> {
        if !(self.youngs_modulus > 0.0) {
            return Err(FatigueError::invalid_input("youngs_modulus", self.youngs_modulus, "must be greater than 0.0"));
        }
        if !(self.fatigue_strength_coefficient > 0.0) {
            return Err(FatigueError::invalid_input(
                "fatigue_strength_coefficient",
                self.fatigue_strength_coefficient,
                "must be greater than 0.0",
            ));
        }
        if !(self.fatigue_ductility_coefficient > 0.0) {
            return Err(FatigueError::invalid_input(
                "fatigue_ductility_coefficient",
                self.fatigue_ductility_coefficient,
                "must be greater than 0.0",
            ));
        }
        if !self.fatigue_strength_exponent.is_finite() {
            return Err(FatigueError::invalid_input("fatigue_strength_exponent", self.fatigue_strength_exponent, "must be finite"));
        }
        if !self.fatigue_ductility_exponent.is_finite() {
            return Err(FatigueError::invalid_input("fatigue_ductility_exponent", self.fatigue_ductility_exponent, "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_true_fracture_strain() {
        assert_relative_eq!(true_fracture_strain(0.22).unwrap(), 0.19885085874516517, epsilon = 1e-12);
        assert_eq!(true_fracture_strain(0.0).unwrap(), 0.0);
        assert!(matches!(true_fracture_strain(-1.0), Err(FatigueError::Domain { .. })));
        assert!(true_fracture_strain(-2.0).is_err());
        assert!(true_fracture_strain(f64::NAN).is_err());
    }

    #[test]
    fn test_material_validation() {
        let material = MaterialConstants::default();
        assert!(material.validate().is_ok());

        let bad = MaterialConstants { youngs_modulus: 0.0, ..Default::default() };
        assert!(bad.validate().is_err());

        let bad = MaterialConstants { name: String::from("  "), ..Default::default() };
        assert!(bad.validate().is_err());

        let bad = MaterialConstants { fracture_strain: -1.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_strain_life_validation() {
        assert!(StrainLifeParams::default().validate().is_ok());

        let bad = StrainLifeParams { fatigue_ductility_coefficient: -0.1, ..Default::default() };
        assert!(bad.validate().is_err());

        let bad = StrainLifeParams { fatigue_strength_exponent: f64::NAN, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
