// src/lib.rs

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub mod app_logic;
pub mod config;
pub mod energy;
pub mod error;
pub mod material;
pub mod plot;
pub mod report;
pub mod solver;
pub mod strain_life;

// When the "wasm" feature is enabled, use wasm_bindgen to expose the strain-life curve to the host.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn strain_life_curve(
    youngs_modulus: f64,
    fatigue_strength_coefficient: f64,
    fatigue_ductility_coefficient: f64,
    fatigue_strength_exponent: f64,
    fatigue_ductility_exponent: f64,
) -> Result<Vec<f64>, JsValue> {
    let params = material::StrainLifeParams {
        youngs_modulus,
        fatigue_strength_coefficient,
        fatigue_ductility_coefficient,
        fatigue_strength_exponent,
        fatigue_ductility_exponent,
    };
    let model = strain_life::StrainLifeModel::new(&params, &strain_life::ReversalSettings::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let points = model.curve().map_err(|e| JsValue::from_str(&e.to_string()))?;
    // Lives first, then amplitudes, in one flat array for the JavaScript side.
    Ok(points
        .iter()
        .map(|p| p.life)
        .chain(points.iter().map(|p| p.strain_amplitude))
        .collect())
}
