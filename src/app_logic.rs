//! Main application logic: configuration, both models, reports and the figure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::config::{load_config, Config};
use crate::energy::{EnergyModel, InversionMethod};
use crate::error::FatigueResult;
use crate::plot::{save_comparison, show_comparison};
use crate::report::{write_csv, write_json, ComparisonReport, StrainLifeResult};
use crate::strain_life::StrainLifeModel;

/// Command line overrides applied on top of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub plot: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub no_plot: bool,
    pub show: bool,
    pub inversion: Option<InversionMethod>,
}

impl RunOptions {
    /// Loads the configured file, or the reference configuration, and applies the overrides.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        if let Some(plot) = &self.plot {
            config.output.plot = Some(plot.clone());
        }
        if self.no_plot {
            config.output.plot = None;
        }
        if let Some(csv) = &self.csv {
            config.output.csv = Some(csv.clone());
        }
        if let Some(json) = &self.json {
            config.output.json = Some(json.clone());
        }
        if self.show {
            config.output.show = true;
        }
        if let Some(inversion) = self.inversion {
            config.energy.inversion = inversion;
        }
        Ok(config)
    }
}

/// Evaluates the energy method and the strain-life method for one configuration.
///
/// The two models share nothing and are evaluated on the rayon pool.
pub fn compute(config: &Config) -> FatigueResult<ComparisonReport> {
    config.validate()?;
    let energy_model = EnergyModel::new(&config.material, &config.energy)?;
    let strain_life_model = StrainLifeModel::new(&config.strain_life, &config.reversals)?;

    let (energy, strain_life) = rayon::join(
        || energy_model.run(),
        || -> FatigueResult<StrainLifeResult> {
            Ok(StrainLifeResult {
                params: strain_life_model.params().clone(),
                transition_reversals: strain_life_model.transition_reversals().ok(),
                points: strain_life_model.curve()?,
            })
        },
    );

    Ok(ComparisonReport {
        material: config.material.name.clone(),
        energy: energy?,
        strain_life: strain_life?,
    })
}

/// Runs one comparison and writes every configured output.
pub fn run(options: &RunOptions) -> Result<ComparisonReport> {
    match &options.config {
        Some(path) => info!("Running with configuration: {}", path.display()),
        None => info!("Running with the reference 4340 configuration"),
    }
    let config = options.resolve()?;
    let report = compute(&config).context("fatigue computation failed")?;

    let fit = &report.energy.fit;
    info!("power-law fit: n = {:.4}, K = {:.2}", fit.n, fit.k);
    if let Some(transition) = report.strain_life.transition_reversals {
        info!("transition life: 2Nt = {:.1} reversals", transition);
    }

    if let Some(prefix) = &config.output.csv {
        write_csv(prefix, &report)?;
    }
    if let Some(path) = &config.output.json {
        write_json(path, &report)?;
    }
    if let Some(path) = &config.output.plot {
        let rendered = if config.output.show {
            show_comparison(&report, path)
        } else {
            save_comparison(&report, path)
        };
        rendered.with_context(|| format!("failed to render {}", path.display()))?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::Life;

    #[test]
    fn test_compute_reference() {
        let report = compute(&Config::default()).unwrap();
        assert_eq!(report.material, "4340");
        assert_eq!(report.energy.points.len(), 18);
        assert_eq!(report.energy.points[0].life, Life::Unbounded);
        assert_eq!(report.strain_life.points.len(), 1000);
        assert!(report.strain_life.transition_reversals.is_some());
    }

    #[test]
    fn test_compute_rejects_invalid_config() {
        let mut config = Config::default();
        config.material.ultimate_stress = config.material.yield_stress;
        assert!(compute(&config).is_err());
    }

    #[test]
    fn test_options_override_config() {
        let options = RunOptions {
            config: Some(PathBuf::from("tests/config.yaml")),
            csv: Some(PathBuf::from("out/run")),
            no_plot: true,
            inversion: Some(InversionMethod::Bisection),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.output.plot, None);
        assert_eq!(config.output.csv, Some(PathBuf::from("out/run")));
        assert_eq!(config.energy.inversion, InversionMethod::Bisection);
        assert!(!config.output.show);
    }

    #[test]
    fn test_show_flag() {
        let options = RunOptions { show: true, ..Default::default() };
        let config = options.resolve().unwrap();
        assert!(config.output.show);
        assert!(config.validate().is_ok());

        let options = RunOptions { show: true, no_plot: true, ..Default::default() };
        assert!(compute(&options.resolve().unwrap()).is_err());
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            csv: Some(dir.path().join("run")),
            json: Some(dir.path().join("run.json")),
            no_plot: true,
            ..Default::default()
        };
        run(&options).unwrap();
        assert!(dir.path().join("run_energy.csv").exists());
        assert!(dir.path().join("run_strain_life.csv").exists());
        assert!(dir.path().join("run.json").exists());
    }
}
