//! Run configuration for the strain-life comparison.
//!
//! Every section is optional; omitted values fall back to the AISI 4340
//! reference case, so an empty file describes the reference run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::energy::EnergySettings;
use crate::error::{FatigueError, FatigueResult};
use crate::material::{MaterialConstants, StrainLifeParams};
use crate::strain_life::ReversalSettings;

/// Represents the configuration for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub material: MaterialConstants,
    pub strain_life: StrainLifeParams,
    pub energy: EnergySettings,
    pub reversals: ReversalSettings,
    pub output: Output,
}

impl Config {
    /// Validates the entire configuration.
    ///
    /// This method checks the validity of each section before any model is built.
    ///
    /// # Examples
    ///
    /// ```
    /// use strainlife::config::Config;
    ///
    /// assert!(Config::default().validate().is_ok());
    /// ```
    pub fn validate(&self) -> FatigueResult<()> {
        self.material.validate()?;
        self.strain_life.validate()?;
        self.energy.validate()?;
        self.reversals.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Where results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    /// Figure path; the extension selects the format. `None` skips the plot.
    pub plot: Option<PathBuf>,
    /// Prefix of the `_energy.csv` and `_strain_life.csv` tables.
    pub csv: Option<PathBuf>,
    /// Path of the JSON report.
    pub json: Option<PathBuf>,
    /// Open the saved figure in an interactive window.
    pub show: bool,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            plot: Some(PathBuf::from("comparison.svg")),
            csv: None,
            json: None,
            show: false,
        }
    }
}

impl Output {
    pub fn validate(&self) -> FatigueResult<()> {
        let paths = [("plot", &self.plot), ("csv", &self.csv), ("json", &self.json)];
        for (field, path) in paths {
            if let Some(path) = path {
                if path.as_os_str().is_empty() {
                    return Err(FatigueError::invalid_input(field, "\"\"", "path must not be empty"));
                }
            }
        }
        if self.show && self.plot.is_none() {
            return Err(FatigueError::invalid_input("show", self.show, "needs a plot path"));
        }
        Ok(())
    }
}

/// Parses a configuration in the format named by `extension` ("yaml", "yml" or "toml").
pub fn parse_config(content: &str, extension: &str) -> Result<Config> {
    let config: Config = match extension.to_ascii_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(content)?,
        "toml" => toml::from_str(content)?,
        other => return Err(anyhow!("unsupported configuration format '{}', expected yaml, yml or toml", other)),
    };
    Ok(config)
}

/// Loads the configuration from a YAML or TOML file.
///
/// # Arguments
///
/// * `config_path` - A path reference to the configuration file.
///
/// # Errors
///
/// This function will return an error if reading or parsing the configuration file fails.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let path = config_path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    parse_config(&content, extension).with_context(|| format!("failed to parse config {}", path.display()))
}
