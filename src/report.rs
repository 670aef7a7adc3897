//! Tabular and JSON output of a comparison run.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::energy::{EnergyResult, Life};
use crate::material::StrainLifeParams;
use crate::strain_life::StrainLifePoint;

/// Strain-life side of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrainLifeResult {
    pub params: StrainLifeParams,
    pub transition_reversals: Option<f64>,
    pub points: Vec<StrainLifePoint>,
}

/// Everything one run computes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub material: String,
    pub energy: EnergyResult,
    pub strain_life: StrainLifeResult,
}

#[derive(Debug, Serialize)]
struct EnergyRow {
    stress: f64,
    strain_amplitude: f64,
    hysteresis_energy: f64,
    // empty field for unbounded life
    life: Option<f64>,
}

#[derive(Debug, Serialize)]
struct StrainLifeRow {
    reversals: f64,
    life: f64,
    strain_amplitude: f64,
    elastic_strain: f64,
    plastic_strain: f64,
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Writes `<prefix>_energy.csv` and `<prefix>_strain_life.csv`.
///
/// # Returns
///
/// The paths of the energy table and the strain-life table.
pub fn write_csv(prefix: &Path, report: &ComparisonReport) -> Result<(PathBuf, PathBuf)> {
    let energy_path = with_suffix(prefix, "_energy.csv");
    let strain_life_path = with_suffix(prefix, "_strain_life.csv");
    create_parent(&energy_path)?;

    let mut writer = csv::Writer::from_path(&energy_path)
        .with_context(|| format!("failed to create {}", energy_path.display()))?;
    for point in &report.energy.points {
        writer.serialize(EnergyRow {
            stress: point.stress,
            strain_amplitude: point.strain,
            hysteresis_energy: point.hysteresis_energy,
            life: match point.life {
                Life::Cycles(n) => Some(n),
                Life::Unbounded => None,
            },
        })?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(&strain_life_path)
        .with_context(|| format!("failed to create {}", strain_life_path.display()))?;
    for point in &report.strain_life.points {
        writer.serialize(StrainLifeRow {
            reversals: point.reversals,
            life: point.life,
            strain_amplitude: point.strain_amplitude,
            elastic_strain: point.elastic_strain,
            plastic_strain: point.plastic_strain,
        })?;
    }
    writer.flush()?;

    info!("wrote {} and {}", energy_path.display(), strain_life_path.display());
    Ok((energy_path, strain_life_path))
}

/// Writes the full report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ComparisonReport) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::{EnergyModel, EnergySettings};
    use crate::material::MaterialConstants;
    use crate::strain_life::{ReversalSettings, StrainLifeModel};

    fn small_report() -> ComparisonReport {
        let energy = EnergyModel::new(&MaterialConstants::default(), &EnergySettings::default())
            .unwrap()
            .run()
            .unwrap();
        let reversals = ReversalSettings { count: 5, ..Default::default() };
        let model = StrainLifeModel::new(&StrainLifeParams::default(), &reversals).unwrap();
        ComparisonReport {
            material: String::from("4340"),
            energy,
            strain_life: StrainLifeResult {
                params: model.params().clone(),
                transition_reversals: model.transition_reversals().ok(),
                points: model.curve().unwrap(),
            },
        }
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix(Path::new("out/run"), "_energy.csv"), PathBuf::from("out/run_energy.csv"));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let report = small_report();
        let (energy_path, strain_life_path) = write_csv(&dir.path().join("nested/run"), &report).unwrap();

        let mut reader = csv::Reader::from_path(&energy_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["stress", "strain_amplitude", "hysteresis_energy", "life"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 18);
        // zero stress row carries no life
        assert_eq!(&rows[0][3], "");
        assert!(rows[1][3].parse::<f64>().unwrap() > 0.0);

        let rows = csv::Reader::from_path(&strain_life_path).unwrap().records().count();
        assert_eq!(rows, 5);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&path, &small_report()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["material"], "4340");
        assert_eq!(value["energy"]["points"][0]["life"], "unbounded");
        assert!(value["energy"]["points"][1]["life"]["cycles"].as_f64().unwrap() > 0.0);
        assert_eq!(value["strain_life"]["points"].as_array().unwrap().len(), 5);
    }
}
