//! Log-log comparison chart of the two strain-life curves.
//!
//! Rendering goes through `plotpy`, which writes a matplotlib script and runs
//! it with python3 when the figure is saved.

use std::path::Path;

use log::{info, warn};
use plotpy::{Curve, Plot};

use crate::energy::EnergyLifePoint;
use crate::error::{FatigueError, FatigueResult};
use crate::report::ComparisonReport;
use crate::strain_life::StrainLifePoint;

pub const TITLE: &str = "Comparison of Strain-Life Curves";
pub const LABEL_X: &str = "Fatigue Life, Nf (cycles)";
pub const LABEL_Y: &str = "Strain Amplitude (εa)";
pub const STRAIN_LIFE_LEGEND: &str = "Coffin-Manson-Basquin";

/// Figure size in points (8 x 6 inches).
const FIGURE_SIZE: (f64, f64) = (576.0, 432.0);

/// Legend entry of the energy curve for a material name.
pub fn energy_legend(material: &str) -> String {
    format!("Energy Method ({})", material)
}

/// (life, strain amplitude) pairs of the energy curve.
///
/// Points without a finite positive life cannot sit on a log axis and are left out.
pub fn energy_series(points: &[EnergyLifePoint]) -> (Vec<f64>, Vec<f64>) {
    points
        .iter()
        .filter_map(|p| match p.life.cycles() {
            Some(life) if life > 0.0 && p.strain > 0.0 => Some((life, p.strain)),
            _ => None,
        })
        .unzip()
}

/// (life, strain amplitude) pairs of the strain-life curve.
pub fn strain_life_series(points: &[StrainLifePoint]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.life, p.strain_amplitude)).unzip()
}

/// Builds the comparison figure without rendering it.
pub fn draw_comparison(report: &ComparisonReport) -> Plot {
    let (energy_x, energy_y) = energy_series(&report.energy.points);
    let skipped = report.energy.points.len() - energy_x.len();
    if skipped > 0 {
        warn!("{} energy point(s) without finite life left out of the plot", skipped);
    }
    let (cmb_x, cmb_y) = strain_life_series(&report.strain_life.points);

    let mut energy = Curve::new();
    energy
        .set_label(&energy_legend(&report.material))
        .set_marker_style("o")
        .set_line_style("-");
    energy.draw(&energy_x, &energy_y);

    let mut cmb = Curve::new();
    cmb.set_label(STRAIN_LIFE_LEGEND).set_line_color("red").set_line_style("-");
    cmb.draw(&cmb_x, &cmb_y);

    let mut plot = Plot::new();
    plot.set_log_x(true).set_log_y(true); // must be before `add`
    plot.add(&energy).add(&cmb);
    plot.set_figure_size_points(FIGURE_SIZE.0, FIGURE_SIZE.1)
        .set_title(TITLE)
        .grid_labels_legend(LABEL_X, LABEL_Y);
    plot.extra("plt.grid(True, which='both', ls='--')\n");
    plot
}

/// Renders the comparison figure to `path`; the extension picks the format.
pub fn save_comparison(report: &ComparisonReport, path: &Path) -> FatigueResult<()> {
    let plot = draw_comparison(report);
    plot.save(path).map_err(FatigueError::plot)?;
    info!("figure written to {}", path.display());
    Ok(())
}

/// Renders the comparison figure to `path` and opens it in a matplotlib window.
///
/// Blocks until the window is closed.
pub fn show_comparison(report: &ComparisonReport, path: &Path) -> FatigueResult<()> {
    let plot = draw_comparison(report);
    info!("figure written to {}, opening viewer", path.display());
    plot.show(path).map_err(FatigueError::plot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_logic::compute;
    use crate::config::Config;
    use crate::energy::Life;
    #[allow(unused_imports)]
    use plotpy::GraphMaker;

    fn energy_point(stress: f64, strain: f64, life: Life) -> EnergyLifePoint {
        EnergyLifePoint {
            stress,
            strain,
            hysteresis_energy: 0.0,
            life,
        }
    }

    #[test]
    fn test_energy_series_skips_unbounded() {
        let points = vec![
            energy_point(0.0, 0.0, Life::Unbounded),
            energy_point(50.0, 2.4e-4, Life::Cycles(9.3e5)),
            energy_point(100.0, 4.8e-4, Life::Cycles(2.3e5)),
        ];
        let (x, y) = energy_series(&points);
        assert_eq!(x, vec![9.3e5, 2.3e5]);
        assert_eq!(y, vec![2.4e-4, 4.8e-4]);
    }

    #[test]
    fn test_strain_life_series() {
        let points = vec![StrainLifePoint {
            reversals: 10.0,
            life: 5.0,
            strain_amplitude: 0.16,
            elastic_strain: 0.003,
            plastic_strain: 0.157,
        }];
        assert_eq!(strain_life_series(&points), (vec![5.0], vec![0.16]));
    }

    #[test]
    fn test_energy_legend() {
        assert_eq!(energy_legend("4340"), "Energy Method (4340)");
    }

    #[test]
    fn test_reference_figure_script() {
        let report = compute(&Config::default()).unwrap();
        let plot = draw_comparison(&report);
        let script = plot.get_buffer();
        for expected in [TITLE, LABEL_X, LABEL_Y, STRAIN_LIFE_LEGEND, "xscale('log')", "yscale('log')", "ls='--'"] {
            assert!(script.contains(expected), "missing {:?} in figure script", expected);
        }
        assert!(script.contains(&energy_legend("4340")));
    }
}
