use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, Command};
use log::error;

use strainlife::app_logic::{self, RunOptions};
use strainlife::energy::InversionMethod;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("strainlife")
        .version("0.1.0")
        .about("Compares energy-based and Coffin-Manson-Basquin fatigue life predictions")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("YAML or TOML configuration file; the 4340 reference case is used when omitted")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("plot")
                .short('p')
                .long("plot")
                .help("Figure path, the extension selects the format")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Prefix for the _energy.csv and _strain_life.csv tables")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Write the full report as JSON")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-plot")
                .long("no-plot")
                .help("Skip rendering the figure")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show")
                .long("show")
                .help("Open the saved figure in a matplotlib window")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inversion")
                .long("inversion")
                .help("Stress-strain inversion method")
                .value_parser(["bisection", "scan"]),
        )
        .after_help("Set RUST_LOG=debug for the fitted and calibrated values.")
        .get_matches();

    let inversion = match matches.get_one::<String>("inversion").map(|s| s.parse::<InversionMethod>()) {
        Some(Ok(method)) => Some(method),
        Some(Err(err)) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
        None => None,
    };

    let options = RunOptions {
        config: matches.get_one::<PathBuf>("config").cloned(),
        plot: matches.get_one::<PathBuf>("plot").cloned(),
        csv: matches.get_one::<PathBuf>("csv").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        no_plot: matches.get_flag("no-plot"),
        show: matches.get_flag("show"),
        inversion,
    };

    match app_logic::run(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
