//! `laser-calib` binary.
//!
//! Runs the calibration-target estimation loop against the simulated rig and
//! prints the resulting report. A JSON config file provides the run
//! configuration; omitted fields fall back to the shipped target defaults.

mod sim;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use laser_calib::core::{
    init_with_level, CalibrationConfig, CalibrationError, ConfigError, ConfigIoError, MountSide,
    TargetPose2D,
};
use laser_calib::{run_calibration, CalibrationReport, PlanarCheckerboard, RunOutcome};

use sim::{FixedMountLookup, SimulatedDetector, SimulatedScanner};

#[derive(Parser)]
#[command(
    name = "laser-calib",
    about = "Estimate the pose of a three-cylinder calibration target from 2D laser scans",
    version
)]
struct Cli {
    /// JSON run configuration; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scanner mount side used when no config file is given.
    #[arg(long, default_value = "front")]
    mount_side: String,

    /// Seed for the simulated scanner and detector.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Probability that a simulated detection misses, 0..1.
    #[arg(long, default_value_t = 0.15)]
    miss_rate: f64,

    /// Simulated target pose in the sensor frame: x, meters.
    #[arg(long, default_value_t = 1.2)]
    target_x: f64,

    /// Simulated target pose in the sensor frame: y, meters.
    #[arg(long, default_value_t = 0.3)]
    target_y: f64,

    /// Simulated target pose in the sensor frame: yaw, radians.
    #[arg(long, default_value_t = 0.25)]
    target_yaw: f64,

    /// Write the full JSON report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    ConfigIo(#[from] ConfigIoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("failed to write report: {0}")]
    ReportIo(#[from] std::io::Error),
    #[error("failed to encode report: {0}")]
    ReportJson(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = init_with_level(level);

    match run(&cli) {
        Ok(report) => {
            print_report(&report);
            match report.outcome {
                RunOutcome::Succeeded => ExitCode::SUCCESS,
                RunOutcome::Failed => ExitCode::FAILURE,
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<CalibrationReport, CliError> {
    let config = match &cli.config {
        Some(path) => CalibrationConfig::load_json(path)?,
        None => CalibrationConfig::new(cli.mount_side.parse::<MountSide>()?),
    };

    let scanner = SimulatedScanner::new(cli.seed);
    let detector = SimulatedDetector::new(
        cli.seed.wrapping_add(1),
        TargetPose2D::new(cli.target_x, cli.target_y, cli.target_yaw),
        cli.miss_rate,
    );
    let projector = PlanarCheckerboard::default();

    let report = run_calibration(&config, &scanner, &FixedMountLookup, &detector, &projector)?;

    if let Some(path) = &cli.report {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }

    Ok(report)
}

fn print_report(report: &CalibrationReport) {
    println!("accepted target poses:");
    for pose in &report.accepted {
        println!(
            "  position ({:.4}, {:.4}, {:.4})  yaw {:.4}",
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.yaw()
        );
    }

    println!("\ncalibration target pose (mean):");
    println!(
        "  position ({:.4}, {:.4}, {:.4})  rotation ({:.4}, {:.4}, {:.4})",
        report.mean.position.x,
        report.mean.position.y,
        report.mean.position.z,
        report.mean.rotation.x,
        report.mean.rotation.y,
        report.mean.rotation.z
    );

    println!("\ndeviation:");
    println!(
        "  position ({:.4}, {:.4}, {:.4})  rotation ({:.4}, {:.4}, {:.4})",
        report.deviation.position.x,
        report.deviation.position.y,
        report.deviation.position.z,
        report.deviation.rotation.x,
        report.deviation.rotation.y,
        report.deviation.rotation.z
    );

    println!("\ncheckerboard points:");
    for point in &report.checkerboard_points {
        println!("  ({:.4}, {:.4}, {:.4})", point.x, point.y, point.z);
    }

    println!(
        "\n>>> {} ({} accepted, {} missed, {} iterations)",
        match report.outcome {
            RunOutcome::Succeeded => "SUCCEEDED to estimate the calibration target pose",
            RunOutcome::Failed => "FAILED to estimate the calibration target pose",
        },
        report.success_count,
        report.fail_count,
        report.iterations
    );
}
