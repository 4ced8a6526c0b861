use std::io::Write;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

mod config;
mod pipeline;

use config::{Cli, Config};

fn main() -> ExitCode {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    log::info!("input files: {:?}", args.input);
    log::info!("output: {}", args.output.display());
    log::info!("mode: {:?}", args.mode);

    let config = match Config::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("output format: {:?}", config.output_format);

    let start = std::time::Instant::now();
    log::info!("start processing...");

    let reports = match pipeline::run(&config) {
        Ok(reports) => reports,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for report in &reports {
        log::debug!(
            "{:?} -> {:?} ({} written)",
            report.input,
            report.output,
            report.written
        );
    }

    let accepted: usize = reports.iter().map(|r| r.accepted).sum();
    let skipped: usize = reports.iter().map(|r| r.skipped).sum();
    log::info!(
        "converted {} file(s): {} points accepted, {} records skipped",
        reports.len(),
        accepted,
        skipped
    );
    log::info!("Elapsed: {:?}", start.elapsed());
    log::info!("Finish processing");

    ExitCode::SUCCESS
}
