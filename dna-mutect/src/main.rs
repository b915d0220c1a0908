//! Core module for the somatic variant-calling workflow
//!
//! This module contains the task graph behind the Mutect2 somatic
//! pipeline: five named steps wired by filename conventions, each
//! expanding into per-sample task instances that wrap one GATK
//! invocation.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use dna_mutect::cli::Args;
use dna_mutect::core::run_workflow;

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();
    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs)
        .build_global()
        .unwrap();

    run_workflow(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:?}", elapsed);
}
