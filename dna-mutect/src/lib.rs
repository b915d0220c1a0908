//! Core module for the somatic variant-calling workflow
//!
//! This module contains the task graph behind the Mutect2 somatic
//! pipeline: five named steps wired by filename conventions, each
//! expanding into per-sample task instances that wrap one GATK
//! invocation. Steps run in the topological order of their
//! declared dependencies; instances within a step run
//! concurrently, bounded by the requested job count.

pub mod cli;
pub mod core;
pub mod utils;

use anyhow::Result;

/// Runs the workflow from an in-process argument vector.
pub fn lib_dna_mutect(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    core::run_workflow(args)
}
