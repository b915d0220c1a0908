//! Core module for the somatic variant-calling workflow
//!
//! This module contains the task graph behind the Mutect2 somatic
//! pipeline: five named steps wired by filename conventions, each
//! expanding into per-sample task instances that wrap one GATK
//! invocation. Steps run in the topological order of their
//! declared dependencies; instances within a step run
//! concurrently, bounded by the requested job count.
//!
//! A failing instance fails its step with the tool's stderr, and
//! no dependent step starts. Outputs of completed steps stay on
//! disk, so a fixed run can resume from the filesystem state.

use anyhow::{anyhow, bail, Result};
use config::{
    get_progress_bar, ARTIFACT_SUFFIX, BAM_SUFFIX, FILTERED_SUFFIX, MUTECT_BAM_SUFFIX,
    MUTECT_VCF_SUFFIX, OXOG_SUFFIX, PRE_ADAPTER_SUFFIX, SAMPLENAME_SUFFIX, TUMOR_TAG,
};
use log::info;
use rayon::prelude::*;

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::cli::Args;
use crate::utils::{discover_bams, pair_samples, read_sample_name, swap_suffix, SamplePair};

/// One of the five workflow steps, named after its GATK tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    GetSampleName,
    Mutect2,
    FilterMutectCalls,
    CollectSequencingArtifactMetrics,
    FilterByOrientationBias,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::GetSampleName,
        Step::Mutect2,
        Step::FilterMutectCalls,
        Step::CollectSequencingArtifactMetrics,
        Step::FilterByOrientationBias,
    ];

    /// Steps whose outputs this step consumes.
    pub fn after(&self) -> &'static [Step] {
        match self {
            Step::GetSampleName => &[],
            Step::Mutect2 => &[Step::GetSampleName],
            Step::FilterMutectCalls => &[Step::Mutect2],
            Step::CollectSequencingArtifactMetrics => &[Step::Mutect2],
            Step::FilterByOrientationBias => {
                &[Step::FilterMutectCalls, Step::CollectSequencingArtifactMetrics]
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::GetSampleName => "GetSampleName",
            Step::Mutect2 => "Mutect2",
            Step::FilterMutectCalls => "FilterMutectCalls",
            Step::CollectSequencingArtifactMetrics => "CollectSequencingArtifactMetrics",
            Step::FilterByOrientationBias => "FilterByOrientationBias",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Orders steps so every step comes after the steps it consumes.
///
/// A dependency outside the requested set counts as satisfied.
/// Ties break by declaration order, so the result is stable.
pub fn topological_order(steps: &[Step]) -> Result<Vec<Step>> {
    let mut remaining = steps.to_vec();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready = remaining
            .iter()
            .position(|step| step.after().iter().all(|dep| !remaining.contains(dep)));

        match ready {
            Some(idx) => order.push(remaining.remove(idx)),
            None => bail!("Workflow steps form a dependency cycle"),
        }
    }

    Ok(order)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TaskKind {
    GetSampleName {
        bam: PathBuf,
        out: PathBuf,
    },
    Mutect2 {
        tumor_bam: PathBuf,
        normal_bam: PathBuf,
        tumor_names: PathBuf,
        normal_names: PathBuf,
        vcf: PathBuf,
        bamout: PathBuf,
    },
    FilterCalls {
        vcf: PathBuf,
        out: PathBuf,
    },
    ArtifactMetrics {
        bam: PathBuf,
        out: PathBuf,
    },
    OrientationBias {
        vcf: PathBuf,
        metrics: PathBuf,
        out: PathBuf,
    },
}

/// A single executable task instance within a step.
///
/// `inputs` are the files that must exist before the instance may
/// run; `outputs` are the files the instance is expected to leave
/// behind for dependent steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub step: Step,
    pub sample: String,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    kind: TaskKind,
}

impl Task {
    /// Verifies that every declared input exists on disk.
    pub fn check_inputs(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                bail!(
                    "{} for sample {} is missing input {:?}",
                    self.step,
                    self.sample,
                    input
                );
            }
        }

        Ok(())
    }

    /// Shell words for this instance, with sample names resolved.
    ///
    /// Mutect2 reads the tumor/normal names from the sample-name
    /// files here, at execution time; the files are written by the
    /// GetSampleName step and do not exist at planning time.
    pub fn argv(&self, args: &Args) -> Result<Vec<String>> {
        if let TaskKind::Mutect2 {
            tumor_names,
            normal_names,
            ..
        } = &self.kind
        {
            let tumor = read_sample_name(tumor_names)?;
            let normal = read_sample_name(normal_names)?;

            return Ok(self.assemble(args, &tumor, &normal));
        }

        Ok(self.assemble(args, "", ""))
    }

    /// One-line preview of this instance for `--dry-run` output.
    ///
    /// Sample names are shown as `$(file)` placeholders since the
    /// files they come from may not exist yet.
    pub fn preview(&self, args: &Args) -> String {
        if let TaskKind::Mutect2 {
            tumor_names,
            normal_names,
            ..
        } = &self.kind
        {
            let tumor = format!("$({})", tumor_names.display());
            let normal = format!("$({})", normal_names.display());

            return self.assemble(args, &tumor, &normal).join(" ");
        }

        self.assemble(args, "", "").join(" ")
    }

    fn assemble(&self, args: &Args, tumor_name: &str, normal_name: &str) -> Vec<String> {
        let mut argv = vec![
            "java".to_string(),
            format!("-Xmx{}", args.memory),
            "-jar".to_string(),
            args.gatk.display().to_string(),
        ];

        match &self.kind {
            TaskKind::GetSampleName { bam, out } => {
                argv.push("GetSampleName".to_string());
                argv.extend(flag("-I", bam));
                argv.extend(flag("-O", out));
            }
            TaskKind::Mutect2 {
                tumor_bam,
                normal_bam,
                vcf,
                bamout,
                ..
            } => {
                argv.push("Mutect2".to_string());
                argv.extend(flag("-R", &args.reference));
                argv.extend(flag("-I", tumor_bam));
                argv.extend(flag("-I", normal_bam));
                argv.extend(["-tumor".to_string(), tumor_name.to_string()]);
                argv.extend(["-normal".to_string(), normal_name.to_string()]);
                argv.extend(flag("-O", vcf));
                argv.extend(flag("-bamout", bamout));
                argv.extend(flag("--germline-resource", &args.germline));
            }
            TaskKind::FilterCalls { vcf, out } => {
                argv.push("FilterMutectCalls".to_string());
                argv.extend(flag("-V", vcf));
                argv.extend(flag("-O", out));
            }
            TaskKind::ArtifactMetrics { bam, out } => {
                argv.push("CollectSequencingArtifactMetrics".to_string());
                argv.extend(flag("-I", bam));
                argv.extend(flag("-O", out));
                argv.extend(flag("-R", &args.reference));
            }
            TaskKind::OrientationBias { vcf, metrics, out } => {
                argv.push("FilterByOrientationBias".to_string());
                argv.extend(flag("-V", vcf));
                argv.extend(["--artifact-modes".to_string(), "G/T".to_string()]);
                argv.extend(flag("-P", metrics));
                argv.extend(flag("-O", out));
            }
        }

        argv
    }

    /// Runs this instance, surfacing the tool's stderr on failure.
    fn execute(&self, args: &Args) -> Result<()> {
        let argv = self.argv(args)?;
        info!("{}: {}", self.step, argv.join(" "));

        let output = Command::new(&argv[0]).args(&argv[1..]).output()?;

        if !output.status.success() {
            bail!(
                "{} failed for sample {}: {}",
                self.step,
                self.sample,
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(())
    }
}

fn flag(name: &str, value: &Path) -> [String; 2] {
    [name.to_string(), value.display().to_string()]
}

fn rename(path: &Path, from: &str, to: &str) -> Result<PathBuf> {
    swap_suffix(path, from, to)
        .ok_or_else(|| anyhow!("Cannot rewrite {:?} from '{}' to '{}'", path, from, to))
}

/// The full workflow plan: steps in topological order, each with
/// its per-sample task instances.
#[derive(Debug)]
pub struct Plan {
    pub steps: Vec<(Step, Vec<Task>)>,
}

/// Plans the workflow over the bams found in the working directory.
///
/// Planning is pure filename arithmetic: it discovers the
/// `*_WEX.bam` files, collates them into tumor/normal pairs and
/// expands every step into its task instances. Nothing is read
/// beyond the directory listing and nothing is executed.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Returns
///
/// The plan, with steps in topological order.
pub fn plan_workflow(args: &Args) -> Result<Plan> {
    let bams = discover_bams(&args.dir)?;
    if bams.is_empty() {
        bail!("No *{} files found in {:?}", BAM_SUFFIX, args.dir);
    }

    let pairs = pair_samples(&bams)?;
    info!(
        "Found {} bam(s) forming {} tumor/normal pair(s)",
        bams.len(),
        pairs.len()
    );

    let mut steps = Vec::with_capacity(Step::ALL.len());
    for step in topological_order(&Step::ALL)? {
        let tasks = match step {
            Step::GetSampleName => samplename_tasks(&bams)?,
            Step::Mutect2 => mutect_tasks(&pairs)?,
            Step::FilterMutectCalls => filter_tasks(&pairs)?,
            Step::CollectSequencingArtifactMetrics => artifact_tasks(&pairs)?,
            Step::FilterByOrientationBias => orientation_tasks(&pairs)?,
        };

        steps.push((step, tasks));
    }

    Ok(Plan { steps })
}

fn samplename_tasks(bams: &[PathBuf]) -> Result<Vec<Task>> {
    bams.iter()
        .map(|bam| {
            let out = rename(bam, BAM_SUFFIX, SAMPLENAME_SUFFIX)?;
            let sample = bam
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(BAM_SUFFIX))
                .map(|stem| stem.to_string())
                .ok_or_else(|| anyhow!("Cannot read a sample prefix from {:?}", bam))?;

            Ok(Task {
                step: Step::GetSampleName,
                sample,
                inputs: vec![bam.clone()],
                outputs: vec![out.clone()],
                kind: TaskKind::GetSampleName {
                    bam: bam.clone(),
                    out,
                },
            })
        })
        .collect()
}

fn mutect_tasks(pairs: &[SamplePair]) -> Result<Vec<Task>> {
    let tagged = format!("{}{}", TUMOR_TAG, BAM_SUFFIX);

    pairs
        .iter()
        .map(|pair| {
            let tumor_names = rename(&pair.tumor, BAM_SUFFIX, SAMPLENAME_SUFFIX)?;
            let normal_names = rename(&pair.normal, BAM_SUFFIX, SAMPLENAME_SUFFIX)?;
            let vcf = rename(&pair.tumor, &tagged, MUTECT_VCF_SUFFIX)?;
            let bamout = rename(&pair.tumor, &tagged, MUTECT_BAM_SUFFIX)?;

            Ok(Task {
                step: Step::Mutect2,
                sample: pair.sample.clone(),
                inputs: vec![
                    pair.tumor.clone(),
                    pair.normal.clone(),
                    tumor_names.clone(),
                    normal_names.clone(),
                ],
                outputs: vec![vcf.clone(), bamout.clone()],
                kind: TaskKind::Mutect2 {
                    tumor_bam: pair.tumor.clone(),
                    normal_bam: pair.normal.clone(),
                    tumor_names,
                    normal_names,
                    vcf,
                    bamout,
                },
            })
        })
        .collect()
}

fn filter_tasks(pairs: &[SamplePair]) -> Result<Vec<Task>> {
    let tagged = format!("{}{}", TUMOR_TAG, BAM_SUFFIX);

    pairs
        .iter()
        .map(|pair| {
            let vcf = rename(&pair.tumor, &tagged, MUTECT_VCF_SUFFIX)?;
            let out = rename(&vcf, MUTECT_VCF_SUFFIX, FILTERED_SUFFIX)?;

            Ok(Task {
                step: Step::FilterMutectCalls,
                sample: pair.sample.clone(),
                inputs: vec![vcf.clone()],
                outputs: vec![out.clone()],
                kind: TaskKind::FilterCalls { vcf, out },
            })
        })
        .collect()
}

fn artifact_tasks(pairs: &[SamplePair]) -> Result<Vec<Task>> {
    let tagged = format!("{}{}", TUMOR_TAG, BAM_SUFFIX);

    pairs
        .iter()
        .map(|pair| {
            let bam = rename(&pair.tumor, &tagged, MUTECT_BAM_SUFFIX)?;
            let out = rename(&bam, MUTECT_BAM_SUFFIX, ARTIFACT_SUFFIX)?;
            let metrics = rename(&bam, MUTECT_BAM_SUFFIX, PRE_ADAPTER_SUFFIX)?;

            Ok(Task {
                step: Step::CollectSequencingArtifactMetrics,
                sample: pair.sample.clone(),
                inputs: vec![bam.clone()],
                outputs: vec![metrics],
                kind: TaskKind::ArtifactMetrics { bam, out },
            })
        })
        .collect()
}

fn orientation_tasks(pairs: &[SamplePair]) -> Result<Vec<Task>> {
    let tagged = format!("{}{}", TUMOR_TAG, BAM_SUFFIX);

    pairs
        .iter()
        .map(|pair| {
            let vcf = rename(&pair.tumor, &tagged, FILTERED_SUFFIX)?;
            let metrics = rename(&pair.tumor, &tagged, PRE_ADAPTER_SUFFIX)?;
            let out = rename(&pair.tumor, &tagged, OXOG_SUFFIX)?;

            Ok(Task {
                step: Step::FilterByOrientationBias,
                sample: pair.sample.clone(),
                inputs: vec![vcf.clone(), metrics.clone()],
                outputs: vec![out.clone()],
                kind: TaskKind::OrientationBias { vcf, metrics, out },
            })
        })
        .collect()
}

/// Renders the plan as one line per task instance, grouped by step.
pub fn render_plan(plan: &Plan, args: &Args) -> String {
    let mut out = String::new();

    for (step, tasks) in &plan.steps {
        out.push_str(&format!("step {} [{} task(s)]\n", step, tasks.len()));
        for task in tasks {
            out.push_str(&format!("  {}\n", task.preview(args)));
        }
    }

    out
}

/// Plans and runs the workflow.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Returns
///
/// Nothing. With `--dry-run` the plan is printed and nothing runs.
///
/// # Example
///
/// ```rust, no_run
/// use clap::{self, Parser};
/// use dna_mutect::cli::Args;
/// use dna_mutect::core::run_workflow;
///
/// let args = Args::parse();
/// run_workflow(args).unwrap();
/// ```
pub fn run_workflow(args: Args) -> Result<()> {
    let plan = plan_workflow(&args)?;

    if args.dry_run {
        println!("{}", render_plan(&plan, &args));
        return Ok(());
    }

    for (step, tasks) in &plan.steps {
        info!("Running step {} with {} task(s)...", step, tasks.len());
        let pb = get_progress_bar(tasks.len() as u64, step.name());

        tasks.par_iter().try_for_each(|task| -> Result<()> {
            task.check_inputs()?;
            task.execute(&args)?;
            pb.inc(1);

            Ok(())
        })?;

        pb.finish_and_clear();
    }

    info!("Workflow complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: PathBuf) -> Args {
        Args {
            dir,
            gatk: PathBuf::from("gatk.jar"),
            reference: PathBuf::from("grch37.fa"),
            germline: PathBuf::from("germline.vcf.gz"),
            memory: "8g".to_string(),
            jobs: 2,
            dry_run: false,
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "s1_T_WEX.bam",
            "s1_N_WEX.bam",
            "s2_T_WEX.bam",
            "s2_N_WEX.bam",
            "pool_WEX.bam",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        dir
    }

    #[test]
    fn declared_order_is_already_topological() {
        let order = topological_order(&Step::ALL).unwrap();

        assert_eq!(
            order,
            vec![
                Step::GetSampleName,
                Step::Mutect2,
                Step::FilterMutectCalls,
                Step::CollectSequencingArtifactMetrics,
                Step::FilterByOrientationBias,
            ]
        );
    }

    #[test]
    fn shuffled_steps_still_order_after_their_dependencies() {
        let mut shuffled = Step::ALL.to_vec();
        shuffled.reverse();

        let order = topological_order(&shuffled).unwrap();

        assert_eq!(order.len(), Step::ALL.len());
        for (idx, step) in order.iter().enumerate() {
            for dep in step.after() {
                let at = order.iter().position(|other| other == dep).unwrap();
                assert!(at < idx, "{} ran before its dependency {}", step, dep);
            }
        }
    }

    #[test]
    fn plan_expands_every_step_per_sample() {
        let dir = fixture();
        let plan = plan_workflow(&args(dir.path().to_path_buf())).unwrap();

        let counts = plan
            .steps
            .iter()
            .map(|(step, tasks)| (*step, tasks.len()))
            .collect::<Vec<_>>();

        assert_eq!(
            counts,
            vec![
                (Step::GetSampleName, 5),
                (Step::Mutect2, 2),
                (Step::FilterMutectCalls, 2),
                (Step::CollectSequencingArtifactMetrics, 2),
                (Step::FilterByOrientationBias, 2),
            ]
        );
    }

    #[test]
    fn dataflow_is_wired_by_filename_suffixes() {
        let dir = fixture();
        let plan = plan_workflow(&args(dir.path().to_path_buf())).unwrap();

        let (_, mutect) = &plan.steps[1];
        assert_eq!(mutect[0].outputs[0], dir.path().join("s1_mutect2.vcf.gz"));
        assert_eq!(mutect[0].outputs[1], dir.path().join("s1_mutect2.bam"));

        let (_, orientation) = &plan.steps[4];
        assert_eq!(
            orientation[0].inputs,
            vec![
                dir.path().join("s1_filtercalls.vcf.gz"),
                dir.path().join("s1_artifacts.pre_adapter_detail_metrics"),
            ]
        );
        assert_eq!(
            orientation[0].outputs,
            vec![dir.path().join("s1_oxog_filtered.vcf.gz")]
        );
    }

    #[test]
    fn mutect_argv_matches_the_tool_contract() {
        let dir = fixture();
        std::fs::write(dir.path().join("s1_T_samplename.txt"), "TUMOR01\n").unwrap();
        std::fs::write(dir.path().join("s1_N_samplename.txt"), "NORMAL01\n").unwrap();

        let args = args(dir.path().to_path_buf());
        let plan = plan_workflow(&args).unwrap();
        let task = &plan.steps[1].1[0];

        let path = |name: &str| dir.path().join(name).display().to_string();
        let expected = vec![
            "java".to_string(),
            "-Xmx8g".to_string(),
            "-jar".to_string(),
            "gatk.jar".to_string(),
            "Mutect2".to_string(),
            "-R".to_string(),
            "grch37.fa".to_string(),
            "-I".to_string(),
            path("s1_T_WEX.bam"),
            "-I".to_string(),
            path("s1_N_WEX.bam"),
            "-tumor".to_string(),
            "TUMOR01".to_string(),
            "-normal".to_string(),
            "NORMAL01".to_string(),
            "-O".to_string(),
            path("s1_mutect2.vcf.gz"),
            "-bamout".to_string(),
            path("s1_mutect2.bam"),
            "--germline-resource".to_string(),
            "germline.vcf.gz".to_string(),
        ];

        assert_eq!(task.argv(&args).unwrap(), expected);
    }

    #[test]
    fn samplename_argv_matches_the_tool_contract() {
        let dir = fixture();
        let args = args(dir.path().to_path_buf());
        let plan = plan_workflow(&args).unwrap();

        let task = &plan.steps[0].1[0];
        let argv = task.argv(&args).unwrap();

        assert_eq!(argv[4], "GetSampleName");
        assert_eq!(argv[5], "-I");
        assert_eq!(argv[6], dir.path().join("pool_WEX.bam").display().to_string());
        assert_eq!(
            argv[8],
            dir.path().join("pool_samplename.txt").display().to_string()
        );
    }

    #[test]
    fn orientation_argv_filters_oxog_artifacts() {
        let dir = fixture();
        let args = args(dir.path().to_path_buf());
        let plan = plan_workflow(&args).unwrap();

        let task = &plan.steps[4].1[0];
        let argv = task.argv(&args).unwrap();

        assert!(argv.contains(&"FilterByOrientationBias".to_string()));
        assert!(argv.contains(&"--artifact-modes".to_string()));
        assert!(argv.contains(&"G/T".to_string()));
        assert!(argv.contains(
            &dir.path()
                .join("s1_artifacts.pre_adapter_detail_metrics")
                .display()
                .to_string()
        ));
    }

    #[test]
    fn planning_fails_without_bams() {
        let dir = tempfile::tempdir().unwrap();

        assert!(plan_workflow(&args(dir.path().to_path_buf())).is_err());
    }

    #[test]
    fn missing_inputs_gate_the_task() {
        let dir = fixture();
        let plan = plan_workflow(&args(dir.path().to_path_buf())).unwrap();

        // sample-name files are not written until GetSampleName runs
        let task = &plan.steps[1].1[0];
        let err = task.check_inputs().unwrap_err().to_string();

        assert!(err.contains("missing input"));
        assert!(err.contains("s1_T_samplename.txt"));
    }

    #[test]
    fn preview_defers_sample_name_resolution() {
        let dir = fixture();
        let args = args(dir.path().to_path_buf());
        let plan = plan_workflow(&args).unwrap();

        let preview = plan.steps[1].1[0].preview(&args);

        assert!(preview.contains("-tumor $("));
        assert!(preview.contains("s1_T_samplename.txt"));
    }

    #[test]
    fn dry_run_plans_without_executing() {
        let dir = fixture();
        let mut args = args(dir.path().to_path_buf());
        args.dry_run = true;

        assert!(run_workflow(args).is_ok());
        assert!(!dir.path().join("s1_T_samplename.txt").exists());
    }

    #[test]
    fn rendered_plan_lists_every_step() {
        let dir = fixture();
        let args = args(dir.path().to_path_buf());
        let plan = plan_workflow(&args).unwrap();

        let rendered = render_plan(&plan, &args);

        for step in Step::ALL {
            assert!(rendered.contains(step.name()));
        }
    }
}
