// src/cli.rs
use std::{env, path::Path, path::PathBuf, process::ExitCode};

use color_eyre::eyre::{Result, eyre};

use crate::config::Job;
use crate::progress::Progress;
use crate::runner::{self, Report};

/// Optional positional input directory; everything else about a job is fixed.
pub fn input_dir(default_dir: &str) -> Result<PathBuf> {
    let mut dir: Option<PathBuf> = None;
    for a in env::args().skip(1) {
        match a.as_str() {
            "-h" | "--help" => {
                let prog = env::args().next().unwrap_or_else(|| s!("split"));
                eprintln!("Usage: {prog} [INPUT_DIR]   (default: {default_dir})");
                std::process::exit(0);
            }
            _ if a.starts_with('-') => return Err(eyre!("Unknown arg: {a}")),
            _ if dir.is_some() => return Err(eyre!("Only one input directory is accepted, got another: {a}")),
            _ => dir = Some(PathBuf::from(a)),
        }
    }
    Ok(dir.unwrap_or_else(|| PathBuf::from(default_dir)))
}

/// Prints one line per finished input.
pub struct ConsoleProgress {
    done: usize,
    total: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self { done: 0, total: 0 }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn item_done(&mut self, input: &Path, ok: bool) {
        self.done += 1;
        let status = if ok { "ok" } else { "FAILED" };
        println!("[{}/{}] {} {status}", self.done, self.total, input.display());
    }
}

/// Run a job and print the report. Non-zero exit if any file failed;
/// `NoInputFiles` and setup errors surface as `Err`.
pub fn run(job: Job) -> Result<ExitCode> {
    let mut progress = ConsoleProgress::new();
    let report = runner::run(&job, Some(&mut progress))?;
    print_report(&report);
    Ok(if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

pub fn print_report(report: &Report) {
    let (out, err) = report_lines(report);
    for line in err {
        eprintln!("{line}");
    }
    for line in out {
        println!("{line}");
    }
}

/// Report as (stdout, stderr) lines.
fn report_lines(report: &Report) -> (Vec<String>, Vec<String>) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    for path in &report.written {
        out.push(format!("Created: {}", path.display()));
    }
    for path in &report.skipped_outputs {
        out.push(format!("Skipped: {} (output of another input)", path.display()));
    }
    for (input, partition) in &report.skipped_empty {
        out.push(format!("Skipped: {} ({partition} has no rows)", input.display()));
    }
    for (input, keys) in &report.unclaimed {
        err.push(format!("Warning: {}: not in any partition: {}", input.display(), keys.join(", ")));
    }
    for (input, e) in &report.failures {
        err.push(format!("{}: {}: {e}", input.display(), e.kind()));
    }
    out.push(format!(
        "\nFiles: {} ok, {} failed. Partitions written: {}.",
        report.files_ok,
        report.files_failed(),
        report.partitions_written()
    ));
    (out, err)
}
