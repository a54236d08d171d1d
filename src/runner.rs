// src/runner.rs
use std::collections::HashSet;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
    mpsc,
};
use std::thread;

use log::{debug, info, warn};

use crate::{
    config::Job,
    file::{discover, ensure_directory, read_template, write_atomic},
    patch,
    progress::Progress,
    split::{Result, SplitError, split_document},
};

/// Summary of a batch run. Every list is sorted by path, so the report does not
/// depend on which worker finished first.
#[derive(Debug, Default)]
pub struct Report {
    /// Input files attempted (successes + failures).
    pub files_processed: usize,
    pub files_ok: usize,
    pub written: Vec<PathBuf>,
    /// (input, partition) pairs not written because they had no rows and skip-on-empty was set.
    pub skipped_empty: Vec<(PathBuf, String)>,
    /// Discovered files left alone because they are outputs of another input.
    pub skipped_outputs: Vec<PathBuf>,
    /// Category keys present in an input but claimed by no partition.
    pub unclaimed: Vec<(PathBuf, Vec<String>)>,
    pub failures: Vec<(PathBuf, SplitError)>,
}

impl Report {
    pub fn partitions_written(&self) -> usize {
        self.written.len()
    }

    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What one input produced.
#[derive(Debug)]
struct FileDone {
    input: PathBuf,
    written: Vec<PathBuf>,
    skipped_empty: Vec<String>,
    unclaimed: Vec<String>,
}

type FileResult = std::result::Result<FileDone, (PathBuf, SplitError)>;

/// Discover inputs, split each one, write every partition.
/// Per-file errors land in the report; only "nothing to do" and setup problems are `Err`.
pub fn run(job: &Job, mut progress: Option<&mut dyn Progress>) -> Result<Report> {
    let discovered = discover(&job.input_dir, &job.patterns)?;
    let out_dir = job.resolved_out_dir().to_path_buf();

    // Re-runs must not split their own outputs.
    let produced: HashSet<PathBuf> = discovered
        .iter()
        .flat_map(|input| {
            output_candidates(job, &out_dir, input)
                .into_iter()
                .filter(move |out| out != input)
        })
        .collect();
    let (files, skipped_outputs): (Vec<PathBuf>, Vec<PathBuf>) =
        discovered.into_iter().partition(|p| !produced.contains(p));
    for p in &skipped_outputs {
        debug!("skipping {} (output of another input)", p.display());
    }

    if files.is_empty() {
        return Err(SplitError::NoInputFiles {
            dir: job.input_dir.clone(),
            patterns: job.patterns.clone(),
        });
    }
    ensure_directory(&out_dir)?;

    if job.taxonomy.is_empty() {
        warn!("taxonomy has no partitions; nothing will be written");
    }
    info!("splitting {} file(s) from {}", files.len(), job.input_dir.display());

    if let Some(p) = progress.as_deref_mut() {
        p.begin(files.len());
        p.log(&format!("Splitting {} file(s)…", files.len()));
    }

    // Concurrency
    let files = Arc::new(files);
    let shared_job = Arc::new(job.clone());
    let out_dir = Arc::new(out_dir);
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<(usize, FileResult)>();

    let workers = job.workers.min(files.len()).max(1);

    for _ in 0..workers {
        let files = Arc::clone(&files);
        let job = Arc::clone(&shared_job);
        let out_dir = Arc::clone(&out_dir);
        let idx = Arc::clone(&counter);
        let tx = res_tx.clone();

        thread::spawn(move || {
            loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= files.len() {
                    break;
                }
                let input = &files[i];
                // A panic costs this file, not the worker or the batch.
                let result = panic::catch_unwind(AssertUnwindSafe(|| process_file(&job, &out_dir, input)))
                    .unwrap_or_else(|payload| Err(SplitError::WorkerLost { reason: panic_reason(&*payload) }))
                    .map_err(|e| (input.clone(), e));
                if tx.send((i, result)).is_err() {
                    break;
                }
            }
        });
    }
    drop(res_tx); // main thread is sole receiver now

    // Aggregate results
    let mut report = Report { skipped_outputs, ..Report::default() };

    let mut reported = vec![false; files.len()];

    for _ in 0..files.len() {
        let Ok((i, result)) = res_rx.recv() else {
            break; // workers ended early
        };
        reported[i] = true;
        report.files_processed += 1;
        match result {
            Ok(done) => {
                info!("{}: {} partition(s) written", done.input.display(), done.written.len());
                if !done.unclaimed.is_empty() {
                    warn!(
                        "{}: categories outside the taxonomy: {}",
                        done.input.display(),
                        done.unclaimed.join(", ")
                    );
                    report.unclaimed.push((done.input.clone(), done.unclaimed));
                }
                for name in done.skipped_empty {
                    debug!("{}: partition `{name}` has no rows, skipped", done.input.display());
                    report.skipped_empty.push((done.input.clone(), name));
                }
                report.written.extend(done.written);
                report.files_ok += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&done.input, true);
                }
            }
            Err((input, err)) => {
                warn!("{}: {}: {err}", input.display(), err.kind());
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("{}: {}: {err}", input.display(), err.kind()));
                    p.item_done(&input, false);
                }
                report.failures.push((input, err));
            }
        }
    }

    for input in unreported(&files, &reported) {
        let err = SplitError::WorkerLost { reason: s!("no result came back for this file") };
        warn!("{}: {}: {err}", input.display(), err.kind());
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&input, false);
        }
        report.files_processed += 1;
        report.failures.push((input, err));
    }

    report.written.sort();
    report.skipped_empty.sort();
    report.skipped_outputs.sort();
    report.unclaimed.sort_by(|a, b| a.0.cmp(&b.0));
    report.failures.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(report)
}

/// Read, split, name, then write. Nothing is written unless every partition
/// assembled and every output name is valid; a failed write removes this file's
/// earlier outputs.
fn process_file(job: &Job, out_dir: &Path, input: &Path) -> Result<FileDone> {
    let template = read_template(input)?;
    let split = split_document(&template, &job.layout, &job.taxonomy)?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!("{}: {} row(s)", input.display(), split.rows_seen);

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut pending: Vec<(PathBuf, String)> = Vec::with_capacity(split.docs.len());
    let mut skipped_empty = Vec::new();

    for doc in split.docs {
        if job.skip_empty && doc.rows == 0 {
            skipped_empty.push(doc.name);
            continue;
        }
        let out_name = job
            .naming
            .output_name(&file_name, &doc.name)
            .ok_or_else(|| SplitError::OutputName { file: file_name.clone(), partition: doc.name.clone() })?;
        let path = out_dir.join(out_name);
        if path == input || !seen.insert(path.clone()) {
            return Err(SplitError::OutputCollision { path });
        }
        let text = if job.patches.is_empty() { doc.text } else { patch::apply(&doc.text, &job.patches) };
        pending.push((path, text));
    }

    let mut written: Vec<PathBuf> = Vec::with_capacity(pending.len());
    for (path, text) in pending {
        if let Err(e) = write_atomic(&path, &text) {
            // All or nothing per input: take back what this file already wrote.
            for done in &written {
                debug!("{}: removing {} after failed write", input.display(), done.display());
                let _ = fs::remove_file(done);
            }
            return Err(e);
        }
        written.push(path);
    }

    Ok(FileDone { input: input.to_path_buf(), written, skipped_empty, unclaimed: split.unclaimed })
}

/// Paths `input` would be split into (ignoring skip-on-empty).
fn output_candidates(job: &Job, out_dir: &Path, input: &Path) -> Vec<PathBuf> {
    let Some(name) = input.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Vec::new();
    };
    job.taxonomy
        .partitions()
        .iter()
        .filter_map(|spec| job.naming.output_name(&name, &spec.name))
        .map(|out| out_dir.join(out))
        .collect()
}

/// Files whose result never reached the aggregator.
fn unreported(files: &[PathBuf], reported: &[bool]) -> Vec<PathBuf> {
    files
        .iter()
        .zip(reported)
        .filter(|(_, seen)| !**seen)
        .map(|(f, _)| f.clone())
        .collect()
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        s!(*msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        s!("worker panicked")
    }
}
