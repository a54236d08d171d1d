// tests/batch_runner.rs
//
// End-to-end runs of the batch driver against scratch directories.
//
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use chart_split::config::{Job, Layout, Naming, PartitionSpec, Taxonomy};
use chart_split::patch::Rule;
use chart_split::progress::Progress;
use chart_split::{SplitError, run};

fn resp_chart(keys: &[&str]) -> String {
    let mut doc = String::from("<html>\n<head>\n<title>Risk 7 - All Actors</title>\n</head>\n<body>\n<table>\n<tbody>\n");
    for k in keys {
        doc.push_str(&format!("  <tr data-actor=\"{k}\">\n    <td>{k}</td>\n  </tr>\n"));
    }
    doc.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    doc
}

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn resp_preset_writes_required_and_optional() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "risk7_resp_actors_chart.html", &resp_chart(&["ai_stake", "ai_user", "ai_dev_gen"]));

    let report = run(&Job::resp_actors(dir.path()).workers(1), None).unwrap();
    assert!(report.is_success());
    assert_eq!(report.files_ok, 1);
    assert_eq!(report.partitions_written(), 2);

    let required = read(dir.path(), "risk7_resp_actors_required_chart.html");
    assert!(required.contains("<title>Risk 7 - Required Actors</title>"));
    let dev = required.find("data-actor=\"ai_dev_gen\"").unwrap();
    let user = required.find("data-actor=\"ai_user\"").unwrap();
    assert!(dev < user, "key-list order, not document order");
    assert!(!required.contains("ai_stake"));

    let optional = read(dir.path(), "risk7_resp_actors_optional_chart.html");
    assert!(optional.contains("Optional Actors"));
    assert!(optional.contains("ai_stake"));
    assert!(!optional.contains("ai_user"));
}

#[test]
fn one_bad_file_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "risk1_resp_actors_chart.html", &resp_chart(&["ai_user"]));
    let broken = resp_chart(&["ai_user"]).replace("<tr data-actor=\"ai_user\">", "<tr>");
    write(dir.path(), "risk2_resp_actors_chart.html", &broken);
    write(dir.path(), "risk3_resp_actors_chart.html", &resp_chart(&["ai_infra"]));

    let report = run(&Job::resp_actors(dir.path()), None).unwrap();
    assert_eq!(report.files_processed, 3);
    assert_eq!(report.files_ok, 2);
    assert_eq!(report.files_failed(), 1);
    assert!(!report.is_success());

    let (failed, err) = &report.failures[0];
    assert!(failed.ends_with("risk2_resp_actors_chart.html"));
    assert_eq!(err.kind(), "MissingCategoryKey");

    assert!(read(dir.path(), "risk1_resp_actors_required_chart.html").contains("ai_user"));
    assert!(read(dir.path(), "risk3_resp_actors_optional_chart.html").contains("ai_infra"));
    assert!(!dir.path().join("risk2_resp_actors_required_chart.html").exists());
    assert!(!dir.path().join("risk2_resp_actors_optional_chart.html").exists());
}

#[test]
fn no_matching_files_is_batch_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "unrelated.html", "<tbody>\n</tbody>\n");
    let err = run(&Job::sector_groups(dir.path()), None).unwrap_err();
    assert!(matches!(err, SplitError::NoInputFiles { .. }));
}

#[test]
fn rerun_leaves_previous_outputs_alone() {
    let dir = tempfile::tempdir().unwrap();
    let job = Job::new(
        dir.path(),
        Layout::new("data-actor", "All Actors"),
        Taxonomy::resp_actors(),
        Naming::BeforeExtension,
    )
    .pattern("*.html");
    write(dir.path(), "chart.html", &resp_chart(&["ai_user", "ai_infra"]));

    let first = run(&job, None).unwrap();
    assert_eq!(first.partitions_written(), 2);

    let second = run(&job, None).unwrap();
    assert_eq!(second.files_processed, 1);
    assert_eq!(second.skipped_outputs.len(), 2);
    assert!(second.skipped_outputs[0].ends_with("chart_optional.html"));
    assert!(second.skipped_outputs[1].ends_with("chart_required.html"));
}

#[test]
fn unclaimed_and_empty_partitions_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    write(dir.path(), "risk5_resp_actors_chart.html", &resp_chart(&["ai_user", "mystery"]));

    let job = Job::resp_actors(dir.path()).out_dir(&out).skip_empty(true);
    let report = run(&job, None).unwrap();

    assert_eq!(report.written.len(), 1);
    assert!(report.written[0].starts_with(&out));
    assert_eq!(report.skipped_empty.len(), 1);
    assert_eq!(report.skipped_empty[0].1, "optional");
    assert_eq!(report.unclaimed.len(), 1);
    assert_eq!(report.unclaimed[0].1, vec!["mystery".to_string()]);
    assert!(!out.join("risk5_resp_actors_optional_chart.html").exists());
}

#[test]
fn name_collisions_fail_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.html", &resp_chart(&["ai_user"]));

    fn same_name(orig: &str, _partition: &str) -> String {
        orig.to_string()
    }
    let job = Job::new(
        dir.path(),
        Layout::new("data-actor", "All Actors"),
        Taxonomy::default().with(PartitionSpec::new("p", "P Actors", &["ai_user"])),
        Naming::Custom(same_name),
    )
    .pattern("a.html");

    let report = run(&job, None).unwrap();
    assert_eq!(report.failures[0].1.kind(), "OutputCollision");
    assert_eq!(read(dir.path(), "a.html"), resp_chart(&["ai_user"]));
}

#[test]
fn failed_write_removes_the_files_other_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let template = resp_chart(&["ai_user", "ai_infra"]);
    write(dir.path(), "risk1_resp_actors_chart.html", &template);
    write(dir.path(), "risk2_resp_actors_chart.html", &template);
    // A directory where the second output of risk1 should go.
    fs::create_dir(dir.path().join("risk1_resp_actors_optional_chart.html")).unwrap();

    let report = run(&Job::resp_actors(dir.path()).workers(1), None).unwrap();
    assert_eq!(report.files_failed(), 1);
    let (failed, err) = &report.failures[0];
    assert!(failed.ends_with("risk1_resp_actors_chart.html"));
    assert_eq!(err.kind(), "Io");

    assert!(!dir.path().join("risk1_resp_actors_required_chart.html").exists());
    assert!(!dir.path().join(".risk1_resp_actors_optional_chart.html.tmp").exists());
    assert!(report.written.iter().all(|p| !p.to_string_lossy().contains("risk1_")));
    assert_eq!(read(dir.path(), "risk1_resp_actors_chart.html"), template);
    assert_eq!(report.files_ok, 1);
    assert!(read(dir.path(), "risk2_resp_actors_required_chart.html").contains("ai_user"));
}

#[test]
fn panic_while_naming_fails_only_that_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r1.html", &resp_chart(&["ai_user"]));
    write(dir.path(), "r2.html", &resp_chart(&["ai_user"]));

    // Discovery names each (file, partition) once; the second round happens in a worker.
    static R2_CALLS: AtomicUsize = AtomicUsize::new(0);
    fn flaky(orig: &str, partition: &str) -> String {
        if orig == "r2.html" && R2_CALLS.fetch_add(1, Ordering::SeqCst) >= 2 {
            panic!("naming blew up for {orig}");
        }
        format!("{partition}-{orig}")
    }
    let job = Job::new(
        dir.path(),
        Layout::new("data-actor", "All Actors"),
        Taxonomy::resp_actors(),
        Naming::Custom(flaky),
    )
    .pattern("r?.html")
    .workers(2);

    let report = run(&job, None).unwrap();
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_ok, 1);
    assert!(!report.is_success());
    let (failed, err) = &report.failures[0];
    assert!(failed.ends_with("r2.html"));
    assert_eq!(err.kind(), "WorkerLost");
    assert!(err.to_string().contains("naming blew up for r2.html"));
    assert!(dir.path().join("required-r1.html").exists());
}

#[test]
fn patches_run_on_every_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "risk9_resp_actors_chart.html", &resp_chart(&["ai_user"]));

    let job = Job::resp_actors(dir.path())
        .patch(Rule::new(r"<title>Risk (\d+)", "<title>R$1").unwrap())
        .patch(Rule::literal("</html>", "</html><!-- split -->").unwrap());
    let report = run(&job, None).unwrap();
    assert!(report.is_success());

    for name in ["risk9_resp_actors_required_chart.html", "risk9_resp_actors_optional_chart.html"] {
        let text = read(dir.path(), name);
        assert!(text.contains("<title>R9 - "), "{name}");
        assert!(text.ends_with("</html><!-- split -->\n"), "{name}");
    }
}

#[derive(Default)]
struct Recorder {
    total: usize,
    done: Vec<bool>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn item_done(&mut self, _input: &Path, ok: bool) {
        self.done.push(ok);
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn progress_sees_every_file() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..6 {
        write(dir.path(), &format!("risk{i}_resp_actors_chart.html"), &resp_chart(&["ai_user"]));
    }
    let mut rec = Recorder::default();
    let report = run(&Job::resp_actors(dir.path()).workers(3), Some(&mut rec)).unwrap();

    assert_eq!(rec.total, 6);
    assert_eq!(rec.done.len(), 6);
    assert!(rec.done.iter().all(|ok| *ok));
    assert!(rec.finished);
    assert_eq!(report.partitions_written(), 12);
    let mut sorted = report.written.clone();
    sorted.sort();
    assert_eq!(sorted, report.written);
}
