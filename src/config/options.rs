// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;
use super::taxonomy::Taxonomy;
use crate::patch::Rule;

/// Opening/closing marker pair around the repeating rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers {
    pub open: String,
    pub close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self { open: s!(TBODY_OPEN), close: s!(TBODY_CLOSE) }
    }
}

/// How a row starts (`<tr ...`) and which attribute carries its category key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPattern {
    pub tag: String,
    pub key_attr: String,
}

impl RowPattern {
    pub fn new(key_attr: &str) -> Self {
        Self { tag: s!(ROW_TAG), key_attr: s!(key_attr) }
    }
}

/// Everything needed to split one document, independent of files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub markers: Markers,
    pub rows: RowPattern,
    /// Phrase in the template replaced by each partition's label.
    pub placeholder: String,
}

impl Layout {
    pub fn new(key_attr: &str, placeholder: &str) -> Self {
        Self {
            markers: Markers::default(),
            rows: RowPattern::new(key_attr),
            placeholder: s!(placeholder),
        }
    }
}

/// Output file naming. Each strategy inserts `_<partition>` somewhere in the input name.
#[derive(Clone, Debug)]
pub enum Naming {
    /// `risk7_resp_actors_chart.html` + `required` → `risk7_resp_actors_required_chart.html`
    BeforeSuffix(String),
    /// `risk_7_sector_vulnerability.html` + `group1` → `risk_7_sector_vulnerability_group1.html`
    BeforeExtension,
    /// Caller-supplied `(original_name, partition_name) -> output_name`.
    Custom(fn(&str, &str) -> String),
}

impl Naming {
    /// `None` when the input name lacks the anchor this strategy needs.
    pub fn output_name(&self, original: &str, partition: &str) -> Option<String> {
        match self {
            Naming::BeforeSuffix(suffix) => {
                let stem = original.strip_suffix(suffix.as_str())?;
                if stem.is_empty() {
                    return None;
                }
                Some(join!(stem, "_", partition, suffix))
            }
            Naming::BeforeExtension => {
                let path = Path::new(original);
                let stem = path.file_stem()?.to_str()?;
                match path.extension().and_then(|e| e.to_str()) {
                    Some(ext) => Some(format!("{stem}_{partition}.{ext}")),
                    None => Some(format!("{stem}_{partition}")),
                }
            }
            Naming::Custom(f) => Some(f(original, partition)),
        }
    }
}

/// A full batch job: where to look, how to split, where to write.
#[derive(Clone, Debug)]
pub struct Job {
    pub input_dir: PathBuf,
    pub patterns: Vec<String>,
    /// Defaults to `input_dir` when `None`.
    pub out_dir: Option<PathBuf>,
    pub layout: Layout,
    pub taxonomy: Taxonomy,
    pub naming: Naming,
    pub skip_empty: bool,
    /// Applied in order to every assembled document before it is written.
    pub patches: Vec<Rule>,
    pub workers: usize,
}

impl Job {
    pub fn new(input_dir: impl Into<PathBuf>, layout: Layout, taxonomy: Taxonomy, naming: Naming) -> Self {
        Self {
            input_dir: input_dir.into(),
            patterns: Vec::new(),
            out_dir: None,
            layout,
            taxonomy,
            naming,
            skip_empty: false,
            patches: Vec::new(),
            workers: WORKERS,
        }
    }

    /// Responsibility actor charts → `required` / `optional`.
    pub fn resp_actors(input_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            input_dir,
            Layout::new(ACTOR_ATTR, ALL_ACTORS),
            Taxonomy::resp_actors(),
            Naming::BeforeSuffix(s!(RESP_SUFFIX)),
        )
        .pattern(RESP_PATTERN)
    }

    /// Sector vulnerability charts → `group1`..`group4`.
    pub fn sector_groups(input_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            input_dir,
            Layout::new(SECTOR_ATTR, ALL_SECTORS),
            Taxonomy::sector_groups(),
            Naming::BeforeExtension,
        )
        .pattern(SECTOR_PATTERN)
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.patterns.push(s!(pattern));
        self
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    pub fn skip_empty(mut self, yes: bool) -> Self {
        self.skip_empty = yes;
        self
    }

    pub fn patch(mut self, rule: Rule) -> Self {
        self.patches.push(rule);
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.workers = n.max(1);
        self
    }

    pub fn resolved_out_dir(&self) -> &Path {
        self.out_dir.as_deref().unwrap_or(&self.input_dir)
    }
}
