// src/split/mod.rs
//! # Templated fragment partitioner
//!
//! Splits one templated chart document into one document per partition.
//!
//! ## Pipeline
//! ```text
//! template ─ locate ─► Region ─ classify ─► [Row] ─ plan ─► Plan ─ assemble ─► [text]
//! ```
//! - [`locate`]: the single line-aligned span between the opening and closing markers.
//! - [`classify`]: one [`Row`] per `<tr ...>` opening line, keyed by an attribute.
//! - [`plan`]: rows regrouped in each partition's key order; unclaimed keys reported.
//! - [`assemble`]: template before + rows + template after, placeholder label rewritten.
//!
//! ## Invariants
//! - Everything outside the region and the placeholder is copied byte for byte.
//! - Assembling every key in document order reproduces the template exactly.
//! - Any structural surprise is an error for this one document, never a guess.
//!
//! Nothing here touches the filesystem; see [`crate::runner`] for the batch side.

pub mod assemble;
pub mod classify;
pub mod error;
pub mod locate;
pub mod plan;

pub use assemble::{TitleRewrite, assemble};
pub use classify::{Classifier, Row, classify};
pub use error::{Result, SplitError};
pub use locate::{Region, locate};
pub use plan::{Plan, Planned, plan};

use crate::config::{Layout, Taxonomy};

/// One assembled output document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionDoc {
    pub name: String,
    pub text: String,
    pub rows: usize,
}

/// Everything produced from one template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Split {
    /// One per taxonomy partition, in taxonomy order (empty partitions included).
    pub docs: Vec<PartitionDoc>,
    pub unclaimed: Vec<String>,
    pub rows_seen: usize,
}

/// Run locate → classify → plan → assemble over one template.
/// All partitions are assembled before returning, so a failure leaves nothing half-done.
pub fn split_document(template: &str, layout: &Layout, taxonomy: &Taxonomy) -> Result<Split> {
    let region = locate(template, &layout.markers.open, &layout.markers.close)?;
    let rows = classify(region.text(), &layout.rows).map_err(|e| shift_lines(e, region.open_line))?;
    let plan = plan(&rows, taxonomy);

    let mut docs = Vec::with_capacity(plan.partitions.len());
    for part in &plan.partitions {
        let title = TitleRewrite { placeholder: &layout.placeholder, replacement: &part.spec.label };
        let text = assemble(template, region.bounds(), &part.rows, &title)?;
        docs.push(PartitionDoc { name: part.spec.name.clone(), text, rows: part.rows.len() });
    }

    Ok(Split { docs, unclaimed: plan.unclaimed, rows_seen: rows.len() })
}

// Region-relative line numbers → template line numbers.
fn shift_lines(err: SplitError, open_line: usize) -> SplitError {
    match err {
        SplitError::MalformedRegion { line, reason } => {
            SplitError::MalformedRegion { line: line + open_line, reason }
        }
        SplitError::MissingCategoryKey { line, attr } => {
            SplitError::MissingCategoryKey { line: line + open_line, attr }
        }
        other => other,
    }
}
