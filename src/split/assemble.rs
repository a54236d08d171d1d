// src/split/assemble.rs
//! Document assembler: template text around the region + one partition's rows,
//! with the placeholder label swapped for the partition's label.

use std::ops::Range;

use super::classify::Row;
use super::error::{Result, SplitError};

/// Replace `placeholder` with `replacement`; the placeholder must occur exactly once.
#[derive(Clone, Copy, Debug)]
pub struct TitleRewrite<'t> {
    pub placeholder: &'t str,
    pub replacement: &'t str,
}

/// `bounds` is the region's byte range in `template` (see [`super::locate::Region::bounds`]).
/// The placeholder must occur exactly once in the whole template, and not inside the
/// region, so that every output carries exactly one replacement.
pub fn assemble(
    template: &str,
    bounds: Range<usize>,
    rows: &[&Row<'_>],
    title: &TitleRewrite<'_>,
) -> Result<String> {
    let before = &template[..bounds.start];
    let after = &template[bounds.end..];
    let ph = title.placeholder;

    let found = if ph.is_empty() { 0 } else { template.matches(ph).count() };
    let outside = before.contains(ph) || after.contains(ph);
    if found != 1 || !outside {
        return Err(SplitError::PlaceholderNotFound { placeholder: s!(ph), found });
    }

    let body_len: usize = rows.iter().flat_map(|r| r.lines.iter()).map(|l| l.len()).sum();
    let mut out = String::with_capacity(
        before.len() + body_len + after.len() + title.replacement.len(),
    );

    let push_rewritten = |out: &mut String, part: &str| match part.find(ph) {
        Some(at) => {
            out.push_str(&part[..at]);
            out.push_str(title.replacement);
            out.push_str(&part[at + ph.len()..]);
        }
        None => out.push_str(part),
    };

    push_rewritten(&mut out, before);
    for row in rows {
        for line in &row.lines {
            out.push_str(line);
        }
    }
    push_rewritten(&mut out, after);

    // The rewrite must not have stitched a fresh placeholder together.
    if !title.replacement.contains(ph) {
        let left = out.matches(ph).count();
        if left > 0 {
            return Err(SplitError::PlaceholderSurvived { placeholder: s!(ph), count: left });
        }
    }

    Ok(out)
}
