// src/split/locate.rs
//! Region locator: single-pass line scan for one opening/closing marker pair.
//!
//! The region is the run of whole lines strictly between the line holding the
//! opening marker and the line holding the closing marker. Both marker lines stay
//! with the surrounding template.
//!
//! Anything that makes the boundary non-unique is an error rather than a guess:
//! - an opening marker while a region is already open (nesting),
//! - a second opening marker after the region closed,
//! - a further closing marker after the region closed,
//! - both markers on the same line (no whole-line region to rewrite).
//!
//! Closing markers seen before the first opening marker belong to earlier markup
//! and are ignored. When both markers are the same text (a `<!-- rows -->` pair),
//! the first hit opens the region and the next one closes it.

use std::ops::Range;

use crate::core::html::{find_all, lines_with_offsets, to_lower};

use super::error::{Result, SplitError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region<'a> {
    text: &'a str,
    start: usize,
    end: usize,
    /// 1-based template line numbers of the marker lines.
    pub open_line: usize,
    pub close_line: usize,
}

impl<'a> Region<'a> {
    /// Byte range of the region within the template.
    pub fn bounds(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The region's text (possibly empty).
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// 1-based template line number of the first region line.
    pub fn first_line(&self) -> usize {
        self.open_line + 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

enum Scan {
    Before,
    Inside { open_line: usize, start: usize },
    Done { open_line: usize, close_line: usize, start: usize, end: usize },
}

pub fn locate<'a>(template: &'a str, open_marker: &str, close_marker: &str) -> Result<Region<'a>> {
    for marker in [open_marker, close_marker] {
        if marker.trim().is_empty() {
            return Err(SplitError::Pattern { pattern: s!(marker), reason: s!("empty marker") });
        }
    }
    let open_lc = to_lower(open_marker);
    let close_lc = to_lower(close_marker);
    let same = open_lc == close_lc;

    let mut state = Scan::Before;

    for (idx, (offset, line)) in lines_with_offsets(template).enumerate() {
        let line_no = idx + 1;
        let lc = to_lower(line);

        // Marker hits on this line, in reading order. `true` = opening marker.
        let closes = if same { Vec::new() } else { find_all(&lc, &close_lc) };
        let mut hits: Vec<(usize, bool)> = find_all(&lc, &open_lc)
            .into_iter()
            .map(|p| (p, true))
            .chain(closes.into_iter().map(|p| (p, false)))
            .collect();
        hits.sort_unstable();

        for (_, is_open) in hits {
            let is_open = is_open && !(same && matches!(state, Scan::Inside { .. }));
            state = match (state, is_open) {
                (Scan::Before, true) => Scan::Inside { open_line: line_no, start: offset + line.len() },
                (Scan::Before, false) => Scan::Before,
                (Scan::Inside { open_line, .. }, true) => {
                    return Err(SplitError::AmbiguousRegion {
                        line: line_no,
                        reason: format!("`{open_marker}` nested inside the region opened at line {open_line}"),
                    });
                }
                (Scan::Inside { open_line, .. }, false) if open_line == line_no => {
                    return Err(SplitError::AmbiguousRegion {
                        line: line_no,
                        reason: format!("`{open_marker}` and `{close_marker}` share one line"),
                    });
                }
                (Scan::Inside { open_line, start }, false) => Scan::Done {
                    open_line,
                    close_line: line_no,
                    start,
                    end: offset,
                },
                (Scan::Done { close_line, .. }, true) => {
                    return Err(SplitError::AmbiguousRegion {
                        line: line_no,
                        reason: format!("second `{open_marker}` after the region closed at line {close_line}"),
                    });
                }
                (Scan::Done { close_line, .. }, false) => {
                    return Err(SplitError::AmbiguousRegion {
                        line: line_no,
                        reason: format!("extra `{close_marker}` after the region closed at line {close_line}"),
                    });
                }
            };
        }
    }

    match state {
        Scan::Before => Err(SplitError::RegionNotFound { marker: s!(open_marker) }),
        Scan::Inside { .. } => Err(SplitError::RegionNotFound { marker: s!(close_marker) }),
        Scan::Done { open_line, close_line, start, end } => Ok(Region {
            text: &template[start..end],
            start,
            end,
            open_line,
            close_line,
        }),
    }
}
