// src/file.rs

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::TMP_SUFFIX;
use crate::split::{Result, SplitError};

/// Read a whole template. Fails fast; nothing is written for a file that can't be read.
pub fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SplitError::io(path, e))
}

/// Files directly inside `dir` matching any of `patterns` (file-name globs, no recursion).
/// Sorted, each file once even if several patterns match it.
pub fn discover(dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SplitError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input directory not found"),
        ));
    }

    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut found: BTreeSet<PathBuf> = BTreeSet::new();

    for pattern in patterns {
        if pattern.contains('/') || pattern.contains('\\') {
            return Err(SplitError::Pattern {
                pattern: pattern.clone(),
                reason: s!("file-name patterns only; no directories"),
            });
        }
        let full = Path::new(&base).join(pattern);
        let entries = glob::glob(&full.to_string_lossy()).map_err(|e| SplitError::Pattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                SplitError::io(path, e.into_error())
            })?;
            if path.is_file() {
                found.insert(path);
            }
        }
    }

    Ok(found.into_iter().collect())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(SplitError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| SplitError::io(dir, e))?;
    }
    Ok(())
}

/// Write to a hidden sibling, then rename over `path`, so readers never see half a file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(join!(".", &name, TMP_SUFFIX));

    fs::write(&tmp, contents).map_err(|e| SplitError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(SplitError::io(path, e));
    }
    Ok(())
}
