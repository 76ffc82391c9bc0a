use ahash::AHashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use utils::{sorted_entries, ExtensionSet};

const STAGING_PREFIX: &str = ".renaming-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub groups: usize,
    pub renamed: usize,
    pub unchanged: usize,
}

/// Canonical name for the `index`-th file of a `(split, label)` group.
pub fn canonical_name(split: &str, label: &str, index: usize, ext: &str) -> String {
    if ext.is_empty() {
        format!("{}_{}_{}", split, label, index)
    } else {
        format!("{}_{}_{}.{}", split, label, index, ext)
    }
}

/// Rename every matching file in `root/<split>/<label>/` to
/// `<split>_<label>_<i>.<ext>`.
///
/// Files are indexed in name order. A group that is already canonical is left
/// alone, so running this twice is a no-op.
pub fn rename_tree(root: &Path, exts: &ExtensionSet) -> io::Result<RenameSummary> {
    let mut summary = RenameSummary::default();

    for split_entry in sorted_entries(root)? {
        if !split_entry.file_type()?.is_dir() {
            continue;
        }
        let split = split_entry.file_name().to_string_lossy().to_string();

        for label_entry in sorted_entries(&split_entry.path())? {
            if !label_entry.file_type()?.is_dir() {
                continue;
            }
            let label = label_entry.file_name().to_string_lossy().to_string();

            let (renamed, unchanged) = rename_group(&label_entry.path(), &split, &label, exts)?;
            summary.groups += 1;
            summary.renamed += renamed;
            summary.unchanged += unchanged;
        }
    }

    log::info!(
        "Renamed {} files across {} groups ({} already canonical)",
        summary.renamed,
        summary.groups,
        summary.unchanged
    );

    Ok(summary)
}

fn rename_group(
    dir: &Path,
    split: &str,
    label: &str,
    exts: &ExtensionSet,
) -> io::Result<(usize, usize)> {
    let mut sources = Vec::new();
    for entry in sorted_entries(dir)? {
        let path = entry.path();
        if entry.file_type()?.is_file() && exts.matches(&path) {
            sources.push(path);
        }
    }

    let plan: Vec<(PathBuf, PathBuf)> = sources
        .iter()
        .enumerate()
        .map(|(i, from)| {
            let ext = from
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            (from.clone(), dir.join(canonical_name(split, label, i, &ext)))
        })
        .collect();

    let source_set: AHashSet<&PathBuf> = sources.iter().collect();
    let pending: Vec<&(PathBuf, PathBuf)> = plan.iter().filter(|(from, to)| from != to).collect();

    // Everything is checked before the first rename so a clash leaves the group untouched.
    for (from, to) in &pending {
        if to.exists() && !source_set.contains(to) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "Cannot rename {:?}: {:?} exists and is not part of the group",
                    from, to
                ),
            ));
        }
    }

    let staged: Vec<(PathBuf, &PathBuf, &PathBuf)> = pending
        .iter()
        .map(|(from, to)| (staging_path(to), from, to))
        .collect();

    for (staging, from, _) in &staged {
        fs::rename(from, staging)?;
    }

    for (staging, from, to) in &staged {
        fs::rename(staging, to)?;
        log::info!("Renamed {} to {}", file_name(from), file_name(to));
    }

    Ok((staged.len(), plan.len() - staged.len()))
}

fn staging_path(target: &Path) -> PathBuf {
    let name = format!("{}{}", STAGING_PREFIX, file_name(target));
    target.with_file_name(name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
