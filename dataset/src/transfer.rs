use ahash::AHashMap;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use utils::VideoFile;

use crate::progress::TransferProgressBar;

/// What to do when two files would land on the same destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Refuse the whole batch before anything is moved.
    #[default]
    Fail,
    /// Let the later file replace the earlier one.
    Overwrite,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!(
                "Unknown conflict policy '{}', expected 'fail' or 'overwrite'",
                other
            )),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Map every file to `dest_dir/<basename>`, checking collisions up front.
///
/// Files already sitting at their destination are dropped from the plan.
pub fn plan_flat(
    files: &[VideoFile],
    dest_dir: &Path,
    policy: ConflictPolicy,
) -> io::Result<Vec<Transfer>> {
    let mut claimed: AHashMap<PathBuf, &Path> = AHashMap::with_capacity(files.len());
    let mut plan = Vec::with_capacity(files.len());

    for file in files {
        let name = file.path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{:?} has no file name", file.path),
            )
        })?;
        let to = dest_dir.join(name);

        if let Some(previous) = claimed.insert(to.clone(), &file.path) {
            match policy {
                ConflictPolicy::Fail => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!(
                            "{:?} and {:?} would both be moved to {:?}",
                            previous, file.path, to
                        ),
                    ));
                }
                ConflictPolicy::Overwrite => {
                    log::warn!("{:?} will overwrite {:?} at {:?}", file.path, previous, to);
                }
            }
        }

        if to == file.path {
            continue;
        }

        if policy == ConflictPolicy::Fail && to.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Destination {:?} already exists", to),
            ));
        }

        plan.push(Transfer {
            from: file.path.clone(),
            to,
        });
    }

    Ok(plan)
}

/// Move a single file, falling back to copy + remove when a plain rename is
/// refused (e.g. source and destination on different devices).
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !from.is_file() {
                return Err(rename_err);
            }
            log::debug!(
                "Rename {:?} -> {:?} failed ({}), copying instead",
                from,
                to,
                rename_err
            );
            copy_then_remove(from, to, &rename_err)
        }
    }
}

/// A failed copy removes whatever reached `to` and reports the copy error,
/// with the rename failure attached.
fn copy_then_remove(from: &Path, to: &Path, rename_err: &io::Error) -> io::Result<()> {
    if let Err(copy_err) = fs::copy(from, to) {
        if to.is_file() {
            let _ = fs::remove_file(to);
        }
        return Err(io::Error::new(
            copy_err.kind(),
            format!(
                "Copying {:?} to {:?} failed: {} (rename failed with: {})",
                from, to, copy_err, rename_err
            ),
        ));
    }
    fs::remove_file(from)
}

/// Execute a plan in order. The first failure aborts; earlier moves stay done.
pub fn execute(plan: &[Transfer], action: &str) -> io::Result<usize> {
    let progress = TransferProgressBar::new(plan.len(), action);

    for transfer in plan {
        move_file(&transfer.from, &transfer.to)?;

        let name = transfer
            .to
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        log::info!(
            "{} {} to {:?}",
            action,
            name,
            transfer.to.parent().unwrap_or(Path::new(""))
        );
        progress.update(&name);
    }

    progress.finish();
    Ok(plan.len())
}
