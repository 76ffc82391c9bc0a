use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use utils::{scan, ExtensionSet};

use crate::transfer::{self, ConflictPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub dest: PathBuf,
    pub found: usize,
    pub moved: usize,
}

/// Move every matching file under `source` straight into `dest`, dropping its
/// sub-path. `dest` is created if missing.
pub fn move_tree(
    source: &Path,
    dest: &Path,
    exts: &ExtensionSet,
    policy: ConflictPolicy,
) -> io::Result<MoveSummary> {
    let files = scan(source, exts)?;
    log::info!("Found {} files matching {} in {:?}", files.len(), exts, source);

    fs::create_dir_all(dest)?;

    let plan = transfer::plan_flat(&files, dest, policy)?;
    let moved = transfer::execute(&plan, "Moved")?;

    Ok(MoveSummary {
        dest: dest.to_path_buf(),
        found: files.len(),
        moved,
    })
}
