use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::extensions::ExtensionSet;

/// A video discovered on disk. `split` and `label` are the names of the
/// grandparent and parent directories, when the file sits that deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub path: PathBuf,
    pub extension: String,
    pub split: Option<String>,
    pub label: Option<String>,
}

impl VideoFile {
    pub fn new(path: PathBuf) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let label_dir = path.parent();
        let label = label_dir.and_then(dir_name);
        let split = label_dir.and_then(Path::parent).and_then(dir_name);

        Self {
            path,
            extension,
            split,
            label,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

fn dir_name(p: &Path) -> Option<String> {
    p.file_name().map(|n| n.to_string_lossy().to_string())
}

/// Recursively collect regular files under `root` whose extension is in `exts`.
/// Symlinks are not followed, so a link to a video is not picked up.
///
/// Results are sorted by path, so anything seeded downstream (shuffles,
/// index assignment) sees the same order on every platform.
pub fn scan(root: &Path, exts: &ExtensionSet) -> io::Result<Vec<VideoFile>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Scan root {:?} is not a directory", root),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && exts.matches(entry.path()) {
            files.push(VideoFile::new(entry.into_path()));
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    log::debug!(
        "Scanned {:?}: {} files matching {}",
        root,
        files.len(),
        exts
    );

    Ok(files)
}

/// Immediate child entries of `dir`, sorted by file name.
pub fn sorted_entries(dir: &Path) -> io::Result<Vec<std::fs::DirEntry>> {
    let mut entries = std::fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
