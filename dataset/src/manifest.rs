use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use utils::sorted_entries;

const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    pub label: String,
}

/// Sample key (`<label>_<stem>`) to entry, ordered by key.
pub type Manifest = BTreeMap<String, ManifestEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSummary {
    pub split: String,
    pub entries: usize,
    pub path: PathBuf,
}

pub fn manifest_key(label: &str, file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    format!("{}_{}", label, stem)
}

/// Build the manifest for one `split` directory laid out as `label/file`.
///
/// Only directories are treated as labels and only regular files as samples;
/// anything else is skipped.
pub fn collect_split(split_dir: &Path) -> io::Result<Manifest> {
    let mut manifest = Manifest::new();

    for label_entry in sorted_entries(split_dir)? {
        if !label_entry.file_type()?.is_dir() {
            log::debug!("Skipping non-directory {:?}", label_entry.path());
            continue;
        }
        let label = label_entry.file_name().to_string_lossy().to_string();

        for file_entry in sorted_entries(&label_entry.path())? {
            let path = file_entry.path();
            if !file_entry.file_type()?.is_file() {
                log::debug!("Skipping non-file {:?}", path);
                continue;
            }

            let file_name = file_entry.file_name().to_string_lossy().to_string();
            let key = manifest_key(&label, &file_name);
            let entry = ManifestEntry {
                url: path.to_string_lossy().to_string(),
                label: label.clone(),
            };

            if let Some(previous) = manifest.insert(key.clone(), entry) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Duplicate manifest key '{}': {} and {:?}",
                        key, previous.url, path
                    ),
                ));
            }
        }
    }

    Ok(manifest)
}

/// Write one `<split>.json` per split directory under `source` into `dest`.
/// Existing manifests are overwritten.
pub fn build_manifests(source: &Path, dest: &Path) -> io::Result<Vec<ManifestSummary>> {
    fs::create_dir_all(dest)?;

    let mut summaries = Vec::new();
    for split_entry in sorted_entries(source)? {
        if !split_entry.file_type()?.is_dir() {
            log::debug!("Skipping non-directory {:?}", split_entry.path());
            continue;
        }
        let split = split_entry.file_name().to_string_lossy().to_string();

        let manifest = collect_split(&split_entry.path())?;
        let path = dest.join(format!("{}.json", split));
        write_manifest(&path, &manifest)?;

        log::info!("Saved {} videos in {:?}", manifest.len(), path);
        summaries.push(ManifestSummary {
            split,
            entries: manifest.len(),
            path,
        });
    }

    let splits: Vec<&str> = summaries.iter().map(|s| s.split.as_str()).collect();
    log::info!("Created json files in {:?} for splits: {:?}", dest, splits);

    Ok(summaries)
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    manifest.serialize(&mut ser).map_err(io::Error::from)?;
    writer.flush()
}

pub fn load_manifest(path: &Path) -> io::Result<Manifest> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid manifest {:?}: {}", path, e),
        )
    })
}
