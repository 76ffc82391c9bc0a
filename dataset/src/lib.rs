//! Staging of a labelled video corpus laid out as `<split>/<label>/<file>`:
//! flattening, canonical renaming, seeded train/val/test splitting and
//! per-split JSON manifests.

pub mod manifest;
pub mod mover;
mod progress;
pub mod rename;
pub mod split;
pub mod transfer;

pub use manifest::{build_manifests, load_manifest, Manifest, ManifestEntry, ManifestSummary};
pub use mover::{move_tree, MoveSummary};
pub use rename::{rename_tree, RenameSummary};
pub use split::{
    partition, split_dataset, Partition, Split, SplitOptions, SplitRatios, SplitSummary,
};
pub use transfer::ConflictPolicy;
