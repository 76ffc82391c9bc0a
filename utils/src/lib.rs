mod extensions;
mod scan;

pub use extensions::{ExtensionSet, DEFAULT_VIDEO_EXTENSIONS};
pub use scan::{scan, sorted_entries, VideoFile};
