use ahash::AHashSet;
use std::fmt;
use std::path::Path;

pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// Case-insensitive set of file extensions, stored without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: AHashSet<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exts = exts
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { exts }
    }

    pub fn videos() -> Self {
        Self::new(DEFAULT_VIDEO_EXTENSIONS)
    }

    pub fn mp4() -> Self {
        Self::new(["mp4"])
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.exts.contains(&normalize(ext))
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.contains(ext))
    }

    /// Sorted view, for logs and stable output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.exts.iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::videos()
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.sorted().iter().map(|e| format!(".{}", e)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

fn normalize(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
