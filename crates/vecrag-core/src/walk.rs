//! Folder enumeration for the indexing pipeline.

use std::path::{Path, PathBuf};

/// Extensions recognized by the indexer. Matching is an exact,
/// case-insensitive comparison against the final extension, so a file named
/// `x.md.txt` counts once, as a `.txt` file.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "txt", "html", "htm", "json", "csv"];

/// Recursively list files under `root` whose extension is in `exts`,
/// lexicographically sorted by full path so chunk ids come out identical on
/// every rebuild of the same folder.
pub fn list_files(root: &Path, exts: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let matched = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                exts.iter().any(|e| *e == ext)
            })
            .unwrap_or(false);
        if matched {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}
