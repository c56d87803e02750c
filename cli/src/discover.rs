use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Recursively collect `.php` files under `root`. With `skip_existing`
/// set, files whose sibling `.json` artifact already exists are left
/// alone so re-runs only pick up new work.
pub fn php_files(root: &Path, skip_existing: bool) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_backup_dir(entry));
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("php") {
            continue;
        }
        if skip_existing && path.with_extension("json").exists() {
            debug!(path = %path.display(), "skipping, JSON artifact already exists");
            continue;
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}

/// Backup directories created by earlier runs hold source copies that
/// must never be picked up as new work.
fn is_backup_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with("backup_"))
}
