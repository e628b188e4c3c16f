//! Source discovery.
//!
//! Recursively scans a project directory for markup-bearing source files and compiles
//! them as one batch.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::host::{should_transform, transform_batch, FileOutcome, SourceFile};
use crate::options::HostOptions;

// ═══════════════════════════════════════════════════════════════════════════════
// DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

fn is_excluded_dir(entry: &DirEntry, options: &HostOptions) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| options.exclude_dirs.iter().any(|dir| dir == name))
            .unwrap_or(false)
}

/// All files under `root` the host would transform, sorted by path.
pub fn discover_sources(root: &Path, options: &HostOptions) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, options))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| should_transform(&path.to_string_lossy(), options))
        .collect();
    files.sort();
    files
}

// ═══════════════════════════════════════════════════════════════════════════════
// BATCH COMPILE
// ═══════════════════════════════════════════════════════════════════════════════

pub fn compile_directory(root: &Path, is_server: bool, options: &HostOptions) -> Vec<FileOutcome> {
    let sources: Vec<SourceFile> = discover_sources(root, options)
        .into_iter()
        .filter_map(|path| {
            let id = path.to_string_lossy().to_string();
            match fs::read_to_string(&path) {
                Ok(code) => Some(SourceFile { id, code }),
                Err(err) => {
                    tracing::warn!(file = %id, error = %err, "failed to read source");
                    None
                }
            }
        })
        .collect();
    tracing::debug!(root = %root.display(), files = sources.len(), "discovered sources");
    transform_batch(&sources, is_server, options)
}
