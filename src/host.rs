//! Build-tool host adapter.
//!
//! A host hands over `(code, id, is_server)` per module. Files outside the markup-bearing
//! extension set, or under a vendored dependency directory, pass through untouched.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CompilerError;
use crate::options::{HostOptions, Target};
use crate::transform::{CompileResult, Compiler};

/// One module handed to [`transform_batch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub id: String,
    pub result: Result<Option<CompileResult>, CompilerError>,
}

/// Module id without its `?query` or `#hash` suffix.
pub fn clean_id(id: &str) -> &str {
    id.split(['?', '#']).next().unwrap_or(id)
}

pub fn should_transform(id: &str, options: &HostOptions) -> bool {
    let path = clean_id(id);
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if !options.extensions.iter().any(|ext| ext == extension) {
        return false;
    }
    !path
        .split(['/', '\\'])
        .any(|segment| options.exclude_dirs.iter().any(|dir| dir == segment))
}

pub fn transform(
    code: &str,
    id: &str,
    is_server: bool,
    options: &HostOptions,
) -> Result<Option<CompileResult>, CompilerError> {
    if !should_transform(id, options) {
        tracing::debug!(file = id, "filtered out by host options");
        return Ok(None);
    }
    let target = if is_server { Target::Server } else { Target::Client };
    Compiler::new(options.compile.clone().with_target(target)).compile(code, id)
}

/// Compiles every file on the rayon pool. Outcomes keep the input order.
pub fn transform_batch(files: &[SourceFile], is_server: bool, options: &HostOptions) -> Vec<FileOutcome> {
    tracing::debug!(files = files.len(), is_server, "batch transform");
    files
        .par_iter()
        .map(|file| FileOutcome {
            id: file.id.clone(),
            result: transform(&file.code, &file.id, is_server, options),
        })
        .collect()
}
