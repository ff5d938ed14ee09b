// Sun Oct 18 2026 - Alex

use crate::error::{ProxyError, ProxyResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Libraries to process for `input`: the file itself, or the matching files
/// directly inside a directory, sorted by path.
pub fn discover_libraries<F>(input: &Path, is_library: F) -> ProxyResult<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if !input.is_dir() {
        return Err(ProxyError::Discovery(input.to_path_buf()));
    }

    let entries = fs::read_dir(input).map_err(|source| ProxyError::DirectoryRead {
        path: input.to_path_buf(),
        source,
    })?;

    let mut libraries: Vec<PathBuf> = readable_paths(input, entries.map(|entry| entry.map(|e| e.path())))
        .into_iter()
        .filter(|path| path.is_file() && is_library(path))
        .collect();

    libraries.sort();
    log::debug!("Discovered {} libraries in {}", libraries.len(), input.display());
    Ok(libraries)
}

/// Entries that cannot be read are logged and left out.
fn readable_paths<I>(dir: &Path, entries: I) -> Vec<PathBuf>
where
    I: Iterator<Item = io::Result<PathBuf>>,
{
    entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect()
}

/// File stem shared by the generated source and compiled artifact.
pub fn library_base_name(library: &Path) -> String {
    library
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "proxy".to_string())
}
