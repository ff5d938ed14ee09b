// Sun Oct 18 2026 - Alex

use crate::error::{ProxyError, ProxyResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const PREAMBLE_FILE: &str = "pch.h";

pub const PREAMBLE: &str = "\
#ifndef PCH_H
#define PCH_H

#pragma once
#define UNICODE
#define WIN32_LEAN_AND_MEAN
#include <windows.h>

#endif // PCH_H
";

/// Writes the shared header every generated unit includes. Returns its path.
pub fn write_preamble(output_dir: &Path) -> ProxyResult<PathBuf> {
    let path = output_dir.join(PREAMBLE_FILE);
    fs::write(&path, PREAMBLE).map_err(|e| ProxyError::io(&path, e))?;
    log::debug!("Wrote preamble {}", path.display());
    Ok(path)
}
