// Sun Oct 18 2026 - Alex

pub mod command;
pub mod msvc;

pub use command::CommandBuildDriver;
pub use msvc::MsvcBuildDriver;

use crate::error::ProxyResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension of compiled proxy libraries.
pub const ARTIFACT_EXTENSION: &str = "dll";

/// Turns a generated source unit into a loadable library next to it.
pub trait BuildDriver {
    /// Returns the artifact path, or `None` when the driver does not build.
    fn build(&self, source: &Path) -> ProxyResult<Option<PathBuf>>;
    fn name(&self) -> &'static str;

    fn enabled(&self) -> bool {
        true
    }
}

/// Leaves generated sources uncompiled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipBuild;

impl BuildDriver for SkipBuild {
    fn build(&self, source: &Path) -> ProxyResult<Option<PathBuf>> {
        log::debug!("Skipping build of {}", source.display());
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn enabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMode {
    #[default]
    Msvc,
    Command,
    None,
}

pub fn artifact_path(source: &Path) -> PathBuf {
    source.with_extension(ARTIFACT_EXTENSION)
}
