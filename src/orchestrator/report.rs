// Sun Oct 18 2026 - Alex

use crate::error::ProxyError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Listing,
    Generation,
    Writing,
    Build,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Listing => write!(f, "listing"),
            Stage::Generation => write!(f, "generation"),
            Stage::Writing => write!(f, "writing"),
            Stage::Build => write!(f, "build"),
        }
    }
}

#[derive(Debug)]
pub struct LibraryFailure {
    pub library: PathBuf,
    pub stage: Stage,
    pub error: ProxyError,
}

impl fmt::Display for LibraryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing {} ({}): {}", self.library.display(), self.stage, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub library: PathBuf,
    pub source: PathBuf,
    pub exports: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub preamble: Option<PathBuf>,
    pub discovered: usize,
    pub generated: Vec<GeneratedUnit>,
    pub compiled: Vec<PathBuf>,
    pub failures: Vec<LibraryFailure>,
    pub build_enabled: bool,
}

impl RunReport {
    /// Libraries that went through every enabled stage.
    pub fn succeeded(&self) -> usize {
        if self.build_enabled {
            self.compiled.len()
        } else {
            self.generated.len()
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn any_succeeded(&self) -> bool {
        self.succeeded() > 0
    }

    pub fn failures_at(&self, stage: Stage) -> usize {
        self.failures.iter().filter(|f| f.stage == stage).count()
    }
}
