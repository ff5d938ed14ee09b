// Sun Oct 18 2026 - Alex

use crate::orchestrator::report::{GeneratedUnit, LibraryFailure};
use std::path::Path;

/// Progress callbacks fired while a run is in flight. All methods default to no-ops.
pub trait RunObserver {
    fn preamble_written(&mut self, _path: &Path) {}
    fn library_started(&mut self, _library: &Path, _index: usize, _total: usize) {}
    fn unit_generated(&mut self, _unit: &GeneratedUnit) {}
    fn symbol_skipped(&mut self, _library: &Path, _symbol: &str) {}
    fn artifact_compiled(&mut self, _artifact: &Path) {}
    fn library_failed(&mut self, _failure: &LibraryFailure) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}
