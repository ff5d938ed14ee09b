// Sun Oct 18 2026 - Alex

pub mod dumpbin;
pub mod pe;

pub use dumpbin::DumpbinLister;
pub use pe::PeLister;

use crate::error::ProxyResult;
use crate::toolchain::{Tool, ToolchainResolver};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Produces the textual export report of a library, in `dumpbin /exports` layout.
pub trait ExportLister {
    fn list(&self, library: &Path) -> ProxyResult<String>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListerKind {
    /// dumpbin when it can be resolved, the PE reader otherwise.
    #[default]
    Auto,
    Dumpbin,
    Pe,
}

impl ListerKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ListerKind::Auto),
            "dumpbin" => Some(ListerKind::Dumpbin),
            "pe" | "goblin" => Some(ListerKind::Pe),
            _ => None,
        }
    }
}

impl fmt::Display for ListerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListerKind::Auto => write!(f, "auto"),
            ListerKind::Dumpbin => write!(f, "dumpbin"),
            ListerKind::Pe => write!(f, "pe"),
        }
    }
}

pub fn create_lister(
    kind: ListerKind,
    resolver: Arc<dyn ToolchainResolver>,
    timeout: Duration,
) -> Box<dyn ExportLister> {
    match kind {
        ListerKind::Dumpbin => Box::new(DumpbinLister::new(resolver).with_timeout(timeout)),
        ListerKind::Pe => Box::new(PeLister::new()),
        ListerKind::Auto => match resolver.resolve(Tool::Dumpbin) {
            Ok(path) => {
                log::info!("Listing exports with {}", path.display());
                Box::new(DumpbinLister::with_path(path).with_timeout(timeout))
            }
            Err(e) => {
                log::info!("{}; listing exports with the built-in PE reader", e);
                Box::new(PeLister::new())
            }
        },
    }
}
