// Sun Oct 18 2026 - Alex

pub mod action;
pub mod builder;
pub mod preamble;
pub mod proxy;

pub use action::{ActionKind, DetectAction};
pub use builder::SourceBuilder;
pub use preamble::{write_preamble, PREAMBLE, PREAMBLE_FILE};
pub use proxy::{ProxyExport, ProxyGenerator, ProxySourceUnit};

/// Extension of generated source units.
pub const SOURCE_EXTENSION: &str = "cpp";
