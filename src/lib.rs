// Sun Oct 18 2026 - Alex

pub mod build;
pub mod config;
pub mod error;
pub mod generator;
pub mod lister;
pub mod orchestrator;
pub mod symbol;
pub mod toolchain;
pub mod ui;

pub use build::{BuildDriver, BuildMode};
pub use config::Config;
pub use error::{ProxyError, ProxyResult};
pub use generator::{ActionKind, DetectAction, ProxyGenerator, ProxySourceUnit};
pub use lister::{ExportLister, ListerKind};
pub use orchestrator::{ProxyCoordinator, RunObserver, RunReport};
pub use symbol::{parse_exports, ExportTable, SymbolName};
pub use toolchain::{ToolchainResolver, VsWhereResolver};
