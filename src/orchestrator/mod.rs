// Sun Oct 18 2026 - Alex

pub mod coordinator;
pub mod discovery;
pub mod observer;
pub mod report;

pub use coordinator::ProxyCoordinator;
pub use discovery::{discover_libraries, library_base_name};
pub use observer::{RunObserver, SilentObserver};
pub use report::{GeneratedUnit, LibraryFailure, RunReport, Stage};
