// Sun Oct 18 2026 - Alex

pub mod banner;
pub mod console;

pub use banner::Banner;
pub use console::ConsoleObserver;
