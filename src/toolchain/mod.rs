// Sun Oct 18 2026 - Alex

pub mod process;
pub mod resolver;

pub use process::{ToolCommand, ToolError, ToolOutput};
pub use resolver::{FixedToolchain, Tool, ToolchainResolver, VsWhereResolver, DEFAULT_VSWHERE};
