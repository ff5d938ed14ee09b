// Sun Oct 18 2026 - Alex

use crate::error::{ProxyError, ProxyResult};
use crate::toolchain::ToolCommand;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_VSWHERE: &str = r"C:\Program Files (x86)\Microsoft Visual Studio\Installer\vswhere.exe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Dumpbin,
    Compiler,
    DevShell,
}

impl Tool {
    /// Pattern handed to `vswhere -find`, relative to the installation root.
    pub fn vswhere_pattern(&self) -> &'static str {
        match self {
            Tool::Dumpbin => r"VC\Tools\MSVC\**\bin\Hostx64\x64\dumpbin.exe",
            Tool::Compiler => r"VC\Tools\MSVC\**\bin\Hostx64\x64\cl.exe",
            Tool::DevShell => r"Common7\Tools\VsDevCmd.bat",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Tool::Dumpbin => "dumpbin.exe",
            Tool::Compiler => "cl.exe",
            Tool::DevShell => "VsDevCmd.bat",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Locates the external executables the lister and build driver run.
pub trait ToolchainResolver {
    fn resolve(&self, tool: Tool) -> ProxyResult<PathBuf>;
}

/// Explicit paths only.
#[derive(Debug, Clone, Default)]
pub struct FixedToolchain {
    paths: HashMap<Tool, PathBuf>,
}

impl FixedToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(tool, path.into());
        self
    }

    pub fn set(&mut self, tool: Tool, path: impl Into<PathBuf>) {
        self.paths.insert(tool, path.into());
    }

    pub fn get(&self, tool: Tool) -> Option<&Path> {
        self.paths.get(&tool).map(PathBuf::as_path)
    }
}

impl ToolchainResolver for FixedToolchain {
    fn resolve(&self, tool: Tool) -> ProxyResult<PathBuf> {
        self.get(tool)
            .map(Path::to_path_buf)
            .ok_or_else(|| ProxyError::Toolchain(format!("no path configured for {}", tool)))
    }
}

/// Resolution order: explicit override, `vswhere -latest -find`, then `PATH`.
pub struct VsWhereResolver {
    vswhere: PathBuf,
    overrides: FixedToolchain,
    timeout: Duration,
}

impl VsWhereResolver {
    pub fn new(vswhere: impl Into<PathBuf>) -> Self {
        Self {
            vswhere: vswhere.into(),
            overrides: FixedToolchain::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_overrides(mut self, overrides: FixedToolchain) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn query_vswhere(&self, tool: Tool) -> Option<PathBuf> {
        if !self.vswhere.is_file() {
            log::debug!("vswhere not present at {}", self.vswhere.display());
            return None;
        }

        let output = ToolCommand::new(&self.vswhere)
            .args(["-latest", "-find", tool.vswhere_pattern()])
            .with_timeout(self.timeout)
            .run()
            .map_err(|e| log::debug!("vswhere failed: {}", e))
            .ok()?;

        if !output.success() {
            log::debug!("vswhere exited with {:?} for {}", output.exit_code(), tool);
            return None;
        }

        // several MSVC versions may match; vswhere lists them oldest first
        last_path_line(&output.stdout_lossy())
    }
}

impl ToolchainResolver for VsWhereResolver {
    fn resolve(&self, tool: Tool) -> ProxyResult<PathBuf> {
        if let Some(path) = self.overrides.get(tool) {
            return Ok(path.to_path_buf());
        }

        if let Some(path) = self.query_vswhere(tool) {
            log::debug!("Resolved {} via vswhere: {}", tool, path.display());
            return Ok(path);
        }

        if let Some(path) = search_path(tool.file_name()) {
            log::debug!("Resolved {} from PATH: {}", tool, path.display());
            return Ok(path);
        }

        Err(ProxyError::Toolchain(format!(
            "{} not found via {} or PATH",
            tool,
            self.vswhere.display()
        )))
    }
}

pub fn last_path_line(output: &str) -> Option<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(PathBuf::from)
}

pub fn search_path(file_name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}
