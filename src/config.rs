// Sun Oct 18 2026 - Alex

use crate::build::BuildMode;
use crate::error::{ProxyError, ProxyResult};
use crate::generator::ActionKind;
use crate::lister::ListerKind;
use crate::toolchain::{FixedToolchain, Tool, DEFAULT_VSWHERE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lister: ListerKind,
    pub action: ActionKind,
    pub message_tag: String,
    pub library_extension: String,
    pub tool_timeout_seconds: u64,
    pub toolchain: ToolchainConfig,
    pub build: BuildConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub vswhere: PathBuf,
    pub dumpbin: Option<PathBuf>,
    pub compiler: Option<PathBuf>,
    pub dev_shell: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub mode: BuildMode,
    pub arch: String,
    pub host_arch: String,
    /// Program followed by its arguments, used when `mode` is `command`.
    /// Empty selects the MinGW cross compiler.
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lister: ListerKind::Auto,
            action: ActionKind::MessageBox,
            message_tag: "DLL Hijack".to_string(),
            library_extension: "dll".to_string(),
            tool_timeout_seconds: 120,
            toolchain: ToolchainConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            vswhere: PathBuf::from(DEFAULT_VSWHERE),
            dumpbin: None,
            compiler: None,
            dev_shell: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mode: BuildMode::Msvc,
            arch: "x64".to_string(),
            host_arch: "x64".to_string(),
            command: Vec::new(),
        }
    }
}

impl ToolchainConfig {
    pub fn overrides(&self) -> FixedToolchain {
        let mut fixed = FixedToolchain::new();
        if let Some(path) = &self.dumpbin {
            fixed.set(Tool::Dumpbin, path);
        }
        if let Some(path) = &self.compiler {
            fixed.set(Tool::Compiler, path);
        }
        if let Some(path) = &self.dev_shell {
            fixed.set(Tool::DevShell, path);
        }
        fixed
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> ProxyResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ProxyError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| ProxyError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn with_lister(mut self, lister: ListerKind) -> Self {
        self.lister = lister;
        self
    }

    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = action;
        self
    }

    pub fn with_message_tag(mut self, tag: impl Into<String>) -> Self {
        self.message_tag = tag.into();
        self
    }

    pub fn with_build_mode(mut self, mode: BuildMode) -> Self {
        self.build.mode = mode;
        self
    }

    pub fn with_build_command(mut self, command: Vec<String>) -> Self {
        self.build.mode = BuildMode::Command;
        self.build.command = command;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.tool_timeout_seconds = seconds;
        self
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_seconds)
    }

    /// Case-insensitive match against the configured library extension.
    pub fn is_library(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(self.library_extension.trim_start_matches('.')))
            .unwrap_or(false)
    }

    pub fn validate(&self) -> ProxyResult<()> {
        if self.library_extension.trim_start_matches('.').is_empty() {
            return Err(ProxyError::Config("library_extension must not be empty".to_string()));
        }
        if self.tool_timeout_seconds == 0 {
            return Err(ProxyError::Config("tool_timeout_seconds must be greater than 0".to_string()));
        }
        if self.message_tag.trim().is_empty() {
            return Err(ProxyError::Config("message_tag must not be empty".to_string()));
        }
        if self.build.command.first().is_some_and(|p| p.trim().is_empty()) {
            return Err(ProxyError::Config("build.command must start with a program".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tool_timeout(), Duration::from_secs(120));
        assert_eq!(config.build.mode, BuildMode::Msvc);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "action": "debug-string", "build": { "mode": "none" }, "toolchain": { "dumpbin": "C:/tools/dumpbin.exe" } }"#,
        )
        .unwrap();
        assert_eq!(config.action, ActionKind::DebugString);
        assert_eq!(config.build.mode, BuildMode::None);
        assert_eq!(config.build.arch, "x64");
        assert_eq!(config.lister, ListerKind::Auto);
        assert_eq!(
            config.toolchain.overrides().get(Tool::Dumpbin),
            Some(Path::new("C:/tools/dumpbin.exe"))
        );
        assert!(config.toolchain.overrides().get(Tool::Compiler).is_none());
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.json");
        let config = Config::new().with_message_tag("Probe").with_lister(ListerKind::Pe);
        fs::write(&path, config.to_json()).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "build": { "mode": "command", "command": [""] } }"#).unwrap();
        assert!(matches!(Config::load(&path), Err(ProxyError::Config(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ProxyError::Config(_))));
    }

    #[test]
    fn test_validate_limits() {
        assert!(Config::new().with_timeout(0).validate().is_err());
        assert!(Config::new().with_message_tag("  ").validate().is_err());
        assert!(Config::new().with_build_command(vec!["g++".to_string()]).validate().is_ok());
        assert!(Config::new().with_build_mode(BuildMode::Command).validate().is_ok());
    }

    #[test]
    fn test_is_library() {
        let config = Config::default();
        assert!(config.is_library(Path::new("C:/x/VERSION.DLL")));
        assert!(config.is_library(Path::new("a/b.dll")));
        assert!(!config.is_library(Path::new("a/b.exe")));
        assert!(!config.is_library(Path::new("a/dll")));
    }
}
