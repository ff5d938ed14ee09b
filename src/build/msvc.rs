// Sun Oct 18 2026 - Alex

use crate::build::{artifact_path, BuildDriver};
use crate::error::{ProxyError, ProxyResult};
use crate::toolchain::{Tool, ToolCommand, ToolchainResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const ENV_DEV_SHELL: &str = "PROXY_DEV_SHELL";
const ENV_COMPILER: &str = "PROXY_COMPILER";
const ENV_SOURCE: &str = "PROXY_SOURCE";
const ENV_OUTPUT: &str = "PROXY_OUTPUT";
const ENV_OBJ_DIR: &str = "PROXY_OBJ_DIR";

/// Builds with `cl.exe` inside a Visual Studio developer shell.
///
/// `cmd.exe` is fed a short script on stdin: enter the developer environment
/// through `VsDevCmd.bat`, compile, and exit with the compiler's status.
/// Tool and file paths reach the script as environment variables.
pub struct MsvcBuildDriver {
    resolver: Arc<dyn ToolchainResolver>,
    arch: String,
    host_arch: String,
    libraries: Vec<String>,
    timeout: Duration,
}

impl MsvcBuildDriver {
    pub fn new(resolver: Arc<dyn ToolchainResolver>) -> Self {
        Self {
            resolver,
            arch: "x64".to_string(),
            host_arch: "x64".to_string(),
            libraries: vec!["user32.lib".to_string()],
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_arch(mut self, arch: &str, host_arch: &str) -> Self {
        self.arch = arch.to_string();
        self.host_arch = host_arch.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Compiler arguments. Paths are referenced through the script's
    /// environment so `cmd.exe` never expands `%` inside them.
    pub fn compiler_args(&self) -> String {
        let mut args = vec!["/nologo".to_string(), "/DYNAMICBASE".to_string()];
        args.extend(self.libraries.iter().map(|l| format!("\"{}\"", l)));
        args.push("/LD".to_string());
        args.push(format!("\"%{}%\"", ENV_SOURCE));
        args.push(format!("/Fe\"%{}%\"", ENV_OUTPUT));
        // cl reads `\"` as an escaped quote, so the directory's trailing separator is doubled
        args.push(format!("/Fo\"%{}%\\\\\"", ENV_OBJ_DIR));
        args.join(" ")
    }

    pub fn script(&self) -> String {
        format!(
            "\"%{}%\" -startdir=none -arch={} -host_arch={} -no_logo\r\n\"%{}%\" {}\r\nexit %ERRORLEVEL%\r\n",
            ENV_DEV_SHELL,
            self.arch,
            self.host_arch,
            ENV_COMPILER,
            self.compiler_args()
        )
    }

    /// The `cmd.exe` invocation building `source` into `artifact`.
    pub fn command(&self, source: &Path, artifact: &Path) -> ProxyResult<ToolCommand> {
        let dev_shell = self.resolver.resolve(Tool::DevShell).map_err(|e| ProxyError::Build {
            message: e.to_string(),
            output: String::new(),
        })?;
        let compiler = self
            .resolver
            .resolve(Tool::Compiler)
            .unwrap_or_else(|_| PathBuf::from(Tool::Compiler.file_name()));
        let dir = source.parent().unwrap_or_else(|| Path::new("."));

        Ok(ToolCommand::new("cmd.exe")
            .with_stdin(self.script())
            .with_env(ENV_DEV_SHELL, dev_shell)
            .with_env(ENV_COMPILER, compiler)
            .with_env(ENV_SOURCE, source)
            .with_env(ENV_OUTPUT, artifact)
            .with_env(ENV_OBJ_DIR, dir)
            .with_timeout(self.timeout))
    }
}

impl BuildDriver for MsvcBuildDriver {
    fn build(&self, source: &Path) -> ProxyResult<Option<PathBuf>> {
        let artifact = artifact_path(source);
        let command = self.command(source, &artifact)?;
        log::debug!("Build script for {}:\n{}", source.display(), self.script());

        let output = command.run().map_err(|e| e.into_build_error())?;

        if !output.success() {
            return Err(ProxyError::Build {
                message: format!("cl.exe exited with {:?}", output.exit_code()),
                output: output.combined(),
            });
        }

        if !artifact.is_file() {
            return Err(ProxyError::Build {
                message: format!("{} was not produced", artifact.display()),
                output: output.combined(),
            });
        }

        Ok(Some(artifact))
    }

    fn name(&self) -> &'static str {
        "msvc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::FixedToolchain;
    use std::ffi::OsString;

    fn driver() -> MsvcBuildDriver {
        MsvcBuildDriver::new(Arc::new(FixedToolchain::new()))
    }

    #[test]
    fn test_compiler_args() {
        assert_eq!(
            driver().compiler_args(),
            "/nologo /DYNAMICBASE \"user32.lib\" /LD \"%PROXY_SOURCE%\" /Fe\"%PROXY_OUTPUT%\" /Fo\"%PROXY_OBJ_DIR%\\\\\""
        );
    }

    #[test]
    fn test_script_enters_dev_shell_first() {
        let script = driver().with_arch("x86", "x64").script();
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines[0], "\"%PROXY_DEV_SHELL%\" -startdir=none -arch=x86 -host_arch=x64 -no_logo");
        assert!(lines[1].starts_with("\"%PROXY_COMPILER%\" /nologo"));
        assert_eq!(lines[2], "exit %ERRORLEVEL%");
    }

    #[test]
    fn test_percent_paths_stay_out_of_script() {
        let resolver = FixedToolchain::new()
            .with(Tool::DevShell, "C:/VS/Common7/Tools/VsDevCmd.bat")
            .with(Tool::Compiler, "C:/VS/cl.exe");
        let driver = MsvcBuildDriver::new(Arc::new(resolver));
        let source = Path::new("C:/out/100%PATH%/version.cpp");
        let artifact = artifact_path(source);

        let command = driver.command(source, &artifact).unwrap();
        assert!(!driver.script().contains("100%"));
        assert_eq!(command.env_value("PROXY_SOURCE"), Some(&OsString::from("C:/out/100%PATH%/version.cpp")));
        assert_eq!(command.env_value("PROXY_OUTPUT"), Some(&OsString::from("C:/out/100%PATH%/version.dll")));
        assert_eq!(command.env_value("PROXY_OBJ_DIR"), Some(&OsString::from("C:/out/100%PATH%")));
        assert_eq!(command.env_value("PROXY_COMPILER"), Some(&OsString::from("C:/VS/cl.exe")));
    }

    #[test]
    fn test_compiler_falls_back_to_path_lookup() {
        let resolver = FixedToolchain::new().with(Tool::DevShell, "C:/VS/VsDevCmd.bat");
        let driver = MsvcBuildDriver::new(Arc::new(resolver));
        let command = driver.command(Path::new("out/a.cpp"), Path::new("out/a.dll")).unwrap();
        assert_eq!(command.env_value("PROXY_COMPILER"), Some(&OsString::from("cl.exe")));
    }

    #[test]
    fn test_missing_dev_shell_is_build_error() {
        let err = driver().build(Path::new("out/a.cpp")).unwrap_err();
        assert!(matches!(err, ProxyError::Build { .. }));
    }
}
