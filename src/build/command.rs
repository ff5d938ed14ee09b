// Sun Oct 18 2026 - Alex

use crate::build::{artifact_path, BuildDriver};
use crate::error::{ProxyError, ProxyResult};
use crate::toolchain::ToolCommand;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builds with a user-supplied command line, e.g. a MinGW cross compiler.
///
/// Arguments may contain `{source}`, `{output}`, `{dir}` and `{stem}`.
#[derive(Debug, Clone)]
pub struct CommandBuildDriver {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandBuildDriver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(120),
        }
    }

    /// `x86_64-w64-mingw32-g++ -shared -o {output} {source} -luser32`
    pub fn mingw() -> Self {
        Self::new(
            "x86_64-w64-mingw32-g++",
            ["-shared", "-municode", "-o", "{output}", "{source}", "-luser32"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn expand_args(&self, source: &Path, artifact: &Path) -> Vec<String> {
        let dir = source.parent().unwrap_or_else(|| Path::new("."));
        let stem = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{source}", &source.display().to_string())
                    .replace("{output}", &artifact.display().to_string())
                    .replace("{dir}", &dir.display().to_string())
                    .replace("{stem}", &stem)
            })
            .collect()
    }
}

impl BuildDriver for CommandBuildDriver {
    fn build(&self, source: &Path) -> ProxyResult<Option<PathBuf>> {
        let artifact = artifact_path(source);
        let output = ToolCommand::new(&self.program)
            .args(self.expand_args(source, &artifact))
            .with_timeout(self.timeout)
            .run()
            .map_err(|e| e.into_build_error())?;

        if !output.success() {
            return Err(ProxyError::Build {
                message: format!("{} exited with {:?}", self.program, output.exit_code()),
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
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let driver = CommandBuildDriver::new(
            "g++",
            vec!["-o".into(), "{output}".into(), "{source}".into(), "-I{dir}".into(), "{stem}.def".into()],
        );
        let args = driver.expand_args(Path::new("out/version.cpp"), Path::new("out/version.dll"));
        assert_eq!(args, vec!["-o", "out/version.dll", "out/version.cpp", "-Iout", "version.def"]);
    }

    #[test]
    fn test_mingw_preset() {
        let args = CommandBuildDriver::mingw().expand_args(Path::new("o/a.cpp"), Path::new("o/a.dll"));
        assert!(args.contains(&"o/a.dll".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-luser32"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_build() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("lib.cpp");
        std::fs::write(&source, "int x;").unwrap();
        let driver = CommandBuildDriver::new("sh", vec!["-c".into(), "cp \"$0\" \"$1\"".into(), "{source}".into(), "{output}".into()]);
        let artifact = driver.build(&source).unwrap().unwrap();
        assert_eq!(artifact, dir.path().join("lib.dll"));
        assert!(artifact.is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_build_surfaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("lib.cpp");
        let driver = CommandBuildDriver::new("sh", vec!["-c".into(), "echo 'error: expected ;'; exit 1".into()]);
        let err = driver.build(&source).unwrap_err();
        assert_eq!(err.tool_output(), Some("error: expected ;\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_artifact_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("lib.cpp");
        let driver = CommandBuildDriver::new("sh", vec!["-c".into(), "exit 0".into()]);
        assert!(matches!(driver.build(&source), Err(ProxyError::Build { .. })));
    }
}
