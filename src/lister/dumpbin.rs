// Sun Oct 18 2026 - Alex

use crate::error::{ProxyError, ProxyResult};
use crate::lister::ExportLister;
use crate::toolchain::{FixedToolchain, Tool, ToolCommand, ToolchainResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Runs `dumpbin /exports <library>` and returns its report.
pub struct DumpbinLister {
    resolver: Arc<dyn ToolchainResolver>,
    timeout: Duration,
}

impl DumpbinLister {
    pub fn new(resolver: Arc<dyn ToolchainResolver>) -> Self {
        Self {
            resolver,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_path(dumpbin: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FixedToolchain::new().with(Tool::Dumpbin, dumpbin)))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ExportLister for DumpbinLister {
    fn list(&self, library: &Path) -> ProxyResult<String> {
        let dumpbin = self
            .resolver
            .resolve(Tool::Dumpbin)
            .map_err(|e| ProxyError::Listing(e.to_string()))?;

        let output = ToolCommand::new(dumpbin)
            .arg("/exports")
            .arg(library)
            .with_timeout(self.timeout)
            .run()
            .map_err(|e| e.into_listing_error())?;

        if !output.success() {
            let detail = output.combined();
            let first = detail.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
            return Err(ProxyError::Listing(format!(
                "dumpbin exited with {:?}: {}",
                output.exit_code(),
                first
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| ProxyError::Listing("dumpbin output is not valid UTF-8".to_string()))
    }

    fn name(&self) -> &'static str {
        "dumpbin"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn fake_dumpbin(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("dumpbin.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_dumpbin(dir.path(), "echo \"ordinal hint RVA      name\"; echo \"   1    0 00001000 $2\"");
        let report = DumpbinLister::with_path(tool).list(Path::new("Foo")).unwrap();
        assert!(report.contains("00001000 Foo"));
    }

    #[test]
    fn test_nonzero_exit_is_listing_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_dumpbin(dir.path(), "echo 'LNK1181: cannot open input file' >&2; exit 1181");
        let err = DumpbinLister::with_path(tool).list(Path::new("x.dll")).unwrap_err();
        match err {
            ProxyError::Listing(msg) => assert!(msg.contains("LNK1181"), "{}", msg),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_timeout_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_dumpbin(dir.path(), "sleep 5");
        let err = DumpbinLister::with_path(tool)
            .with_timeout(Duration::from_millis(200))
            .list(Path::new("x.dll"))
            .unwrap_err();
        assert!(matches!(err, ProxyError::Timeout { .. }));
    }

    #[test]
    fn test_unresolved_dumpbin() {
        let lister = DumpbinLister::new(Arc::new(FixedToolchain::new()));
        assert!(matches!(lister.list(Path::new("x.dll")), Err(ProxyError::Listing(_))));
    }
}
