// Sun Oct 18 2026 - Alex

use crate::build::{artifact_path, BuildDriver, BuildMode, CommandBuildDriver, MsvcBuildDriver, SkipBuild};
use crate::config::Config;
use crate::error::{ProxyError, ProxyResult};
use crate::generator::{write_preamble, DetectAction, ProxyGenerator, SOURCE_EXTENSION};
use crate::lister::{create_lister, ExportLister};
use crate::orchestrator::discovery::{discover_libraries, library_base_name};
use crate::orchestrator::observer::RunObserver;
use crate::orchestrator::report::{GeneratedUnit, LibraryFailure, RunReport, Stage};
use crate::symbol::parse_exports;
use crate::toolchain::{ToolchainResolver, VsWhereResolver};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Drives list → parse → generate → write → build for every input library.
///
/// Failures of one library are recorded and the run moves on; only discovery
/// and output-directory problems end it early.
pub struct ProxyCoordinator {
    config: Config,
    lister: Box<dyn ExportLister>,
    generator: ProxyGenerator,
    builder: Box<dyn BuildDriver>,
}

impl ProxyCoordinator {
    pub fn new(
        config: Config,
        lister: Box<dyn ExportLister>,
        generator: ProxyGenerator,
        builder: Box<dyn BuildDriver>,
    ) -> Self {
        Self {
            config,
            lister,
            generator,
            builder,
        }
    }

    pub fn from_config(config: Config) -> ProxyResult<Self> {
        config.validate()?;

        let timeout = config.tool_timeout();
        let resolver: Arc<dyn ToolchainResolver> = Arc::new(
            VsWhereResolver::new(&config.toolchain.vswhere)
                .with_overrides(config.toolchain.overrides())
                .with_timeout(timeout),
        );

        let lister = create_lister(config.lister, resolver.clone(), timeout);
        let generator = ProxyGenerator::new(DetectAction::new(config.action, config.message_tag.clone()));
        let builder: Box<dyn BuildDriver> = match config.build.mode {
            BuildMode::Msvc => Box::new(
                MsvcBuildDriver::new(resolver)
                    .with_arch(&config.build.arch, &config.build.host_arch)
                    .with_timeout(timeout),
            ),
            BuildMode::Command => {
                let driver = match config.build.command.split_first() {
                    Some((program, args)) => CommandBuildDriver::new(program.clone(), args.to_vec()),
                    None => CommandBuildDriver::mingw(),
                };
                Box::new(driver.with_timeout(timeout))
            }
            BuildMode::None => Box::new(SkipBuild),
        };

        log::debug!("Using {} lister and {} build driver", lister.name(), builder.name());
        Ok(Self::new(config, lister, generator, builder))
    }

    pub fn lister_name(&self) -> &'static str {
        self.lister.name()
    }

    pub fn builder_name(&self) -> &'static str {
        self.builder.name()
    }

    pub fn run(&self, input: &Path, output_dir: &Path, observer: &mut dyn RunObserver) -> ProxyResult<RunReport> {
        let libraries = discover_libraries(input, |p| self.config.is_library(p))?;

        fs::create_dir_all(output_dir).map_err(|source| ProxyError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let preamble = write_preamble(output_dir)?;
        observer.preamble_written(&preamble);

        let mut report = RunReport {
            preamble: Some(preamble),
            discovered: libraries.len(),
            build_enabled: self.builder.enabled(),
            ..RunReport::default()
        };

        // output base name (case-folded) -> library that claimed it
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        let total = libraries.len();
        for (index, library) in libraries.iter().enumerate() {
            observer.library_started(library, index, total);
            self.process_library(library, output_dir, &mut claimed, &mut report, observer);
        }

        log::info!(
            "Processed {} libraries: {} generated, {} compiled, {} failed",
            total,
            report.generated.len(),
            report.compiled.len(),
            report.failed()
        );
        Ok(report)
    }

    fn process_library(
        &self,
        library: &Path,
        output_dir: &Path,
        claimed: &mut HashMap<String, PathBuf>,
        report: &mut RunReport,
        observer: &mut dyn RunObserver,
    ) {
        let base = library_base_name(library);
        log::debug!("Processing {} as {}", library.display(), base);

        let source = output_dir.join(format!("{}.{}", base, SOURCE_EXTENSION));
        if let Err(error) = self.check_outputs(library, &base, &source, claimed) {
            return fail(report, observer, library, Stage::Writing, error);
        }

        let raw = match self.lister.list(library) {
            Ok(raw) => raw,
            Err(error) => return fail(report, observer, library, Stage::Listing, error),
        };

        let table = parse_exports(&raw);
        let unit = self.generator.generate(&base, &table);
        if let Err(error) = unit.verify(&table) {
            return fail(report, observer, library, Stage::Generation, error);
        }

        for symbol in &unit.skipped {
            observer.symbol_skipped(library, symbol.as_str());
        }

        if let Err(e) = fs::write(&source, &unit.text) {
            return fail(report, observer, library, Stage::Writing, ProxyError::io(&source, e));
        }

        let generated = GeneratedUnit {
            library: library.to_path_buf(),
            source: source.clone(),
            exports: unit.export_count(),
            skipped: unit.skipped.len(),
        };
        observer.unit_generated(&generated);
        report.generated.push(generated);

        match self.builder.build(&source) {
            Ok(Some(artifact)) => {
                observer.artifact_compiled(&artifact);
                report.compiled.push(artifact);
            }
            Ok(None) => {}
            Err(error) => fail(report, observer, library, Stage::Build, error),
        }
    }

    /// Each library needs outputs of its own: no other library in the run may
    /// map to the same base name, and the compiled proxy must not land on the
    /// library it was generated from.
    fn check_outputs(
        &self,
        library: &Path,
        base: &str,
        source: &Path,
        claimed: &mut HashMap<String, PathBuf>,
    ) -> ProxyResult<()> {
        if let Some(first) = claimed.get(&base.to_lowercase()) {
            return Err(ProxyError::OutputConflict {
                path: source.to_path_buf(),
                reason: format!("is already produced for {}", first.display()),
            });
        }

        if self.builder.enabled() {
            let artifact = artifact_path(source);
            if same_file(&artifact, library) {
                return Err(ProxyError::OutputConflict {
                    path: artifact,
                    reason: "would overwrite the input library".to_string(),
                });
            }
        }

        claimed.insert(base.to_lowercase(), library.to_path_buf());
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn fail(report: &mut RunReport, observer: &mut dyn RunObserver, library: &Path, stage: Stage, error: ProxyError) {
    log::debug!("{} failed at {}: {}", library.display(), stage, error);
    let failure = LibraryFailure {
        library: library.to_path_buf(),
        stage,
        error,
    };
    observer.library_failed(&failure);
    report.failures.push(failure);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{ActionKind, PREAMBLE_FILE};
    use crate::orchestrator::observer::SilentObserver;

    /// Treats each input file as its own export report; files containing
    /// `LISTING-FAILS` fail the way a crashing dumpbin would.
    struct ReportFileLister;

    impl ExportLister for ReportFileLister {
        fn list(&self, library: &Path) -> ProxyResult<String> {
            let text = fs::read_to_string(library).map_err(|e| ProxyError::Listing(e.to_string()))?;
            if text.contains("LISTING-FAILS") {
                return Err(ProxyError::Listing("dumpbin exited with Some(1)".to_string()));
            }
            Ok(text)
        }

        fn name(&self) -> &'static str {
            "report-file"
        }
    }

    /// Writes a placeholder artifact; sources named `broken.cpp` fail to build.
    struct TouchBuild;

    impl BuildDriver for TouchBuild {
        fn build(&self, source: &Path) -> ProxyResult<Option<PathBuf>> {
            if source.file_stem().map(|s| s == "broken").unwrap_or(false) {
                return Err(ProxyError::Build {
                    message: "cl.exe exited with Some(2)".to_string(),
                    output: "broken.cpp(3): error C2059".to_string(),
                });
            }
            let artifact = artifact_path(source);
            fs::write(&artifact, b"MZ").map_err(|e| ProxyError::io(&artifact, e))?;
            Ok(Some(artifact))
        }

        fn name(&self) -> &'static str {
            "touch"
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RunObserver for Recorder {
        fn preamble_written(&mut self, _path: &Path) {
            self.events.push("preamble".to_string());
        }

        fn unit_generated(&mut self, unit: &GeneratedUnit) {
            self.events.push(format!("generated {}", unit.source.file_name().unwrap().to_string_lossy()));
        }

        fn artifact_compiled(&mut self, artifact: &Path) {
            self.events.push(format!("compiled {}", artifact.file_name().unwrap().to_string_lossy()));
        }

        fn library_failed(&mut self, failure: &LibraryFailure) {
            self.events.push(format!("failed {} at {}", failure.library.file_name().unwrap().to_string_lossy(), failure.stage));
        }

        fn symbol_skipped(&mut self, _library: &Path, symbol: &str) {
            self.events.push(format!("skipped {}", symbol));
        }
    }

    fn coordinator() -> ProxyCoordinator {
        let config = Config::default();
        let generator = ProxyGenerator::new(DetectAction::new(ActionKind::MessageBox, "DLL Hijack"));
        ProxyCoordinator::new(config, Box::new(ReportFileLister), generator, Box::new(TouchBuild))
    }

    fn report(names: &[&str]) -> String {
        let mut text = String::from("Dump of file x.dll\n\n    ordinal hint RVA      name\n\n");
        for (i, name) in names.iter().enumerate() {
            text.push_str(&format!("{:>11} {:>4X} {:08X} {}\n", i + 1, i, 0x1000 + i * 0x10, name));
        }
        text.push_str("\n  Summary\n\n        1000 .data\n");
        text
    }

    #[test]
    fn test_partial_failure_is_isolated() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("a.dll"), report(&["Foo"])).unwrap();
        fs::write(input.path().join("b.dll"), "LISTING-FAILS").unwrap();
        fs::write(input.path().join("c.dll"), report(&["Bar", "Baz"])).unwrap();

        let mut recorder = Recorder::default();
        let run = coordinator().run(input.path(), output.path(), &mut recorder).unwrap();

        assert_eq!(run.discovered, 3);
        assert_eq!(run.failed(), 1);
        assert_eq!(run.failures[0].library, input.path().join("b.dll"));
        assert_eq!(run.failures[0].stage, Stage::Listing);
        assert!(output.path().join("a.dll").is_file());
        assert!(output.path().join("c.dll").is_file());
        assert!(!output.path().join("b.cpp").exists());
        assert_eq!(run.succeeded(), 2);
        assert_eq!(
            recorder.events,
            vec![
                "preamble",
                "generated a.cpp",
                "compiled a.dll",
                "failed b.dll at listing",
                "generated c.cpp",
                "compiled c.dll",
            ]
        );
    }

    #[test]
    fn test_build_failure_keeps_source() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("broken.dll"), report(&["Foo"])).unwrap();
        fs::write(input.path().join("fine.dll"), report(&["Foo"])).unwrap();

        let run = coordinator().run(input.path(), output.path(), &mut SilentObserver).unwrap();
        assert_eq!(run.generated.len(), 2);
        assert_eq!(run.compiled, vec![output.path().join("fine.dll")]);
        assert_eq!(run.failures_at(Stage::Build), 1);
        assert_eq!(run.failures[0].error.tool_output(), Some("broken.cpp(3): error C2059"));
        assert!(output.path().join("broken.cpp").is_file());
    }

    #[test]
    fn test_runs_are_idempotent() {
        let input = tempfile::tempdir().unwrap();
        fs::write(input.path().join("version.dll"), report(&["GetFileVersionInfoA", "?X@@YAXXZ", "VerQueryValueW"])).unwrap();
        fs::write(input.path().join("empty.dll"), "no exports here").unwrap();

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        coordinator().run(input.path(), first.path(), &mut SilentObserver).unwrap();
        coordinator().run(input.path(), second.path(), &mut SilentObserver).unwrap();

        for name in ["version.cpp", "empty.cpp", PREAMBLE_FILE] {
            let a = fs::read_to_string(first.path().join(name)).unwrap();
            let b = fs::read_to_string(second.path().join(name)).unwrap();
            assert_eq!(a, b, "{} differs between runs", name);
        }
    }

    #[test]
    fn test_single_file_and_output_dir_creation() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let library = input.path().join("version.dll");
        fs::write(&library, report(&["Foo", "Bar"])).unwrap();
        fs::write(input.path().join("other.dll"), report(&["Baz"])).unwrap();
        let nested = output.path().join("nested").join("out");

        let run = coordinator().run(&library, &nested, &mut SilentObserver).unwrap();
        assert_eq!(run.generated.len(), 1);
        assert_eq!(run.generated[0].exports, 2);
        assert!(nested.join(PREAMBLE_FILE).is_file());

        let text = fs::read_to_string(nested.join("version.cpp")).unwrap();
        assert!(text.contains("__declspec(dllexport) void Foo()"));
        assert!(text.contains("L\"DLL Hijack in version!Bar\""));
        assert!(!nested.join("other.cpp").exists());
    }

    #[test]
    fn test_invalid_input_is_fatal() {
        let output = tempfile::tempdir().unwrap();
        let target = output.path().join("out");
        let err = coordinator()
            .run(Path::new("/nonexistent/input"), &target, &mut SilentObserver)
            .unwrap_err();
        assert!(matches!(err, ProxyError::Discovery(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_skipped_symbols_are_reported() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("odd.dll"), report(&["Good", "bad=name"])).unwrap();

        let mut recorder = Recorder::default();
        let run = coordinator().run(input.path(), output.path(), &mut recorder).unwrap();
        assert_eq!(run.generated[0].skipped, 1);
        assert!(recorder.events.contains(&"skipped bad=name".to_string()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_case_variant_libraries_do_not_share_outputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("foo.DLL"), report(&["Upper"])).unwrap();
        fs::write(input.path().join("foo.dll"), report(&["Lower"])).unwrap();

        let run = coordinator().run(input.path(), output.path(), &mut SilentObserver).unwrap();
        assert_eq!(run.generated.len(), 1);
        assert_eq!(run.succeeded(), 1);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].library, input.path().join("foo.dll"));
        assert_eq!(run.failures[0].stage, Stage::Writing);
        assert!(matches!(run.failures[0].error, ProxyError::OutputConflict { .. }));

        let text = fs::read_to_string(output.path().join("foo.cpp")).unwrap();
        assert!(text.contains("void Upper()"));
        assert!(!text.contains("void Lower()"));
    }

    #[test]
    fn test_build_never_overwrites_input_library() {
        let dir = tempfile::tempdir().unwrap();
        let library = dir.path().join("version.dll");
        let original = report(&["GetFileVersionInfoA"]);
        fs::write(&library, &original).unwrap();

        let run = coordinator().run(dir.path(), dir.path(), &mut SilentObserver).unwrap();
        assert!(!run.any_succeeded());
        assert_eq!(run.failures_at(Stage::Writing), 1);
        match &run.failures[0].error {
            ProxyError::OutputConflict { reason, .. } => assert!(reason.contains("overwrite")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(fs::read_to_string(&library).unwrap(), original);
        assert!(!dir.path().join("version.cpp").exists());
    }

    #[test]
    fn test_in_place_generation_without_build() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("version.dll"), report(&["Foo"])).unwrap();

        let generator = ProxyGenerator::new(DetectAction::new(ActionKind::MessageBox, "DLL Hijack"));
        let coordinator = ProxyCoordinator::new(Config::default(), Box::new(ReportFileLister), generator, Box::new(SkipBuild));
        let run = coordinator.run(dir.path(), dir.path(), &mut SilentObserver).unwrap();
        assert_eq!(run.succeeded(), 1);
        assert!(dir.path().join("version.cpp").is_file());
    }

    #[test]
    fn test_from_config_without_build() {
        let config = Config::default()
            .with_build_mode(BuildMode::None)
            .with_lister(crate::lister::ListerKind::Pe);
        let coordinator = ProxyCoordinator::from_config(config).unwrap();
        assert_eq!(coordinator.lister_name(), "pe");
        assert_eq!(coordinator.builder_name(), "none");
    }

    #[test]
    fn test_from_config_command_build() {
        let config = Config::default()
            .with_build_mode(BuildMode::Command)
            .with_lister(crate::lister::ListerKind::Pe);
        let coordinator = ProxyCoordinator::from_config(config).unwrap();
        assert_eq!(coordinator.builder_name(), "command");
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = Config::default().with_timeout(0);
        assert!(matches!(ProxyCoordinator::from_config(config), Err(ProxyError::Config(_))));
    }
}
