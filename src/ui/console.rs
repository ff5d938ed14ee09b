// Sun Oct 18 2026 - Alex

use crate::orchestrator::{GeneratedUnit, LibraryFailure, RunObserver, RunReport};
use colored::*;
use std::path::Path;

/// Prints run progress to the terminal.
///
/// Progress goes to stdout, failures go to stderr. Compiler and linker output
/// is shown only for failed builds.
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", "[*]".cyan(), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "[+]".green().bold(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "[!]".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "[-]".red().bold(), message);
    }

    pub fn print_summary(&self, report: &RunReport) {
        println!();
        println!("{}", "Summary".bold().underline());
        for (key, value) in summary_items(report) {
            println!("  {}: {}", key.bold(), value);
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ConsoleObserver {
    fn preamble_written(&mut self, path: &Path) {
        self.info(&format!("Wrote {}", path.display()));
    }

    fn library_started(&mut self, library: &Path, index: usize, total: usize) {
        self.info(&format!("[{}/{}] Processing {}", index + 1, total, library.display()));
    }

    fn unit_generated(&mut self, unit: &GeneratedUnit) {
        self.success(&format!(
            "Generated {} ({} exports)",
            unit.source.display(),
            unit.exports
        ));
        if unit.skipped > 0 {
            self.warning(&format!(
                "{} export(s) of {} could not be proxied",
                unit.skipped,
                unit.library.display()
            ));
        }
    }

    fn symbol_skipped(&mut self, library: &Path, symbol: &str) {
        if self.verbose {
            self.warning(&format!("Skipping {}!{}", library.display(), symbol));
        }
    }

    fn artifact_compiled(&mut self, artifact: &Path) {
        self.success(&format!("Compiled {}", artifact.display()));
    }

    fn library_failed(&mut self, failure: &LibraryFailure) {
        self.error(&failure.to_string());
        if let Some(output) = failure.error.tool_output() {
            for line in output.lines().filter(|l| !l.trim().is_empty()) {
                eprintln!("    {}", line.dimmed());
            }
        }
    }
}

fn summary_items(report: &RunReport) -> Vec<(&'static str, String)> {
    let mut items = vec![
        ("Libraries found", report.discovered.to_string()),
        ("Sources generated", report.generated.len().to_string()),
    ];

    if report.build_enabled {
        items.push(("Libraries compiled", report.compiled.len().to_string()));
    }
    items.push(("Failures", report.failed().to_string()));
    items
}
