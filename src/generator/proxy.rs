// Sun Oct 18 2026 - Alex

use crate::error::{ProxyError, ProxyResult};
use crate::generator::action::DetectAction;
use crate::generator::builder::SourceBuilder;
use crate::generator::preamble::PREAMBLE_FILE;
use crate::symbol::{ExportTable, SymbolKind, SymbolName};
use std::collections::HashSet;

const INTERNAL_PREFIX: &str = "proxy_export_";
const EXPORT_CAPTION: &str = "Function Call";
const ENTRY_CAPTION: &str = "DllMain Event";
const ENTRY_SITE: &str = "DLL_PROCESS_ATTACH";

/// One replacement export in a generated unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyExport {
    pub symbol: SymbolName,
    /// Name of the C++ definition. Equals the export name unless the export is decorated.
    pub definition: String,
    pub kind: SymbolKind,
}

impl ProxyExport {
    pub fn is_renamed(&self) -> bool {
        self.kind == SymbolKind::Decorated
    }
}

/// Generated C++ source for one proxy library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySourceUnit {
    pub library: String,
    pub text: String,
    pub exports: Vec<ProxyExport>,
    pub skipped: Vec<SymbolName>,
}

impl ProxySourceUnit {
    pub fn export_count(&self) -> usize {
        self.exports.len()
    }

    pub fn definition_names(&self) -> Vec<&str> {
        self.exports.iter().map(|e| e.definition.as_str()).collect()
    }

    /// Every name of `table` is either exported or skipped, exactly once.
    pub fn verify(&self, table: &ExportTable) -> ProxyResult<()> {
        if self.exports.len() + self.skipped.len() != table.len() {
            return Err(ProxyError::Generation(format!(
                "{}: {} exports and {} skipped for a table of {}",
                self.library,
                self.exports.len(),
                self.skipped.len(),
                table.len()
            )));
        }

        let mut seen = HashSet::new();
        for export in &self.exports {
            if !seen.insert(export.definition.as_str()) {
                return Err(ProxyError::Generation(format!(
                    "{}: definition {} emitted twice",
                    self.library, export.definition
                )));
            }
        }
        Ok(())
    }
}

pub struct ProxyGenerator {
    action: DetectAction,
}

impl ProxyGenerator {
    pub fn new(action: DetectAction) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &DetectAction {
        &self.action
    }

    /// Renders the proxy unit for `library` exporting every name in `table`.
    ///
    /// Identifier exports get a `#define S S_orig` in the prefix block so the
    /// headers declare the original under the alias, an `#undef S` after the
    /// includes, and a same-named `dllexport` definition. Decorated exports are
    /// defined under an internal name and exported with a linker directive.
    pub fn generate(&self, library: &str, table: &ExportTable) -> ProxySourceUnit {
        let exports = self.plan(table);
        let skipped: Vec<SymbolName> = table
            .iter()
            .filter(|s| s.kind() == SymbolKind::Rejected)
            .cloned()
            .collect();

        for symbol in &skipped {
            log::warn!("{}: export {:?} cannot be expressed in source, skipping", library, symbol.as_str());
        }

        let mut src = SourceBuilder::new();

        // rename pass
        src.line(format!("#include \"{}\"", PREAMBLE_FILE));
        src.line("#include <windows.h>");
        src.line("#include <iostream>");
        for export in exports.iter().filter(|e| !e.is_renamed()) {
            src.prepend_line(format!("#define {} {}", export.symbol, export.symbol.alias()));
            src.line(format!("#undef {}", export.symbol));
        }

        let decorated: Vec<&ProxyExport> = exports.iter().filter(|e| e.is_renamed()).collect();
        if !decorated.is_empty() {
            src.blank();
            for export in &decorated {
                src.line(format!(
                    "#pragma comment(linker, \"/EXPORT:{}={}\")",
                    export.symbol, export.definition
                ));
            }
        }

        // definition pass
        for export in &exports {
            src.blank();
            self.render_export(&mut src, library, export);
        }

        src.blank();
        self.render_entry_point(&mut src, library);

        log::debug!(
            "Generated {} exports for {} ({} renamed, {} skipped)",
            exports.len(),
            library,
            decorated.len(),
            skipped.len()
        );

        ProxySourceUnit {
            library: library.to_string(),
            text: src.finish(),
            exports,
            skipped,
        }
    }

    fn plan(&self, table: &ExportTable) -> Vec<ProxyExport> {
        let mut taken: HashSet<String> = table
            .iter()
            .filter(|s| s.is_identifier())
            .map(|s| s.as_str().to_string())
            .collect();

        let mut exports = Vec::with_capacity(table.len());
        for (index, symbol) in table.iter().enumerate() {
            let kind = self.placement(symbol);
            match kind {
                SymbolKind::Identifier => exports.push(ProxyExport {
                    symbol: symbol.clone(),
                    definition: symbol.as_str().to_string(),
                    kind,
                }),
                SymbolKind::Decorated => {
                    let mut internal = format!("{}{}", INTERNAL_PREFIX, index);
                    while taken.contains(&internal) {
                        internal.push('_');
                    }
                    taken.insert(internal.clone());
                    exports.push(ProxyExport {
                        symbol: symbol.clone(),
                        definition: internal,
                        kind,
                    });
                }
                SymbolKind::Rejected => {}
            }
        }
        exports
    }

    fn placement(&self, symbol: &SymbolName) -> SymbolKind {
        match symbol.kind() {
            SymbolKind::Identifier if self.action.kind().api_names().contains(&symbol.as_str()) => {
                SymbolKind::Decorated
            }
            kind => kind,
        }
    }

    fn render_export(&self, src: &mut SourceBuilder, library: &str, export: &ProxyExport) {
        let statement = self.action.statement(library, export.symbol.as_str(), EXPORT_CAPTION);
        let signature = if export.is_renamed() {
            format!("void {}()", export.definition)
        } else {
            format!("__declspec(dllexport) void {}()", export.definition)
        };

        src.open("extern \"C\"");
        src.open(signature).line(statement).close();
        src.close();
    }

    fn render_entry_point(&self, src: &mut SourceBuilder, library: &str) {
        let statement = self.action.statement(library, ENTRY_SITE, ENTRY_CAPTION);

        src.open("BOOL APIENTRY DllMain(HMODULE hModule, DWORD ul_reason_for_call, LPVOID lpReserved)");
        src.line("switch (ul_reason_for_call) {");
        src.line("case DLL_PROCESS_ATTACH:");
        src.indent().line(statement).line("break;").dedent();
        for reason in ["DLL_THREAD_ATTACH", "DLL_THREAD_DETACH", "DLL_PROCESS_DETACH"] {
            src.line(format!("case {}:", reason));
            src.indent().line("break;").dedent();
        }
        src.line("}");
        src.line("return TRUE;");
        src.close();
    }
}
