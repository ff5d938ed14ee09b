// Sun Oct 18 2026 - Alex

use crate::error::{ProxyError, ProxyResult};
use crate::lister::ExportLister;
use crate::symbol::EXPORT_HEADER;
use goblin::pe::export::Reexport;
use goblin::pe::PE;
use goblin::Object;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Reads the export directory in-process and renders it the way
/// `dumpbin /exports` does, so one parser serves both listers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeLister;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLine {
    pub ordinal: u32,
    pub hint: u32,
    pub rva: u64,
    pub name: Option<String>,
    pub forwarded_to: Option<String>,
}

impl PeLister {
    pub fn new() -> Self {
        Self
    }

    /// Export directory entries with resolved ordinals. An ordinal that does
    /// not fit in 32 bits means a corrupt directory and fails the listing.
    pub fn export_lines(pe: &PE) -> ProxyResult<Vec<ExportLine>> {
        let (ordinal_base, ordinal_table) = match &pe.export_data {
            Some(data) => (
                data.export_directory_table.ordinal_base,
                data.export_ordinal_table.as_slice(),
            ),
            None => (1, &[][..]),
        };

        pe.exports
            .iter()
            .enumerate()
            .map(|(index, export)| {
                let offset = ordinal_table.get(index).map(|o| u32::from(*o)).unwrap_or(index as u32);
                let ordinal = ordinal_base.checked_add(offset).ok_or_else(|| {
                    ProxyError::Listing(format!(
                        "export ordinal overflows: base {:#x} + {}",
                        ordinal_base, offset
                    ))
                })?;

                let forwarded_to = export.reexport.as_ref().map(|r| match r {
                    Reexport::DLLName { export, lib } => format!("{}.{}", lib, export),
                    Reexport::DLLOrdinal { ordinal, lib } => format!("{}.#{}", lib, ordinal),
                });

                Ok(ExportLine {
                    ordinal,
                    hint: index as u32,
                    rva: export.rva as u64,
                    name: export.name.map(str::to_string),
                    forwarded_to,
                })
            })
            .collect()
    }
}

/// Renders export lines as a `dumpbin /exports` report.
pub fn render_report(library: &str, lines: &[ExportLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dump of file {}", library);
    let _ = writeln!(out);
    let _ = writeln!(out, "File Type: DLL");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Section contains the following exports for {}", library);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>12} number of functions", lines.len());
    let _ = writeln!(out, "{:>12} number of names", lines.iter().filter(|l| l.name.is_some()).count());
    let _ = writeln!(out);
    let _ = writeln!(out, "    {}", EXPORT_HEADER);
    let _ = writeln!(out);

    for line in lines {
        match (&line.name, &line.forwarded_to) {
            (Some(name), Some(target)) => {
                let _ = writeln!(out, "{:>11} {:>4X}          {} (forwarded to {})", line.ordinal, line.hint, name, target);
            }
            (Some(name), None) => {
                let _ = writeln!(out, "{:>11} {:>4X} {:08X} {}", line.ordinal, line.hint, line.rva, name);
            }
            (None, _) => {
                let _ = writeln!(out, "{:>11}      {:08X} [NONAME]", line.ordinal, line.rva);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  Summary");
    out
}

impl ExportLister for PeLister {
    fn list(&self, library: &Path) -> ProxyResult<String> {
        let bytes = fs::read(library)
            .map_err(|e| ProxyError::Listing(format!("cannot read {}: {}", library.display(), e)))?;

        let pe = match Object::parse(&bytes) {
            Ok(Object::PE(pe)) => pe,
            Ok(_) => {
                return Err(ProxyError::Listing(format!("{} is not a PE image", library.display())))
            }
            Err(e) => {
                return Err(ProxyError::Listing(format!(
                    "failed to parse {}: {}",
                    library.display(),
                    e
                )))
            }
        };

        let name = pe
            .name
            .map(str::to_string)
            .or_else(|| library.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default();

        let lines = Self::export_lines(&pe)?;
        log::debug!("{}: {} export directory entries", library.display(), lines.len());
        Ok(render_report(&name, &lines))
    }

    fn name(&self) -> &'static str {
        "pe"
    }
}
