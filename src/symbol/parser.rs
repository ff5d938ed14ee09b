// Sun Oct 18 2026 - Alex

use crate::symbol::{ExportTable, SymbolName};
use once_cell::sync::Lazy;
use regex::Regex;

/// Column header that opens the export listing in a `dumpbin /exports` report.
pub const EXPORT_HEADER: &str = "ordinal hint RVA      name";

// ordinal, hint, RVA, name. dumpbin prints the hint in hex.
static RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+([0-9A-Fa-f]+)\s+([0-9A-Fa-f]+)\s+(\S+)")
        .expect("export record pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord<'a> {
    pub ordinal: u32,
    pub hint: u32,
    pub rva: u64,
    pub name: &'a str,
}

/// Parses the textual report of an export-table dump into its exported names.
///
/// Everything up to the column header is ignored. Lines after it that are not
/// records (blank lines, the summary, forwarders, `[NONAME]` entries) are skipped.
/// A report without the header yields an empty table.
pub fn parse_exports(raw: &str) -> ExportTable {
    let mut table = ExportTable::new();

    for record in export_records(raw) {
        match SymbolName::new(record.name) {
            Some(name) => {
                if !table.insert(name) {
                    log::debug!("Duplicate export {} at ordinal {}", record.name, record.ordinal);
                }
            }
            None => log::debug!("Ignoring export token {:?}", record.name),
        }
    }

    table
}

pub fn export_records(raw: &str) -> impl Iterator<Item = ExportRecord<'_>> {
    raw.lines()
        .skip_while(|line| !line.contains(EXPORT_HEADER))
        .skip(1)
        .filter_map(parse_record)
}

pub fn parse_record(line: &str) -> Option<ExportRecord<'_>> {
    let caps = RECORD.captures(line)?;
    let name = caps.get(4)?.as_str();

    if is_annotation(name) {
        return None;
    }

    Some(ExportRecord {
        ordinal: caps[1].parse().ok()?,
        hint: u32::from_str_radix(&caps[2], 16).ok()?,
        rva: u64::from_str_radix(&caps[3], 16).ok()?,
        name,
    })
}

fn is_annotation(token: &str) -> bool {
    token.starts_with('[') || token.starts_with('(')
}
