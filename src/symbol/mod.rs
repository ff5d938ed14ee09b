// Sun Oct 18 2026 - Alex

pub mod name;
pub mod parser;
pub mod table;

pub use name::{classify, SymbolKind, SymbolName};
pub use parser::{parse_exports, ExportRecord, EXPORT_HEADER};
pub use table::ExportTable;
