// Sun Oct 18 2026 - Alex

use std::fmt;

/// Names the generated unit defines itself; an export spelled the same way
/// cannot be redefined verbatim.
pub const RESERVED_UNIT_NAMES: &[&str] = &["DllMain"];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// How an export name can be expressed in the generated unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Legal identifier, defined and exported under its own name.
    Identifier,
    /// Printable but not an identifier (mangled, decorated, keyword).
    /// Exported through a linker directive pointing at an internal name.
    Decorated,
    /// Cannot be written even into a linker directive.
    Rejected,
}

/// One exported entry point name, case-sensitive and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolName(String);

impl SymbolName {
    /// Returns `None` for empty tokens or tokens carrying whitespace.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(|c| c.is_whitespace()) {
            return None;
        }
        Some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> SymbolKind {
        classify(&self.0)
    }

    pub fn is_identifier(&self) -> bool {
        self.kind() == SymbolKind::Identifier
    }

    /// Name of the original symbol once the alias directive renamed it.
    pub fn alias(&self) -> String {
        format!("{}_orig", self.0)
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymbolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn classify(name: &str) -> SymbolKind {
    if is_c_identifier(name) && !is_reserved(name) {
        return SymbolKind::Identifier;
    }

    let linkable = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '"' | ',' | '=' | '\\'));

    if linkable {
        SymbolKind::Decorated
    } else {
        SymbolKind::Rejected
    }
}

pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_reserved(name: &str) -> bool {
    CPP_KEYWORDS.contains(&name) || RESERVED_UNIT_NAMES.contains(&name)
}
