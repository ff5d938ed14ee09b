// Sun Oct 18 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side effect the proxy performs when one of its exports or its entry point runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Blocking `MessageBoxW`, visible to whoever is watching the desktop.
    #[default]
    MessageBox,
    /// `OutputDebugStringW`, picked up by a debugger or DebugView without blocking the host.
    DebugString,
}

impl ActionKind {
    /// Win32 functions the rendered action calls. An export with one of these
    /// names must not be redefined under its own name.
    pub fn api_names(&self) -> &'static [&'static str] {
        match self {
            ActionKind::MessageBox => &["MessageBoxW"],
            ActionKind::DebugString => &["OutputDebugStringW"],
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "message-box" | "messagebox" | "msgbox" => Some(ActionKind::MessageBox),
            "debug-string" | "debugstring" | "ods" => Some(ActionKind::DebugString),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::MessageBox => write!(f, "message-box"),
            ActionKind::DebugString => write!(f, "debug-string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectAction {
    kind: ActionKind,
    tag: String,
}

impl DetectAction {
    pub fn new(kind: ActionKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Text identifying which library and which export fired.
    pub fn message(&self, library: &str, site: &str) -> String {
        format!("{} in {}!{}", self.tag, library, site)
    }

    /// A single C++ statement performing the action.
    pub fn statement(&self, library: &str, site: &str, caption: &str) -> String {
        let text = wide_literal(&self.message(library, site));
        match self.kind {
            ActionKind::MessageBox => format!(
                "MessageBoxW(NULL, {}, {}, MB_OK);",
                text,
                wide_literal(caption)
            ),
            ActionKind::DebugString => format!("OutputDebugStringW({});", text),
        }
    }
}

/// Renders `text` as a C++ wide string literal.
pub fn wide_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    out.push_str("L\"");
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            // keeps `??x` from ever reading as a trigraph
            '?' => out.push_str("\\?"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if (c as u32) <= 0xFFFF => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push_str(&format!("\\U{:08X}", c as u32)),
        }
    }
    out.push('"');
    out
}
