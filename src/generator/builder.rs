// Sun Oct 18 2026 - Alex

/// Line-oriented text builder with a prefix region.
///
/// Lines pushed with [`SourceBuilder::prepend_line`] are placed before the body,
/// each new one ahead of the previous ones, so the prefix renders in reverse
/// push order.
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    prefix: Vec<String>,
    body: Vec<String>,
    indent: usize,
}

const INDENT: &str = "    ";

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.prefix.push(line.into());
        self
    }

    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        let line = line.as_ref();
        if line.is_empty() {
            self.body.push(String::new());
        } else {
            self.body.push(format!("{}{}", INDENT.repeat(self.indent), line));
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.body.push(String::new());
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    /// Opens a brace block: `header {`, then indents.
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(format!("{} {{", header.as_ref()));
        self.indent()
    }

    pub fn close(&mut self) -> &mut Self {
        self.dedent();
        self.line("}")
    }

    pub fn finish(&self) -> String {
        let mut out = String::new();
        for line in self.prefix.iter().rev() {
            out.push_str(line);
            out.push('\n');
        }
        for line in &self.body {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
