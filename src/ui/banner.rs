// Sun Oct 18 2026 - Alex

use colored::*;

const WIDTH: usize = 56;

/// Boxed startup banner: tool name, one-line purpose, version.
pub struct Banner {
    title: String,
    subtitle: String,
    version: String,
}

impl Banner {
    pub fn new(title: &str, subtitle: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            version: version.to_string(),
        }
    }

    pub fn default_banner() -> Self {
        Banner::new(
            "DLL Proxy Generator",
            "search-order hijack detectors from export tables",
            env!("CARGO_PKG_VERSION"),
        )
    }

    /// Rows between the borders, centred and padded to the box width.
    fn rows(&self) -> [String; 3] {
        let center = |text: &str| format!("{:^width$}", text, width = WIDTH);
        [
            center(&self.title),
            center(&self.subtitle),
            center(&format!("v{}", self.version)),
        ]
    }

    pub fn render(&self) -> String {
        let border = "─".repeat(WIDTH + 2);
        let [title, subtitle, version] = self.rows();

        [
            format!("┌{}┐", border),
            format!("│ {} │", title.cyan().bold()),
            format!("│ {} │", subtitle),
            format!("├{}┤", border),
            format!("│ {} │", version.green()),
            format!("└{}┘", border),
        ]
        .join("\n")
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }
}
