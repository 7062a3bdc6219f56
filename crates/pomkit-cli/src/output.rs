//! Output formatting
//!
//! Results go to stdout so they can be piped; status lines go to stderr.

use console::{style, Term};

/// Status and result printer
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a result line to stdout, even in quiet mode
    pub fn result(&self, line: &str) {
        let _ = self.out.write_line(line);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self.err.write_line(&format!("{} {message}", self.prefix(true)));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        let _ = self.err.write_line(&format!("{} {message}", self.prefix(false)));
    }

    /// Print a section header to stdout
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.out.write_line(&styled);
    }

    /// Dim text when colors are on
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.use_color {
            style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }

    fn prefix(&self, ok: bool) -> String {
        match (self.use_color, ok) {
            (false, true) => "OK".to_string(),
            (false, false) => "FAIL".to_string(),
            (true, true) => style("✓").green().bold().to_string(),
            (true, false) => style("✗").red().bold().to_string(),
        }
    }
}
