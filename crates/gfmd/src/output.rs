//! Status messages for the `gfmd` commands.
//!
//! Everything goes to stderr so that rendered markdown on stdout stays clean
//! when `gfmd render` is used in a pipe.

use console::{Style, Term};

/// How a message is coloured.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn style(self) -> Style {
        let style = Style::new().for_stderr();
        match self {
            Self::Plain => style,
            Self::Success => style.green(),
            Self::Warning => style.yellow(),
            Self::Error => style.red().bold(),
        }
    }
}

/// Writer for human-readable status lines on stderr.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Neutral progress line, e.g. a file `--check` would update.
    pub(crate) fn info(&self, msg: &str) {
        self.emit(Tone::Plain, msg);
    }

    /// Final summary of a successful run.
    pub(crate) fn success(&self, msg: &str) {
        self.emit(Tone::Success, msg);
    }

    /// Preprocessor warning for one document, prefixed with its name.
    pub(crate) fn document_warning(&self, document: &str, warning: &str) {
        self.emit(Tone::Warning, &document_message(document, warning));
    }

    /// Error that ends the process.
    pub(crate) fn error(&self, msg: &str) {
        self.emit(Tone::Error, msg);
    }

    fn emit(&self, tone: Tone, msg: &str) {
        // Write errors on stderr are ignored.
        let _ = self.term.write_line(&tone.style().apply_to(msg).to_string());
    }
}

/// `{document}: {message}`, where `document` is a path or `<stdin>`.
fn document_message(document: &str, message: &str) -> String {
    format!("{document}: {message}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_document_message_prefixes_name() {
        assert_eq!(
            document_message("docs/README.md", "line 3: unterminated diagram region"),
            "docs/README.md: line 3: unterminated diagram region"
        );
        assert_eq!(document_message("<stdin>", "x"), "<stdin>: x");
    }
}
