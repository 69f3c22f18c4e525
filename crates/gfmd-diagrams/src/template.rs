//! Markdown snippet that replaces a diagram region.
//!
//! The snippet keeps the region markers so the document can be processed again:
//!
//! ````markdown
//! <!-- gfmd-start -->
//! ![mermaid diagram](https://kroki.io/mermaid/svg/...)
//!
//! <details>
//! <summary><sup><sub>Diagram source code</sub></sup></summary>
//!
//! ```mermaid
//! graph TD; A-->B;
//! ```
//! </details>
//! <!-- gfmd-end -->
//! ````

use std::fmt::Write;

use crate::consts::{END_MARKER, FENCE_TOKEN, START_MARKER};
use crate::language::MarkupLanguage;

/// Summary line of the collapsible source section.
const SOURCE_SUMMARY: &str = "<summary><sup><sub>Diagram source code</sub></sup></summary>";

/// Render a region with an image link and its collapsible source.
#[must_use]
pub fn render_region(language: MarkupLanguage, source: &str, link: &str) -> String {
    let mut out = String::with_capacity(source.len() + link.len() + 192);

    out.push_str(START_MARKER);
    out.push('\n');
    let _ = writeln!(out, "![{language} diagram]({link})");
    out.push('\n');
    out.push_str("<details>\n");
    out.push_str(SOURCE_SUMMARY);
    out.push_str("\n\n");
    let _ = writeln!(out, "{FENCE_TOKEN}{language}");
    out.push_str(source);
    out.push('\n');
    out.push_str(FENCE_TOKEN);
    out.push('\n');
    out.push_str("</details>\n");
    out.push_str(END_MARKER);
    out.push('\n');

    out
}
