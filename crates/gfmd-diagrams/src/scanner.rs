//! Line-oriented scanner for diagram regions.
//!
//! A region looks like this:
//!
//! ````markdown
//! <!-- gfmd-start -->
//! ```mermaid
//! graph TD; A-->B;
//! ```
//! <!-- gfmd-end -->
//! ````
//!
//! The scanner never fails. Unsupported fences are passed over, and a missing
//! end marker simply ends the region at the end of input.

use std::sync::LazyLock;

use regex::Regex;

use crate::consts::{END_MARKER, FENCE_TOKEN};
use crate::language::{MarkupLanguage, SUPPORTED_LANGUAGES};

static START_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!-- gfmd-start -->").unwrap());

/// Input stream consumed by [`RegionScanner`].
///
/// Lines are yielded with their line terminator (if any).
pub trait LineSource {
    /// Current line, without advancing.
    fn peek_line(&self) -> Option<&str>;

    /// Advance past the current line.
    fn consume(&mut self);

    /// Whether all lines have been consumed.
    fn is_exhausted(&self) -> bool {
        self.peek_line().is_none()
    }
}

/// [`LineSource`] over an in-memory string.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor positioned at the first line of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
        }
    }

    /// Current line, borrowed from the underlying text rather than the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&'a str> {
        self.text[self.pos..].split_inclusive('\n').next()
    }

    /// Byte offset of the current line.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Line number of the current line (1-indexed).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Text between `start` and the current position.
    #[must_use]
    pub fn consumed_since(&self, start: usize) -> &'a str {
        &self.text[start..self.pos]
    }
}

impl LineSource for LineCursor<'_> {
    fn peek_line(&self) -> Option<&str> {
        self.current()
    }

    fn consume(&mut self) {
        if let Some(line) = self.current() {
            self.pos += line.len();
            self.line += 1;
        }
    }
}

/// A scanned diagram region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    /// Language of the first supported fenced block, if any.
    pub language: Option<MarkupLanguage>,
    /// Diagram source with surrounding whitespace trimmed.
    pub source: String,
    /// Whether the end marker was found before the input ran out.
    pub terminated: bool,
}

impl Region {
    /// Language and source, when the region carries a renderable diagram.
    #[must_use]
    pub fn diagram(&self) -> Option<(MarkupLanguage, &str)> {
        self.language.map(|language| (language, self.source.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for a fence opening or the end marker.
    SeekingFenceOrEnd,
    /// Inside a supported fence, collecting diagram lines.
    CollectingFenceBody,
}

/// Scans one diagram region from a [`LineSource`].
///
/// # Example
///
/// ```
/// use gfmd_diagrams::{LineCursor, MarkupLanguage, RegionScanner};
///
/// let text = "<!-- gfmd-start -->\n```mermaid\ngraph TD; A-->B;\n```\n<!-- gfmd-end -->\n";
/// let mut cursor = LineCursor::new(text);
/// let region = RegionScanner::default().scan(&mut cursor).unwrap();
///
/// assert_eq!(region.language, Some(MarkupLanguage::Mermaid));
/// assert_eq!(region.source, "graph TD; A-->B;");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RegionScanner<'a> {
    languages: &'a [MarkupLanguage],
}

impl Default for RegionScanner<'static> {
    fn default() -> Self {
        Self::new(SUPPORTED_LANGUAGES)
    }
}

impl<'a> RegionScanner<'a> {
    /// Create a scanner recognizing `languages`, in first-match-wins order.
    #[must_use]
    pub fn new(languages: &'a [MarkupLanguage]) -> Self {
        Self { languages }
    }

    /// Whether `line` opens a region.
    #[must_use]
    pub fn is_start(line: &str) -> bool {
        START_MARKER_RE.is_match(line)
    }

    /// Scan a region starting at the current line of `source`.
    ///
    /// Returns `None` without consuming anything when the current line is not a
    /// start marker. Otherwise consumes through the end marker line (or to the
    /// end of input) and returns the region.
    pub fn scan<S: LineSource + ?Sized>(&self, source: &mut S) -> Option<Region> {
        if !Self::is_start(source.peek_line()?) {
            return None;
        }
        source.consume();

        let mut state = State::SeekingFenceOrEnd;
        let mut language = None;
        let mut body = String::new();
        let mut terminated = false;

        while let Some(line) = source.peek_line() {
            let is_fence = line.contains(FENCE_TOKEN);
            let is_end = line.contains(END_MARKER);

            match state {
                State::SeekingFenceOrEnd if is_fence => {
                    // Only the first supported block of a region is collected.
                    if language.is_none() {
                        match MarkupLanguage::detect(line, self.languages) {
                            Some(detected) => {
                                language = Some(detected);
                                state = State::CollectingFenceBody;
                            }
                            None => {
                                tracing::debug!(
                                    fence = line.trim_end(),
                                    "Skipping unsupported fence"
                                );
                            }
                        }
                    }
                    source.consume();
                }
                State::SeekingFenceOrEnd => {
                    source.consume();
                    if is_end {
                        terminated = true;
                        break;
                    }
                }
                State::CollectingFenceBody if is_fence => {
                    state = State::SeekingFenceOrEnd;
                    source.consume();
                    if is_end {
                        terminated = true;
                        break;
                    }
                }
                State::CollectingFenceBody => {
                    body.push_str(line);
                    source.consume();
                }
            }
        }

        Some(Region {
            language,
            source: body.trim().to_owned(),
            terminated,
        })
    }
}
