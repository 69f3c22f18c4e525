//! Document-level processing of diagram regions.
//!
//! Walks a markdown document line by line, hands every region start marker to
//! [`RegionScanner`], and replaces each region that carries a diagram with the
//! snippet from [`render_region`]. Everything else is copied verbatim.

use crate::consts::DEFAULT_KROKI_URL;
use crate::fence::{FenceEvent, FenceTracker};
use crate::kroki::KrokiLink;
use crate::language::{MarkupLanguage, SUPPORTED_LANGUAGES};
use crate::scanner::{LineCursor, LineSource, RegionScanner};
use crate::template::render_region;

/// Settings for [`DiagramPreprocessor`].
#[derive(Debug, Clone)]
pub struct PreprocessorConfig {
    /// Kroki server URL used in generated links.
    pub kroki_url: String,
    /// Recognized languages, in first-match-wins order.
    pub languages: Vec<MarkupLanguage>,
    /// Wrap top-level diagram fences that are not yet inside a region.
    pub wrap_bare_fences: bool,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            kroki_url: DEFAULT_KROKI_URL.to_owned(),
            languages: SUPPORTED_LANGUAGES.to_vec(),
            wrap_bare_fences: false,
        }
    }
}

/// A region found while processing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    /// Zero-based index of the region within the document.
    pub index: usize,
    /// Line of the start marker or wrapped fence (1-indexed).
    pub line: usize,
    /// Detected diagram language, `None` if the region was copied through.
    pub language: Option<MarkupLanguage>,
    /// Generated image link.
    pub link: Option<String>,
    /// Whether the region had an end marker.
    pub terminated: bool,
}

/// Rewrites diagram regions in a markdown document.
///
/// # Example
///
/// ```
/// use gfmd_diagrams::DiagramPreprocessor;
///
/// let markdown = "# Title\n\n<!-- gfmd-start -->\n```mermaid\ngraph TD; A-->B;\n```\n<!-- gfmd-end -->\n";
///
/// let mut preprocessor = DiagramPreprocessor::default();
/// let output = preprocessor.process(markdown);
///
/// assert!(output.starts_with("# Title\n\n<!-- gfmd-start -->\n![mermaid diagram](https://kroki.io/mermaid/svg/"));
/// assert_eq!(preprocessor.regions().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DiagramPreprocessor {
    config: PreprocessorConfig,
    regions: Vec<RegionInfo>,
    warnings: Vec<String>,
}

impl DiagramPreprocessor {
    #[must_use]
    pub fn new(config: PreprocessorConfig) -> Self {
        Self {
            config,
            regions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Process a document and return the rewritten text.
    ///
    /// Regions and warnings accumulate across calls.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut cursor = LineCursor::new(input);
        let mut fence = FenceTracker::new();

        while let Some(line) = cursor.current() {
            if !fence.in_fence() {
                if self.process_region(&mut cursor, &mut output) {
                    continue;
                }
                if self.config.wrap_bare_fences && self.wrap_fence(&mut cursor, &mut output) {
                    continue;
                }
            }

            fence.update(line);
            output.push_str(line);
            cursor.consume();
        }

        if fence.in_fence() {
            tracing::debug!("Document ends inside a fenced code block");
        }

        output
    }

    /// Regions found so far.
    #[must_use]
    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }

    /// Warnings generated so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the preprocessor and return the collected regions.
    #[must_use]
    pub fn into_regions(self) -> Vec<RegionInfo> {
        self.regions
    }

    /// Scan a region at the cursor and emit its replacement.
    ///
    /// Returns `false` without consuming when the cursor is not at a start marker.
    fn process_region(&mut self, cursor: &mut LineCursor<'_>, output: &mut String) -> bool {
        let start = cursor.position();
        let line_num = cursor.line_number();

        let Some(region) = RegionScanner::new(&self.config.languages).scan(cursor) else {
            return false;
        };

        let index = self.regions.len();
        let link = match region.diagram() {
            // The scanner ran to the end of input, so everything after the
            // start marker was consumed and must be kept as written.
            _ if !region.terminated => {
                self.warnings.push(format!(
                    "line {line_num}: unterminated diagram region (missing end marker), left unchanged"
                ));
                output.push_str(cursor.consumed_since(start));
                None
            }
            Some((language, source)) => {
                let link = KrokiLink::new(&self.config.kroki_url, language, source).to_string();
                output.push_str(&render_region(language, source, &link));
                tracing::debug!(index, line = line_num, %language, "Rendered diagram region");
                Some(link)
            }
            None => {
                self.warnings.push(format!(
                    "line {line_num}: diagram region without a supported diagram, left unchanged"
                ));
                output.push_str(cursor.consumed_since(start));
                None
            }
        };

        self.regions.push(RegionInfo {
            index,
            line: line_num,
            language: region.language,
            link,
            terminated: region.terminated,
        });
        true
    }

    /// Wrap a bare diagram fence at the cursor into a new region.
    ///
    /// Returns `false` without consuming when the cursor is not at such a fence.
    fn wrap_fence(&mut self, cursor: &mut LineCursor<'_>, output: &mut String) -> bool {
        let Some(line) = cursor.current() else {
            return false;
        };

        let mut fence = FenceTracker::new();
        let Some(FenceEvent::Open { info }) = fence.update(line) else {
            return false;
        };
        let Some(language) = info
            .split_whitespace()
            .next()
            .and_then(MarkupLanguage::parse)
            .filter(|language| self.config.languages.contains(language))
        else {
            return false;
        };

        let start = cursor.position();
        let line_num = cursor.line_number();
        cursor.consume();

        let mut body = String::new();
        let mut closed = false;
        while let Some(line) = cursor.current() {
            cursor.consume();
            if fence.update(line) == Some(FenceEvent::Close) {
                closed = true;
                break;
            }
            body.push_str(line);
        }

        if !closed {
            self.warnings.push(format!(
                "line {line_num}: unclosed {language} fence, left unchanged"
            ));
            output.push_str(cursor.consumed_since(start));
            return true;
        }

        let source = body.trim();
        let link = KrokiLink::new(&self.config.kroki_url, language, source).to_string();
        output.push_str(&render_region(language, source, &link));
        tracing::debug!(line = line_num, %language, "Wrapped bare diagram fence");

        self.regions.push(RegionInfo {
            index: self.regions.len(),
            line: line_num,
            language: Some(language),
            link: Some(link),
            terminated: true,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::kroki::encode;

    const REGION: &str = "<!-- gfmd-start -->\n```mermaid\ngraph TD; A-->B;\n```\n<!-- gfmd-end -->\n";

    fn rendered(source: &str) -> String {
        render_region(
            MarkupLanguage::Mermaid,
            source,
            &encode(MarkupLanguage::Mermaid, source),
        )
    }

    #[test]
    fn test_replaces_region() {
        let mut pp = DiagramPreprocessor::default();
        let output = pp.process(&format!("Intro\n\n{REGION}\nOutro\n"));

        assert_eq!(
            output,
            format!("Intro\n\n{}\nOutro\n", rendered("graph TD; A-->B;"))
        );
        assert!(pp.warnings().is_empty());

        let regions = pp.into_regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].line, 3);
        assert_eq!(regions[0].language, Some(MarkupLanguage::Mermaid));
        assert_eq!(
            regions[0].link.as_deref(),
            Some(encode(MarkupLanguage::Mermaid, "graph TD; A-->B;").as_str())
        );
    }

    #[test]
    fn test_processing_is_idempotent() {
        let mut pp = DiagramPreprocessor::default();
        let once = pp.process(&format!("# Doc\n{REGION}text\n"));
        let twice = pp.process(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_document_without_regions_is_unchanged() {
        let mut pp = DiagramPreprocessor::default();
        let input = "# Title\n\n```mermaid\ngraph TD;\n```\n\nNo trailing newline";
        assert_eq!(pp.process(input), input);
        assert!(pp.regions().is_empty());
    }

    #[test]
    fn test_region_without_diagram_is_copied() {
        let mut pp = DiagramPreprocessor::default();
        let input = "<!-- gfmd-start -->\n```sequence\nA->B: hi\n```\n<!-- gfmd-end -->\nafter\n";

        assert_eq!(pp.process(input), input);
        assert_eq!(pp.regions()[0].language, None);
        assert_eq!(pp.regions()[0].link, None);
        assert!(pp.warnings()[0].contains("without a supported diagram"));
    }

    #[test]
    fn test_empty_region_is_copied() {
        let mut pp = DiagramPreprocessor::default();
        let input = "<!-- gfmd-start -->\n<!-- gfmd-end -->\n";
        assert_eq!(pp.process(input), input);
    }

    #[test]
    fn test_unterminated_region_warns() {
        let mut pp = DiagramPreprocessor::default();
        let input = "<!-- gfmd-start -->\n```mermaid\nA-->B\n```\n";

        assert_eq!(pp.process(input), input);
        assert!(!pp.regions()[0].terminated);
        assert_eq!(pp.regions()[0].language, Some(MarkupLanguage::Mermaid));
        assert_eq!(pp.regions()[0].link, None);
        assert!(pp.warnings()[0].contains("unterminated"));
    }

    #[test]
    fn test_unterminated_region_keeps_rest_of_document() {
        let mut pp = DiagramPreprocessor::default();
        let input = format!(
            "Intro\n{REGION}\n<!-- gfmd-start -->\n```mermaid\nA-->B\n```\n\n# Chapter 2\n\nImportant prose.\n"
        );
        let output = pp.process(&input);

        assert!(output.ends_with("```\n\n# Chapter 2\n\nImportant prose.\n"));
        assert_eq!(
            output,
            format!(
                "Intro\n{}\n<!-- gfmd-start -->\n```mermaid\nA-->B\n```\n\n# Chapter 2\n\nImportant prose.\n",
                rendered("graph TD; A-->B;")
            )
        );
        assert_eq!(pp.warnings().len(), 1);
    }

    #[test]
    fn test_marker_inside_code_fence_is_ignored() {
        let mut pp = DiagramPreprocessor::default();
        let input = format!("````markdown\n{REGION}````\n");

        assert_eq!(pp.process(&input), input);
        assert!(pp.regions().is_empty());
    }

    #[test]
    fn test_multiple_regions() {
        let mut pp = DiagramPreprocessor::default();
        let plantuml = "<!-- gfmd-start -->\n```plantuml\n@startuml\nA -> B\n@enduml\n```\n<!-- gfmd-end -->\n";
        let output = pp.process(&format!("{REGION}\n{plantuml}"));

        assert!(output.contains("![plantuml diagram](https://kroki.io/plantuml/svg/"));
        let regions = pp.regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].index, 0);
        assert_eq!(regions[1].index, 1);
        assert_eq!(regions[1].line, 7);
        assert_eq!(regions[1].language, Some(MarkupLanguage::PlantUml));
    }

    #[test]
    fn test_custom_kroki_url() {
        let mut pp = DiagramPreprocessor::new(PreprocessorConfig {
            kroki_url: "http://kroki.local:8000".to_owned(),
            ..PreprocessorConfig::default()
        });
        let output = pp.process(REGION);
        assert!(output.contains("](http://kroki.local:8000/mermaid/svg/"));
    }

    #[test]
    fn test_restricted_language_set() {
        let mut pp = DiagramPreprocessor::new(PreprocessorConfig {
            languages: vec![MarkupLanguage::PlantUml],
            ..PreprocessorConfig::default()
        });
        assert_eq!(pp.process(REGION), REGION);
        assert_eq!(pp.regions()[0].language, None);
    }

    #[test]
    fn test_wrap_bare_fences() {
        let mut pp = DiagramPreprocessor::new(PreprocessorConfig {
            wrap_bare_fences: true,
            ..PreprocessorConfig::default()
        });
        let output = pp.process("Before\n```mermaid\ngraph TD; A-->B;\n```\nAfter\n");

        assert_eq!(
            output,
            format!("Before\n{}After\n", rendered("graph TD; A-->B;"))
        );
        assert_eq!(pp.regions()[0].line, 2);

        // Wrapped output is stable on the next run
        assert_eq!(pp.process(&output), output);
    }

    #[test]
    fn test_wrap_skips_other_languages_and_nested_fences() {
        let mut pp = DiagramPreprocessor::new(PreprocessorConfig {
            wrap_bare_fences: true,
            ..PreprocessorConfig::default()
        });
        let input = "```rust\nfn main() {}\n```\n~~~markdown\n```mermaid\nA\n```\n~~~\n";

        assert_eq!(pp.process(input), input);
        assert!(pp.regions().is_empty());
    }

    #[test]
    fn test_wrap_leaves_unclosed_fence() {
        let mut pp = DiagramPreprocessor::new(PreprocessorConfig {
            wrap_bare_fences: true,
            ..PreprocessorConfig::default()
        });
        let input = "```plantuml\n@startuml\n";

        assert_eq!(pp.process(input), input);
        assert!(pp.warnings()[0].contains("unclosed plantuml fence"));
    }
}
