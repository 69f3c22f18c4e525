//! Diagram regions in markdown rendered as Kroki image links.
//!
//! A diagram region wraps a fenced diagram between two HTML comments:
//!
//! ````markdown
//! <!-- gfmd-start -->
//! ```mermaid
//! graph TD; A-->B;
//! ```
//! <!-- gfmd-end -->
//! ````
//!
//! Processing replaces the region with an image that points at Kroki plus a
//! collapsible copy of the source, keeping the markers so the document can be
//! processed again after the diagram changes.
//!
//! # Architecture
//!
//! - [`RegionScanner`]: line-oriented state machine over a [`LineSource`]
//! - [`KrokiLink`] / [`encode`]: deterministic zlib + URL-safe base64 links
//! - [`render_region`]: markdown snippet for a rendered region
//! - [`DiagramPreprocessor`]: applies the above to a whole document
//!
//! # Example
//!
//! ```
//! use gfmd_diagrams::{DiagramPreprocessor, PreprocessorConfig};
//!
//! let markdown = "<!-- gfmd-start -->\n```plantuml\nA -> B\n```\n<!-- gfmd-end -->\n";
//!
//! let mut preprocessor = DiagramPreprocessor::new(PreprocessorConfig::default());
//! let output = preprocessor.process(markdown);
//!
//! assert!(output.contains("![plantuml diagram](https://kroki.io/plantuml/svg/"));
//! assert!(output.contains("<details>"));
//! ```

mod consts;
mod fence;
mod kroki;
mod language;
mod preprocessor;
mod scanner;
mod template;

pub use consts::{DEFAULT_KROKI_URL, END_MARKER, FENCE_TOKEN, OUTPUT_FORMAT, START_MARKER};
pub use kroki::{DecodeError, KrokiLink, decode_payload, encode, encode_payload, encode_with_base};
pub use language::{MarkupLanguage, SUPPORTED_LANGUAGES, UnknownLanguage};
pub use preprocessor::{DiagramPreprocessor, PreprocessorConfig, RegionInfo};
pub use scanner::{LineCursor, LineSource, Region, RegionScanner};
pub use template::render_region;
