//! Marker literals and rendering defaults.

/// Literal that opens a diagram region.
pub const START_MARKER: &str = "<!-- gfmd-start -->";

/// Literal that closes a diagram region (matched as a substring).
pub const END_MARKER: &str = "<!-- gfmd-end -->";

/// Token that opens and closes a fenced code block (matched as a substring).
pub const FENCE_TOKEN: &str = "```";

/// Public Kroki instance used when no server is configured.
pub const DEFAULT_KROKI_URL: &str = "https://kroki.io";

/// Image format requested from Kroki.
pub const OUTPUT_FORMAT: &str = "svg";
