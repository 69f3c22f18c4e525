//! `gfmd render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use gfmd_config::{CliSettings, Config};
use gfmd_diagrams::{DiagramPreprocessor, PreprocessorConfig, RegionInfo};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to process (reads stdin when omitted).
    files: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout.
    #[arg(short, long)]
    in_place: bool,

    /// Only report files that would change; exit non-zero if any would.
    #[arg(long, conflicts_with = "in_place")]
    check: bool,

    /// Fail on diagram regions without an end marker.
    #[arg(long)]
    strict: bool,

    /// Kroki server URL for generated links (overrides config).
    #[arg(long, env = "GFMD_KROKI_URL")]
    kroki_url: Option<String>,

    /// Wrap bare mermaid/plantuml fences into new diagram regions.
    #[arg(long)]
    wrap: bool,

    /// Path to configuration file (default: auto-discover gfmd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Result of processing one document.
struct RenderedDocument {
    text: String,
    regions: Vec<RegionInfo>,
    warnings: Vec<String>,
}

impl RenderedDocument {
    fn unterminated(&self) -> usize {
        self.regions.iter().filter(|r| !r.terminated).count()
    }
}

fn render_document(config: &PreprocessorConfig, input: &str) -> RenderedDocument {
    let mut preprocessor = DiagramPreprocessor::new(config.clone());
    let text = preprocessor.process(input);
    let warnings = preprocessor.warnings().to_vec();
    RenderedDocument {
        text,
        regions: preprocessor.into_regions(),
        warnings,
    }
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.in_place && self.files.is_empty() {
            return Err(CliError::Validation(
                "--in-place requires at least one file".to_owned(),
            ));
        }

        let cli_settings = CliSettings {
            kroki_url: self.kroki_url.clone(),
            wrap_bare_fences: self.wrap.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        let pp_config = config.preprocessor_config();

        let inputs: Vec<Option<&Path>> = if self.files.is_empty() {
            vec![None]
        } else {
            self.files.iter().map(|p| Some(p.as_path())).collect()
        };

        // No file is written until every input has rendered cleanly.
        let mut rendered = Vec::with_capacity(inputs.len());
        for path in inputs {
            let name = path.map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string());
            let input = read_input(path)?;
            let doc = render_document(&pp_config, &input);

            for warning in &doc.warnings {
                output.document_warning(&name, warning);
            }
            tracing::info!(file = %name, regions = doc.regions.len(), "Processed document");

            if self.strict && doc.unterminated() > 0 {
                return Err(CliError::Validation(format!(
                    "{name}: {} diagram region(s) without end marker",
                    doc.unterminated()
                )));
            }

            let is_changed = doc.text != input;
            rendered.push((path, name, doc, is_changed));
        }

        let mut changed = Vec::new();
        let mut stdout = std::io::stdout().lock();

        for (path, name, doc, is_changed) in rendered {
            if is_changed {
                changed.push(name);
            }

            if self.check {
                continue;
            }

            match path {
                Some(path) if self.in_place => {
                    if is_changed {
                        std::fs::write(path, &doc.text)?;
                    }
                }
                _ => stdout.write_all(doc.text.as_bytes())?,
            }
        }
        stdout.flush()?;

        if self.check {
            if !changed.is_empty() {
                for name in &changed {
                    output.info(&format!("would update {name}"));
                }
                return Err(CliError::Validation(format!(
                    "{} file(s) would be updated",
                    changed.len()
                )));
            }
            output.success("All diagram regions are up to date");
        } else if self.in_place {
            output.success(&format!("Updated {} file(s)", changed.len()));
        }

        Ok(())
    }
}
