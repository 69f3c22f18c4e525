//! `gfmd link` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use gfmd_config::{CliSettings, Config};
use gfmd_diagrams::{KrokiLink, MarkupLanguage};

use super::read_input;
use crate::error::CliError;

/// Arguments for the link command.
#[derive(Args)]
pub(crate) struct LinkArgs {
    /// Diagram language (mermaid, plantuml).
    #[arg(short, long)]
    language: MarkupLanguage,

    /// File with the diagram source (reads stdin when omitted or `-`).
    file: Option<PathBuf>,

    /// Kroki server URL (overrides config).
    #[arg(long, env = "GFMD_KROKI_URL")]
    kroki_url: Option<String>,

    /// Path to configuration file (default: auto-discover gfmd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LinkArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            kroki_url: self.kroki_url.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = read_input(self.file.as_deref())?;
        let link = build_link(&config.kroki.url, self.language, &source);

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{link}")?;
        Ok(())
    }
}

/// Link for a diagram file, trimmed the same way region sources are.
fn build_link(kroki_url: &str, language: MarkupLanguage, source: &str) -> KrokiLink {
    KrokiLink::new(kroki_url, language, source.trim())
}
