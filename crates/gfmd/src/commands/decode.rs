//! `gfmd decode` command implementation.

use std::io::Write;

use clap::Args;
use gfmd_diagrams::{KrokiLink, decode_payload};

use crate::error::CliError;

/// Arguments for the decode command.
#[derive(Args)]
pub(crate) struct DecodeArgs {
    /// Kroki image URL or bare encoded payload.
    input: String,
}

impl DecodeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let source = decode_input(&self.input)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{source}")?;
        Ok(())
    }
}

fn decode_input(input: &str) -> Result<String, CliError> {
    let input = input.trim();
    let source = if input.contains("://") {
        KrokiLink::parse(input)?.decode_source()?
    } else {
        decode_payload(input)?
    };
    Ok(source)
}
