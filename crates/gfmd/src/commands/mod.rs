//! CLI command implementations.

pub(crate) mod decode;
pub(crate) mod link;
pub(crate) mod render;

pub(crate) use decode::DecodeArgs;
pub(crate) use link::LinkArgs;
pub(crate) use render::RenderArgs;

use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when `path` is `None` or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
