use anyhow::{bail, Context, Result};
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;

/// Encodings tried in order when the config does not name any.
///
/// The single-byte fallbacks map every byte value, so this default chain
/// always decodes *something* — arbitrary binary comes back as mojibake
/// rather than an error. The "could not decode" failure is only reachable
/// with a custom `encodings` list (e.g. utf-8 alone).
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "windows-1251", "windows-1252"];

/// Read a text file, trying each encoding in order until one decodes the
/// bytes without errors.
pub fn read_text_file(path: &Path, encodings: &[String]) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    for label in encodings {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            eprintln!("Warning: unknown encoding label '{}'", label);
            continue;
        };
        let (decoded, _, had_errors) = encoding.decode(&bytes);
        if !had_errors {
            return Ok(decoded.into_owned());
        }
    }

    bail!(
        "Could not decode {} with any configured encoding ({})",
        path.display(),
        encodings.join(", ")
    )
}
