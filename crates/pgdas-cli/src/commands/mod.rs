//! Subcommands and the input handling they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod serve;

use std::fs;
use std::path::Path;

use tracing::debug;

use pgdas_core::models::config::PdfConfig;
use pgdas_core::pdf::extract_document_text;
use pgdas_core::{DocumentText, PgdasConfig};

/// Input file extensions accepted by `process` and `batch`.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// Load the config file given with `--config`, else the default location,
/// else built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PgdasConfig> {
    if let Some(path) = path {
        return Ok(PgdasConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(PgdasConfig::from_file(&default_path)?)
    } else {
        Ok(PgdasConfig::default())
    }
}

/// Lowercased extension of `path`.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Read a statement as document text: PDFs go through text extraction,
/// `.txt` files are taken as already-extracted text.
pub fn read_statement(path: &Path, config: &PdfConfig) -> anyhow::Result<DocumentText> {
    let extension = extension_of(path);
    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            Ok(extract_document_text(&data, config)?)
        }
        "txt" => {
            let data = fs::read(path)?;
            let text = std::str::from_utf8(&data)
                .map_err(pgdas_core::ExtractionError::from)?;
            Ok(DocumentText::new(text))
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
