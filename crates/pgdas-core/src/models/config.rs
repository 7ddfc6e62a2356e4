//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};

use crate::error::PgdasError;

/// Main configuration for the pgdas pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PgdasConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// HTTP upload server configuration.
    pub server: ServerConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum number of characters of extracted text; shorter output is
    /// treated as a document with no extractable text.
    pub min_text_length: usize,

    /// Maximum pages accepted (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 1,
            max_pages: 0,
        }
    }
}

/// How the debit-per-tax block is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TributosStrategy {
    /// Scan the window after the "Valor do Débito por Tributo" marker and
    /// drop a leading duplicate of the informed revenue.
    #[default]
    AnchorWindow,
    /// Read the numbers following the `IRPJ CSLL ... Total` header row.
    HeaderRow,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Strategy for the tributos block.
    pub tributos_strategy: TributosStrategy,
}

/// HTTP upload server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: String,

    /// Port to listen on.
    pub port: u16,

    /// Path accepting statement uploads.
    pub upload_path: String,

    /// Largest accepted upload body, in bytes.
    pub max_upload_bytes: usize,

    /// Accepted request content types.
    pub allowed_content_types: Vec<String>,

    /// Value of the `Access-Control-Allow-Origin` header.
    pub cors_allow_origin: String,

    /// Number of characters of extracted text to log at debug level.
    pub log_text_preview_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            upload_path: "/upload".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_content_types: vec!["application/pdf".to_string()],
            cors_allow_origin: "*".to_string(),
            log_text_preview_chars: 5000,
        }
    }
}

impl ServerConfig {
    /// `bind:port` socket address string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Whether a request content type (parameters ignored) is accepted.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    }
}

impl PgdasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, PgdasError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PgdasError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), PgdasError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PgdasError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PgdasConfig =
            serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.upload_path, "/upload");
        assert_eq!(config.extraction.tributos_strategy, TributosStrategy::AnchorWindow);
        assert_eq!(config.pdf.max_pages, 0);
    }

    #[test]
    fn test_strategy_snake_case() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"tributos_strategy": "header_row"}"#).unwrap();
        assert_eq!(config.tributos_strategy, TributosStrategy::HeaderRow);
    }

    #[test]
    fn test_accepts_content_type_ignores_parameters() {
        let server = ServerConfig::default();
        assert!(server.accepts_content_type("application/pdf"));
        assert!(server.accepts_content_type("Application/PDF; charset=binary"));
        assert!(!server.accepts_content_type("text/plain"));
        assert_eq!(server.address(), "0.0.0.0:3000");
    }
}
