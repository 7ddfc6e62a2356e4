//! Serve command - HTTP upload endpoint for statement PDFs.

use std::io::Read;
use std::sync::Arc;

use clap::Args;
use console::style;
use serde_json::{json, Value};
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, error, info, warn};

use pgdas_core::pdf::{extract_document_text, is_pdf};
use pgdas_core::{PdfError, PgdasConfig, SimplesParser, StatementParser};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn run(args: ServeArgs, mut config: PgdasConfig) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let address = config.server.address();
    let server = Server::http(&address)
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", address, e))?;
    let server = Arc::new(server);
    let config = Arc::new(config);

    println!(
        "{} Listening on http://{}{}",
        style("✓").green(),
        address,
        config.server.upload_path
    );

    loop {
        let listener = Arc::clone(&server);
        let next = tokio::task::spawn_blocking(move || listener.recv());

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                server.unblock();
                break;
            }
            received = next => {
                let Some(request) = accepted(received?) else {
                    continue;
                };
                let config = Arc::clone(&config);
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = serve_request(request, &config) {
                        warn!("Failed to send response: {}", e);
                    }
                });
            }
        }
    }

    Ok(())
}

/// A failed `recv` drops that one connection; the server keeps listening.
fn accepted<T>(received: std::io::Result<T>) -> Option<T> {
    match received {
        Ok(request) => Some(request),
        Err(e) => {
            warn!("Failed to receive request: {}", e);
            None
        }
    }
}

fn serve_request(mut request: Request, config: &PgdasConfig) -> anyhow::Result<()> {
    let method = request.method().to_string();
    let path = request.url().to_string();
    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_string());

    // One byte past the limit is enough to tell an oversized upload apart
    let limit = config.server.max_upload_bytes as u64 + 1;
    let mut body = Vec::new();
    request.as_reader().take(limit).read_to_end(&mut body)?;

    let (status, payload) =
        handle_upload(&method, &path, content_type.as_deref(), &body, config);
    info!("{} {} -> {}", method, path, status);

    let data = if payload.is_null() {
        Vec::new()
    } else {
        serde_json::to_vec(&payload)?
    };

    let mut response = Response::from_data(data).with_status_code(status);
    for (name, value) in response_headers(config) {
        response = response.with_header(header(name, &value)?);
    }

    request.respond(response)?;
    Ok(())
}

fn header(name: &str, value: &str) -> anyhow::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| anyhow::anyhow!("Invalid header {}: {}", name, value))
}

/// Headers sent with every response.
fn response_headers(config: &PgdasConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Content-Type", "application/json".to_string()),
        (
            "Access-Control-Allow-Origin",
            config.server.cors_allow_origin.clone(),
        ),
        ("Access-Control-Allow-Methods", "POST, OPTIONS".to_string()),
        ("Access-Control-Allow-Headers", "Content-Type".to_string()),
    ]
}

fn error_body(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

/// Map one upload request to a status code and JSON body.
///
/// A `Null` body means the response carries no content.
pub fn handle_upload(
    method: &str,
    path: &str,
    content_type: Option<&str>,
    body: &[u8],
    config: &PgdasConfig,
) -> (u16, Value) {
    let server = &config.server;
    let path = path.split('?').next().unwrap_or(path);

    if method.eq_ignore_ascii_case("OPTIONS") {
        return (204, Value::Null);
    }
    if path != server.upload_path {
        return (404, error_body("not found"));
    }
    if !method.eq_ignore_ascii_case("POST") {
        return (405, error_body(format!("method {} not allowed", method)));
    }
    if body.is_empty() {
        return (400, error_body("no file uploaded"));
    }
    if body.len() > server.max_upload_bytes {
        return (
            413,
            error_body(format!(
                "file exceeds the {} byte upload limit",
                server.max_upload_bytes
            )),
        );
    }
    if !content_type.is_some_and(|ct| server.accepts_content_type(ct)) {
        return (415, error_body("only PDF uploads are accepted"));
    }
    if !is_pdf(body) {
        return (415, error_body("uploaded file is not a PDF"));
    }

    let text = match extract_document_text(body, &config.pdf) {
        Ok(text) => text,
        Err(e) => return pdf_failure(e),
    };

    let preview: String = text
        .as_str()
        .chars()
        .take(server.log_text_preview_chars)
        .collect();
    debug!("Extracted text preview:\n{}", preview);

    let outcome = SimplesParser::from_config(&config.extraction).parse(text.as_str());
    debug!(tributos = ?outcome.result.tributos, "Captured tributos block");
    if !outcome.missing_fields.is_empty() {
        debug!("Fields not found: {:?}", outcome.missing_fields);
    }

    match serde_json::to_value(&outcome.result) {
        Ok(value) => (200, value),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            (500, error_body("internal error"))
        }
    }
}

fn pdf_failure(e: PdfError) -> (u16, Value) {
    if e.is_client_error() {
        warn!("Rejected upload: {}", e);
        (422, error_body(e.to_string()))
    } else {
        error!("PDF processing failed: {}", e);
        (500, error_body("failed to process PDF"))
    }
}
