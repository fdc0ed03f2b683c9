//! HTTP server for the report viewer
//!
//! `ledgerlens serve` → starts server, shows the upload page
//!
//! Every request carries the whole report in its body and is answered
//! from that alone; the server keeps nothing between requests.

use crate::config::Config;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::export::{build_artifact, Artifact, ExportFormat};
use crate::render::ReportSummary;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Everything the viewer page needs after an upload.
#[derive(Serialize)]
struct ReportPayload {
    summary: ReportSummary,
    json_export: Artifact,
    html_export: Artifact,
}

#[derive(Deserialize)]
struct ExportQuery {
    format: String,
}

// Upload page with the banner, header block, metric tiles and download buttons
const VIEWER_HTML: &str = include_str!("viewer.html");

/// A response decided by [`route`], before it is written to the socket.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Download name; sent as `Content-Disposition: attachment`.
    pub attachment: Option<String>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: String) -> Self {
        Self {
            status,
            content_type,
            body,
            attachment: None,
        }
    }

    fn json<T: Serialize>(status: u16, payload: &ApiResponse<T>) -> Self {
        let body = serde_json::to_string(payload).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"data":null,"error":"{}"}}"#, e)
        });
        Self::new(status, "application/json", body)
    }

    fn error(status: u16, message: String) -> Self {
        Self::json(status, &ApiResponse::failure(message))
    }

    fn too_large(limit: u64) -> Self {
        Self::error(413, format!("Upload exceeds {} bytes", limit))
    }
}

/// Start the report viewer server
pub fn start_viewer_server(config: &Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let server = Server::http(&addr).map_err(|e| Error::Server(e.to_string()))?;

    let url = format!("http://{}", addr);

    eprintln!("\n{}", "🏦 ledgerlens".green().bold());
    eprintln!("   Report viewer: {}", url);
    eprintln!("   Press Ctrl+C to stop\n");
    tracing::info!(%addr, "viewer listening");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            tracing::error!(error = %e, "failed to answer request");
        }
    }

    Ok(())
}

fn handle_request(mut request: Request, config: &Config) -> std::io::Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();
    let limit = config.server.max_upload_bytes;

    let reply = if method == Method::Post {
        let declared_too_large = request
            .body_length()
            .map(|len| len as u64 > limit)
            .unwrap_or(false);
        if declared_too_large {
            Reply::too_large(limit)
        } else {
            match read_body(request.as_reader(), limit)? {
                Some(body) => route(&method, &url, &body, config),
                None => Reply::too_large(limit),
            }
        }
    } else {
        route(&method, &url, &[], config)
    };

    tracing::debug!(%method, %url, status = reply.status, "handled request");
    respond(request, reply)
}

/// Read at most `limit` bytes; `None` when the body is longer than that.
pub fn read_body<R: Read>(reader: R, limit: u64) -> std::io::Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut body)?;
    if body.len() as u64 > limit {
        Ok(None)
    } else {
        Ok(Some(body))
    }
}

/// Decide the response for one request.
pub fn route(method: &Method, url: &str, body: &[u8], config: &Config) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Reply::new(200, "text/html; charset=utf-8", VIEWER_HTML.to_string())
        }

        // API: summary plus both artifacts for an uploaded report
        (&Method::Post, "/api/report") => handle_report(body, config),

        // API: one artifact as a download (POST /api/export?format=json|html)
        (&Method::Post, "/api/export") => handle_export(query, body, config),

        _ => Reply::new(404, "text/plain; charset=utf-8", "Not found".to_string()),
    }
}

fn handle_report(body: &[u8], config: &Config) -> Reply {
    let doc = match Document::from_slice(body) {
        Ok(doc) => doc,
        Err(e) => return Reply::error(400, e.to_string()),
    };

    match report_payload(&doc, config) {
        Ok(payload) => Reply::json(200, &ApiResponse::success(payload)),
        Err(e) => Reply::error(500, e.to_string()),
    }
}

fn report_payload(doc: &Document, config: &Config) -> Result<ReportPayload> {
    let summary = ReportSummary::from_document(doc, &config.report.default_company);
    tracing::info!(company = %summary.company, schema = %summary.schema_version, "report loaded");

    let html_company = &config.report.html_company;
    let json_export = build_artifact(doc, ExportFormat::Json, &summary.company, html_company)?;
    let html_export = build_artifact(doc, ExportFormat::Html, &summary.company, html_company)?;

    Ok(ReportPayload {
        summary,
        json_export,
        html_export,
    })
}

fn handle_export(query: &str, body: &[u8], config: &Config) -> Reply {
    let format = match serde_urlencoded::from_str::<ExportQuery>(query) {
        Ok(q) => match q.format.parse::<ExportFormat>() {
            Ok(f) => f,
            Err(e) => return Reply::error(400, e.to_string()),
        },
        Err(e) => return Reply::error(400, format!("Invalid query: {}", e)),
    };

    let doc = match Document::from_slice(body) {
        Ok(doc) => doc,
        Err(e) => return Reply::error(400, e.to_string()),
    };

    let company = crate::resolve::resolve_company_name(doc.root(), &config.report.default_company);
    match build_artifact(&doc, format, &company, &config.report.html_company) {
        Ok(artifact) => Reply {
            status: 200,
            content_type: artifact.content_type,
            body: artifact.body,
            attachment: Some(artifact.file_name),
        },
        Err(e) => Reply::error(500, e.to_string()),
    }
}

fn respond(request: Request, reply: Reply) -> std::io::Result<()> {
    let mut response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(header("Content-Type", reply.content_type)?);

    if let Some(name) = reply.attachment {
        let disposition = format!("attachment; filename=\"{}\"", header_safe_file_name(&name));
        response = response.with_header(header("Content-Disposition", &disposition)?);
    }

    request.respond(response)
}

fn header(name: &str, value: &str) -> std::io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid header {}: {}", name, value),
        )
    })
}

/// Header values must be printable ASCII without quotes; anything else
/// becomes `_`. The JSON API still reports the exact name.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn post(url: &str, body: &str) -> Reply {
        route(&Method::Post, url, body.as_bytes(), &Config::default())
    }

    fn body_json(reply: &Reply) -> Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    // === ApiResponse Tests ===

    #[test]
    fn test_api_response_serializes_to_json() {
        let response: ApiResponse<String> = ApiResponse::success("test".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"ok\":true"));
        assert!(json.contains("\"data\":\"test\""));
        assert!(json.contains("\"error\":null"));
    }

    #[test]
    fn test_api_response_failure() {
        let json = serde_json::to_string(&ApiResponse::failure("boom".to_string())).unwrap();
        assert_eq!(json, r#"{"ok":false,"data":null,"error":"boom"}"#);
    }

    // === Routing Tests ===

    #[test]
    fn test_index_serves_viewer() {
        let reply = route(&Method::Get, "/", &[], &Config::default());
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains("Bank Statement Analysis v5.0"));
    }

    #[test]
    fn test_unknown_path_is_404() {
        let reply = route(&Method::Get, "/nope", &[], &Config::default());
        assert_eq!(reply.status, 404);
        let reply = route(&Method::Get, "/api/report", &[], &Config::default());
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn test_report_success() {
        let reply = post(
            "/api/report",
            r#"{"report_info": {"company_name": "Acme Pty Ltd", "schema_version": "5.0"},
                "accounts": [{}], "integrity_score": {"score": 90}}"#,
        );
        assert_eq!(reply.status, 200);

        let json = body_json(&reply);
        assert_eq!(json["ok"], true);
        let data = &json["data"];
        assert_eq!(data["summary"]["company"], "Acme Pty Ltd");
        assert_eq!(data["summary"]["schema_version"], "5.0");
        assert_eq!(data["summary"]["metrics"][0]["value"], "90%");
        assert_eq!(data["json_export"]["file_name"], "Acme_Pty_Ltd_analysis.json");
        assert_eq!(data["html_export"]["file_name"], "Acme_Pty_Ltd_analysis.html");
        assert!(data["html_export"]["body"]
            .as_str()
            .unwrap()
            .contains("<h1>Acme Pty Ltd</h1>"));
    }

    #[test]
    fn test_report_invalid_json_is_400() {
        let reply = post("/api/report", "{not json");
        assert_eq!(reply.status, 400);

        let json = body_json(&reply);
        assert_eq!(json["ok"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON:"));
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_report_unnamed_company_uses_configured_default() {
        let mut config = Config::default();
        config.report.default_company = "Mystery Client".to_string();
        let reply = route(&Method::Post, "/api/report", b"{}", &config);

        let json = body_json(&reply);
        assert_eq!(json["data"]["summary"]["company"], "Mystery Client");
        assert_eq!(json["data"]["json_export"]["file_name"], "Mystery_Client_analysis.json");
    }

    #[test]
    fn test_export_html_attachment() {
        let reply = post("/api/export?format=html", r#"{"company": "Acme Co"}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "text/html");
        assert_eq!(reply.attachment.as_deref(), Some("Acme_Co_analysis.html"));
        assert!(reply.body.contains("<h1>Acme Co</h1>"));
    }

    #[test]
    fn test_export_json_attachment() {
        let reply = post("/api/export?format=json", r#"{"b":1,"a":2}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.attachment.as_deref(), Some("Unknown_analysis.json"));
        assert_eq!(reply.body, "{\n  \"b\": 1,\n  \"a\": 2\n}");
    }

    #[test]
    fn test_export_bad_format_and_missing_query() {
        assert_eq!(post("/api/export?format=pdf", "{}").status, 400);
        assert_eq!(post("/api/export", "{}").status, 400);
    }

    // === Body Limit Tests ===

    #[test]
    fn test_read_body_within_limit() {
        let body = read_body(&b"12345"[..], 5).unwrap();
        assert_eq!(body.as_deref(), Some(&b"12345"[..]));
    }

    #[test]
    fn test_read_body_over_limit() {
        assert_eq!(read_body(&b"123456"[..], 5).unwrap(), None);
    }

    #[test]
    fn test_header_safe_file_name() {
        assert_eq!(header_safe_file_name("Acme_analysis.json"), "Acme_analysis.json");
        assert_eq!(header_safe_file_name("Ä\"b\\c_analysis.html"), "__b_c_analysis.html");
    }

    // === Viewer HTML Tests ===

    #[test]
    fn test_viewer_html_is_valid() {
        assert!(VIEWER_HTML.contains("<!DOCTYPE html>"));
        assert!(VIEWER_HTML.contains("</html>"));
        assert!(VIEWER_HTML.contains("accept=\".json\""));
        assert!(VIEWER_HTML.contains("/api/report"));
    }
}
