//! Downloadable artifacts: the JSON passthrough and the standalone HTML report

use crate::document::Document;
use crate::error::{Error, Result};
use crate::report;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Export format offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Html => "text/html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Download name: spaces in the company name become underscores.
pub fn artifact_file_name(company: &str, format: ExportFormat) -> String {
    format!("{}_analysis.{}", company.replace(' ', "_"), format.extension())
}

/// Make a download name safe to create on disk: path separators and NUL
/// become `_`.
pub fn disk_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

/// Pretty-print the report with 2-space indentation, keys in original order.
pub fn json_artifact(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc.root())?)
}

/// Build the artifact for `format`.
///
/// `company` names the file; `html_company` is the fallback name used
/// inside the HTML report when the document has none.
pub fn build_artifact(
    doc: &Document,
    format: ExportFormat,
    company: &str,
    html_company: &str,
) -> Result<Artifact> {
    let body = match format {
        ExportFormat::Json => json_artifact(doc)?,
        ExportFormat::Html => report::generate(doc, html_company),
    };

    Ok(Artifact {
        file_name: artifact_file_name(company, format),
        content_type: format.content_type(),
        body,
    })
}
