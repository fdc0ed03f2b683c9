//! ledgerlens - Viewer for bank-statement analysis reports
//!
//! Loads the JSON produced by the statement analysis pipeline, works out
//! which schema generation wrote it, and presents the headline numbers.
//!
//! # Overview
//!
//! Nothing here computes a metric. Scores, ratings and observations are
//! already in the report; ledgerlens only reads them (with a default for
//! every field) and re-exports the report in two forms:
//!
//! | Artifact | Contents |
//! |----------|----------|
//! | `<company>_analysis.json` | the report, pretty-printed, keys in original order |
//! | `<company>_analysis.html` | a standalone page with the score panels and observations |
//!
//! # Quick Start
//!
//! ```no_run
//! use ledgerlens::{Document, ReportSummary};
//!
//! let doc = Document::from_slice(br#"{"report_info": {"company_name": "Acme"}}"#).unwrap();
//! let summary = ReportSummary::from_document(&doc, "Unknown");
//! println!("{}", summary.banner());
//!
//! let html = ledgerlens::report::generate(&doc, "Company");
//! assert!(html.contains("<h1>Acme</h1>"));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod render;
pub mod report;
pub mod resolve;
pub mod serve;

pub use config::Config;
pub use document::Document;
pub use error::{Error, Result};
pub use export::{artifact_file_name, build_artifact, json_artifact, Artifact, ExportFormat};
pub use render::{Metric, ReportSummary};
pub use resolve::{detect_schema_version, resolve_company_name, SchemaVersion};
