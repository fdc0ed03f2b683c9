//! Summary view: the banner, header block and four metric tiles
//!
//! The same [`ReportSummary`] feeds the terminal output of
//! `ledgerlens summary` and the JSON the browser viewer renders.

use crate::document::{array_at, number_or, text_or, Document};
use crate::resolve::{detect_schema_version, resolve_company_name, SchemaVersion};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

/// One labelled metric tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// Read-only projection of a report for on-screen display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub company: String,
    pub schema_version: SchemaVersion,
    pub period_start: String,
    pub period_end: String,
    pub total_months: String,
    pub metrics: Vec<Metric>,
}

impl ReportSummary {
    pub fn from_document(doc: &Document, default_company: &str) -> Self {
        let root = doc.root();

        let integrity = text_or(root, &["integrity_score", "score"], "0");
        let kite = text_or(root, &["kite_flying", "risk_score"], "0");
        let volatility = number_or(root, &["volatility", "overall_index"], 0.0);
        let accounts = array_at(root, &["accounts"]).len();

        Self {
            company: resolve_company_name(root, default_company),
            schema_version: detect_schema_version(root),
            period_start: text_or(root, &["report_info", "period_start"], ""),
            period_end: text_or(root, &["report_info", "period_end"], ""),
            total_months: text_or(root, &["report_info", "total_months"], "0"),
            metrics: vec![
                Metric {
                    label: "Integrity",
                    value: format!("{}%", integrity),
                },
                Metric {
                    label: "Kite Risk",
                    value: kite,
                },
                Metric {
                    label: "Volatility",
                    value: format!("{}%", round_whole(volatility)),
                },
                Metric {
                    label: "Accounts",
                    value: accounts.to_string(),
                },
            ],
        }
    }

    /// Status line shown once a report has loaded.
    pub fn banner(&self) -> String {
        format!("Loaded: {} (Schema v{})", self.company, self.schema_version)
    }

    pub fn period_line(&self) -> String {
        format!("{} → {}", self.period_start, self.period_end)
    }

    pub fn months_line(&self) -> String {
        format!("{} Months", self.total_months)
    }
}

/// Format a float rounded to a whole number, ties to even.
pub fn round_whole(value: f64) -> String {
    format!("{:.0}", value)
}

/// Print the summary for a terminal.
pub fn write_summary<W: Write>(out: &mut W, summary: &ReportSummary) -> io::Result<()> {
    writeln!(out, "{}", summary.banner().green().bold())?;
    writeln!(out)?;
    writeln!(out, "{}", summary.company.bold())?;
    writeln!(out, "{}", summary.period_line())?;
    writeln!(out, "{}", summary.months_line())?;
    writeln!(out, "{}", "─".repeat(48).dimmed())?;

    for metric in &summary.metrics {
        writeln!(out, "  {:<12} {}", metric.label.dimmed(), metric.value.cyan().bold())?;
    }

    Ok(())
}
