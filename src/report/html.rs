//! Standalone HTML report
//!
//! Produces a single self-contained page (inline CSS, no scripts, no
//! external resources) that can be saved and opened offline.

use crate::document::{array_at, number_or, text_or, Document};
use crate::render::round_whole;
use crate::resolve::resolve_company_name;
use chrono::{Local, NaiveDateTime};

/// Company name used in the HTML report when none can be resolved.
pub const DEFAULT_HTML_COMPANY: &str = "Company";

const STYLE: &str = r#"
body {
    font-family: Arial, sans-serif;
    background: #0f172a;
    color: #e5e7eb;
    padding: 2rem;
}
.card {
    background: #020617;
    padding: 1.5rem;
    border-radius: 12px;
    margin-bottom: 1rem;
}
h1,h2 {
    color: #22c55e;
}
footer {
    margin-top: 3rem;
    color: #94a3b8;
    font-size: 0.8rem;
}
"#;

/// Render the report stamped with the current local time.
pub fn generate(doc: &Document, company_fallback: &str) -> String {
    render_standalone(doc, company_fallback, Local::now().naive_local())
}

/// Render the report with an explicit generation time.
pub fn render_standalone(doc: &Document, company_fallback: &str, generated_at: NaiveDateTime) -> String {
    let root = doc.root();

    let company = html_escape(&resolve_company_name(root, company_fallback));
    let period_start = html_escape(&text_or(root, &["report_info", "period_start"], ""));
    let period_end = html_escape(&text_or(root, &["report_info", "period_end"], ""));
    let total_months = html_escape(&text_or(root, &["report_info", "total_months"], "0"));

    let int_score = html_escape(&text_or(root, &["integrity_score", "score"], "0"));
    let int_rating = html_escape(&text_or(root, &["integrity_score", "rating"], "N/A"));

    let vol_index = round_whole(number_or(root, &["volatility", "overall_index"], 0.0));
    let vol_level = html_escape(&text_or(root, &["volatility", "overall_level"], "LOW"));

    let kite_score = html_escape(&text_or(root, &["kite_flying", "risk_score"], "0"));
    let kite_level = html_escape(&text_or(root, &["kite_flying", "risk_level"], "LOW"));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Bank Statement Analysis - {company}</title>
<style>{style}</style>
</head>
<body>

<h1>{company}</h1>
<p>Period: {period_start} → {period_end} ({total_months} months)</p>

<div class="card">
<h2>Integrity Score</h2>
<p>{int_score}% — {int_rating}</p>
</div>

<div class="card">
<h2>Volatility</h2>
<p>{vol_index}% — {vol_level}</p>
</div>

<div class="card">
<h2>Kite Flying Risk</h2>
<p>{kite_score} — {kite_level}</p>
</div>

<div class="card">
<h2>Observations</h2>
<ul>
{observations}
</ul>
</div>

<footer>
Generated {generated}
</footer>

</body>
</html>
"#,
        style = STYLE,
        observations = render_observations(root),
        generated = iso_timestamp(generated_at),
    )
}

/// One `<li>` per positive observation, in document order.
/// Entries that are not strings are skipped.
fn render_observations(root: &serde_json::Value) -> String {
    array_at(root, &["observations", "positive"])
        .iter()
        .filter_map(|o| o.as_str())
        .map(|o| format!("<li>{}</li>", html_escape(o)))
        .collect()
}

/// ISO-8601 local time with microseconds, e.g. `2024-03-01T09:15:02.000412`.
fn iso_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Escape text for safe inclusion in HTML content and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
