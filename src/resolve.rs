//! Company name and schema version resolution
//!
//! Reports come from two generations of the upstream pipeline. Older (4.0)
//! reports carry no version tag, so the version is sniffed from fields
//! that only the 5.0 pipeline emits.

use crate::document::{array_at, is_truthy, lookup};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Placeholder names the pipeline writes when it could not find a real one.
const PLACEHOLDER_NAMES: &[&str] = &["unknown", "n/a", "na", "company", "-", "null"];

/// Where a company name may live, highest priority first.
const NAME_CANDIDATES: &[&[&str]] = &[
    &["report_info", "company_name"],
    &["report_info", "company"],
    &["report_info", "entity_name"],
    &["company_name"],
    &["company"],
    &["entity_name"],
];

/// Report schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaVersion {
    #[serde(rename = "4.0")]
    V4,
    #[serde(rename = "5.0")]
    V5,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V4 => "4.0",
            SchemaVersion::V5 => "5.0",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the first usable company name, or `default`.
///
/// Nested `report_info` fields win over top-level duplicates. Candidates
/// that are not strings, are blank, or match a placeholder (any case) are
/// skipped. The returned name is trimmed but keeps its original case.
pub fn resolve_company_name(report: &Value, default: &str) -> String {
    if !report.is_object() {
        return default.to_string();
    }

    NAME_CANDIDATES
        .iter()
        .filter_map(|path| lookup(report, path).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty() && !is_placeholder(name))
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

fn is_placeholder(name: &str) -> bool {
    let lower = name.to_lowercase();
    PLACEHOLDER_NAMES.contains(&lower.as_str())
}

/// Infer which pipeline generation produced `report`.
///
/// First match wins: an explicit `5.x` tag, then any recurring-payment or
/// non-bank-financing data, then a `highest_intraday` key in the first
/// month of the first account. Anything else is treated as 4.0, including
/// sparse 5.0 reports that happen to have none of those.
pub fn detect_schema_version(report: &Value) -> SchemaVersion {
    let tagged_v5 = lookup(report, &["report_info", "schema_version"])
        .and_then(Value::as_str)
        .map(|v| v.starts_with("5."))
        .unwrap_or(false);
    if tagged_v5 {
        return SchemaVersion::V5;
    }

    let has_v5_sections = ["recurring_payments", "non_bank_financing"]
        .into_iter()
        .any(|key| lookup(report, &[key]).map(is_truthy).unwrap_or(false));
    if has_v5_sections {
        return SchemaVersion::V5;
    }

    let first_month = array_at(report, &["accounts"])
        .first()
        .map(|account| array_at(account, &["monthly_summary"]))
        .and_then(|months| months.first())
        .and_then(Value::as_object);
    if first_month.is_some_and(|month| month.contains_key("highest_intraday")) {
        return SchemaVersion::V5;
    }

    SchemaVersion::V4
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // === resolve_company_name ===

    #[test]
    fn test_non_object_returns_default() {
        for input in [json!(null), json!("Acme"), json!([{"company": "Acme"}]), json!(3)] {
            assert_eq!(resolve_company_name(&input, "Fallback"), "Fallback");
        }
    }

    #[test]
    fn test_nested_name_beats_top_level() {
        let report = json!({
            "company": "Other",
            "report_info": {"company_name": "Acme"}
        });
        assert_eq!(resolve_company_name(&report, "Company"), "Acme");
    }

    #[test]
    fn test_candidate_order_within_report_info() {
        let report = json!({"report_info": {"entity_name": "Entity", "company": "Co"}});
        assert_eq!(resolve_company_name(&report, "x"), "Co");
    }

    #[test]
    fn test_placeholder_rejected_case_insensitively() {
        let report = json!({"report_info": {"company_name": "UNKNOWN"}});
        assert_eq!(resolve_company_name(&report, "Company"), "Company");

        let report = json!({"report_info": {"company_name": " N/A "}, "company": "Real Ltd"});
        assert_eq!(resolve_company_name(&report, "Company"), "Real Ltd");
    }

    #[test]
    fn test_whitespace_only_falls_through() {
        let report = json!({
            "report_info": {"company_name": "   ", "company": "\t\n"},
            "entity_name": "  Fallthrough Pty  "
        });
        assert_eq!(resolve_company_name(&report, "d"), "Fallthrough Pty");

        let report = json!({"report_info": {"company_name": "   "}});
        assert_eq!(resolve_company_name(&report, "d"), "d");
    }

    #[test]
    fn test_non_string_candidates_skipped() {
        let report = json!({
            "report_info": {"company_name": 42, "company": ["Acme"]},
            "company_name": "Top Level"
        });
        assert_eq!(resolve_company_name(&report, "d"), "Top Level");
    }

    #[test]
    fn test_report_info_wrong_type_degrades() {
        let report = json!({"report_info": "broken", "company": "Acme"});
        assert_eq!(resolve_company_name(&report, "d"), "Acme");
    }

    #[test]
    fn test_keeps_original_case() {
        let report = json!({"report_info": {"company_name": "  ACME Holdings  "}});
        assert_eq!(resolve_company_name(&report, "d"), "ACME Holdings");
    }

    proptest! {
        #[test]
        fn prop_placeholders_never_win(idx in 0usize..6, upper in any::<bool>(), pad in "[ \t]{0,3}") {
            let base = PLACEHOLDER_NAMES[idx];
            let name = if upper { base.to_uppercase() } else { base.to_string() };
            let report = json!({"report_info": {"company_name": format!("{pad}{name}{pad}")}});
            prop_assert_eq!(resolve_company_name(&report, "Default"), "Default");
        }

        #[test]
        fn prop_real_names_are_trimmed(name in "[A-Za-z][A-Za-z0-9 &]{2,20}[A-Za-z0-9]") {
            prop_assume!(!is_placeholder(name.trim()));
            let report = json!({"company": format!("  {name}  ")});
            prop_assert_eq!(resolve_company_name(&report, "Default"), name.trim());
        }
    }

    // === detect_schema_version ===

    #[test]
    fn test_explicit_v5_tag() {
        let report = json!({"report_info": {"schema_version": "5.2"}});
        assert_eq!(detect_schema_version(&report), SchemaVersion::V5);
    }

    #[test]
    fn test_explicit_v4_tag_is_v4() {
        let report = json!({"report_info": {"schema_version": "4.1"}});
        assert_eq!(detect_schema_version(&report), SchemaVersion::V4);
    }

    #[test]
    fn test_numeric_tag_ignored() {
        let report = json!({"report_info": {"schema_version": 5.0}});
        assert_eq!(detect_schema_version(&report), SchemaVersion::V4);
    }

    #[test]
    fn test_v5_sections() {
        assert_eq!(
            detect_schema_version(&json!({"recurring_payments": [1]})),
            SchemaVersion::V5
        );
        assert_eq!(
            detect_schema_version(&json!({"non_bank_financing": {"lenders": []}})),
            SchemaVersion::V5
        );
        assert_eq!(
            detect_schema_version(&json!({"recurring_payments": [], "non_bank_financing": null})),
            SchemaVersion::V4
        );
    }

    #[test]
    fn test_empty_document_is_v4() {
        assert_eq!(detect_schema_version(&json!({})), SchemaVersion::V4);
        assert_eq!(detect_schema_version(&json!([])), SchemaVersion::V4);
    }

    #[test]
    fn test_intraday_key_in_first_month() {
        let v5 = json!({"accounts": [{"monthly_summary": [{"highest_intraday": 100}]}]});
        assert_eq!(detect_schema_version(&v5), SchemaVersion::V5);

        let v4 = json!({"accounts": [{"monthly_summary": [{"closing_balance": 100}]}]});
        assert_eq!(detect_schema_version(&v4), SchemaVersion::V4);
    }

    #[test]
    fn test_intraday_only_checked_on_first_account_and_month() {
        let later_month = json!({"accounts": [{"monthly_summary": [{}, {"highest_intraday": 1}]}]});
        assert_eq!(detect_schema_version(&later_month), SchemaVersion::V4);

        let later_account = json!({"accounts": [
            {"monthly_summary": []},
            {"monthly_summary": [{"highest_intraday": 1}]}
        ]});
        assert_eq!(detect_schema_version(&later_account), SchemaVersion::V4);
    }

    #[test]
    fn test_malformed_accounts_degrade() {
        for report in [
            json!({"accounts": {"0": {}}}),
            json!({"accounts": ["checking"]}),
            json!({"accounts": [{"monthly_summary": "none"}]}),
            json!({"accounts": [{"monthly_summary": ["highest_intraday"]}]}),
            json!({"report_info": null}),
        ] {
            assert_eq!(detect_schema_version(&report), SchemaVersion::V4);
        }
    }

    #[test]
    fn test_schema_version_display() {
        assert_eq!(SchemaVersion::V5.to_string(), "5.0");
        assert_eq!(SchemaVersion::V4.as_str(), "4.0");
        assert_eq!(serde_json::to_string(&SchemaVersion::V5).unwrap(), "\"5.0\"");
    }
}
