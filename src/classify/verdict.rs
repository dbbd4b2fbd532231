// src/classify/verdict.rs
//
// The model's raw output is an untrusted oracle: code fences, prose,
// invalid enums, and inflated confidence all show up in practice. Every
// rule here degrades to "no change" rather than erroring.
use crate::classify::models::{ChangeKind, ChangeResult};
use serde_json::Value;

pub const NO_CHANGE_SENTINEL: &str = "NO_CHANGE";

const FALLBACK_SUMMARY: &str = "A meaningful change was detected on the pricing page.";

pub fn parse_verdict(raw: &str, min_confidence: f64) -> Option<ChangeResult> {
    let body = strip_code_fences(raw);

    if body.is_empty() || body.eq_ignore_ascii_case(NO_CHANGE_SENTINEL) {
        return None;
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("⚠️ Unparseable classifier verdict ({e}): {body}");
            return None;
        }
    };

    let kind = match value
        .get("kind")
        .and_then(Value::as_str)
        .and_then(ChangeKind::parse)
    {
        Some(k) => k,
        None => {
            eprintln!("⚠️ Classifier verdict has no recognized kind, treating as no change");
            return None;
        }
    };

    // Hard gate, independent of how confident the model claims to be about
    // its own formatting: missing or non-numeric scores fail closed.
    let confidence_score = match value.get("confidence_score").and_then(Value::as_f64) {
        Some(c) => c,
        None => {
            eprintln!("⚠️ Classifier verdict missing confidence_score, treating as no change");
            return None;
        }
    };

    if confidence_score < min_confidence {
        eprintln!(
            "Verdict below confidence gate ({confidence_score:.2} < {min_confidence:.2}), treating as no change"
        );
        return None;
    }

    let field = |key: &str, default: &str| -> String {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    Some(ChangeResult {
        kind,
        summary: field("summary", FALLBACK_SUMMARY),
        old_value: field("old_value", ""),
        new_value: field("new_value", ""),
        plan: field("plan", "Unknown"),
        confidence_score,
    })
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.6;

    fn verdict(json: &str) -> Option<ChangeResult> {
        parse_verdict(json, THRESHOLD)
    }

    #[test]
    fn well_formed_price_change_parses() {
        let result = verdict(
            r#"{"kind": "price_change", "summary": "Pro went from $29 to $39 per month.",
                "old_value": "$29/mo", "new_value": "$39/mo", "plan": "Pro",
                "confidence_score": 0.9}"#,
        )
        .unwrap();

        assert_eq!(result.kind, ChangeKind::PriceChange);
        assert_eq!(result.old_value, "$29/mo");
        assert_eq!(result.new_value, "$39/mo");
        assert_eq!(result.plan, "Pro");
        assert_eq!(result.confidence_score, 0.9);
    }

    #[test]
    fn code_fences_are_stripped() {
        let raw = "```json\n{\"kind\": \"tier_change\", \"summary\": \"s\", \"old_value\": \"a\", \"new_value\": \"b\", \"plan\": \"Team\", \"confidence_score\": 0.8}\n```";
        let result = verdict(raw).unwrap();
        assert_eq!(result.kind, ChangeKind::TierChange);
    }

    #[test]
    fn sentinel_means_no_change() {
        assert_eq!(verdict("NO_CHANGE"), None);
        assert_eq!(verdict("  no_change  "), None);
    }

    #[test]
    fn garbage_means_no_change() {
        assert_eq!(verdict("the page looks different to me"), None);
        assert_eq!(verdict(""), None);
    }

    #[test]
    fn unrecognized_kind_means_no_change() {
        let raw = r#"{"kind": "layout_change", "summary": "s", "confidence_score": 0.95}"#;
        assert_eq!(verdict(raw), None);
    }

    #[test]
    fn low_confidence_is_gated() {
        let raw = r#"{"kind": "price_change", "summary": "s", "old_value": "$29",
                      "new_value": "$39", "plan": "Pro", "confidence_score": 0.4}"#;
        assert_eq!(verdict(raw), None);
    }

    #[test]
    fn missing_or_non_numeric_confidence_is_gated() {
        let missing = r#"{"kind": "price_change", "summary": "s"}"#;
        let non_numeric = r#"{"kind": "price_change", "summary": "s", "confidence_score": "high"}"#;
        assert_eq!(verdict(missing), None);
        assert_eq!(verdict(non_numeric), None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let raw = r#"{"kind": "feature_change", "confidence_score": 0.7}"#;
        let result = verdict(raw).unwrap();

        assert!(!result.summary.is_empty());
        assert_eq!(result.old_value, "");
        assert_eq!(result.new_value, "");
        assert_eq!(result.plan, "Unknown");
    }
}
