// src/fingerprint.rs
use crate::classify::ChangeResult;
use sha2::{Digest, Sha256};

const DELIMITER: &str = "|";
const FINGERPRINT_LEN: usize = 16;

/// Stable hash over a change's semantic fields, used only for dedup.
///
/// Summary wording is deliberately excluded: the classifier may phrase the
/// same underlying change differently between calls, and both phrasings must
/// collapse to one fingerprint.
pub fn fingerprint(change: &ChangeResult) -> String {
    let material = [
        change.kind.as_str(),
        change.old_value.as_str(),
        change.new_value.as_str(),
        change.plan.as_str(),
    ]
    .join(DELIMITER);

    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    let digest = hasher.finalize();

    format!("{digest:x}")[..FINGERPRINT_LEN].to_string()
}

/// Plain equality against the target's last-notified fingerprint.
pub fn is_duplicate(new_fingerprint: &str, last_notified: Option<&str>) -> bool {
    last_notified == Some(new_fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ChangeKind, ChangeResult};

    fn change(summary: &str) -> ChangeResult {
        ChangeResult {
            kind: ChangeKind::PriceChange,
            summary: summary.to_string(),
            old_value: "$29/mo".to_string(),
            new_value: "$39/mo".to_string(),
            plan: "Pro".to_string(),
            confidence_score: 0.9,
        }
    }

    #[test]
    fn deterministic_across_summary_wording() {
        let a = change("Pro went from $29 to $39 monthly.");
        let b = change("The Pro plan price increased by ten dollars.");
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn any_semantic_field_difference_changes_the_hash() {
        let base = change("x");

        let mut other_kind = change("x");
        other_kind.kind = ChangeKind::TierChange;

        let mut other_new = change("x");
        other_new.new_value = "$49/mo".to_string();

        let mut other_plan = change("x");
        other_plan.plan = "Business".to_string();

        assert_ne!(fingerprint(&base), fingerprint(&other_kind));
        assert_ne!(fingerprint(&base), fingerprint(&other_new));
        assert_ne!(fingerprint(&base), fingerprint(&other_plan));
    }

    #[test]
    fn fingerprint_is_short_hex() {
        let fp = fingerprint(&change("x"));
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn duplicate_is_plain_equality() {
        let fp = fingerprint(&change("x"));
        assert!(is_duplicate(&fp, Some(&fp)));
        assert!(!is_duplicate(&fp, Some("deadbeefdeadbeef")));
        assert!(!is_duplicate(&fp, None));
    }
}
