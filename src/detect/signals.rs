// src/detect/signals.rs
use regex::Regex;
use std::sync::OnceLock;

fn price_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Currency symbol followed by digits, or "<number> / mo|month|...".
        Regex::new(r"(?i)[$€£¥₹]\s*\d|\d+(\.\d+)?\s*/\s*(mo|month|yr|year|user|seat)\b")
            .expect("price pattern must compile")
    })
}

fn plan_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(starter|basic|pro|professional|business|enterprise|team|free|plus|premium|standard|growth|scale|individual|ultimate)\b",
        )
        .expect("plan pattern must compile")
    })
}

/// Pull the diff blocks most likely to matter: anything that looks like a
/// price or names a plan tier. Advisory only — prioritizes signal for the
/// classifier context and the alert email, never decides meaningfulness.
pub fn extract_hints(added: &[String], removed: &[String]) -> Vec<String> {
    added
        .iter()
        .chain(removed.iter())
        .filter(|block| price_pattern().is_match(block) || plan_pattern().is_match(block))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn currency_symbols_match() {
        let hints = extract_hints(&blocks(&["Now only $49", "Read our latest announcement"]), &[]);
        assert_eq!(hints, vec!["Now only $49".to_string()]);
    }

    #[test]
    fn per_period_prices_match() {
        let added = blocks(&["19 / mo for annual billing", "12 /seat", "300 words of copy"]);
        let hints = extract_hints(&added, &[]);
        assert_eq!(
            hints,
            vec!["19 / mo for annual billing".to_string(), "12 /seat".to_string()]
        );
    }

    #[test]
    fn plan_vocabulary_matches() {
        let removed = blocks(&["Enterprise tier now includes SSO", "Our mission statement"]);
        let hints = extract_hints(&[], &removed);
        assert_eq!(hints, vec!["Enterprise tier now includes SSO".to_string()]);
    }

    #[test]
    fn added_blocks_come_before_removed() {
        let added = blocks(&["Pro $39/mo"]);
        let removed = blocks(&["Pro $29/mo"]);
        let hints = extract_hints(&added, &removed);
        assert_eq!(hints, vec!["Pro $39/mo".to_string(), "Pro $29/mo".to_string()]);
    }

    #[test]
    fn unrelated_copy_is_excluded() {
        let added = blocks(&["We rewrote our landing page headline"]);
        assert!(extract_hints(&added, &[]).is_empty());
    }
}
