// src/detect/noise.rs
use regex::Regex;
use std::sync::OnceLock;

// Lines shorter than this (after trimming) carry no signal.
const MIN_LINE_CHARS: usize = 3;

fn noise_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Tracking / analytics snippets
            r"(?i)(google-?analytics|googletagmanager|gtag\(|fbq\(|facebook pixel|hotjar|mixpanel|segment\.io|utm_[a-z]+)",
            // Copyright and "last updated" stamps
            r"(?i)(©|&copy;|copyright\s+(19|20)\d{2}|all rights reserved|last\s+updated)",
            // Cookie / GDPR consent banners
            r"(?i)(cookie|gdpr|consent|accept\s+all|manage\s+preferences)",
            // Legal footer boilerplate
            r"(?i)(privacy\s+policy|terms\s+of\s+(service|use)|terms\s+(&|and)\s+conditions|sitemap|contact\s+us)",
            // Social share prompts
            r"(?i)(share\s+(this|on)|follow\s+us|tweet\s+this|find\s+us\s+on\s+(twitter|facebook|linkedin|instagram))",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("noise pattern must compile"))
        .collect()
    })
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("blank-run pattern must compile"))
}

/// Strip lines that carry no pricing signal before any comparison.
///
/// Pure and idempotent: clean(clean(x)) == clean(x). Applied transiently at
/// diff time, never to stored snapshots, so rule changes here can be
/// replayed against history.
pub fn clean(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_LINE_CHARS)
        .filter(|line| !noise_patterns().iter().any(|re| re.is_match(line)))
        .collect();

    let joined = kept.join("\n");
    blank_runs().replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_is_idempotent() {
        let raw = "  Pro plan: $29/mo  \n\n© 2024 Acme Inc\nx\nStarter: $10/mo\n";
        let once = clean(raw);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn strips_known_noise_categories() {
        let raw = "\
We use cookies to improve your experience
© 2024 Acme Inc. All rights reserved.
Pro plan: $29 per month
Privacy Policy | Terms of Service
Follow us on Twitter
Loaded via googletagmanager.com/gtm.js";

        assert_eq!(clean(raw), "Pro plan: $29 per month");
    }

    #[test]
    fn drops_empty_and_tiny_lines() {
        let raw = "ok\n\n  \nNo\nEnterprise: custom pricing";
        assert_eq!(clean(raw), "Enterprise: custom pricing");
    }

    #[test]
    fn keeps_ordinary_pricing_lines_untouched() {
        let raw = "Starter $10/mo\nPro $29/mo";
        assert_eq!(clean(raw), raw);
    }
}
