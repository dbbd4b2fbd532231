// fetcher.rs
use crate::fetcher::FetchError;
use crate::monitor::PageFetcher;
use rand::Rng;
use reqwest::blocking::Client;
use scraper::{Html, Node};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Hard cap on extracted page text, bounding downstream classifier cost.
pub const MAX_PAGE_CHARS: usize = 8000;
const TRUNCATION_MARKER: &str = "... [truncated]";

const MAX_ATTEMPTS: u64 = 3;
const JITTER_MAX_SECS: u64 = 2;

// Subtrees that never hold pricing content.
const SKIPPED_TAGS: [&str; 7] = ["script", "style", "noscript", "svg", "nav", "footer", "header"];

pub struct PricingPageFetcher {
    client: Client,
}

impl PricingPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let html = resp.text().map_err(|e| FetchError::Network(e.to_string()))?;

        let text = extract_visible_text(&html);
        if text.trim().is_empty() {
            return Err(FetchError::EmptyPage);
        }

        Ok(cap_page_text(&text))
    }
}

impl PageFetcher for PricingPageFetcher {
    /// Fetch a pricing page and reduce it to plain text, retrying transient
    /// failures with a short jittered backoff.
    fn fetch_pricing_text(&self, url: &str) -> Result<String, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.try_fetch(url) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    eprintln!("⚠️ Fetch attempt {attempt} failed for {url}: {e}");
                    last_err = Some(e);

                    if attempt < MAX_ATTEMPTS {
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                        std::thread::sleep(Duration::from_secs(attempt + jitter));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| FetchError::Network("fetch retry loop failed".into())))
    }
}

/// Walk the DOM and collect visible text, one line per text node, skipping
/// scripts and page chrome.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines: Vec<String> = Vec::new();
    collect_text(document.tree.root(), &mut lines);
    lines.join("\n")
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, lines: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Element(el) => {
                if SKIPPED_TAGS.contains(&el.name()) {
                    continue;
                }
                collect_text(child, lines);
            }
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !collapsed.is_empty() {
                    lines.push(collapsed);
                }
            }
            _ => {}
        }
    }
}

fn cap_page_text(text: &str) -> String {
    if text.chars().count() <= MAX_PAGE_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_PAGE_CHARS).collect();
    format!("{cut}{TRUNCATION_MARKER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_pricing_text_and_skips_chrome() {
        let html = r#"
            <html>
              <head><title>Pricing</title><style>.x { color: red; }</style></head>
              <body>
                <nav><a href="/">Home</a></nav>
                <main>
                  <h1>Plans</h1>
                  <p>Pro   $29/mo</p>
                </main>
                <script>trackPageview();</script>
                <footer>© 2024 Acme</footer>
              </body>
            </html>"#;

        let text = extract_visible_text(html);

        assert!(text.contains("Plans"));
        assert!(text.contains("Pro $29/mo"));
        assert!(!text.contains("trackPageview"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Acme"));
    }

    #[test]
    fn long_pages_are_capped_with_marker() {
        let text = "word ".repeat(4000);
        let capped = cap_page_text(&text);

        assert!(capped.ends_with(TRUNCATION_MARKER));
        assert!(capped.chars().count() <= MAX_PAGE_CHARS + TRUNCATION_MARKER.len());
    }

    #[test]
    fn short_pages_pass_through() {
        assert_eq!(cap_page_text("Pro $29/mo"), "Pro $29/mo");
    }
}
