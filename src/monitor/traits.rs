// src/monitor/traits.rs
//
// Seams between the check cycle and its collaborators, so the orchestrator
// can run against fakes in tests. Real implementations: PricingPageFetcher,
// OpenAiClassifier, BrevoMailer.
use crate::classify::ChangeResult;
use crate::fetcher::FetchError;
use crate::mailer::{AlertEmail, MailerError};

pub trait PageFetcher {
    /// Extracted plain text of the pricing page, capped at the fetch layer.
    fn fetch_pricing_text(&self, url: &str) -> Result<String, FetchError>;
}

pub trait Classifier {
    /// A meaningful change, or None. Implementations must swallow transport
    /// and parse failures: a classification failure is a no-change, never an
    /// error the cycle has to handle.
    fn classify(&self, old_text: &str, new_text: &str) -> Option<ChangeResult>;
}

pub trait Notifier {
    fn send_alert(&self, recipient_email: &str, email: &AlertEmail) -> Result<(), MailerError>;
}
