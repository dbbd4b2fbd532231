// src/mailer.rs

use crate::classify::ChangeResult;
use crate::monitor::Notifier;
use reqwest::blocking::Client;
use serde::Serialize;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum MailerError {
    Config(String),
    RequestFailed(String),
    ApiError(String),
}

impl fmt::Display for MailerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailerError::Config(msg) => write!(f, "Config error: {}", msg),
            MailerError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            MailerError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl Error for MailerError {}

/// A fully rendered notification: subject plus rich and plain bodies.
pub struct AlertEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

impl BrevoMailer {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Self {
        Self {
            api_key,
            sender_email,
            sender_name,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, MailerError> {
        let api_key = std::env::var("BREVO_API_KEY").map_err(|_| {
            MailerError::Config("BREVO_API_KEY environment variable not set".into())
        })?;
        let sender_email = std::env::var("ALERT_SENDER_EMAIL")
            .unwrap_or_else(|_| "alerts@pricewatch.dev".to_string());
        let sender_name =
            std::env::var("ALERT_SENDER_NAME").unwrap_or_else(|_| "Pricewatch".to_string());

        Ok(Self::new(api_key, sender_email, sender_name))
    }
}

impl Notifier for BrevoMailer {
    fn send_alert(&self, recipient_email: &str, email: &AlertEmail) -> Result<(), MailerError> {
        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient {
                email: recipient_email,
            }],
            subject: &email.subject,
            html_content: &email.html_body,
            text_content: &email.text_body,
        };

        let resp = self
            .client
            .post("https://api.brevo.com/v3/smtp/email")
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MailerError::ApiError(format!(
                "Failed to send alert email: {}",
                error_body
            )));
        }

        Ok(())
    }
}

/// Render the outgoing notification. The snippet and hints are already
/// bounded by the differ/signal rules, which keeps the payload small.
pub fn render_alert_email(
    label: &str,
    url: &str,
    change: &ChangeResult,
    snippet: &str,
    hints: &[String],
) -> AlertEmail {
    let subject = format!("{}: {} detected", label, change.kind.label());
    let confidence_pct = change.confidence_score * 100.0;

    let hints_html = if hints.is_empty() {
        String::new()
    } else {
        let items: String = hints
            .iter()
            .map(|h| format!("<li>{}</li>", h))
            .collect();
        format!("<p><b>Pricing signals:</b></p><ul>{}</ul>", items)
    };

    let html_body = format!(
        r#"
        <h1>{kind} on {label}</h1>
        <p>{summary}</p>
        <p>
            <b>Plan:</b> {plan}<br>
            <b>Before:</b> {old}<br>
            <b>After:</b> {new}<br>
            <b>Confidence:</b> {confidence_pct:.0}%
        </p>
        {hints_html}
        <pre>{snippet}</pre>
        <p><a href="{url}">View the page</a></p>
    "#,
        kind = change.kind.label(),
        label = label,
        summary = change.summary,
        plan = change.plan,
        old = change.old_value,
        new = change.new_value,
    );

    let mut text_body = format!(
        "{kind} on {label}\n\n{summary}\n\nPlan: {plan}\nBefore: {old}\nAfter: {new}\nConfidence: {confidence_pct:.0}%\n",
        kind = change.kind.label(),
        summary = change.summary,
        plan = change.plan,
        old = change.old_value,
        new = change.new_value,
    );
    if !snippet.is_empty() {
        text_body.push_str("\n");
        text_body.push_str(snippet);
        text_body.push('\n');
    }
    text_body.push_str(&format!("\nView the page: {url}\n"));

    AlertEmail {
        subject,
        html_body,
        text_body,
    }
}
