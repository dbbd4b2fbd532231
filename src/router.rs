use crate::config::Config;
use crate::db::connection::Database;
use crate::db::targets;
use crate::errors::ServerError;
use crate::monitor::scheduler;
use crate::responses::{text_response, ResultResp};
use astra::Request;

pub fn handle(req: Request, db: &Database, config: &Config) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        // Keep-alive probe for the hosting platform.
        ("GET", "/health") => text_response(200, "ok"),

        ("GET", "/") => status_page(db),

        // On-demand cycle; the daily schedule drives the same entry point.
        ("POST", "/run") => {
            scheduler::spawn_cycle(db, config.clone());
            text_response(202, "check cycle started")
        }

        _ => Err(ServerError::NotFound),
    }
}

fn status_page(db: &Database) -> ResultResp {
    let targets = targets::get_active_targets(db)?;

    let mut body = format!("pricewatch: {} active target(s)\n", targets.len());
    for t in &targets {
        let checked = t
            .last_checked_at
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "never".to_string());
        body.push_str(&format!(
            "- {} <{}> last checked: {}\n",
            t.label, t.url, checked
        ));
    }

    text_response(200, body)
}
