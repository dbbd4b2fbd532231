// src/monitor/scheduler.rs
use crate::classify::OpenAiClassifier;
use crate::config::Config;
use crate::db::connection::Database;
use crate::fetcher::PricingPageFetcher;
use crate::mailer::BrevoMailer;
use crate::monitor::run_cycle;

/// Fire one cycle on a background thread (the POST /run trigger).
pub fn spawn_cycle(db: &Database, config: Config) {
    let db = db.clone(); // cheap clone (path only)

    std::thread::spawn(move || {
        println!("🧵 Check cycle thread started");
        run_once(&db, &config);
    });
}

/// Daily trigger: run a cycle, sleep, repeat. On-demand runs via the router
/// drive the same cycle function.
pub fn start_daily(db: Database, config: Config) {
    std::thread::spawn(move || loop {
        run_once(&db, &config);
        std::thread::sleep(config.cycle_interval);
    });
}

/// Collaborators are constructed per run, inside the thread, so a missing
/// env var surfaces in the log instead of killing the server.
fn run_once(db: &Database, config: &Config) {
    let fetcher = match PricingPageFetcher::new(config.fetch_timeout) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("❌ Fetcher init failed: {e}");
            return;
        }
    };

    let classifier = match OpenAiClassifier::from_env(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Classifier init failed: {e}");
            return;
        }
    };

    let notifier = match BrevoMailer::from_env() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ Mailer init failed: {e}");
            return;
        }
    };

    run_cycle(db, &fetcher, &classifier, &notifier, config);
}
