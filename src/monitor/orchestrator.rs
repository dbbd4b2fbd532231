// src/monitor/orchestrator.rs
use crate::config::Config;
use crate::db::connection::Database;
use crate::db::targets::MonitorTarget;
use crate::db::{alerts, snapshots, targets};
use crate::detect::{differ, noise, signals};
use crate::errors::ServerError;
use crate::fingerprint::{fingerprint, is_duplicate};
use crate::mailer::render_alert_email;
use crate::monitor::{Classifier, Notifier, PageFetcher};
use chrono::{Duration as ChronoDuration, NaiveDateTime, Utc};

/// Terminal state of one target's check.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Cooldown,
    FetchFailed,
    Baseline,
    NoTextChange,
    NoMeaningfulChange,
    DuplicateChange,
    Notified,
    NotifyFailed,
}

#[derive(Debug, Default)]
pub struct CycleStats {
    pub targets_seen: usize,
    pub checked: usize,
    pub notified: usize,
    pub failed: usize,
}

/// Run one full check cycle over every active target, strictly sequentially.
/// One target's failure never aborts the rest of the batch; at most one
/// outbound fetch is in flight at any time.
pub fn run_cycle(
    db: &Database,
    fetcher: &dyn PageFetcher,
    classifier: &dyn Classifier,
    notifier: &dyn Notifier,
    config: &Config,
) -> CycleStats {
    let mut stats = CycleStats::default();

    let targets = match targets::get_active_targets(db) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("❌ Could not load targets, aborting cycle: {e}");
            return stats;
        }
    };

    println!("🔎 Check cycle started: {} active target(s)", targets.len());

    for (idx, target) in targets.iter().enumerate() {
        stats.targets_seen += 1;

        match check_target(db, fetcher, classifier, notifier, config, target) {
            Ok(outcome) => {
                println!("   {} → {:?}", target.label, outcome);
                match outcome {
                    CheckOutcome::Cooldown => {}
                    CheckOutcome::FetchFailed => stats.failed += 1,
                    CheckOutcome::Notified => {
                        stats.checked += 1;
                        stats.notified += 1;
                    }
                    CheckOutcome::NotifyFailed => {
                        stats.checked += 1;
                        stats.failed += 1;
                    }
                    _ => stats.checked += 1,
                }
            }
            Err(e) => {
                stats.failed += 1;
                eprintln!("⚠️ Target {} failed: {e}", target.label);
            }
        }

        // Politeness pause between origins.
        if idx + 1 < targets.len() {
            std::thread::sleep(config.inter_target_delay);
        }
    }

    println!(
        "✅ Cycle complete: {} checked, {} notified, {} failed",
        stats.checked, stats.notified, stats.failed
    );

    stats
}

fn check_target(
    db: &Database,
    fetcher: &dyn PageFetcher,
    classifier: &dyn Classifier,
    notifier: &dyn Notifier,
    config: &Config,
    target: &MonitorTarget,
) -> Result<CheckOutcome, ServerError> {
    let now = Utc::now().naive_utc();

    if in_cooldown(target.last_checked_at, now, config.cooldown_hours) {
        return Ok(CheckOutcome::Cooldown);
    }

    // A failed fetch skips the target with no mutation; the next scheduled
    // cycle retries naturally.
    let raw_text = match fetcher.fetch_pricing_text(&target.url) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("⚠️ Fetch failed for {}: {e}", target.url);
            return Ok(CheckOutcome::FetchFailed);
        }
    };

    let previous = snapshots::latest_snapshot(db, target.id)?;

    // Snapshots store the raw text; cleaning happens at diff time so filter
    // rule changes can be replayed against history.
    let new_snapshot_id = snapshots::insert_snapshot(db, target.id, &raw_text, now)?;
    targets::touch_last_checked(db, target.id, now)?;

    let previous = match previous {
        Some(snap) => snap,
        None => return Ok(CheckOutcome::Baseline),
    };

    let diff = differ::compare(&previous.content, &raw_text);
    if !diff.has_changes {
        return Ok(CheckOutcome::NoTextChange);
    }

    let change = match classifier.classify(
        &noise::clean(&previous.content),
        &noise::clean(&raw_text),
    ) {
        Some(c) => c,
        None => return Ok(CheckOutcome::NoMeaningfulChange),
    };

    let fp = fingerprint(&change);
    if is_duplicate(&fp, target.last_change_fingerprint.as_deref()) {
        // Already reported this exact change; the stored fingerprint stays
        // put so page flapping can't re-notify.
        return Ok(CheckOutcome::DuplicateChange);
    }

    let alert_id = alerts::insert_alert(
        db,
        &alerts::NewAlert {
            target_id: target.id,
            old_snapshot_id: previous.id,
            new_snapshot_id,
            change: &change,
            fingerprint: &fp,
        },
        now,
    )?;

    let snippet = differ::render_snippet(&diff);
    let hints = signals::extract_hints(&diff.added, &diff.removed);
    let email = render_alert_email(&target.label, &target.url, &change, &snippet, &hints);

    let outcome = match notifier.send_alert(&target.recipient_email, &email) {
        Ok(()) => {
            alerts::mark_alert_sent(db, alert_id)?;
            CheckOutcome::Notified
        }
        Err(e) => {
            eprintln!("⚠️ Notification failed for {}: {e}", target.label);
            CheckOutcome::NotifyFailed
        }
    };

    // Advance the fingerprint even when delivery failed: at most one
    // notification attempt per distinct change, never an endless retry.
    targets::record_notified_change(db, target.id, &fp, change.kind.as_str())?;

    Ok(outcome)
}

fn in_cooldown(
    last_checked: Option<NaiveDateTime>,
    now: NaiveDateTime,
    cooldown_hours: i64,
) -> bool {
    match last_checked {
        Some(ts) => now - ts < ChronoDuration::hours(cooldown_hours),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_checked_targets_are_due() {
        let now = Utc::now().naive_utc();
        assert!(!in_cooldown(None, now, 24));
    }

    #[test]
    fn recently_checked_targets_wait() {
        let now = Utc::now().naive_utc();
        assert!(in_cooldown(Some(now - ChronoDuration::hours(2)), now, 24));
    }

    #[test]
    fn stale_targets_proceed() {
        let now = Utc::now().naive_utc();
        assert!(!in_cooldown(Some(now - ChronoDuration::hours(25)), now, 24));
    }
}
