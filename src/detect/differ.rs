// src/detect/differ.rs
use crate::detect::noise;

// Diff blocks shorter than this are discarded as noise.
const MIN_BLOCK_CHARS: usize = 3;
const MAX_CONTEXT_BLOCKS: usize = 10;
const MAX_SNIPPET_LINES: usize = 5;
const MAX_SNIPPET_LINE_CHARS: usize = 120;

/// Line-level diff between two cleaned snapshots. Transient: recomputed on
/// every check, never persisted.
#[derive(Debug, Default, PartialEq)]
pub struct DiffResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub has_changes: bool,
}

/// Compare two raw snapshot texts. Both are noise-filtered first; matching
/// is whitespace-insensitive so re-wrapped text is not flagged as changed.
///
/// This is the pipeline gate: when has_changes is false the classifier is
/// never invoked.
pub fn compare(old_text: &str, new_text: &str) -> DiffResult {
    let old_clean = noise::clean(old_text);
    let new_clean = noise::clean(new_text);

    let old_lines: Vec<String> = old_clean.lines().map(normalize_line).collect();
    let new_lines: Vec<String> = new_clean.lines().map(normalize_line).collect();

    let (removed, added) = diff_lines(&old_lines, &new_lines);
    let has_changes = !added.is_empty() || !removed.is_empty();

    DiffResult {
        added,
        removed,
        has_changes,
    }
}

/// Compact, token-bounded diff rendering for the classifier. None when the
/// texts are identical after cleaning — callers treat that as nothing to
/// classify.
pub fn build_context(old_text: &str, new_text: &str, max_chars: usize) -> Option<String> {
    let diff = compare(old_text, new_text);
    if !diff.has_changes {
        return None;
    }
    Some(context_from_diff(&diff, max_chars))
}

pub fn context_from_diff(diff: &DiffResult, max_chars: usize) -> String {
    let mut out = String::new();

    if !diff.removed.is_empty() {
        out.push_str("REMOVED:\n");
        for block in diff.removed.iter().take(MAX_CONTEXT_BLOCKS) {
            out.push_str(block);
            out.push('\n');
        }
    }

    if !diff.added.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("ADDED:\n");
        for block in diff.added.iter().take(MAX_CONTEXT_BLOCKS) {
            out.push_str(block);
            out.push('\n');
        }
    }

    truncate_chars(out.trim_end(), max_chars)
}

/// Short human-readable excerpt for the notification email: at most 5
/// removed and 5 added lines, 120 chars each. Presentation only, but the
/// bounds keep the outgoing payload small.
pub fn render_snippet(diff: &DiffResult) -> String {
    let mut lines = Vec::new();

    for block in diff.removed.iter().take(MAX_SNIPPET_LINES) {
        lines.push(format!("- {}", excerpt(block)));
    }
    for block in diff.added.iter().take(MAX_SNIPPET_LINES) {
        lines.push(format!("+ {}", excerpt(block)));
    }

    lines.join("\n")
}

fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// LCS walk over the two line lists. Consecutive changed lines group into
/// one block. O(n*m) is fine here: pages are capped at fetch time, a few
/// hundred lines at most.
fn diff_lines(old: &[String], new: &[String]) -> (Vec<String>, Vec<String>) {
    let n = old.len();
    let m = new.len();

    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut removed_blocks = Vec::new();
    let mut added_blocks = Vec::new();
    let mut removed_run: Vec<&str> = Vec::new();
    let mut added_run: Vec<&str> = Vec::new();

    let (mut i, mut j) = (0, 0);
    loop {
        if i < n && j < m && old[i] == new[j] {
            flush_run(&mut removed_run, &mut removed_blocks);
            flush_run(&mut added_run, &mut added_blocks);
            i += 1;
            j += 1;
        } else if j < m && (i == n || lcs[i][j + 1] >= lcs[i + 1][j]) {
            added_run.push(&new[j]);
            j += 1;
        } else if i < n {
            removed_run.push(&old[i]);
            i += 1;
        } else {
            break;
        }
    }
    flush_run(&mut removed_run, &mut removed_blocks);
    flush_run(&mut added_run, &mut added_blocks);

    (removed_blocks, added_blocks)
}

fn flush_run(run: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if run.is_empty() {
        return;
    }
    let block = run.join("\n").trim().to_string();
    run.clear();
    if block.chars().count() >= MIN_BLOCK_CHARS {
        blocks.push(block);
    }
}

fn excerpt(block: &str) -> String {
    let first = block.lines().next().unwrap_or("");
    first.chars().take(MAX_SNIPPET_LINE_CHARS).collect()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_have_no_changes() {
        let text = "Starter $10/mo\nPro $29/mo\nEnterprise: talk to us";
        let diff = compare(text, text);

        assert!(!diff.has_changes);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn whitespace_only_changes_are_ignored() {
        let diff = compare("Price: $10", "Price:   $10");
        assert!(!diff.has_changes);
    }

    #[test]
    fn genuine_price_change_is_detected() {
        let diff = compare("Plan Pro: $29/mo", "Plan Pro: $39/mo");

        assert!(diff.has_changes);
        assert_eq!(diff.removed, vec!["Plan Pro: $29/mo".to_string()]);
        assert_eq!(diff.added, vec!["Plan Pro: $39/mo".to_string()]);
    }

    #[test]
    fn unchanged_lines_do_not_appear_in_diff() {
        let old = "Starter $10/mo\nPro $29/mo";
        let new = "Starter $10/mo\nPro $39/mo";
        let diff = compare(old, new);

        assert_eq!(diff.removed, vec!["Pro $29/mo".to_string()]);
        assert_eq!(diff.added, vec!["Pro $39/mo".to_string()]);
    }

    #[test]
    fn consecutive_changed_lines_group_into_one_block() {
        let old = "Header line\nPro $29/mo\nSeats included: 5\nFooter line";
        let new = "Header line\nPro $39/mo\nSeats included: 10\nFooter line";
        let diff = compare(old, new);

        assert_eq!(diff.removed, vec!["Pro $29/mo\nSeats included: 5".to_string()]);
        assert_eq!(diff.added, vec!["Pro $39/mo\nSeats included: 10".to_string()]);
    }

    #[test]
    fn build_context_is_none_without_changes() {
        assert_eq!(build_context("same text", "same text", 3000), None);
    }

    #[test]
    fn build_context_lists_removed_then_added() {
        let ctx = build_context("Plan Pro: $29/mo", "Plan Pro: $39/mo", 3000).unwrap();

        let removed_at = ctx.find("REMOVED:").unwrap();
        let added_at = ctx.find("ADDED:").unwrap();
        assert!(removed_at < added_at);
        assert!(ctx.contains("Plan Pro: $29/mo"));
        assert!(ctx.contains("Plan Pro: $39/mo"));
    }

    #[test]
    fn build_context_respects_char_budget() {
        let old: String = (0..50).map(|i| format!("Old plan line number {i}\n")).collect();
        let new: String = (0..50).map(|i| format!("New plan line number {i}\n")).collect();

        let ctx = build_context(&old, &new, 200).unwrap();
        assert!(ctx.chars().count() <= 200);
    }

    #[test]
    fn snippet_is_bounded_and_prefixed() {
        // 8 scattered changes: alternating stable lines keep each change in
        // its own block, so the 5-block snippet caps apply.
        let old: String = (0..8)
            .map(|i| format!("stable row {i}\nOld offer number {i} priced at ${i}0/mo\n"))
            .collect();
        let new: String = (0..8)
            .map(|i| format!("stable row {i}\nNew offer number {i} priced at ${i}5/mo\n"))
            .collect();

        let diff = compare(&old, &new);
        assert_eq!(diff.removed.len(), 8);

        let snippet = render_snippet(&diff);
        let lines: Vec<&str> = snippet.lines().collect();

        assert_eq!(lines.len(), 10); // 5 removed + 5 added
        assert!(lines[..5].iter().all(|l| l.starts_with("- ")));
        assert!(lines[5..].iter().all(|l| l.starts_with("+ ")));
        assert!(lines.iter().all(|l| l.chars().count() <= MAX_SNIPPET_LINE_CHARS + 2));
    }
}
