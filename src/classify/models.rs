// src/classify/models.rs

/// The four change categories the classifier is allowed to report.
/// Anything else in a verdict is treated as no-change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    PriceChange,
    TierChange,
    FeatureChange,
    CopyChange,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::PriceChange => "price_change",
            ChangeKind::TierChange => "tier_change",
            ChangeKind::FeatureChange => "feature_change",
            ChangeKind::CopyChange => "copy_change",
        }
    }

    pub fn parse(s: &str) -> Option<ChangeKind> {
        match s {
            "price_change" => Some(ChangeKind::PriceChange),
            "tier_change" => Some(ChangeKind::TierChange),
            "feature_change" => Some(ChangeKind::FeatureChange),
            "copy_change" => Some(ChangeKind::CopyChange),
            _ => None,
        }
    }

    /// Human form for email subjects and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::PriceChange => "Price change",
            ChangeKind::TierChange => "Tier change",
            ChangeKind::FeatureChange => "Feature change",
            ChangeKind::CopyChange => "Copy change",
        }
    }
}

/// Classifier verdict for a meaningful change. Transient: persisted only as
/// an alert row once the confidence and dedup gates pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeResult {
    pub kind: ChangeKind,
    pub summary: String,
    pub old_value: String,
    pub new_value: String,
    pub plan: String,
    pub confidence_score: f64,
}
