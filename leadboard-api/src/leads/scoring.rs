use shared_types::{Lead, LeadPriority};

/// Heuristic lead score. A backend-assigned score is returned unchanged;
/// zero counts as unset. The computed value is never written back.
pub fn calculate_score(lead: &Lead) -> i64 {
    if let Some(score) = lead.score {
        if score != 0 {
            return score;
        }
    }

    let mut score = match lead.source.as_deref() {
        Some("Referral") => 10,
        Some("Website") => 6,
        Some("Ads") => 4,
        _ => 2,
    };

    // Completeness
    if lead.email.as_deref().is_some_and(|e| !e.is_empty()) {
        score += 2;
    }
    if lead.notes.as_deref().is_some_and(|n| !n.is_empty()) {
        score += 2;
    }

    score += match lead.priority {
        LeadPriority::High => 8,
        LeadPriority::Medium => 4,
        LeadPriority::Low => 1,
    };

    // High-demand services
    if matches!(
        lead.service_required.as_deref(),
        Some("Nanny") | Some("Elder care")
    ) {
        score += 3;
    }

    score
}

/// Display class for a score. Inclusive lower bounds, no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Hot,
    Warm,
    Cold,
}

impl ScoreBand {
    pub fn for_score(score: i64) -> Self {
        if score >= 20 {
            ScoreBand::Hot
        } else if score >= 10 {
            ScoreBand::Warm
        } else {
            ScoreBand::Cold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Hot => "hot",
            ScoreBand::Warm => "warm",
            ScoreBand::Cold => "cold",
        }
    }
}
