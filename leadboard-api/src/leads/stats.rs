use chrono::{DateTime, Duration, Utc};
use shared_types::{Lead, LeadStats, LeadStatus};

/// KPI strip over the filtered lead set. `total_count` is the authoritative
/// size of that set and is reported as-is.
pub fn compute_stats(leads: &[Lead], total_count: i64, now: DateTime<Utc>) -> LeadStats {
    if leads.is_empty() {
        return LeadStats::default();
    }

    let seven_days_ago = now - Duration::days(7);

    let new_leads = leads
        .iter()
        .filter(|l| l.created_at >= seven_days_ago)
        .count() as i64;

    let unassigned = leads
        .iter()
        .filter(|l| l.assigned_to.as_deref().map_or(true, |a| a.is_empty()))
        .count() as i64;

    let overdue = leads
        .iter()
        .filter(|l| l.next_followup_at.map_or(false, |t| t < now))
        .count() as i64;

    let converted = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Converted)
        .count();

    let conversion_rate = if total_count > 0 {
        ((converted as f64 / total_count as f64) * 100.0).round() as i64
    } else {
        0
    };

    LeadStats {
        total_leads: total_count,
        new_leads,
        unassigned,
        overdue,
        conversion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_types::{LeadPriority, SourceTable};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    fn lead(id: &str, days_ago: i64) -> Lead {
        Lead {
            id: id.to_string(),
            source_table: SourceTable::Leads,
            created_at: now() - Duration::days(days_ago),
            updated_at: None,
            name: id.to_string(),
            phone: None,
            email: None,
            city: None,
            source: None,
            campaign: None,
            service_required: None,
            status: LeadStatus::New,
            assigned_to: None,
            notes: None,
            message: None,
            specific_requirements: None,
            last_contacted_at: None,
            next_followup_at: None,
            priority: LeadPriority::Medium,
            score: None,
        }
    }

    #[test]
    fn empty_input_is_all_zeros() {
        let stats = compute_stats(&[], 100, now());
        assert_eq!(stats, LeadStats::default());
    }

    #[test]
    fn conversion_rate_rounds_against_total() {
        let mut leads: Vec<Lead> = (0..6).map(|i| lead(&i.to_string(), 0)).collect();
        leads[0].status = LeadStatus::Converted;
        // round(100 * 1 / 6) = 17
        let stats = compute_stats(&leads, 6, now());
        assert_eq!(stats.conversion_rate, 17);
        assert_eq!(stats.total_leads, 6);
    }

    #[test]
    fn counters_cover_recency_assignment_and_followups() {
        let mut fresh = lead("a", 3);
        fresh.assigned_to = Some("Priya".to_string());
        let old = lead("b", 10);
        let mut overdue = lead("c", 8);
        overdue.next_followup_at = Some(now() - Duration::hours(1));

        let stats = compute_stats(&[fresh, old, overdue], 3, now());
        assert_eq!(stats.new_leads, 1);
        assert_eq!(stats.unassigned, 2);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn total_is_the_passed_in_count_not_page_length() {
        let leads = vec![lead("a", 0)];
        let stats = compute_stats(&leads, 57, now());
        assert_eq!(stats.total_leads, 57);
    }
}
