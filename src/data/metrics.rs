use std::collections::HashMap;

use serde::Serialize;

use super::dimensions::{distinct_values, Dimension};
use super::model::{ClassFamily, FamilyStats, PayrollRecord, SessionRecord};

// ---------------------------------------------------------------------------
// Session metric cards
// ---------------------------------------------------------------------------

/// Headline numbers for a (usually filtered) set of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub sessions: usize,
    pub total_capacity: f64,
    pub average_fill_percentage: f64,
    pub total_revenue: f64,
    pub trainers: usize,
    pub classes: usize,
}

pub fn summarize_sessions(sessions: &[SessionRecord]) -> SessionSummary {
    if sessions.is_empty() {
        return SessionSummary::default();
    }
    let total_fill: f64 = sessions.iter().map(|s| s.fill_percentage).sum();
    SessionSummary {
        sessions: sessions.len(),
        total_capacity: sessions.iter().map(|s| s.capacity).sum(),
        average_fill_percentage: total_fill / sessions.len() as f64,
        total_revenue: sessions.iter().map(|s| s.revenue).sum(),
        trainers: distinct_values(sessions, |s| s.trainer.as_str()).len(),
        classes: distinct_values(sessions, |s| s.class.as_str()).len(),
    }
}

/// Revenue and attendance for one value of a dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPerformance {
    pub value: String,
    pub sessions: usize,
    pub revenue: f64,
    pub average_fill_percentage: f64,
}

/// Rank the values of `dimension` by total revenue, best first. Blank
/// values are not ranked. Ties keep first-occurrence order.
pub fn rank_by_revenue(sessions: &[SessionRecord], dimension: Dimension) -> Vec<GroupPerformance> {
    let mut totals: HashMap<&str, (usize, f64, f64)> = HashMap::new();
    for session in sessions {
        let value = dimension.value_of(session);
        if value.is_empty() {
            continue;
        }
        let entry = totals.entry(value).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += session.revenue;
        entry.2 += session.fill_percentage;
    }

    let mut ranked: Vec<GroupPerformance> = distinct_values(sessions, |s| dimension.value_of(s))
        .into_iter()
        .filter_map(|value| {
            let (count, revenue, fill) = totals.get(value.as_str()).copied()?;
            Some(GroupPerformance {
                sessions: count,
                revenue,
                average_fill_percentage: fill / count as f64,
                value,
            })
        })
        .collect();

    // stable sort keeps first-occurrence order for ties
    ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranked
}

// ---------------------------------------------------------------------------
// Payroll comparison cards
// ---------------------------------------------------------------------------

/// Per-family totals across a set of payroll rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayrollSummary {
    pub rows: usize,
    pub trainers: usize,
    pub cycle: FamilyStats,
    pub strength: FamilyStats,
    pub barre: FamilyStats,
    pub total: FamilyStats,
    pub converted: f64,
    pub retained: f64,
    pub new_customers: f64,
}

impl PayrollSummary {
    pub fn family(&self, family: ClassFamily) -> &FamilyStats {
        match family {
            ClassFamily::Cycle => &self.cycle,
            ClassFamily::Strength => &self.strength,
            ClassFamily::Barre => &self.barre,
        }
    }
}

pub fn summarize_payroll(records: &[PayrollRecord]) -> PayrollSummary {
    let mut summary = PayrollSummary {
        rows: records.len(),
        trainers: distinct_values(records, |r| r.teacher_id.as_str()).len(),
        ..PayrollSummary::default()
    };
    for record in records {
        summary.cycle.accumulate(&record.cycle);
        summary.strength.accumulate(&record.strength);
        summary.barre.accumulate(&record.barre);
        summary.total.accumulate(&record.total);
        summary.converted += record.converted;
        summary.retained += record.retained;
        summary.new_customers += record.new_customers;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(trainer: &str, revenue: f64, fill: f64) -> SessionRecord {
        SessionRecord {
            trainer: trainer.to_string(),
            class: "Barre 57".to_string(),
            capacity: 20.0,
            revenue,
            fill_percentage: fill,
            ..SessionRecord::default()
        }
    }

    #[test]
    fn empty_summary_is_zeroed() {
        assert_eq!(summarize_sessions(&[]), SessionSummary::default());
        assert_eq!(summarize_payroll(&[]).rows, 0);
    }

    #[test]
    fn session_summary_totals() {
        let sessions = vec![session("A", 100.0, 50.0), session("B", 300.0, 100.0)];
        let summary = summarize_sessions(&sessions);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.total_capacity, 40.0);
        assert_eq!(summary.average_fill_percentage, 75.0);
        assert_eq!(summary.total_revenue, 400.0);
        assert_eq!(summary.trainers, 2);
        assert_eq!(summary.classes, 1);
    }

    #[test]
    fn trainers_ranked_by_revenue() {
        let sessions = vec![
            session("A", 100.0, 40.0),
            session("B", 500.0, 90.0),
            session("A", 100.0, 60.0),
            session("C", 200.0, 70.0),
            session("", 900.0, 70.0),
        ];
        let ranked = rank_by_revenue(&sessions, Dimension::Trainer);
        let order: Vec<_> = ranked.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert_eq!(ranked[1].sessions, 2);
        assert_eq!(ranked[1].average_fill_percentage, 50.0);
    }

    #[test]
    fn payroll_summary_adds_families() {
        let row = |id: &str| PayrollRecord {
            teacher_id: id.to_string(),
            cycle: FamilyStats {
                sessions: 4.0,
                customers: 30.0,
                ..FamilyStats::default()
            },
            barre: FamilyStats {
                paid: 1500.0,
                ..FamilyStats::default()
            },
            converted: 2.0,
            ..PayrollRecord::default()
        };
        let summary = summarize_payroll(&[row("T1"), row("T2"), row("T1")]);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.trainers, 2);
        assert_eq!(summary.family(ClassFamily::Cycle).sessions, 12.0);
        assert_eq!(summary.family(ClassFamily::Barre).paid, 4500.0);
        assert_eq!(summary.converted, 6.0);
    }
}
