use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;

use crate::data::dimensions::{Dimension, DimensionOptions, PayrollOptions};
use crate::data::metrics::{
    rank_by_revenue, summarize_payroll, summarize_sessions, GroupPerformance, PayrollSummary,
    SessionSummary,
};
use crate::data::model::{ClassFamily, PayrollRecord, SessionRecord};

/// Output flavour for the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    summary: SessionSummary,
    top_trainers: Vec<GroupPerformance>,
    top_classes: Vec<GroupPerformance>,
    sessions: &'a [SessionRecord],
}

#[derive(Serialize)]
struct PayrollReport<'a> {
    summary: PayrollSummary,
    options: &'a PayrollOptions,
    records: &'a [PayrollRecord],
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Render the filtered session view with its metric cards.
pub fn render_sessions(
    sessions: &[SessionRecord],
    canonical_len: usize,
    limit: usize,
    format: OutputFormat,
) -> Result<String> {
    let summary = summarize_sessions(sessions);
    let top_trainers = rank_by_revenue(sessions, Dimension::Trainer);
    let top_classes = rank_by_revenue(sessions, Dimension::Class);

    if format == OutputFormat::Json {
        let report = SessionReport {
            summary,
            top_trainers,
            top_classes,
            sessions,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut output = String::new();
    let _ = writeln!(output, "# Class Attendance");
    let _ = writeln!(
        output,
        "{} of {} sessions match the current filters",
        summary.sessions, canonical_len
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Metrics");
    let _ = writeln!(output, "- Total capacity: {:.0}", summary.total_capacity);
    let _ = writeln!(output, "- Average fill: {:.1}%", summary.average_fill_percentage);
    let _ = writeln!(output, "- Revenue: {:.2}", summary.total_revenue);
    let _ = writeln!(output, "- Trainers: {}", summary.trainers);
    let _ = writeln!(output, "- Classes: {}", summary.classes);

    write_ranking(&mut output, "Top Performing Trainers", &top_trainers, limit);
    write_ranking(&mut output, "Top Performing Classes", &top_classes, limit);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sessions");
    if sessions.is_empty() {
        let _ = writeln!(output, "No sessions match these filters.");
    }
    for s in sessions.iter().take(limit) {
        let _ = writeln!(
            output,
            "- {} | {} {} | {} | {} with {} | cap {:.0}, fill {:.1}%, revenue {:.2}",
            s.date, s.day, s.time, s.location, s.class, s.trainer, s.capacity, s.fill_percentage, s.revenue
        );
    }
    if sessions.len() > limit {
        let _ = writeln!(output, "... {} more", sessions.len() - limit);
    }
    Ok(output)
}

fn write_ranking(output: &mut String, title: &str, ranked: &[GroupPerformance], limit: usize) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {title}");
    if ranked.is_empty() {
        let _ = writeln!(output, "Nothing to rank.");
        return;
    }
    for group in ranked.iter().take(limit) {
        let _ = writeln!(
            output,
            "- {}: revenue {:.2} across {} sessions (avg fill {:.1}%)",
            group.value, group.revenue, group.sessions, group.average_fill_percentage
        );
    }
}

// ---------------------------------------------------------------------------
// Filter options
// ---------------------------------------------------------------------------

pub fn render_options(options: &DimensionOptions, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(options)?);
    }

    let mut output = String::new();
    for dimension in Dimension::ALL {
        let values = options.get(dimension);
        let _ = writeln!(output, "{dimension} ({}):", values.len());
        for value in values {
            let _ = writeln!(output, "  {value}");
        }
    }
    Ok(output)
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

/// Render the PowerCycle / Barre / Strength comparison.
pub fn render_payroll(
    records: &[PayrollRecord],
    options: &PayrollOptions,
    format: OutputFormat,
) -> Result<String> {
    let summary = summarize_payroll(records);

    if format == OutputFormat::Json {
        let report = PayrollReport {
            summary,
            options,
            records,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut output = String::new();
    let _ = writeln!(output, "# PowerCycle vs Barre vs Strength");
    let _ = writeln!(
        output,
        "{} payroll rows across {} trainers",
        summary.rows, summary.trainers
    );
    let _ = writeln!(output);
    for family in ClassFamily::ALL {
        let stats = summary.family(family);
        let _ = writeln!(
            output,
            "- {}: {:.0} sessions ({:.0} empty), {:.0} customers, {:.1} per class, paid {:.2}",
            family.label(),
            stats.sessions,
            stats.empty_sessions,
            stats.customers,
            stats.average_customers(),
            stats.paid
        );
    }
    let _ = writeln!(
        output,
        "- Total: {:.0} sessions, {:.0} customers, paid {:.2}",
        summary.total.sessions, summary.total.customers, summary.total.paid
    );
    let _ = writeln!(
        output,
        "- Converted {:.0}, retained {:.0}, new {:.0}",
        summary.converted, summary.retained, summary.new_customers
    );
    Ok(output)
}
