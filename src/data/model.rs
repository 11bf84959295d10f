use std::fmt;

use serde::{Deserialize, Serialize};

use super::dimensions::DimensionOptions;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a raw sheet row
// ---------------------------------------------------------------------------

/// A loosely typed spreadsheet cell. Sheet exports hand us either text or
/// numbers; anything missing (short rows, nulls, blank CSV fields) is `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

/// One raw row as delivered by the upstream source, header rows included.
pub type RawRow = Vec<CellValue>;

impl CellValue {
    /// Render the cell as text for string-valued record fields.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Sheets send whole numbers as `12`, not `12.0`.
            CellValue::Number(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.0}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

// ---------------------------------------------------------------------------
// SessionRecord – one recurring class occurrence
// ---------------------------------------------------------------------------

/// A single class session. Identity is the `(unique_id1, unique_id2)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub unique_id1: String,
    pub unique_id2: String,
    pub trainer: String,
    pub class: String,
    pub location: String,
    pub day: String,
    pub time: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub capacity: f64,
    pub fill_percentage: f64,
    pub revenue: f64,
    /// Calendar date as it appeared in the sheet; may be blank or malformed.
    pub date: String,
}

impl SessionRecord {
    /// Composite identity used for de-duplication across sources.
    pub fn identity(&self) -> (&str, &str) {
        (&self.unique_id1, &self.unique_id2)
    }
}

// ---------------------------------------------------------------------------
// PayrollRecord – one trainer-month aggregate
// ---------------------------------------------------------------------------

/// The three class families tracked by payroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassFamily {
    Cycle,
    Strength,
    Barre,
}

impl ClassFamily {
    pub const ALL: [ClassFamily; 3] = [ClassFamily::Cycle, ClassFamily::Strength, ClassFamily::Barre];

    pub fn label(self) -> &'static str {
        match self {
            ClassFamily::Cycle => "PowerCycle",
            ClassFamily::Strength => "Strength",
            ClassFamily::Barre => "Barre",
        }
    }
}

/// Session and pay counters for one class family (or the precomputed total).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyStats {
    pub sessions: f64,
    pub empty_sessions: f64,
    pub non_empty_sessions: f64,
    pub customers: f64,
    pub paid: f64,
}

impl FamilyStats {
    /// Add another set of counters into this one.
    pub fn accumulate(&mut self, other: &FamilyStats) {
        self.sessions += other.sessions;
        self.empty_sessions += other.empty_sessions;
        self.non_empty_sessions += other.non_empty_sessions;
        self.customers += other.customers;
        self.paid += other.paid;
    }

    /// Customers per non-empty session, `0` when nothing ran.
    pub fn average_customers(&self) -> f64 {
        if self.non_empty_sessions > 0.0 {
            self.customers / self.non_empty_sessions
        } else {
            0.0
        }
    }
}

/// One payroll row: a trainer's activity for a single month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub teacher_id: String,
    pub teacher_name: String,
    pub teacher_email: String,
    pub location: String,
    pub cycle: FamilyStats,
    pub strength: FamilyStats,
    pub barre: FamilyStats,
    pub total: FamilyStats,
    /// `"<MonthName> <Year>"`, e.g. `"March 2024"`.
    pub month_year: String,
    pub unique: String,
    pub converted: f64,
    pub conversion: String,
    pub retained: f64,
    pub retention: String,
    #[serde(rename = "new")]
    pub new_customers: f64,
}

impl PayrollRecord {
    pub fn family(&self, family: ClassFamily) -> &FamilyStats {
        match family {
            ClassFamily::Cycle => &self.cycle,
            ClassFamily::Strength => &self.strength,
            ClassFamily::Barre => &self.barre,
        }
    }

    /// Identity of a payroll row: trainer plus month.
    pub fn identity(&self) -> (&str, &str) {
        (&self.teacher_id, &self.month_year)
    }
}

// ---------------------------------------------------------------------------
// SessionDataset – the canonical merged collection
// ---------------------------------------------------------------------------

/// The canonical, de-duplicated session collection with its filter options.
#[derive(Debug, Clone, Default)]
pub struct SessionDataset {
    /// Canonical sessions in merge order.
    pub sessions: Vec<SessionRecord>,
    /// Distinct values per dimension, derived from `sessions`.
    pub options: DimensionOptions,
}

impl SessionDataset {
    /// Build the option lists from already merged sessions.
    pub fn from_sessions(sessions: Vec<SessionRecord>) -> Self {
        let options = DimensionOptions::from_sessions(&sessions);
        SessionDataset { sessions, options }
    }

    /// Number of canonical sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(12.0).to_text(), "12");
        assert_eq!(CellValue::Number(12.5).to_text(), "12.5");
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::from("Barre 57").to_text(), "Barre 57");
    }

    #[test]
    fn average_customers_handles_idle_family() {
        let idle = FamilyStats::default();
        assert_eq!(idle.average_customers(), 0.0);

        let busy = FamilyStats {
            sessions: 10.0,
            empty_sessions: 2.0,
            non_empty_sessions: 8.0,
            customers: 64.0,
            paid: 12000.0,
        };
        assert_eq!(busy.average_customers(), 8.0);
    }

    #[test]
    fn accumulate_sums_every_counter() {
        let mut total = FamilyStats::default();
        let row = FamilyStats {
            sessions: 4.0,
            empty_sessions: 1.0,
            non_empty_sessions: 3.0,
            customers: 20.0,
            paid: 3500.0,
        };
        total.accumulate(&row);
        total.accumulate(&row);
        assert_eq!(total.sessions, 8.0);
        assert_eq!(total.customers, 40.0);
        assert_eq!(total.paid, 7000.0);
    }
}
