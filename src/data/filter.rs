use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coerce::{parse_calendar_date, parse_month_year};
use super::dimensions::Dimension;
use super::model::{PayrollRecord, SessionRecord};

// ---------------------------------------------------------------------------
// Criteria building blocks
// ---------------------------------------------------------------------------

/// Either no constraint, or exactly one named value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Only(String),
}

impl Scope {
    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(wanted) => wanted == value,
        }
    }
}

impl From<&str> for Scope {
    /// `"all"` (any case) or an empty string mean no constraint.
    fn from(s: &str) -> Self {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Scope::All
        } else {
            Scope::Only(s.to_string())
        }
    }
}

impl FromStr for Scope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Scope::from(s))
    }
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericBounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Inclusive calendar range; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Build from the raw text of two date pickers; blank or unreadable
    /// text leaves that side open.
    pub fn from_text(start: &str, end: &str) -> Self {
        Self {
            start: parse_calendar_date(start),
            end: parse_calendar_date(end),
        }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Numeric session fields with range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Capacity,
    FillRate,
    Revenue,
}

impl NumericField {
    /// Field value used for comparison. Normalized records already hold `0`
    /// for missing cells, so every numeric filter treats absence as zero.
    pub fn value_of(self, record: &SessionRecord) -> f64 {
        match self {
            NumericField::Capacity => record.capacity,
            NumericField::FillRate => record.fill_percentage,
            NumericField::Revenue => record.revenue,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria – analyst-chosen narrowing state for sessions
// ---------------------------------------------------------------------------

/// Everything the analyst has chosen to narrow the session view by.
///
/// The default value is the cleared state: filtering with it returns the
/// input unchanged.
///
/// As JSON it uses the dashboard's flat shape:
///
/// ```json
/// { "activeLocation": "Kenkere House",
///   "dateRange": { "start": "2024-03-01", "end": "" },
///   "trainers": ["Anisha Shah"], "classes": [], "locations": [],
///   "days": [], "times": [], "types": [],
///   "minCapacity": 15, "maxRevenue": 20000 }
/// ```
///
/// Every key is optional. Blank or unreadable date bounds stay open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CriteriaFields", into = "CriteriaFields")]
pub struct FilterCriteria {
    /// Studio tab; applied before the detailed filters.
    pub location_scope: Scope,
    pub date_range: DateRange,
    /// Multi-select per dimension. A missing or empty set means no constraint.
    pub selections: BTreeMap<Dimension, BTreeSet<String>>,
    pub capacity: NumericBounds,
    pub fill_rate: NumericBounds,
    pub revenue: NumericBounds,
}

impl FilterCriteria {
    /// Selected values for `dimension` (possibly empty).
    pub fn selection(&self, dimension: Dimension) -> impl Iterator<Item = &str> {
        self.selections
            .get(&dimension)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Replace the selection for `dimension`.
    pub fn select<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            self.selections.remove(&dimension);
        } else {
            self.selections.insert(dimension, set);
        }
    }

    /// Add `value` to the selection if absent, otherwise remove it.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        let selected = self.selections.entry(dimension).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        if selected.is_empty() {
            self.selections.remove(&dimension);
        }
    }

    /// Drop any selection for `dimension`.
    pub fn clear_selection(&mut self, dimension: Dimension) {
        self.selections.remove(&dimension);
    }

    pub fn bounds(&self, field: NumericField) -> NumericBounds {
        match field {
            NumericField::Capacity => self.capacity,
            NumericField::FillRate => self.fill_rate,
            NumericField::Revenue => self.revenue,
        }
    }

    /// Reset to the cleared state.
    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }

    /// Whether no predicate would be applied.
    pub fn is_cleared(&self) -> bool {
        self.predicates().is_empty()
    }

    /// The active predicates, in application order. Inactive criteria
    /// contribute nothing.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates = Vec::new();

        if let Scope::Only(location) = &self.location_scope {
            predicates.push(Predicate::Equals(Dimension::Location, location));
        }
        for (dimension, selected) in &self.selections {
            if !selected.is_empty() {
                predicates.push(Predicate::Member(*dimension, selected));
            }
        }
        for field in [NumericField::Capacity, NumericField::FillRate, NumericField::Revenue] {
            let bounds = self.bounds(field);
            if bounds.is_active() {
                predicates.push(Predicate::Range(field, bounds));
            }
        }
        if self.date_range.is_active() {
            predicates.push(Predicate::Dated(self.date_range));
        }

        predicates
    }
}

/// Wire form of [`FilterCriteria`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CriteriaFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    active_location: Option<String>,
    date_range: DateFields,
    trainers: Vec<String>,
    classes: Vec<String>,
    locations: Vec<String>,
    days: Vec<String>,
    times: Vec<String>,
    types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_fill_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_fill_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_revenue: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DateFields {
    start: Option<String>,
    end: Option<String>,
}

const LIST_DIMENSIONS: [Dimension; 6] = [
    Dimension::Trainer,
    Dimension::Class,
    Dimension::Location,
    Dimension::Day,
    Dimension::Time,
    Dimension::Type,
];

impl From<CriteriaFields> for FilterCriteria {
    fn from(fields: CriteriaFields) -> Self {
        let mut criteria = FilterCriteria {
            location_scope: fields
                .active_location
                .as_deref()
                .map(Scope::from)
                .unwrap_or_default(),
            date_range: DateRange::from_text(
                fields.date_range.start.as_deref().unwrap_or(""),
                fields.date_range.end.as_deref().unwrap_or(""),
            ),
            capacity: NumericBounds::new(fields.min_capacity, fields.max_capacity),
            fill_rate: NumericBounds::new(fields.min_fill_rate, fields.max_fill_rate),
            revenue: NumericBounds::new(fields.min_revenue, fields.max_revenue),
            ..FilterCriteria::default()
        };
        let lists = [
            fields.trainers,
            fields.classes,
            fields.locations,
            fields.days,
            fields.times,
            fields.types,
        ];
        for (dimension, values) in LIST_DIMENSIONS.into_iter().zip(lists) {
            criteria.select(dimension, values);
        }
        criteria
    }
}

impl From<FilterCriteria> for CriteriaFields {
    fn from(criteria: FilterCriteria) -> Self {
        let list = |dimension| -> Vec<String> {
            criteria.selection(dimension).map(str::to_string).collect()
        };
        let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        CriteriaFields {
            active_location: match &criteria.location_scope {
                Scope::All => None,
                Scope::Only(location) => Some(location.clone()),
            },
            date_range: DateFields {
                start: date(criteria.date_range.start),
                end: date(criteria.date_range.end),
            },
            trainers: list(Dimension::Trainer),
            classes: list(Dimension::Class),
            locations: list(Dimension::Location),
            days: list(Dimension::Day),
            times: list(Dimension::Time),
            types: list(Dimension::Type),
            min_capacity: criteria.capacity.min,
            max_capacity: criteria.capacity.max,
            min_fill_rate: criteria.fill_rate.min,
            max_fill_rate: criteria.fill_rate.max,
            min_revenue: criteria.revenue.min,
            max_revenue: criteria.revenue.max,
        }
    }
}

/// One independent, side-effect free test over a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<'a> {
    Equals(Dimension, &'a str),
    Member(Dimension, &'a BTreeSet<String>),
    Range(NumericField, NumericBounds),
    /// Records without a readable date never pass.
    Dated(DateRange),
}

impl Predicate<'_> {
    pub fn test(&self, record: &SessionRecord) -> bool {
        match self {
            Predicate::Equals(dim, wanted) => dim.value_of(record) == *wanted,
            Predicate::Member(dim, selected) => selected.contains(dim.value_of(record)),
            Predicate::Range(field, bounds) => bounds.contains(field.value_of(record)),
            Predicate::Dated(range) => {
                parse_calendar_date(&record.date).is_some_and(|date| range.contains(date))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session filter engine
// ---------------------------------------------------------------------------

/// Return indices of sessions that pass every active predicate, in input
/// order.
pub fn filtered_indices(sessions: &[SessionRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let predicates = criteria.predicates();
    sessions
        .iter()
        .enumerate()
        .filter(|(_, record)| predicates.iter().all(|p| p.test(record)))
        .map(|(i, _)| i)
        .collect()
}

/// Narrow `sessions` to the records passing `criteria`. The input is never
/// modified; the result keeps input order.
pub fn filter_sessions(sessions: &[SessionRecord], criteria: &FilterCriteria) -> Vec<SessionRecord> {
    let predicates = criteria.predicates();
    let filtered: Vec<SessionRecord> = sessions
        .iter()
        .filter(|record| predicates.iter().all(|p| p.test(record)))
        .cloned()
        .collect();
    log::debug!(
        "{} active predicates kept {} of {} sessions",
        predicates.len(),
        filtered.len(),
        sessions.len()
    );
    filtered
}

// ---------------------------------------------------------------------------
// Timeframe – relative window for payroll months
// ---------------------------------------------------------------------------

/// A window reaching back from now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "all")]
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timeframe `{0}` (expected 3m, 6m, 1y or all)")]
pub struct ParseTimeframeError(pub String);

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::ThreeMonths => "3m",
            Timeframe::SixMonths => "6m",
            Timeframe::OneYear => "1y",
            Timeframe::All => "all",
        }
    }

    fn months(self) -> Option<u32> {
        match self {
            Timeframe::ThreeMonths => Some(3),
            Timeframe::SixMonths => Some(6),
            Timeframe::OneYear => Some(12),
            Timeframe::All => None,
        }
    }

    /// Start of the window ending at `now`, or `None` for [`Timeframe::All`].
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (31 May minus 3 months is 28/29 February).
    pub fn anchor(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let months = self.months()?;
        Some(
            now.checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDateTime::MIN),
        )
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3m" => Ok(Timeframe::ThreeMonths),
            "6m" => Ok(Timeframe::SixMonths),
            "1y" => Ok(Timeframe::OneYear),
            "all" => Ok(Timeframe::All),
            _ => Err(ParseTimeframeError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Payroll filter
// ---------------------------------------------------------------------------

/// Narrowing state for the payroll comparison view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollFilter {
    pub location: Scope,
    /// Matched against the teacher's display name.
    pub trainer: Scope,
    pub timeframe: Timeframe,
}

impl PayrollFilter {
    /// Whether `record` passes, with the timeframe window ending at `now`.
    ///
    /// A month label counts as its first day at midnight; records with a
    /// missing or unreadable label fail any window other than `all`.
    pub fn matches(&self, record: &PayrollRecord, now: NaiveDateTime) -> bool {
        if !self.location.admits(&record.location) || !self.trainer.admits(&record.teacher_name) {
            return false;
        }
        let Some(anchor) = self.timeframe.anchor(now) else {
            return true;
        };
        parse_month_year(&record.month_year)
            .and_then(|month| month.and_hms_opt(0, 0, 0))
            .is_some_and(|month_start| month_start >= anchor && month_start <= now)
    }
}

/// Narrow payroll rows by location, trainer and timeframe, keeping order.
pub fn filter_payroll(
    records: &[PayrollRecord],
    filter: &PayrollFilter,
    now: NaiveDateTime,
) -> Vec<PayrollRecord> {
    let filtered: Vec<PayrollRecord> = records
        .iter()
        .filter(|record| filter.matches(record, now))
        .cloned()
        .collect();
    log::debug!(
        "payroll filter ({}) kept {} of {} rows",
        filter.timeframe,
        filtered.len(),
        records.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn session(id: &str, capacity: f64, date: &str) -> SessionRecord {
        SessionRecord {
            unique_id1: id.to_string(),
            unique_id2: "1".to_string(),
            trainer: "Anisha".to_string(),
            location: "Kenkere House".to_string(),
            capacity,
            date: date.to_string(),
            ..SessionRecord::default()
        }
    }

    fn month(label: &str) -> PayrollRecord {
        PayrollRecord {
            teacher_name: "Rohan".to_string(),
            location: "Supreme HQ, Bandra".to_string(),
            month_year: label.to_string(),
            ..PayrollRecord::default()
        }
    }

    #[test]
    fn cleared_criteria_has_no_predicates() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_cleared());

        let mut emptied = FilterCriteria::default();
        emptied.selections.insert(Dimension::Day, BTreeSet::new());
        assert!(emptied.is_cleared());
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let bounds = NumericBounds::new(Some(10.0), Some(20.0));
        assert!(bounds.contains(10.0));
        assert!(bounds.contains(20.0));
        assert!(!bounds.contains(9.0));
        assert!(!bounds.contains(20.5));
        assert!(NumericBounds::default().contains(f64::MAX));
    }

    #[test]
    fn capacity_range_filters_sessions() {
        let sessions = vec![session("a", 9.0, ""), session("b", 10.0, ""), session("c", 25.0, "")];
        let criteria = FilterCriteria {
            capacity: NumericBounds::new(Some(10.0), Some(25.0)),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&sessions, &criteria), vec![1, 2]);
    }

    #[test]
    fn date_range_edges_and_bad_dates() {
        let sessions = vec![
            session("a", 0.0, "2024-03-01"),
            session("b", 0.0, "2024-02-29"),
            session("c", 0.0, "2024-03-31"),
            session("d", 0.0, "2024-04-01"),
            session("e", 0.0, "garbage"),
            session("f", 0.0, ""),
        ];
        let criteria = FilterCriteria {
            date_range: DateRange::new(Some(date(2024, 3, 1)), Some(date(2024, 3, 31))),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&sessions, &criteria), vec![0, 2]);

        let open_end = FilterCriteria {
            date_range: DateRange::new(Some(date(2024, 3, 31)), None),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&sessions, &open_end), vec![2, 3]);

        // without a date constraint malformed dates are irrelevant
        assert_eq!(
            filtered_indices(&sessions, &FilterCriteria::default()),
            vec![0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn date_range_from_picker_text() {
        let range = DateRange::from_text("", "2024-03-31");
        assert_eq!(range, DateRange::new(None, Some(date(2024, 3, 31))));
        assert!(!DateRange::from_text("", "").is_active());
    }

    #[test]
    fn selections_toggle_and_clear() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle(Dimension::Trainer, "Anisha");
        criteria.toggle(Dimension::Trainer, "Rohan");
        assert_eq!(
            criteria.selection(Dimension::Trainer).collect::<Vec<_>>(),
            vec!["Anisha", "Rohan"]
        );
        criteria.toggle(Dimension::Trainer, "Anisha");
        criteria.toggle(Dimension::Trainer, "Rohan");
        assert!(criteria.selections.is_empty());

        criteria.select(Dimension::Day, ["Monday"]);
        assert!(!criteria.is_cleared());
        criteria.clear_selection(Dimension::Day);
        assert!(criteria.is_cleared());
    }

    #[test]
    fn location_scope_and_selection_conjoin() {
        let mut other = session("b", 0.0, "");
        other.location = "Supreme HQ, Bandra".to_string();
        let sessions = vec![session("a", 0.0, ""), other];

        let mut criteria = FilterCriteria {
            location_scope: Scope::Only("Kenkere House".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&sessions, &criteria), vec![0]);

        criteria.select(Dimension::Location, ["Supreme HQ, Bandra"]);
        assert!(filtered_indices(&sessions, &criteria).is_empty());
    }

    #[test]
    fn scope_parses_all() {
        assert_eq!("all".parse::<Scope>(), Ok(Scope::All));
        assert_eq!("ALL".parse::<Scope>(), Ok(Scope::All));
        assert_eq!("".parse::<Scope>(), Ok(Scope::All));
        assert_eq!(
            "Kenkere House".parse::<Scope>(),
            Ok(Scope::Only("Kenkere House".to_string()))
        );
    }

    #[test]
    fn timeframe_round_trips_its_symbols() {
        for symbol in ["3m", "6m", "1y", "all"] {
            let tf: Timeframe = symbol.parse().unwrap();
            assert_eq!(tf.to_string(), symbol);
        }
        assert!("2w".parse::<Timeframe>().is_err());
    }

    #[test]
    fn three_month_window() {
        let now = at(2024, 6, 15, 12);
        assert_eq!(Timeframe::ThreeMonths.anchor(now), Some(at(2024, 3, 15, 12)));
        assert_eq!(Timeframe::All.anchor(now), None);

        let filter = PayrollFilter {
            timeframe: Timeframe::ThreeMonths,
            ..PayrollFilter::default()
        };
        let records = vec![
            month("March 2024"),
            month("April 2024"),
            month("June 2024"),
            month("July 2024"),
            month("Jun 2024"),
            month(""),
        ];
        let kept = filter_payroll(&records, &filter, now);
        let labels: Vec<_> = kept.iter().map(|r| r.month_year.as_str()).collect();
        assert_eq!(labels, vec!["April 2024", "June 2024"]);
    }

    #[test]
    fn window_anchor_on_first_of_month_at_midnight() {
        let now = at(2024, 6, 1, 0);
        let filter = PayrollFilter {
            timeframe: Timeframe::ThreeMonths,
            ..PayrollFilter::default()
        };
        assert!(filter.matches(&month("March 2024"), now));
        assert!(filter.matches(&month("June 2024"), now));
        assert!(!filter.matches(&month("February 2024"), now));
    }

    #[test]
    fn one_year_window_and_all() {
        let now = at(2024, 6, 15, 9);
        let year = PayrollFilter {
            timeframe: Timeframe::OneYear,
            ..PayrollFilter::default()
        };
        assert!(!year.matches(&month("June 2023"), now));
        assert!(year.matches(&month("July 2023"), now));

        let all = PayrollFilter::default();
        assert!(all.matches(&month("not a month"), now));
    }

    #[test]
    fn six_month_window() {
        let now = at(2024, 8, 20, 18);
        assert_eq!(Timeframe::SixMonths.anchor(now), Some(at(2024, 2, 20, 18)));
        let filter = PayrollFilter {
            timeframe: Timeframe::SixMonths,
            ..PayrollFilter::default()
        };
        assert!(!filter.matches(&month("February 2024"), now));
        assert!(filter.matches(&month("March 2024"), now));
        assert!(filter.matches(&month("August 2024"), now));
        assert!(!filter.matches(&month("September 2024"), now));

        // 31 August minus six months clamps to 29 February
        let leap = at(2024, 8, 31, 0);
        assert_eq!(Timeframe::SixMonths.anchor(leap), Some(at(2024, 2, 29, 0)));
        assert!(!filter.matches(&month("February 2024"), leap));
    }

    #[test]
    fn criteria_from_dashboard_json() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{
                "dateRange": { "start": "", "end": "" },
                "trainers": ["Anisha"],
                "classes": [],
                "locations": [],
                "days": [],
                "times": [],
                "types": [],
                "minCapacity": 15
            }"#,
        )
        .unwrap();
        assert!(!criteria.is_cleared());
        assert!(!criteria.date_range.is_active());
        assert_eq!(criteria.capacity, NumericBounds::new(Some(15.0), None));
        assert_eq!(criteria.selection(Dimension::Trainer).collect::<Vec<_>>(), vec!["Anisha"]);
        assert_eq!(criteria.predicates().len(), 2);

        let mut other = session("b", 1.0, "2024-03-01");
        other.trainer = "Rohan".to_string();
        let records = vec![session("a", 20.0, "2024-03-01"), session("c", 1.0, ""), other];
        let kept: Vec<_> = filter_sessions(&records, &criteria)
            .into_iter()
            .map(|r| r.unique_id1)
            .collect();
        assert_eq!(kept, vec!["a"]);
    }

    #[test]
    fn criteria_json_dates_and_scope() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{ "activeLocation": "Kenkere House",
                 "dateRange": { "start": "2024-03-01", "end": null },
                 "maxRevenue": 5000 }"#,
        )
        .unwrap();
        assert_eq!(criteria.location_scope, Scope::Only("Kenkere House".to_string()));
        assert_eq!(criteria.date_range, DateRange::new(Some(date(2024, 3, 1)), None));
        assert_eq!(criteria.revenue.max, Some(5000.0));

        let all: FilterCriteria = serde_json::from_str(r#"{ "activeLocation": "all" }"#).unwrap();
        assert!(all.is_cleared());
        let empty: FilterCriteria = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, FilterCriteria::default());
    }

    #[test]
    fn criteria_json_writes_flat_shape() {
        let mut criteria = FilterCriteria {
            date_range: DateRange::new(None, Some(date(2024, 4, 30))),
            fill_rate: NumericBounds::new(Some(50.0), None),
            ..FilterCriteria::default()
        };
        criteria.select(Dimension::Day, ["Monday"]);

        let value = serde_json::to_value(&criteria).unwrap();
        assert_eq!(value["days"], serde_json::json!(["Monday"]));
        assert_eq!(value["trainers"], serde_json::json!([]));
        assert_eq!(value["minFillRate"], serde_json::json!(50.0));
        assert_eq!(value["dateRange"]["end"], serde_json::json!("2024-04-30"));
        assert!(value.get("maxFillRate").is_none());

        let back: FilterCriteria = serde_json::from_value(value).unwrap();
        assert_eq!(back, criteria);
    }

    #[test]
    fn payroll_location_and_trainer() {
        let now = at(2024, 6, 15, 9);
        let filter = PayrollFilter {
            location: Scope::Only("Supreme HQ, Bandra".to_string()),
            trainer: Scope::Only("Anisha".to_string()),
            timeframe: Timeframe::All,
        };
        assert!(!filter.matches(&month("June 2024"), now));

        let mut anisha = month("June 2024");
        anisha.teacher_name = "Anisha".to_string();
        assert!(filter.matches(&anisha, now));
    }
}
