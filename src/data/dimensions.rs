use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{PayrollRecord, SessionRecord};

// ---------------------------------------------------------------------------
// Dimension – a categorical attribute of a session
// ---------------------------------------------------------------------------

/// Categorical session attributes that can be sliced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Trainer,
    Class,
    Location,
    Day,
    Time,
    Type,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Trainer,
        Dimension::Class,
        Dimension::Location,
        Dimension::Day,
        Dimension::Time,
        Dimension::Type,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Trainer => "trainer",
            Dimension::Class => "class",
            Dimension::Location => "location",
            Dimension::Day => "day",
            Dimension::Time => "time",
            Dimension::Type => "type",
        }
    }

    /// The record's value for this dimension.
    pub fn value_of(self, record: &SessionRecord) -> &str {
        match self {
            Dimension::Trainer => &record.trainer,
            Dimension::Class => &record.class,
            Dimension::Location => &record.location,
            Dimension::Day => &record.day,
            Dimension::Time => &record.time,
            Dimension::Type => &record.session_type,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dimension `{0}` (expected trainer, class, location, day, time or type)")]
pub struct ParseDimensionError(pub String);

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|dim| dim.name() == wanted)
            .ok_or_else(|| ParseDimensionError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Distinct values
// ---------------------------------------------------------------------------

/// Distinct non-empty values of `accessor` across `records`, in order of
/// first occurrence.
pub fn distinct_values<T, F>(records: &[T], accessor: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| accessor(record))
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Distinct values of one session dimension.
pub fn dimension_values(sessions: &[SessionRecord], dimension: Dimension) -> Vec<String> {
    distinct_values(sessions, |record| dimension.value_of(record))
}

/// Option lists for every session filter control. Always built from the
/// canonical collection so narrowing one dimension never hides options in
/// another.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DimensionOptions {
    pub trainers: Vec<String>,
    pub classes: Vec<String>,
    pub locations: Vec<String>,
    pub days: Vec<String>,
    pub times: Vec<String>,
    pub types: Vec<String>,
}

impl DimensionOptions {
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        DimensionOptions {
            trainers: dimension_values(sessions, Dimension::Trainer),
            classes: dimension_values(sessions, Dimension::Class),
            locations: dimension_values(sessions, Dimension::Location),
            days: dimension_values(sessions, Dimension::Day),
            times: dimension_values(sessions, Dimension::Time),
            types: dimension_values(sessions, Dimension::Type),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Trainer => &self.trainers,
            Dimension::Class => &self.classes,
            Dimension::Location => &self.locations,
            Dimension::Day => &self.days,
            Dimension::Time => &self.times,
            Dimension::Type => &self.types,
        }
    }
}

/// Option lists for the payroll filter controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayrollOptions {
    pub locations: Vec<String>,
    pub trainers: Vec<String>,
}

impl PayrollOptions {
    pub fn from_records(records: &[PayrollRecord]) -> Self {
        PayrollOptions {
            locations: distinct_values(records, |r| r.location.as_str()),
            trainers: distinct_values(records, |r| r.teacher_name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trainer(name: &str) -> SessionRecord {
        SessionRecord {
            trainer: name.to_string(),
            ..SessionRecord::default()
        }
    }

    #[test]
    fn first_occurrence_order_not_sorted() {
        let sessions: Vec<_> = ["B", "A", "B", "C"].into_iter().map(trainer).collect();
        assert_eq!(
            dimension_values(&sessions, Dimension::Trainer),
            vec!["B", "A", "C"]
        );
    }

    #[test]
    fn empty_values_are_skipped() {
        let sessions: Vec<_> = ["", "A", "", "A"].into_iter().map(trainer).collect();
        assert_eq!(dimension_values(&sessions, Dimension::Trainer), vec!["A"]);
        assert!(dimension_values(&sessions, Dimension::Day).is_empty());
    }

    #[test]
    fn options_cover_every_dimension() {
        let sessions = vec![SessionRecord {
            trainer: "Anisha".into(),
            class: "Barre 57".into(),
            location: "Kenkere House".into(),
            day: "Monday".into(),
            time: "07:00".into(),
            session_type: "Barre".into(),
            ..SessionRecord::default()
        }];
        let options = DimensionOptions::from_sessions(&sessions);
        for dim in Dimension::ALL {
            assert_eq!(options.get(dim), [dim.value_of(&sessions[0]).to_string()]);
        }
    }

    #[test]
    fn payroll_options_use_teacher_names() {
        let records = vec![
            PayrollRecord {
                teacher_name: "Rohan".into(),
                location: "Supreme HQ, Bandra".into(),
                ..PayrollRecord::default()
            },
            PayrollRecord {
                teacher_name: "Anisha".into(),
                location: "Supreme HQ, Bandra".into(),
                ..PayrollRecord::default()
            },
        ];
        let options = PayrollOptions::from_records(&records);
        assert_eq!(options.trainers, vec!["Rohan", "Anisha"]);
        assert_eq!(options.locations, vec!["Supreme HQ, Bandra"]);
    }

    #[test]
    fn dimension_names_parse() {
        assert_eq!("Trainer".parse::<Dimension>(), Ok(Dimension::Trainer));
        assert_eq!(" type ".parse::<Dimension>(), Ok(Dimension::Type));
        assert!("room".parse::<Dimension>().is_err());
    }
}
