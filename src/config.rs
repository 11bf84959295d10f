use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::merge::{SessionSource, DEFAULT_MERGE_ORDER};
use crate::data::normalize::SessionColumns;

/// Dashboard settings that describe the upstream sheets.
///
/// Example:
///
/// ```json
/// {
///   "recurringColumns": { "trainer": 8, "capacity": 9 },
///   "teacherColumns": { "uniqueId1": 1, "uniqueId2": 0 },
///   "mergeOrder": ["teacher", "recurring"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Layout of the recurring-sessions sheet.
    pub recurring_columns: SessionColumns,
    /// Layout of the teacher-sessions sheet.
    pub teacher_columns: SessionColumns,
    /// Session sources in precedence order. On conflicting identities the
    /// record from the earlier source is kept.
    pub merge_order: Vec<SessionSource>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recurring_columns: SessionColumns::default(),
            teacher_columns: SessionColumns::default(),
            merge_order: DEFAULT_MERGE_ORDER.to_vec(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Keys left out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The merge order must name each source exactly once.
    pub fn validate(&self) -> Result<()> {
        for source in DEFAULT_MERGE_ORDER {
            let count = self.merge_order.iter().filter(|s| **s == source).count();
            ensure!(
                count == 1,
                "mergeOrder must list `{}` exactly once (found {count})",
                source_name(source)
            );
        }
        Ok(())
    }

    pub fn columns_for(&self, source: SessionSource) -> &SessionColumns {
        match source {
            SessionSource::Recurring => &self.recurring_columns,
            SessionSource::Teacher => &self.teacher_columns,
        }
    }
}

fn source_name(source: SessionSource) -> &'static str {
    match source {
        SessionSource::Recurring => "recurring",
        SessionSource::Teacher => "teacher",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{ "teacherColumns": { "uniqueId1": 1, "uniqueId2": 0 } }"#,
        )
        .unwrap();
        assert_eq!(config.recurring_columns, SessionColumns::default());
        assert_eq!(config.teacher_columns.unique_id1, 1);
        assert_eq!(config.teacher_columns.trainer, 8);
        assert_eq!(config.merge_order, DEFAULT_MERGE_ORDER.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn merge_order_must_name_both_sources() {
        let config = DashboardConfig {
            merge_order: vec![SessionSource::Teacher],
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());

        let doubled = DashboardConfig {
            merge_order: vec![SessionSource::Teacher, SessionSource::Teacher],
            ..DashboardConfig::default()
        };
        assert!(doubled.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(DashboardConfig::load(Some(Path::new("/nonexistent/dashboard.json"))).is_err());
        assert_eq!(DashboardConfig::load(None).unwrap(), DashboardConfig::default());
    }
}
