use anyhow::Result;
use chrono::NaiveDateTime;

use crate::config::DashboardConfig;
use crate::data::dimensions::{Dimension, PayrollOptions};
use crate::data::filter::{filter_payroll, filtered_indices, FilterCriteria, PayrollFilter};
use crate::data::merge::{merge_sessions, SessionSource};
use crate::data::model::{PayrollRecord, RawRow, SessionDataset, SessionRecord};
use crate::data::normalize::{normalize_payroll, normalize_sessions};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything the presentation layer reads, independent of rendering.
///
/// Each setter recomputes what depends on it; nothing is patched in place.
/// Session filtering is skipped when neither the dataset nor the criteria
/// changed since the last run.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub config: DashboardConfig,

    /// Canonical sessions plus their option lists (None until rows arrive).
    pub dataset: Option<SessionDataset>,

    /// Active session criteria.
    pub criteria: FilterCriteria,

    /// Indices into `dataset.sessions` passing `criteria` (cached).
    pub visible_indices: Vec<usize>,

    /// Payroll rows as loaded.
    pub payroll: Vec<PayrollRecord>,

    /// Payroll filter options, from all payroll rows.
    pub payroll_options: PayrollOptions,

    pub payroll_filter: PayrollFilter,

    /// Bumped whenever `dataset` is replaced.
    generation: u64,

    /// `(generation, criteria)` of the last session filter run.
    last_run: Option<(u64, FilterCriteria)>,
}

impl DashboardState {
    /// Start empty with `config`, which must pass
    /// [`DashboardConfig::validate`].
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Ingest freshly fetched session sheets. A source that was not
    /// delivered counts as empty.
    pub fn set_session_rows(&mut self, recurring: Option<&[RawRow]>, teacher: Option<&[RawRow]>) {
        let normalized: Vec<Vec<SessionRecord>> = self
            .config
            .merge_order
            .iter()
            .map(|&source| {
                let rows = match source {
                    SessionSource::Recurring => recurring,
                    SessionSource::Teacher => teacher,
                };
                rows.map(|rows| normalize_sessions(rows, self.config.columns_for(source)))
                    .unwrap_or_default()
            })
            .collect();

        let merged = merge_sessions(normalized.iter().map(Vec::as_slice));
        self.set_dataset(SessionDataset::from_sessions(merged));
    }

    /// Replace the canonical dataset and refilter.
    pub fn set_dataset(&mut self, dataset: SessionDataset) {
        log::info!(
            "Canonical session collection: {} records, {} trainers, {} locations",
            dataset.len(),
            dataset.options.trainers.len(),
            dataset.options.locations.len()
        );
        self.dataset = Some(dataset);
        self.generation += 1;
        self.refilter();
    }

    /// Ingest a freshly fetched payroll sheet.
    pub fn set_payroll_rows(&mut self, rows: Option<&[RawRow]>) {
        self.payroll = rows.map(normalize_payroll).unwrap_or_default();
        self.payroll_options = PayrollOptions::from_records(&self.payroll);
    }

    /// Recompute `visible_indices` unless nothing relevant changed.
    pub fn refilter(&mut self) {
        let key = (self.generation, self.criteria.clone());
        if self.last_run.as_ref() == Some(&key) {
            log::trace!("session filter unchanged, reusing {} rows", self.visible_indices.len());
            return;
        }
        self.visible_indices = match &self.dataset {
            Some(ds) => filtered_indices(&ds.sessions, &self.criteria),
            None => Vec::new(),
        };
        self.last_run = Some(key);
    }

    /// Replace the criteria wholesale.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &str) {
        self.criteria.toggle(dimension, value);
        self.refilter();
    }

    /// Remove the constraint on one dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        self.criteria.clear_selection(dimension);
        self.refilter();
    }

    /// Back to the cleared state.
    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.refilter();
    }

    /// The canonical sessions, or nothing before data arrives.
    pub fn canonical_sessions(&self) -> &[SessionRecord] {
        self.dataset
            .as_ref()
            .map(|ds| ds.sessions.as_slice())
            .unwrap_or(&[])
    }

    /// Sessions passing the current criteria, in canonical order.
    pub fn visible_sessions(&self) -> Vec<&SessionRecord> {
        let sessions = self.canonical_sessions();
        self.visible_indices
            .iter()
            .filter_map(|&i| sessions.get(i))
            .collect()
    }

    /// Payroll rows passing the payroll filter, windows ending at `now`.
    pub fn visible_payroll(&self, now: NaiveDateTime) -> Vec<PayrollRecord> {
        filter_payroll(&self.payroll, &self.payroll_filter, now)
    }
}
