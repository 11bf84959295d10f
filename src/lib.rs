//! Reporting engine for a fitness-studio dashboard.
//!
//! Raw sheet rows are normalized into typed session and payroll records,
//! session sources are merged on their composite identity, and the
//! canonical collection is narrowed by analyst-chosen criteria. The
//! presentation layer drives recomputation through [`state::DashboardState`].

pub mod config;
pub mod data;
pub mod report;
pub mod state;
