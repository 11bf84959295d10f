/// Data layer: raw sheet rows in, canonical records and filtered views out.
///
/// Architecture:
/// ```text
///  recurring rows   teacher rows      payroll rows
///        │               │                 │
///        ▼               ▼                 ▼
///   ┌───────────────────────────────────────────┐
///   │ normalize   header skipped, cells coerced │
///   └───────────────────────────────────────────┘
///        │               │                 │
///        ▼               ▼                 │
///   ┌──────────────────────────┐           │
///   │ merge   first seen wins  │           │
///   └──────────────────────────┘           │
///        │                                 │
///        ▼                                 ▼
///   ┌────────────────┐              Vec<PayrollRecord>
///   │ SessionDataset │──► dimensions     │
///   └────────────────┘    (options)      │
///        │                                │
///        ▼                                ▼
///   ┌──────────────────────────────────────────┐
///   │ filter   criteria → narrowed view        │──► metrics
///   └──────────────────────────────────────────┘
/// ```
///
/// Everything here is pure and synchronous; inputs are never mutated.

pub mod coerce;
pub mod dimensions;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod metrics;
pub mod model;
pub mod normalize;
