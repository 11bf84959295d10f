use serde::{Deserialize, Serialize};

use super::coerce::coerce_number;
use super::model::{CellValue, FamilyStats, PayrollRecord, RawRow, SessionRecord};

/// Number of columns in the payroll sheet.
pub const PAYROLL_COLUMN_COUNT: usize = 31;

// ---------------------------------------------------------------------------
// Column layouts
// ---------------------------------------------------------------------------

/// Column index of every session field in a raw sheet row.
///
/// The default matches the recurring-sessions export:
/// `uniqueId1, uniqueId2, date, day, time, location, class, type, trainer,
/// capacity, fillPercentage, revenue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionColumns {
    pub unique_id1: usize,
    pub unique_id2: usize,
    pub date: usize,
    pub day: usize,
    pub time: usize,
    pub location: usize,
    pub class: usize,
    #[serde(rename = "type")]
    pub session_type: usize,
    pub trainer: usize,
    pub capacity: usize,
    pub fill_percentage: usize,
    pub revenue: usize,
}

impl Default for SessionColumns {
    fn default() -> Self {
        Self {
            unique_id1: 0,
            unique_id2: 1,
            date: 2,
            day: 3,
            time: 4,
            location: 5,
            class: 6,
            session_type: 7,
            trainer: 8,
            capacity: 9,
            fill_percentage: 10,
            revenue: 11,
        }
    }
}

// Fixed payroll layout: identity, location, three family quintuples,
// totals, month, then conversion/retention metrics.
const PAYROLL_TEACHER_ID: usize = 0;
const PAYROLL_TEACHER_NAME: usize = 1;
const PAYROLL_TEACHER_EMAIL: usize = 2;
const PAYROLL_LOCATION: usize = 3;
const PAYROLL_CYCLE: usize = 4;
const PAYROLL_STRENGTH: usize = 9;
const PAYROLL_BARRE: usize = 14;
const PAYROLL_TOTAL: usize = 19;
const PAYROLL_MONTH_YEAR: usize = 24;
const PAYROLL_UNIQUE: usize = 25;
const PAYROLL_CONVERTED: usize = 26;
const PAYROLL_CONVERSION: usize = 27;
const PAYROLL_RETAINED: usize = 28;
const PAYROLL_RETENTION: usize = 29;
const PAYROLL_NEW: usize = 30;

// ---------------------------------------------------------------------------
// Cell access
// ---------------------------------------------------------------------------

static EMPTY_CELL: CellValue = CellValue::Empty;

fn cell_at(row: &[CellValue], idx: usize) -> &CellValue {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn text_at(row: &[CellValue], idx: usize) -> String {
    cell_at(row, idx).to_text()
}

fn number_at(row: &[CellValue], idx: usize) -> f64 {
    coerce_number(cell_at(row, idx))
}

/// Data rows of a sheet, i.e. everything after the header. Sheets with no
/// data row yield nothing.
fn data_rows(rows: &[RawRow]) -> &[RawRow] {
    if rows.len() < 2 {
        return &[];
    }
    &rows[1..]
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Map one raw row onto a [`SessionRecord`] using `columns`.
pub fn normalize_session_row(row: &[CellValue], columns: &SessionColumns) -> SessionRecord {
    SessionRecord {
        unique_id1: text_at(row, columns.unique_id1),
        unique_id2: text_at(row, columns.unique_id2),
        trainer: text_at(row, columns.trainer),
        class: text_at(row, columns.class),
        location: text_at(row, columns.location),
        day: text_at(row, columns.day),
        time: text_at(row, columns.time),
        session_type: text_at(row, columns.session_type),
        capacity: number_at(row, columns.capacity),
        fill_percentage: number_at(row, columns.fill_percentage),
        revenue: number_at(row, columns.revenue),
        date: text_at(row, columns.date),
    }
}

/// Normalize a whole session sheet. The first row is the header and is
/// always skipped.
pub fn normalize_sessions(rows: &[RawRow], columns: &SessionColumns) -> Vec<SessionRecord> {
    let records: Vec<SessionRecord> = data_rows(rows)
        .iter()
        .map(|row| normalize_session_row(row, columns))
        .collect();
    log::debug!("normalized {} session rows", records.len());
    records
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

fn family_at(row: &[CellValue], base: usize) -> FamilyStats {
    FamilyStats {
        sessions: number_at(row, base),
        empty_sessions: number_at(row, base + 1),
        non_empty_sessions: number_at(row, base + 2),
        customers: number_at(row, base + 3),
        paid: number_at(row, base + 4),
    }
}

/// Map one raw payroll row onto a [`PayrollRecord`].
pub fn normalize_payroll_row(row: &[CellValue]) -> PayrollRecord {
    if row.len() > PAYROLL_COLUMN_COUNT {
        log::trace!(
            "payroll row has {} cells, ignoring the last {}",
            row.len(),
            row.len() - PAYROLL_COLUMN_COUNT
        );
    }
    PayrollRecord {
        teacher_id: text_at(row, PAYROLL_TEACHER_ID),
        teacher_name: text_at(row, PAYROLL_TEACHER_NAME),
        teacher_email: text_at(row, PAYROLL_TEACHER_EMAIL),
        location: text_at(row, PAYROLL_LOCATION),
        cycle: family_at(row, PAYROLL_CYCLE),
        strength: family_at(row, PAYROLL_STRENGTH),
        barre: family_at(row, PAYROLL_BARRE),
        total: family_at(row, PAYROLL_TOTAL),
        month_year: text_at(row, PAYROLL_MONTH_YEAR),
        unique: text_at(row, PAYROLL_UNIQUE),
        converted: number_at(row, PAYROLL_CONVERTED),
        conversion: text_at(row, PAYROLL_CONVERSION),
        retained: number_at(row, PAYROLL_RETAINED),
        retention: text_at(row, PAYROLL_RETENTION),
        new_customers: number_at(row, PAYROLL_NEW),
    }
}

/// Normalize the payroll sheet, skipping its header row.
pub fn normalize_payroll(rows: &[RawRow]) -> Vec<PayrollRecord> {
    let records: Vec<PayrollRecord> = data_rows(rows)
        .iter()
        .map(|row| normalize_payroll_row(row))
        .collect();
    log::debug!("normalized {} payroll rows", records.len());
    records
}
