use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub workout_id: String,
    pub exercise_type_id: Option<String>,
    pub exercise_number: i64,
    pub exercise_weight: Option<f64>,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_type_id: row.get("exercise_type_id")?,
            exercise_number: row.get("exercise_number")?,
            exercise_weight: row.get("exercise_weight")?,
        })
    }
}

/// One client-supplied exercise line of a finished workout session.
/// Its 1-indexed position in the batch becomes `exercise_number`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub exercise_type_id: Option<String>,
    pub weight: Option<f64>,
}

/// Flat row backing the per-exercise weight trend: the type name is
/// None when the catalog entry was deleted or never set.
#[derive(Debug, Clone)]
pub struct ExerciseTrendRow {
    pub type_name: Option<String>,
    pub date: NaiveDate,
    pub weight: Option<f64>,
}

impl FromSqliteRow for ExerciseTrendRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            type_name: row.get("type_name")?,
            date: row.get("workout_date")?,
            weight: row.get("exercise_weight")?,
        })
    }
}
