use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Catalog entry shared across all users and workouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseType {
    pub id: String,
    pub name: String,
}

impl FromSqliteRow for ExerciseType {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}
