use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub duration: i64,
    pub weight: Option<f64>,
    pub workout_number: i64,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            duration: row.get("duration")?,
            weight: row.get("weight")?,
            workout_number: row.get("workout_number")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Read-time presentation view of a workout, with the duration split
/// into whole hours and remainder minutes. The stored record never
/// carries these derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutView {
    pub workout: Workout,
    pub hours: i64,
    pub mins: i64,
}

impl From<Workout> for WorkoutView {
    fn from(workout: Workout) -> Self {
        let hours = workout.duration / 60;
        let mins = workout.duration % 60;
        Self {
            workout,
            hours,
            mins,
        }
    }
}

/// A workout joined with the number of exercises it contains,
/// as needed by the monthly dashboard summary.
#[derive(Debug, Clone)]
pub struct WorkoutWithExercises {
    pub workout: Workout,
    pub exercise_count: i64,
}

impl FromSqliteRow for WorkoutWithExercises {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            workout: Workout::from_row(row)?,
            exercise_count: row.get("exercise_count")?,
        })
    }
}
