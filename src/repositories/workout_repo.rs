use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    Exercise, ExerciseEntry, ExerciseTrendRow, FromSqliteRow, Workout, WorkoutWithExercises,
};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a finished workout session and its exercises as one transaction.
    ///
    /// The per-user `workout_number` is computed inside the same transaction
    /// as the insert, so concurrent sessions by one user cannot observe the
    /// same count. Entries referencing a nonexistent exercise type are still
    /// created, with the type reference cleared; a bad id never aborts the
    /// batch.
    pub async fn record_session(
        &self,
        user_id: &str,
        date: NaiveDate,
        duration: i64,
        weight: Option<f64>,
        entries: Vec<ExerciseEntry>,
    ) -> Result<Workout> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || -> Result<Workout> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let existing: i64 = tx.query_row(
                "SELECT COUNT(*) FROM workouts WHERE user_id = ?",
                [&user_id],
                |row| row.get(0),
            )?;
            let workout_number = existing + 1;

            let workout = Workout {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.clone(),
                date,
                duration,
                weight,
                workout_number,
                created_at: now,
            };

            tx.execute(
                "INSERT INTO workouts (id, user_id, date, duration, weight, workout_number, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    workout.id,
                    workout.user_id,
                    workout.date,
                    workout.duration,
                    workout.weight,
                    workout.workout_number,
                    workout.created_at,
                ],
            )?;

            for (index, entry) in entries.iter().enumerate() {
                let type_id = match &entry.exercise_type_id {
                    Some(id) => {
                        let exists: bool = tx.query_row(
                            "SELECT COUNT(*) > 0 FROM exercise_types WHERE id = ?",
                            [id],
                            |row| row.get(0),
                        )?;
                        if exists {
                            Some(id.clone())
                        } else {
                            None
                        }
                    }
                    None => None,
                };

                tx.execute(
                    "INSERT INTO exercises (id, workout_id, exercise_type_id, exercise_number, exercise_weight)
                     VALUES (?, ?, ?, ?, ?)",
                    rusqlite::params![
                        Uuid::new_v4().to_string(),
                        workout.id,
                        type_id,
                        (index + 1) as i64,
                        entry.weight,
                    ],
                )?;
            }

            tx.commit()?;
            Ok(workout)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The user's most recently created workouts, newest first.
    pub async fn find_recent_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Workout>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workouts WHERE user_id = ?
                 ORDER BY created_at DESC, workout_number DESC LIMIT ?",
            )?;
            let workouts = stmt
                .query_map(rusqlite::params![user_id, limit], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// All of the user's workouts, newest first.
    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Workout>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workouts WHERE user_id = ?
                 ORDER BY created_at DESC, workout_number DESC",
            )?;
            let workouts = stmt
                .query_map([&user_id], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Every workout of every user, for the leaderboard totals.
    pub async fn find_all(&self) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<Workout>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts")?;
            let workouts = stmt
                .query_map([], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Deleting a workout cascades to its exercises. Only the owner's rows
    /// match, so a foreign id deletes nothing.
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workouts WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The user's workouts within one calendar month, each joined with
    /// its exercise count, as consumed by `stats::monthly_summary`.
    pub async fn find_by_user_in_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<WorkoutWithExercises>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let year = format!("{:04}", year);
        let month = format!("{:02}", month);
        tokio::task::spawn_blocking(move || -> Result<Vec<WorkoutWithExercises>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT w.*, COUNT(e.id) AS exercise_count
                 FROM workouts w
                 LEFT JOIN exercises e ON e.workout_id = w.id
                 WHERE w.user_id = ? AND strftime('%Y', w.date) = ? AND strftime('%m', w.date) = ?
                 GROUP BY w.id",
            )?;
            let workouts = stmt
                .query_map(
                    rusqlite::params![user_id, year, month],
                    WorkoutWithExercises::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The user's workouts within one calendar year, for `stats::yearly_series`.
    pub async fn find_by_user_in_year(&self, user_id: &str, year: i32) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let year = format!("{:04}", year);
        tokio::task::spawn_blocking(move || -> Result<Vec<Workout>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workouts WHERE user_id = ? AND strftime('%Y', date) = ?",
            )?;
            let workouts = stmt
                .query_map(rusqlite::params![user_id, year], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Flat (type name, workout date, weight) rows across all of the user's
    /// history, for `stats::exercise_trend`.
    pub async fn find_trend_rows_by_user(&self, user_id: &str) -> Result<Vec<ExerciseTrendRow>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<ExerciseTrendRow>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT t.name AS type_name, w.date AS workout_date, e.exercise_weight
                 FROM exercises e
                 JOIN workouts w ON e.workout_id = w.id
                 LEFT JOIN exercise_types t ON e.exercise_type_id = t.id
                 WHERE w.user_id = ?",
            )?;
            let rows = stmt
                .query_map([&user_id], ExerciseTrendRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The exercises of one workout in sequence order.
    pub async fn find_exercises_by_workout(&self, workout_id: &str) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let workout_id = workout_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Exercise>> {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare("SELECT * FROM exercises WHERE workout_id = ? ORDER BY exercise_number")?;
            let exercises = stmt
                .query_map([&workout_id], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
