use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ExerciseType, FromSqliteRow};

#[derive(Clone)]
pub struct ExerciseTypeRepository {
    pool: DbPool,
}

impl ExerciseTypeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The full catalog, as shown on the workout entry form.
    pub async fn find_all(&self) -> Result<Vec<ExerciseType>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<ExerciseType>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercise_types ORDER BY name")?;
            let types = stmt
                .query_map([], ExerciseType::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(types)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ExerciseType>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<ExerciseType>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercise_types WHERE id = ?")?;
            let result = stmt.query_row([&id], ExerciseType::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, name: &str) -> Result<ExerciseType> {
        let exercise_type = ExerciseType {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        let type_clone = exercise_type.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercise_types (id, name) VALUES (?, ?)",
                rusqlite::params![type_clone.id, type_clone.name],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(exercise_type)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM exercise_types WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
