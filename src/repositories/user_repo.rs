use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, RegisterForm, User, UserProfile};
use crate::stats::round1;

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<User>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let result = stmt.query_row([&id], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let username = username.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<User>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?")?;
            let result = stmt.query_row([&username], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// All users in registration order, as fetched for the leaderboard.
    pub async fn find_all(&self) -> Result<Vec<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<User>> {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users ORDER BY registration_date")?;
            let users = stmt
                .query_map([], User::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, form: &RegisterForm) -> Result<User> {
        let password_hash = hash_password(&form.password1)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: form.username.clone(),
            password_hash,
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            middle_name: form.middle_name.clone(),
            gender: form.gender,
            age: form.age,
            // Stored decimals carry one fractional digit
            weight: form.weight.map(round1),
            height: form.height.map(round1),
            registration_date: Utc::now(),
        };
        let user_clone = user.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO users (id, username, password_hash, email, first_name, last_name,
                                    middle_name, gender, age, weight, height, registration_date)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    user_clone.id,
                    user_clone.username,
                    user_clone.password_hash,
                    user_clone.email,
                    user_clone.first_name,
                    user_clone.last_name,
                    user_clone.middle_name,
                    user_clone.gender.as_str(),
                    user_clone.age,
                    user_clone.weight,
                    user_clone.height,
                    user_clone.registration_date,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(user)
    }

    pub async fn update_profile(&self, id: &str, profile: &UserProfile) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let profile = profile.clone();
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE users SET first_name = ?, last_name = ?, middle_name = ?, gender = ?,
                                  age = ?, weight = ?, height = ?, email = ?
                 WHERE id = ?",
                rusqlite::params![
                    profile.first_name,
                    profile.last_name,
                    profile.middle_name,
                    profile.gender.as_str(),
                    profile.age,
                    profile.weight,
                    profile.height,
                    profile.email,
                    id,
                ],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self.find_by_username(username).await?;

        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::models::Gender;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    fn register_form(username: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            password1: "password123".to_string(),
            password2: "password123".to_string(),
            first_name: "Ivan".to_string(),
            last_name: String::new(),
            middle_name: String::new(),
            gender: Gender::Male,
            age: Some(30),
            weight: Some(82.5),
            height: None,
            email: "ivan@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = setup_test_db();
        let repo = UserRepository::new(pool);

        let user = repo.create(&register_form("ivan")).await.unwrap();
        assert_eq!(user.username, "ivan");
        assert_ne!(user.password_hash, "password123");

        let found = repo.find_by_username("ivan").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.age, Some(30));
        assert_eq!(found.weight, Some(82.5));
        assert_eq!(found.gender, Gender::Male);
    }

    #[tokio::test]
    async fn test_create_rounds_weight_and_height() {
        let pool = setup_test_db();
        let repo = UserRepository::new(pool);

        let mut form = register_form("ivan");
        form.weight = Some(84.52);
        form.height = Some(180.25);

        let user = repo.create(&form).await.unwrap();
        assert_eq!(user.weight, Some(84.5));
        assert_eq!(user.height, Some(180.3));

        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(found.weight, Some(84.5));
        assert_eq!(found.height, Some(180.3));
    }

    #[tokio::test]
    async fn test_verify_password() {
        let pool = setup_test_db();
        let repo = UserRepository::new(pool);
        repo.create(&register_form("ivan")).await.unwrap();

        let ok = repo.verify_password("ivan", "password123").await.unwrap();
        assert!(ok.is_some());

        let bad = repo.verify_password("ivan", "wrong").await.unwrap();
        assert!(bad.is_none());

        let missing = repo.verify_password("nobody", "password123").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let pool = setup_test_db();
        let repo = UserRepository::new(pool);
        let user = repo.create(&register_form("ivan")).await.unwrap();

        let updated = repo
            .update_profile(
                &user.id,
                &UserProfile {
                    first_name: "Petr".to_string(),
                    last_name: "Petrov".to_string(),
                    middle_name: String::new(),
                    gender: Gender::Male,
                    age: None,
                    weight: Some(84.0),
                    height: Some(180.0),
                    email: "petr@example.com".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(updated);

        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(found.first_name, "Petr");
        assert_eq!(found.age, None);
        assert_eq!(found.weight, Some(84.0));
    }
}
