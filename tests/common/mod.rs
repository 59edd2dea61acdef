#![allow(dead_code)]

use axum::Router;
use chrono::NaiveDate;

use fittrack::db::{create_memory_pool, DbPool};
use fittrack::middleware::AuthContext;
use fittrack::migrations::run_migrations_for_tests;
use fittrack::models::{ExerciseEntry, ExerciseType, Gender, RegisterForm, User, Workout};
use fittrack::repositories::{
    ExerciseTypeRepository, SessionRepository, UserRepository, WorkoutRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    use fittrack::handlers::{auth, dashboard, home, settings, users, workouts};

    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_type_repo = ExerciseTypeRepository::new(pool.clone());

    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
        session_repo: session_repo.clone(),
    };
    let home_state = home::HomeState {
        workout_repo: workout_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
        exercise_type_repo: exercise_type_repo.clone(),
    };
    let dashboard_state = dashboard::DashboardState {
        workout_repo: workout_repo.clone(),
    };
    let users_state = users::UsersState {
        user_repo: user_repo.clone(),
        workout_repo: workout_repo.clone(),
    };
    let settings_state = settings::SettingsState {
        user_repo: user_repo.clone(),
    };

    let auth_context = AuthContext {
        user_repo,
        session_repo,
    };

    fittrack::routes::create_router(
        auth_state,
        home_state,
        workouts_state,
        dashboard_state,
        users_state,
        settings_state,
        auth_context,
    )
}

pub async fn create_test_user(pool: &DbPool, username: &str, password: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(&RegisterForm {
            username: username.to_string(),
            password1: password.to_string(),
            password2: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            middle_name: String::new(),
            gender: Gender::Male,
            age: None,
            weight: None,
            height: None,
            email: String::new(),
        })
        .await
        .unwrap()
}

pub async fn create_test_user_with_age(
    pool: &DbPool,
    username: &str,
    age: Option<u32>,
) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(&RegisterForm {
            username: username.to_string(),
            password1: "password123".to_string(),
            password2: "password123".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            middle_name: String::new(),
            gender: Gender::Male,
            age,
            weight: None,
            height: None,
            email: String::new(),
        })
        .await
        .unwrap()
}

pub async fn create_session_cookie(pool: &DbPool, user: &User) -> String {
    let session_repo = SessionRepository::new(pool.clone());
    let token = session_repo.create(&user.id).await.unwrap();
    format!("session={}", token)
}

pub async fn create_test_exercise_type(pool: &DbPool, name: &str) -> ExerciseType {
    let repo = ExerciseTypeRepository::new(pool.clone());
    repo.create(name).await.unwrap()
}

pub async fn create_test_workout(
    pool: &DbPool,
    user_id: &str,
    date: NaiveDate,
    duration: i64,
    weight: Option<f64>,
    entries: Vec<ExerciseEntry>,
) -> Workout {
    let repo = WorkoutRepository::new(pool.clone());
    repo.record_session(user_id, date, duration, weight, entries)
        .await
        .unwrap()
}
