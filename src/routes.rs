use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::handlers::{auth, dashboard, health, home, settings, users, workouts};
use crate::middleware::AuthContext;

#[allow(clippy::too_many_arguments)]
pub fn create_router(
    auth_state: auth::AuthState,
    home_state: home::HomeState,
    workouts_state: workouts::WorkoutsState,
    dashboard_state: dashboard::DashboardState,
    users_state: users::UsersState,
    settings_state: settings::SettingsState,
    auth_context: AuthContext,
) -> Router {
    Router::new()
        // Main page
        .route("/", get(home::index))
        .with_state(home_state)
        // Auth routes
        .route(
            "/registration",
            get(auth::registration_page).post(auth::registration_submit),
        )
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .with_state(auth_state)
        // Workout routes
        .route(
            "/show_all_workouts",
            get(workouts::show_all).post(workouts::delete),
        )
        .route(
            "/workout",
            get(workouts::entry_page).post(workouts::submit),
        )
        .with_state(workouts_state)
        // Dashboard
        .route("/dashboard", get(dashboard::index))
        .with_state(dashboard_state)
        // Leaderboard
        .route("/users", get(users::index))
        .with_state(users_state)
        // Settings
        .route(
            "/settings",
            get(settings::index).post(settings::update),
        )
        .with_state(settings_state)
        // Health probe
        .route("/health", get(health::health_check))
        // Session resolution for the AuthUser extractor
        .layer(Extension(auth_context))
}
