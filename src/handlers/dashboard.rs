use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use chrono::Datelike;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::repositories::WorkoutRepository;
use crate::stats::{self, MonthlySummary};

#[derive(Clone)]
pub struct DashboardState {
    pub workout_repo: WorkoutRepository,
}

#[derive(Template)]
#[template(path = "dashboard/index.html")]
struct DashboardTemplate {
    user: AuthUser,
    summary: MonthlySummary,
    current_year: i32,
    monthly_stats_json: String,
    exercise_stats_json: String,
}

/// Current-month averages plus the two JSON chart payloads.
pub async fn index(State(state): State<DashboardState>, auth_user: AuthUser) -> Result<Response> {
    let now = chrono::Local::now();
    let current_year = now.year();
    let current_month = now.month();

    let monthly_workouts = state
        .workout_repo
        .find_by_user_in_month(&auth_user.id, current_year, current_month)
        .await?;
    let yearly_workouts = state
        .workout_repo
        .find_by_user_in_year(&auth_user.id, current_year)
        .await?;
    let trend_rows = state
        .workout_repo
        .find_trend_rows_by_user(&auth_user.id)
        .await?;

    let summary = stats::monthly_summary(&monthly_workouts);
    let monthly_stats = stats::yearly_series(&yearly_workouts, current_year);
    let exercise_stats = stats::exercise_trend(&trend_rows);

    let monthly_stats_json =
        serde_json::to_string(&monthly_stats).map_err(|e| AppError::Internal(e.to_string()))?;
    let exercise_stats_json =
        serde_json::to_string(&exercise_stats).map_err(|e| AppError::Internal(e.to_string()))?;

    let template = DashboardTemplate {
        user: auth_user,
        summary,
        current_year,
        monthly_stats_json,
        exercise_stats_json,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}
