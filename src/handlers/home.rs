use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::WorkoutView;
use crate::repositories::WorkoutRepository;

#[derive(Clone)]
pub struct HomeState {
    pub workout_repo: WorkoutRepository,
}

#[derive(Template)]
#[template(path = "home/index.html")]
struct HomeTemplate {
    user: AuthUser,
    workouts: Vec<WorkoutView>,
}

/// Main page: the 5 most recently created workouts.
pub async fn index(State(state): State<HomeState>, auth_user: AuthUser) -> Result<Response> {
    let workouts = state
        .workout_repo
        .find_recent_by_user(&auth_user.id, 5)
        .await?
        .into_iter()
        .map(WorkoutView::from)
        .collect();

    let template = HomeTemplate {
        user: auth_user,
        workouts,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}
