use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::repositories::{UserRepository, WorkoutRepository};
use crate::stats::{self, LeaderboardEntry, SortKey};

#[derive(Clone)]
pub struct UsersState {
    pub user_repo: UserRepository,
    pub workout_repo: WorkoutRepository,
}

#[derive(Template)]
#[template(path = "users/index.html")]
struct LeaderboardTemplate {
    user: AuthUser,
    entries: Vec<LeaderboardEntry>,
}

#[derive(Deserialize)]
pub struct SortQuery {
    sort: Option<String>,
}

pub async fn index(
    State(state): State<UsersState>,
    auth_user: AuthUser,
    Query(query): Query<SortQuery>,
) -> Result<Response> {
    let users = state.user_repo.find_all().await?;
    let workouts = state.workout_repo.find_all().await?;

    let sort = SortKey::parse(query.sort.as_deref());
    let entries = stats::leaderboard(&users, &workouts, sort);

    let template = LeaderboardTemplate {
        user: auth_user,
        entries,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}
