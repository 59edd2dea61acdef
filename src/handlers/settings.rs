use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{SettingsForm, User, UserProfile};
use crate::repositories::UserRepository;
use crate::stats::round1;

#[derive(Clone)]
pub struct SettingsState {
    pub user_repo: UserRepository,
}

#[derive(Template)]
#[template(path = "settings/index.html")]
struct SettingsTemplate {
    user: AuthUser,
    profile: User,
    error: Option<String>,
}

pub async fn index(State(state): State<SettingsState>, auth_user: AuthUser) -> Result<Response> {
    let profile = state
        .user_repo
        .find_by_id(&auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let template = SettingsTemplate {
        user: auth_user,
        profile,
        error: None,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

async fn re_render(
    state: &SettingsState,
    auth_user: AuthUser,
    message: String,
) -> Result<Response> {
    let profile = state
        .user_repo
        .find_by_id(&auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let template = SettingsTemplate {
        user: auth_user,
        profile,
        error: Some(message),
    };
    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn update(
    State(state): State<SettingsState>,
    auth_user: AuthUser,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    // Malformed numeric fields re-render the form, not a 422
    let form = match SettingsForm::from_fields(&fields) {
        Ok(form) => form,
        Err(message) => return re_render(&state, auth_user, message).await,
    };

    if let Some(message) = validate_settings(&form) {
        return re_render(&state, auth_user, message).await;
    }

    let profile = UserProfile {
        first_name: form.first_name,
        last_name: form.last_name,
        middle_name: form.middle_name,
        gender: form.gender,
        age: form.age,
        weight: form.weight.map(round1),
        height: form.height.map(round1),
        email: form.email,
    };

    state.user_repo.update_profile(&auth_user.id, &profile).await?;

    Ok(Redirect::to("/").into_response())
}

fn validate_settings(form: &SettingsForm) -> Option<String> {
    if form.age.is_some_and(|a| a > 150) {
        return Some("Age is out of range".to_string());
    }
    if form.weight.is_some_and(|w| w < 0.0) || form.height.is_some_and(|h| h < 0.0) {
        return Some("Weight and height must be non-negative".to_string());
    }
    None
}
