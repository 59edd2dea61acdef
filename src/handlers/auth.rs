use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;

use crate::error::{AppError, Result};
use crate::middleware::auth::OptionalAuthUser;
use crate::models::{LoginCredentials, RegisterForm};
use crate::repositories::{SessionRepository, UserRepository};
use crate::session;

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub session_repo: SessionRepository,
}

// Templates
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/registration.html")]
struct RegistrationTemplate {
    error: Option<String>,
}

fn render<T: Template>(template: T) -> Result<Response> {
    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

// Handlers
pub async fn registration_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    render(RegistrationTemplate { error: None })
}

pub async fn registration_submit(
    State(state): State<AuthState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    // Malformed numeric fields re-render the form, not a 422
    let form = match RegisterForm::from_fields(&fields) {
        Ok(form) => form,
        Err(message) => {
            return render(RegistrationTemplate {
                error: Some(message),
            })
        }
    };

    if let Some(message) = validate_registration(&form) {
        return render(RegistrationTemplate {
            error: Some(message),
        });
    }

    if state
        .user_repo
        .find_by_username(&form.username)
        .await?
        .is_some()
    {
        return render(RegistrationTemplate {
            error: Some("Username already exists".to_string()),
        });
    }

    state.user_repo.create(&form).await?;

    Ok(Redirect::to("/login").into_response())
}

fn validate_registration(form: &RegisterForm) -> Option<String> {
    if form.username.trim().is_empty() {
        return Some("Username is required".to_string());
    }
    if form.password1.len() < 6 {
        return Some("Password must be at least 6 characters".to_string());
    }
    if form.password1 != form.password2 {
        return Some("Passwords do not match".to_string());
    }
    if form.age.is_some_and(|a| a > 150) {
        return Some("Age is out of range".to_string());
    }
    if form.weight.is_some_and(|w| w < 0.0) || form.height.is_some_and(|h| h < 0.0) {
        return Some("Weight and height must be non-negative".to_string());
    }
    None
}

pub async fn login_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    // Redirect to main if already logged in
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    render(LoginTemplate { error: None })
}

pub async fn login_submit(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(credentials): Form<LoginCredentials>,
) -> Result<Response> {
    let user = state
        .user_repo
        .verify_password(&credentials.username, &credentials.password)
        .await?;

    match user {
        Some(user) => {
            let token = state.session_repo.create(&user.id).await?;
            let jar = jar.add(session::create_session_cookie(&token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        None => render(LoginTemplate {
            error: Some("Invalid username or password".to_string()),
        }),
    }
}

pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response> {
    if let Some(token) = session::get_session_token(&jar) {
        state.session_repo.delete(&token).await?;
    }
    let jar = jar.add(session::remove_session_cookie());
    Ok((jar, Redirect::to("/login")).into_response())
}
