use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::CookieJar;

use crate::repositories::{SessionRepository, UserRepository};
use crate::session;

/// Repositories the extractors need to resolve a session cookie into a
/// user. Attached to the router as an `Extension` layer.
#[derive(Clone)]
pub struct AuthContext {
    pub user_repo: UserRepository,
    pub session_repo: SessionRepository,
}

/// The authenticated requester, resolved from the DB-backed session.
/// Every handler takes this explicitly; there is no ambient current user.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

async fn resolve_user(parts: &mut Parts) -> Option<AuthUser> {
    let Extension(ctx) = Extension::<AuthContext>::from_request_parts(parts, &())
        .await
        .ok()?;

    let jar = CookieJar::from_headers(&parts.headers);
    let token = session::get_session_token(&jar)?;

    let user_id = ctx.session_repo.find_valid(&token).await.ok()??;
    let user = ctx.user_repo.find_by_id(&user_id).await.ok()??;

    Some(AuthUser {
        id: user.id,
        username: user.username,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(parts).await.ok_or(AuthRedirect)
    }
}

pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

// Optional auth - doesn't redirect, just returns None if not logged in
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(resolve_user(parts).await))
    }
}
