//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user (and optionally the
//! admin flag) in route handlers. The session only stores the user id; the
//! user row is loaded once per request so a deleted or demoted account takes
//! effect immediately.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use oliv_core::UserId;

use crate::db::UserRepository;
use crate::models::User;
use crate::models::session::keys;
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// If the user is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires an authenticated admin.
///
/// Anonymous requests are redirected to the login page; logged-in users
/// without the admin flag are redirected home.
pub struct RequireAdmin(pub User);

/// Error returned when a guarded route cannot run.
#[derive(Debug)]
pub enum AuthRejection {
    /// No authenticated user; redirect to the login page.
    RedirectToLogin,
    /// Authenticated but not an admin; redirect home.
    RedirectToHome,
    /// Session or database lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectToHome => Redirect::to("/").into_response(),
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Resolve the session's user, if any.
async fn current_user(parts: &Parts, state: &AppState) -> Result<Option<User>, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let Some(session) = parts.extensions.get::<Session>() else {
        tracing::error!("Session layer missing; cannot resolve user");
        return Err(AuthRejection::Internal);
    };

    let user_id = session.get::<UserId>(keys::USER_ID).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read session");
        AuthRejection::Internal
    })?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };

    UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %user_id, "Failed to load session user");
            AuthRejection::Internal
        })
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state)
            .await?
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if user.is_admin {
            Ok(Self(user))
        } else {
            tracing::debug!(user_id = %user.id, "Non-admin denied admin route");
            Err(AuthRejection::RedirectToHome)
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is not
/// logged in. Lookup failures are treated as anonymous.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state).await.ok().flatten()))
    }
}

/// Bind the session to a user after a successful login.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user_id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::USER_ID, user_id).await
}

/// Helper to clear the current user from the session (logout).
///
/// Cart and language are left in place.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<UserId>(keys::USER_ID).await?;
    Ok(())
}
