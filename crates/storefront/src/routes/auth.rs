//! Authentication route handlers.
//!
//! Handles signup, login and logout with username/password accounts.
//! Failures are reported as short text responses (see `AppError`).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::routes::required;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: Option<String>,
    /// Collected by the form but not stored.
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate;

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page() -> impl IntoResponse {
    SignupTemplate
}

/// Handle signup form submission.
///
/// Creates a non-admin account and sends the browser to the login page. A
/// taken username yields a 409 and no new row.
#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect> {
    let username = required(form.username, "username")?;
    required(form.email, "email")?;
    let password = required(form.password, "password")?;

    AuthService::new(state.pool())
        .register(&username, &password)
        .await?;

    Ok(Redirect::to("/login"))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate
}

/// Handle login form submission.
///
/// On success the session is bound to the user and the browser goes home.
/// Wrong passwords and unknown usernames both yield "Invalid credentials".
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let username = required(form.username, "username")?;
    let password = required(form.password, "password")?;

    let user = AuthService::new(state.pool())
        .login(&username, &password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    set_current_user(&session, user.id).await?;
    set_sentry_user(&user.id, Some(user.username.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to("/"))
}

// =============================================================================
// Logout Route
// =============================================================================

/// End the authenticated session. Cart and language survive logout.
#[instrument(skip(session, user), fields(user_id = %user.id))]
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}
