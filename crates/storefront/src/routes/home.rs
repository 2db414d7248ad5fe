//! Static page handlers: home, about and contact.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub username: Option<String>,
    pub is_admin: bool,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate;

/// Display the home page.
pub async fn home(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        is_admin: user.as_ref().is_some_and(|u| u.is_admin),
        username: user.map(|u| u.username.into_inner()),
    }
}

/// Display the about page.
pub async fn about() -> impl IntoResponse {
    AboutTemplate
}

/// Display the contact form.
pub async fn contact() -> impl IntoResponse {
    ContactTemplate
}

/// Accept a contact submission.
///
/// Submissions are not stored or forwarded; the form is shown again.
pub async fn contact_submit() -> impl IntoResponse {
    tracing::debug!("Contact form submitted");
    ContactTemplate
}
