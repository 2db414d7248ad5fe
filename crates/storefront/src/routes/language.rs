//! Language preference handler.

use axum::{
    extract::Path,
    http::{HeaderMap, header},
    response::Redirect,
};
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::set_language;

/// Store the language tag and send the browser back where it came from.
///
/// The tag is not validated. Without a `Referer` header the redirect goes to
/// the home page.
pub async fn set(
    session: Session,
    headers: HeaderMap,
    Path(lang): Path<String>,
) -> Result<Redirect> {
    set_language(&session, &lang).await?;

    let target = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("/");

    Ok(Redirect::to(target))
}
