//! Session middleware configuration and typed session accessors.
//!
//! The cookie carries only a signed session id; cart, language and identity
//! live in the session record held by the store (`SQLite` in production,
//! in-memory in tests).

use secrecy::ExposeSecret;
use thiserror::Error;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;
use crate::models::Cart;
use crate::models::session::{DEFAULT_LANGUAGE, keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "oliv_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The session secret could not be turned into a signing key.
#[derive(Debug, Error)]
#[error("session secret is too short to derive a signing key")]
pub struct SessionKeyError;

/// Create the session layer around `store`, signing cookies with the
/// configured session secret.
///
/// # Arguments
///
/// * `store` - Session record storage
/// * `config` - Storefront configuration (for session secret and cookie security)
///
/// # Errors
///
/// Returns `SessionKeyError` if the secret is shorter than 64 bytes.
pub fn create_session_layer<S>(
    store: S,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<S, SignedCookie>, SessionKeyError>
where
    S: SessionStore + Clone,
{
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|_| SessionKeyError)?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}

// =============================================================================
// Cart
// =============================================================================

/// Read the cart, or an empty one if the session has none.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Replace the cart stored in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

// =============================================================================
// Language
// =============================================================================

/// The session's language tag, defaulting to `"en"`.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn language(session: &Session) -> Result<String, tower_sessions::session::Error> {
    Ok(session
        .get::<String>(keys::LANG)
        .await?
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()))
}

/// Overwrite the session's language tag. Any tag is accepted.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_language(
    session: &Session,
    lang: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::LANG, lang).await
}
