//! Cart identity store.
//!
//! The cart ID is the only cart state kept on our side. It lives in two slots:
//! a long-lived cookie (primary) and the server-side session (fallback). Both
//! are injected into [`CartIdStore`] as [`CartIdSlot`] capabilities so tests
//! can swap in [`InMemorySlot`]. Last write wins; there is no cross-device
//! sync.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tower_sessions::Session;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};
use tracing::warn;

use crate::state::AppState;

/// Cart cookie name.
pub const CART_COOKIE_NAME: &str = "shopfront_cart";

/// Cart cookie lifetime.
pub const CART_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Session key for the fallback slot.
pub const CART_SESSION_KEY: &str = "cart_id";

/// A place a cart ID can be read from, written to, and cleared.
pub trait CartIdSlot: Send + Sync {
    /// Current value, if any.
    fn read(&self) -> impl Future<Output = Option<String>> + Send;

    /// Store `cart_id`.
    fn write(&self, cart_id: &str) -> impl Future<Output = ()> + Send;

    /// Remove the value.
    fn clear(&self) -> impl Future<Output = ()> + Send;
}

/// An absent slot (e.g. no session layer on this request) reads as empty and
/// ignores writes.
impl<S: CartIdSlot> CartIdSlot for Option<S> {
    async fn read(&self) -> Option<String> {
        match self {
            Some(slot) => slot.read().await,
            None => None,
        }
    }

    async fn write(&self, cart_id: &str) {
        if let Some(slot) = self {
            slot.write(cart_id).await;
        }
    }

    async fn clear(&self) {
        if let Some(slot) = self {
            slot.clear().await;
        }
    }
}

/// Cart ID store over a primary and a fallback slot.
#[derive(Debug, Clone)]
pub struct CartIdStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P: CartIdSlot, F: CartIdSlot> CartIdStore<P, F> {
    /// Combine two slots.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Primary first, then fallback. Blank values count as absent.
    pub async fn load(&self) -> Option<String> {
        if let Some(id) = self.primary.read().await.filter(|id| !id.trim().is_empty()) {
            return Some(id);
        }
        self.fallback
            .read()
            .await
            .filter(|id| !id.trim().is_empty())
    }

    /// Write the ID to both slots, or clear both when `None`.
    pub async fn save(&self, cart_id: Option<&str>) {
        match cart_id {
            Some(id) => {
                self.primary.write(id).await;
                self.fallback.write(id).await;
            }
            None => {
                self.primary.clear().await;
                self.fallback.clear().await;
            }
        }
    }

    /// The primary slot.
    pub const fn primary(&self) -> &P {
        &self.primary
    }

    /// The fallback slot.
    pub const fn fallback(&self) -> &F {
        &self.fallback
    }
}

// =============================================================================
// Cookie slot
// =============================================================================

#[derive(Debug, Default)]
struct CookieState {
    current: Option<String>,
    outgoing: Option<Cookie<'static>>,
}

/// Cookie-backed slot.
///
/// Reads the value the request carried; writes queue a `Set-Cookie` that
/// [`CartIdentity::respond`] attaches to the response.
#[derive(Debug, Clone)]
pub struct CookieSlot {
    secure: bool,
    state: Arc<Mutex<CookieState>>,
}

impl CookieSlot {
    /// Slot seeded with the request's cookie value.
    #[must_use]
    pub fn new(current: Option<String>, secure: bool) -> Self {
        Self {
            secure,
            state: Arc::new(Mutex::new(CookieState {
                current,
                outgoing: None,
            })),
        }
    }

    /// Slot seeded from request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        Self::new(cart_cookie_value(headers), secure)
    }

    /// The pending `Set-Cookie` header value, if a write or clear happened.
    pub async fn set_cookie_header(&self) -> Option<HeaderValue> {
        let state = self.state.lock().await;
        let cookie = state.outgoing.as_ref()?;
        HeaderValue::from_str(&cookie.to_string()).ok()
    }

    fn cookie(&self, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((CART_COOKIE_NAME, value))
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure)
            .build()
    }
}

impl CartIdSlot for CookieSlot {
    async fn read(&self) -> Option<String> {
        self.state.lock().await.current.clone()
    }

    async fn write(&self, cart_id: &str) {
        let cookie = self.cookie(
            cart_id.to_string(),
            Duration::days(CART_COOKIE_MAX_AGE_DAYS),
        );
        let mut state = self.state.lock().await;
        state.current = Some(cart_id.to_string());
        state.outgoing = Some(cookie);
    }

    async fn clear(&self) {
        let cookie = self.cookie(String::new(), Duration::ZERO);
        let mut state = self.state.lock().await;
        state.current = None;
        state.outgoing = Some(cookie);
    }
}

/// Extract the cart cookie from `Cookie` headers.
fn cart_cookie_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == CART_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

// =============================================================================
// Session slot
// =============================================================================

/// Server-side session slot.
#[derive(Debug, Clone)]
pub struct SessionSlot {
    session: Session,
}

impl SessionSlot {
    /// Wrap a request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartIdSlot for SessionSlot {
    async fn read(&self) -> Option<String> {
        match self.session.get::<String>(CART_SESSION_KEY).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read cart id from session");
                None
            }
        }
    }

    async fn write(&self, cart_id: &str) {
        if let Err(e) = self.session.insert(CART_SESSION_KEY, cart_id).await {
            warn!(error = %e, "Failed to store cart id in session");
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.session.remove::<String>(CART_SESSION_KEY).await {
            warn!(error = %e, "Failed to clear cart id from session");
        }
    }
}

// =============================================================================
// In-memory slot
// =============================================================================

/// Process-local slot for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl InMemorySlot {
    /// Slot holding `cart_id`.
    #[must_use]
    pub fn with_value(cart_id: &str) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(cart_id.to_string()))),
        }
    }
}

impl CartIdSlot for InMemorySlot {
    async fn read(&self) -> Option<String> {
        self.value.lock().await.clone()
    }

    async fn write(&self, cart_id: &str) {
        *self.value.lock().await = Some(cart_id.to_string());
    }

    async fn clear(&self) {
        *self.value.lock().await = None;
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// The request's cart identity: cookie slot plus optional session slot.
///
/// Handlers that change the cart ID must finish through [`Self::respond`] so
/// the `Set-Cookie` header reaches the client.
#[derive(Debug, Clone)]
pub struct CartIdentity {
    store: CartIdStore<CookieSlot, Option<SessionSlot>>,
}

impl CartIdentity {
    /// Identity from explicit parts.
    #[must_use]
    pub const fn new(cookie: CookieSlot, session: Option<SessionSlot>) -> Self {
        Self {
            store: CartIdStore::new(cookie, session),
        }
    }

    /// Current cart ID.
    pub async fn load(&self) -> Option<String> {
        self.store.load().await
    }

    /// Persist or forget the cart ID.
    pub async fn save(&self, cart_id: Option<&str>) {
        self.store.save(cart_id).await;
    }

    /// Turn `body` into a response, attaching any pending `Set-Cookie`.
    pub async fn respond(self, body: impl IntoResponse) -> Response {
        let mut response = body.into_response();
        if let Some(value) = self.store.primary().set_cookie_header().await {
            response.headers_mut().append(SET_COOKIE, value);
        }
        response
    }
}

impl FromRequestParts<AppState> for CartIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie = CookieSlot::from_headers(&parts.headers, state.config().is_secure());
        let session = parts.extensions.get::<Session>().cloned().map(SessionSlot::new);
        Ok(Self::new(cookie, session))
    }
}
