//! Request authorization for the logs API

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Decides whether a request may use the logs API
///
/// Evaluated before any other handler logic; a `false` answer yields
/// `401 Unauthorized`. Implemented for plain closures:
///
/// ```ignore
/// let only_admins = |parts: &Parts| parts.headers.contains_key("x-admin");
/// ```
pub trait Authorize: Send + Sync + 'static {
    fn is_authorized(&self, parts: &Parts) -> bool;
}

impl<F> Authorize for F
where
    F: Fn(&Parts) -> bool + Send + Sync + 'static,
{
    fn is_authorized(&self, parts: &Parts) -> bool {
        self(parts)
    }
}

/// Lets every request through
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorize for AllowAll {
    fn is_authorized(&self, _parts: &Parts) -> bool {
        true
    }
}

/// Requires `Authorization: Bearer <token>`
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

impl Authorize for BearerToken {
    fn is_authorized(&self, parts: &Parts) -> bool {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|presented| {
                constant_time_eq(presented.trim().as_bytes(), self.token.as_bytes())
            })
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
