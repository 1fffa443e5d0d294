//! Session-object auth adapter

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use faultline_core::{AuthAdapter, AuthUser};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::BoxError;

/// User block of a provider session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Session as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn for_user(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// Reshape into an [`AuthUser`]
    ///
    /// Providers that identify users by email alone leave `id` unset, so the
    /// email stands in. A user with neither is treated as anonymous.
    pub fn into_auth_user(self) -> Option<AuthUser> {
        let user = self.user?;
        let id = user.id.or_else(|| user.email.clone())?;
        Some(AuthUser {
            id,
            email: user.email,
            name: user.name,
        })
    }
}

type SessionFetcher =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Option<Session>, BoxError>> + Send + Sync>;

/// [`AuthAdapter`] over a zero-argument session fetch
#[derive(Clone)]
pub struct SessionAuthAdapter {
    fetch: SessionFetcher,
}

impl SessionAuthAdapter {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Session>, BoxError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || Box::pin(fetch())),
        }
    }
}

impl fmt::Debug for SessionAuthAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAuthAdapter").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthAdapter for SessionAuthAdapter {
    async fn get_user(&self) -> Option<AuthUser> {
        match (self.fetch)().await {
            Ok(Some(session)) => {
                let user = session.into_auth_user();
                if user.is_none() {
                    debug!("Session carries no usable user identity");
                }
                user
            }
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "Session lookup failed, treating user as anonymous");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Option<&str>, email: Option<&str>) -> SessionUser {
        SessionUser {
            id: id.map(String::from),
            email: email.map(String::from),
            name: Some("Ada".to_string()),
        }
    }

    #[tokio::test]
    async fn test_session_user_is_reshaped() {
        let adapter = SessionAuthAdapter::new(|| async {
            Ok(Some(Session::for_user(user(Some("u1"), Some("ada@example.com")))))
        });

        let resolved = adapter.get_user().await.unwrap();
        assert_eq!(resolved.id, "u1");
        assert_eq!(resolved.email.as_deref(), Some("ada@example.com"));
        assert_eq!(resolved.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_email_stands_in_for_missing_id() {
        let adapter = SessionAuthAdapter::new(|| async {
            Ok(Some(Session::for_user(user(None, Some("ada@example.com")))))
        });
        assert_eq!(adapter.get_user().await.unwrap().id, "ada@example.com");
    }

    #[tokio::test]
    async fn test_anonymous_session() {
        let adapter =
            SessionAuthAdapter::new(|| async { Ok(Some(Session::for_user(user(None, None)))) });
        assert!(adapter.get_user().await.is_none());

        let adapter = SessionAuthAdapter::new(|| async { Ok(Some(Session::default())) });
        assert!(adapter.get_user().await.is_none());

        let adapter = SessionAuthAdapter::new(|| async { Ok(None) });
        assert!(adapter.get_user().await.is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_swallowed() {
        let adapter = SessionAuthAdapter::new(|| async {
            Err::<Option<Session>, BoxError>("session store unreachable".into())
        });
        assert!(adapter.get_user().await.is_none());
    }

    #[test]
    fn test_session_deserializes_partial_user() {
        let session: Session =
            serde_json::from_str(r#"{"user":{"email":"ada@example.com"}}"#).unwrap();
        assert_eq!(session.into_auth_user().unwrap().id, "ada@example.com");
    }
}
