//! User resolution contract

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The user attached to a log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl AuthUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Resolves the current user from an auth provider
///
/// User context is advisory: implementations swallow provider failures and
/// return `None`, so logging always proceeds.
#[async_trait]
pub trait AuthAdapter: Send + Sync {
    async fn get_user(&self) -> Option<AuthUser>;
}

#[async_trait]
impl<T: AuthAdapter + ?Sized> AuthAdapter for Arc<T> {
    async fn get_user(&self) -> Option<AuthUser> {
        (**self).get_user().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<AuthUser>);

    #[async_trait]
    impl AuthAdapter for Fixed {
        async fn get_user(&self) -> Option<AuthUser> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_arc_forwards_to_inner() {
        let adapter: Arc<dyn AuthAdapter> =
            Arc::new(Fixed(Some(AuthUser::new("u1").with_email("a@b.c"))));
        let user = adapter.get_user().await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
        assert!(user.name.is_none());
    }
}
