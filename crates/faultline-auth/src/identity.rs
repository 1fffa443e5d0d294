//! User-id auth adapter with optional profile hydration

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use faultline_core::{AuthAdapter, AuthUser};
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::BoxError;

/// Contact details looked up for a user id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub email: Option<String>,
    pub name: Option<String>,
}

type IdFetcher =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Option<String>, BoxError>> + Send + Sync>;
type ProfileFetcher =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Option<Profile>, BoxError>> + Send + Sync>;

/// [`AuthAdapter`] for providers whose session holds only a user id
///
/// With [`IdentityAuthAdapter::with_profile`] configured, email and name are
/// filled in by a second lookup. If that lookup is absent or fails, only the
/// id is reported.
#[derive(Clone)]
pub struct IdentityAuthAdapter {
    fetch_user_id: IdFetcher,
    fetch_profile: Option<ProfileFetcher>,
}

impl IdentityAuthAdapter {
    pub fn new<F, Fut>(fetch_user_id: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>, BoxError>> + Send + 'static,
    {
        Self {
            fetch_user_id: Arc::new(move || Box::pin(fetch_user_id())),
            fetch_profile: None,
        }
    }

    pub fn with_profile<F, Fut>(mut self, fetch_profile: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Profile>, BoxError>> + Send + 'static,
    {
        self.fetch_profile = Some(Arc::new(move |id| Box::pin(fetch_profile(id))));
        self
    }

    async fn hydrate(&self, id: &str) -> Profile {
        let Some(fetch_profile) = &self.fetch_profile else {
            return Profile::default();
        };

        match fetch_profile(id.to_string()).await {
            Ok(profile) => profile.unwrap_or_default(),
            Err(error) => {
                debug!(user_id = id, %error, "Profile lookup failed, keeping id only");
                Profile::default()
            }
        }
    }
}

impl fmt::Debug for IdentityAuthAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityAuthAdapter")
            .field("hydrates_profile", &self.fetch_profile.is_some())
            .finish()
    }
}

#[async_trait]
impl AuthAdapter for IdentityAuthAdapter {
    async fn get_user(&self) -> Option<AuthUser> {
        let id = match (self.fetch_user_id)().await {
            Ok(Some(id)) if !id.is_empty() => id,
            Ok(_) => return None,
            Err(error) => {
                warn!(%error, "User id lookup failed, treating user as anonymous");
                return None;
            }
        };

        let profile = self.hydrate(&id).await;
        Some(AuthUser {
            id,
            email: profile.email,
            name: profile.name,
        })
    }
}
