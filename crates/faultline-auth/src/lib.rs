//! # Faultline Auth
//!
//! [`AuthAdapter`] implementations that resolve the user behind the current
//! request from an authentication provider.
//!
//! User context is advisory: a provider failure is logged and reported as
//! "no user", never propagated.
//!
//! - [`SessionAuthAdapter`]: provider exposes a session object carrying the
//!   user's id, email and name
//! - [`IdentityAuthAdapter`]: provider exposes only a user id, optionally
//!   hydrated with a profile lookup

mod identity;
mod session;

pub use identity::{IdentityAuthAdapter, Profile};
pub use session::{Session, SessionAuthAdapter, SessionUser};

pub use faultline_core::{AuthAdapter, AuthUser};

/// Error type returned by provider callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
