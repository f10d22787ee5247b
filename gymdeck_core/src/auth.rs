//! Opaque authentication collaborator.
//!
//! The core is identity-agnostic: session records are stamped with the
//! profile's user id, and the auth provider is consulted only for display
//! (e.g. showing the signed-in email). Failures here are surfaced as
//! warnings and never affect in-memory state.

use crate::Result;

/// An external identity, used only for display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub email: String,
}

/// Sign-in/sign-out provider boundary
pub trait AuthProvider {
    /// Fire-and-forget sign-out; callers navigate away regardless
    fn sign_out(&self) -> Result<()>;

    /// Currently signed-in identity, if any
    fn current_session(&self) -> Option<AuthSession>;
}

/// Stub provider for local-only operation: never signed in, sign-out
/// always succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct StubAuth;

impl AuthProvider for StubAuth {
    fn sign_out(&self) -> Result<()> {
        tracing::debug!("Stub sign-out");
        Ok(())
    }

    fn current_session(&self) -> Option<AuthSession> {
        None
    }
}
