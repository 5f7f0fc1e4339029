//! Identity collaborator.

use {anyhow::Result, model::Identity};

/// Resolves the stable identity of the client that submitted the current
/// transaction. Issuance and authentication are external; the mechanism only
/// ever compares identities byte for byte and hashes their raw bytes in the
/// commitment scheme.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    fn current_caller(&self) -> Result<Identity>;
}

/// Provider returning a fixed identity, for hosts that resolve the caller
/// before invoking the mechanism, and for tests.
#[derive(Clone, Debug)]
pub struct StaticCaller(pub Identity);

impl IdentityProvider for StaticCaller {
    fn current_caller(&self) -> Result<Identity> {
        Ok(self.0.clone())
    }
}
