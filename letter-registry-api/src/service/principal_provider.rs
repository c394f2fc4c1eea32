use async_trait::async_trait;

use crate::domain::principal::Principal;
use crate::error::{ApiError, ApiResult};

/// Resolves the principal behind the current request or session.
#[async_trait]
pub trait PrincipalProvider: Send + Sync {
    /// Fails with [`ApiError::Unauthenticated`] when there is no active session.
    async fn current_principal(&self) -> ApiResult<Principal>;
}

/// An already-resolved principal is its own provider.
#[async_trait]
impl PrincipalProvider for Principal {
    async fn current_principal(&self) -> ApiResult<Principal> {
        Ok(self.clone())
    }
}

/// Provider for requests without a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

#[async_trait]
impl PrincipalProvider for Anonymous {
    async fn current_principal(&self) -> ApiResult<Principal> {
        Err(ApiError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::principal::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_principal_resolves_to_itself() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let principal = Principal::new(Uuid::new_v4(), [Role::Hr]);
        let resolved = principal.current_principal().await?;
        assert_eq!(resolved, principal);
        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated() {
        assert_eq!(Anonymous.current_principal().await, Err(ApiError::Unauthenticated));
    }
}
