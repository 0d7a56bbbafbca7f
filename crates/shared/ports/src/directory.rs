use ashmart_core::Actor;
use async_trait::async_trait;

/// Port onto the external user directory.
///
/// Users are owned by the authentication collaborator; the engine only
/// records identities it has seen and asks for the total count.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Record an identity resolved by the authentication layer
    async fn record(&self, actor: &Actor);

    /// Total number of known users
    async fn count(&self) -> usize;
}
