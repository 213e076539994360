use crate::domain::{SubscriberEmail, SubscriberId};
use crate::utils::error_chain_fmt;
use async_trait::async_trait;

#[derive(thiserror::Error)]
pub enum DatabaseError {
    #[error("{0}")]
    SubscriptionMismatch(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Remove the subscription held by `email` for subscriber `id`.
    ///
    /// Deleting a subscription that no longer exists is not an error.
    async fn delete_subscription(
        &self,
        id: &SubscriberId,
        email: &SubscriberEmail,
    ) -> Result<(), DatabaseError>;
}
