use super::error::{ErrorKind, UseCaseError};
use super::parse::validate_subscription_id;
use crate::dtos::SubscriptionResponse;
use crate::services::SubscriptionRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct GetSubscriptionUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetSubscriptionUseCase {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<SubscriptionResponse, UseCaseError> {
        validate_subscription_id(id)?;

        let subscription = self
            .subscriptions
            .get(id)
            .await
            .map_err(|e| UseCaseError::from_repository(ErrorKind::GetFailed, e))?;

        Ok(subscription.into())
    }
}
