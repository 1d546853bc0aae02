use super::error::{ErrorKind, UseCaseError};
use super::parse::validate_subscription_id;
use crate::dtos::DeleteSubscriptionResponse;
use crate::services::SubscriptionRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct DeleteSubscriptionUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl DeleteSubscriptionUseCase {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<DeleteSubscriptionResponse, UseCaseError> {
        validate_subscription_id(id)?;

        self.subscriptions
            .delete(id)
            .await
            .map_err(|e| UseCaseError::from_repository(ErrorKind::DeleteFailed, e))?;

        Ok(DeleteSubscriptionResponse { deleted: true })
    }
}
