use super::error::{ErrorKind, UseCaseError};
use super::parse::{parse_date, parse_user_id};
use crate::dtos::{CreateSubscriptionRequest, CreateSubscriptionResponse};
use crate::models::NewSubscription;
use crate::services::SubscriptionRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct CreateSubscriptionUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CreateSubscriptionUseCase {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Validate and store a new subscription. A missing or empty `end_date`
    /// means the subscription is open-ended.
    #[instrument(skip(self, request), fields(service_name = %request.service_name))]
    pub async fn execute(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<CreateSubscriptionResponse, UseCaseError> {
        if request.service_name.is_empty() {
            return Err(ErrorKind::EmptyServiceName.into());
        }
        let user_id = parse_user_id(&request.user_id)?;
        let start_date = parse_date(&request.start_date)?;
        let end_date = match request.end_date.as_deref() {
            None | Some("") => None,
            Some(value) => Some(parse_date(value)?),
        };

        let subscription = NewSubscription {
            service_name: request.service_name,
            price: request.price,
            user_id,
            start_date,
            end_date,
        };

        let id = self
            .subscriptions
            .create(&subscription)
            .await
            .map_err(|e| UseCaseError::wrap(ErrorKind::CreateFailed, e))?;

        Ok(CreateSubscriptionResponse { id })
    }
}
