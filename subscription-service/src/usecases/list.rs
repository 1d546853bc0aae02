use super::error::{ErrorKind, UseCaseError};
use super::parse::{non_empty, parse_user_id};
use crate::dtos::{ListSubscriptionsQuery, SubscriptionListResponse};
use crate::models::ListFilter;
use crate::services::SubscriptionRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct ListSubscriptionsUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ListSubscriptionsUseCase {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    #[instrument(skip(self, query), fields(limit = query.limit, offset = query.offset))]
    pub async fn execute(
        &self,
        query: ListSubscriptionsQuery,
    ) -> Result<SubscriptionListResponse, UseCaseError> {
        if query.limit < 0 {
            return Err(ErrorKind::InvalidLimit.into());
        }
        if query.offset < 0 {
            return Err(ErrorKind::InvalidOffset.into());
        }

        let user_id = non_empty(query.user_id)
            .map(|value| parse_user_id(&value))
            .transpose()?;

        let filter = ListFilter {
            user_id,
            service_name: non_empty(query.service_name),
            limit: query.limit,
            offset: query.offset,
        };

        let subscriptions = self
            .subscriptions
            .get_list(&filter)
            .await
            .map_err(|e| UseCaseError::wrap(ErrorKind::ListFailed, e))?;

        Ok(subscriptions.into())
    }
}
