use super::error::{ErrorKind, UseCaseError};
use super::parse::{non_empty, parse_date, parse_user_id};
use crate::dtos::{TotalSumQuery, TotalSumResponse};
use crate::models::SumFilter;
use crate::services::SubscriptionRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct GetTotalSumUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetTotalSumUseCase {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Total price of every subscription matching the supplied criteria.
    /// Both date bounds are inclusive and compare against `start_date`.
    #[instrument(skip(self, query))]
    pub async fn execute(&self, query: TotalSumQuery) -> Result<TotalSumResponse, UseCaseError> {
        let user_id = non_empty(query.user_id)
            .map(|value| parse_user_id(&value))
            .transpose()?;
        let start_date = non_empty(query.start_date)
            .map(|value| parse_date(&value))
            .transpose()?;
        let end_date = non_empty(query.end_date)
            .map(|value| parse_date(&value))
            .transpose()?;

        let filter = SumFilter {
            user_id,
            service_name: non_empty(query.service_name),
            start_date,
            end_date,
        };

        let total_sum = self
            .subscriptions
            .get_total_sum(&filter)
            .await
            .map_err(|e| UseCaseError::wrap(ErrorKind::SumFailed, e))?;

        Ok(TotalSumResponse { total_sum })
    }
}
