use super::error::{ErrorKind, UseCaseError};
use super::parse::{parse_date, parse_user_id, validate_subscription_id};
use crate::dtos::{Field, UpdateSubscriptionRequest, UpdateSubscriptionResponse};
use crate::models::Subscription;
use crate::services::SubscriptionRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct UpdateSubscriptionUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

/// A patch whose text fields have already been checked and parsed.
struct ParsedPatch {
    service_name: Option<String>,
    price: Option<i64>,
    user_id: Option<Uuid>,
    start_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date.
    end_date: Option<Option<NaiveDate>>,
}

impl ParsedPatch {
    fn parse(request: UpdateSubscriptionRequest) -> Result<Self, ErrorKind> {
        let service_name = match request.service_name {
            Field::Present(name) if name.is_empty() => return Err(ErrorKind::EmptyServiceName),
            field => field.into_option(),
        };
        let user_id = request
            .user_id
            .into_option()
            .map(|value| parse_user_id(&value))
            .transpose()?;
        let start_date = request
            .start_date
            .into_option()
            .map(|value| parse_date(&value))
            .transpose()?;
        let end_date = match request.end_date {
            Field::Absent => None,
            Field::Present(None) => Some(None),
            Field::Present(Some(value)) if value.is_empty() => Some(None),
            Field::Present(Some(value)) => Some(Some(parse_date(&value)?)),
        };

        Ok(Self {
            service_name,
            price: request.price.into_option(),
            user_id,
            start_date,
            end_date,
        })
    }

    fn apply(self, current: &mut Subscription) {
        if let Some(service_name) = self.service_name {
            current.service_name = service_name;
        }
        if let Some(price) = self.price {
            current.price = price;
        }
        if let Some(user_id) = self.user_id {
            current.user_id = user_id;
        }
        if let Some(start_date) = self.start_date {
            current.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            current.end_date = end_date;
        }
    }
}

impl UpdateSubscriptionUseCase {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Apply a field-level patch. Every supplied field is validated before
    /// storage is touched; an empty patch is a no-op reported as
    /// `updated: false`.
    ///
    /// The read and the write are separate storage calls, so a concurrent
    /// update between them is overwritten.
    #[instrument(skip(self, request))]
    pub async fn execute(
        &self,
        id: i64,
        request: UpdateSubscriptionRequest,
    ) -> Result<UpdateSubscriptionResponse, UseCaseError> {
        validate_subscription_id(id)?;

        if request.is_empty() {
            debug!("Empty patch, nothing to update");
            return Ok(UpdateSubscriptionResponse { updated: false });
        }
        let patch = ParsedPatch::parse(request)?;

        let mut subscription = self
            .subscriptions
            .get(id)
            .await
            .map_err(|e| UseCaseError::from_repository(ErrorKind::GetFailed, e))?;

        patch.apply(&mut subscription);

        self.subscriptions
            .update(&subscription)
            .await
            .map_err(|e| UseCaseError::from_repository(ErrorKind::UpdateFailed, e))?;

        Ok(UpdateSubscriptionResponse { updated: true })
    }
}
