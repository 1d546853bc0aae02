//! Use cases: validate, parse, call storage, shape the response.
//!
//! Validation and parse failures are returned before any storage call.
//! Storage errors never escape unwrapped; each is folded into one
//! [`ErrorKind`] with the raw cause kept for logging.

mod create;
mod delete;
pub mod error;
mod get;
mod list;
pub mod parse;
mod total_sum;
mod update;

pub use create::CreateSubscriptionUseCase;
pub use delete::DeleteSubscriptionUseCase;
pub use error::{ErrorKind, UseCaseError};
pub use get::GetSubscriptionUseCase;
pub use list::ListSubscriptionsUseCase;
pub use total_sum::GetTotalSumUseCase;
pub use update::UpdateSubscriptionUseCase;

use crate::services::SubscriptionRepository;
use std::sync::Arc;

/// Every subscription use case, sharing one repository.
#[derive(Clone)]
pub struct SubscriptionUseCases {
    pub create: CreateSubscriptionUseCase,
    pub get: GetSubscriptionUseCase,
    pub update: UpdateSubscriptionUseCase,
    pub delete: DeleteSubscriptionUseCase,
    pub list: ListSubscriptionsUseCase,
    pub total_sum: GetTotalSumUseCase,
}

impl SubscriptionUseCases {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            create: CreateSubscriptionUseCase::new(subscriptions.clone()),
            get: GetSubscriptionUseCase::new(subscriptions.clone()),
            update: UpdateSubscriptionUseCase::new(subscriptions.clone()),
            delete: DeleteSubscriptionUseCase::new(subscriptions.clone()),
            list: ListSubscriptionsUseCase::new(subscriptions.clone()),
            total_sum: GetTotalSumUseCase::new(subscriptions),
        }
    }
}
