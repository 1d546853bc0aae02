//! Subscription model.

use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

/// A recurring paid subscription as stored.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Subscription {
    pub id: i64,
    pub service_name: String,
    /// Amount in minor currency units.
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    /// `None` for an open-ended subscription.
    pub end_date: Option<NaiveDate>,
}

/// A subscription that has not been persisted yet; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewSubscription {
    /// Attach the storage-assigned id.
    pub fn into_subscription(self, id: i64) -> Subscription {
        Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
