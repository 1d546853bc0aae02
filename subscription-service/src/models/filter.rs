//! Filter value objects for read queries.

use chrono::NaiveDate;
use uuid::Uuid;

/// One page of subscriptions, optionally narrowed by exact-match fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Criteria for aggregating spend.
///
/// Both date bounds are inclusive and apply to the subscription's
/// `start_date` column: `end_date` here is the latest start date counted,
/// not a bound on the subscription's own end date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SumFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
