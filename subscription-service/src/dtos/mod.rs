//! Boundary shapes for subscription operations.
//!
//! Dates travel as `DD-MM-YYYY` text and user ids as hyphenated UUID text.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A patch field that remembers whether the client sent it at all.
///
/// Mark each field `#[serde(default)]` so a missing key stays `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Absent => None,
            Field::Present(value) => Some(value),
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Field::Present)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateSubscriptionRequest {
    #[schema(example = "Netflix")]
    pub service_name: String,
    /// Minor currency units.
    #[schema(example = 2000)]
    pub price: i64,
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    #[schema(example = "01-01-2025")]
    pub start_date: String,
    #[schema(example = "31-12-2025")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionResponse {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    #[schema(example = "Netflix")]
    pub service_name: String,
    pub price: i64,
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    #[schema(example = "01-01-2025")]
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Field-level patch. Omitted fields are left unchanged; `end_date` sent as
/// `""` or `null` clears the end date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Spotify")]
    pub service_name: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 975)]
    pub price: Field<i64>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub user_id: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "01-02-2025")]
    pub start_date: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "30-11-2025")]
    pub end_date: Field<Option<String>>,
}

impl UpdateSubscriptionRequest {
    /// True when the client supplied no field at all.
    pub fn is_empty(&self) -> bool {
        self.service_name.is_absent()
            && self.price.is_absent()
            && self.user_id.is_absent()
            && self.start_date.is_absent()
            && self.end_date.is_absent()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateSubscriptionResponse {
    pub updated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteSubscriptionResponse {
    pub deleted: bool,
}

/// An omitted `limit` reads as 0, which selects an empty page.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSubscriptionsQuery {
    /// User ID (UUID)
    pub user_id: Option<String>,
    /// Exact service name
    pub service_name: Option<String>,
    /// Page size
    #[serde(default)]
    pub limit: i64,
    /// Rows to skip
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionListResponse {
    pub items: Vec<SubscriptionResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalSumQuery {
    /// User ID (UUID)
    pub user_id: Option<String>,
    /// Exact service name
    pub service_name: Option<String>,
    /// Earliest subscription start date counted (DD-MM-YYYY)
    pub start_date: Option<String>,
    /// Latest subscription start date counted (DD-MM-YYYY)
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TotalSumResponse {
    pub total_sum: i64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "subscription not found")]
    pub error: String,
}
