//! Domain → response mapping.

use crate::dtos::{SubscriptionListResponse, SubscriptionResponse};
use crate::models::Subscription;
use crate::usecases::parse::format_date;

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            price: subscription.price,
            user_id: subscription.user_id.hyphenated().to_string(),
            start_date: format_date(subscription.start_date),
            end_date: subscription.end_date.map(format_date),
        }
    }
}

impl From<Vec<Subscription>> for SubscriptionListResponse {
    fn from(subscriptions: Vec<Subscription>) -> Self {
        Self {
            items: subscriptions
                .into_iter()
                .map(SubscriptionResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn subscription(id: i64, end_date: Option<NaiveDate>) -> Subscription {
        Subscription {
            id,
            service_name: "YandexMusic".to_string(),
            price: 500,
            user_id: Uuid::parse_str("60601fee-2bf1-4721-ae6f-7636e79a0cba").unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_date,
        }
    }

    #[test]
    fn test_maps_dates_and_user_id_to_text() {
        let response =
            SubscriptionResponse::from(subscription(7, NaiveDate::from_ymd_opt(2025, 12, 31)));

        assert_eq!(response.id, 7);
        assert_eq!(response.user_id, "60601fee-2bf1-4721-ae6f-7636e79a0cba");
        assert_eq!(response.start_date, "01-07-2025");
        assert_eq!(response.end_date.as_deref(), Some("31-12-2025"));
    }

    #[test]
    fn test_open_ended_subscription_has_no_end_date() {
        let response = SubscriptionResponse::from(subscription(1, None));
        assert_eq!(response.end_date, None);
    }

    #[test]
    fn test_list_preserves_order_and_empty_is_empty() {
        let list = SubscriptionListResponse::from(vec![subscription(2, None), subscription(1, None)]);
        let ids: Vec<i64> = list.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let empty = SubscriptionListResponse::from(Vec::new());
        assert!(empty.items.is_empty());
    }
}
