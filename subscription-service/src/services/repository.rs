//! Subscription storage contract and its PostgreSQL implementation.

use crate::models::{ListFilter, NewSubscription, Subscription, SumFilter};
use crate::services::database::Database;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::query::{build_list_query, build_sum_query};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Storage failures, split so callers can tell a missing row from a broken
/// backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("subscription not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(anyhow::Error),
}

impl RepositoryError {
    fn database(context: &str, err: sqlx::Error) -> Self {
        RepositoryError::Database(anyhow::anyhow!("{}: {}", context, err))
    }
}

/// The six storage operations the use cases depend on.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription and return the assigned id.
    async fn create(&self, subscription: &NewSubscription) -> Result<i64, RepositoryError>;

    async fn get(&self, id: i64) -> Result<Subscription, RepositoryError>;

    /// Replace every mutable field of an existing row.
    async fn update(&self, subscription: &Subscription) -> Result<(), RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    async fn get_list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, RepositoryError>;

    /// Sum of `price` over matching rows; zero when none match.
    async fn get_total_sum(&self, filter: &SumFilter) -> Result<i64, RepositoryError>;
}

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    db: Database,
}

impl PgSubscriptionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    #[instrument(skip(self, subscription), fields(user_id = %subscription.user_id))]
    async fn create(&self, subscription: &NewSubscription) -> Result<i64, RepositoryError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_subscription"])
            .start_timer();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscriptions (service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| RepositoryError::database("Failed to create subscription", e))?;

        timer.observe_duration();
        info!(id = id, service_name = %subscription.service_name, "Subscription created");

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Subscription, RepositoryError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_subscription"])
            .start_timer();

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| RepositoryError::database("Failed to get subscription", e))?;

        timer.observe_duration();

        subscription.ok_or_else(|| {
            warn!(id = id, "Subscription not found");
            RepositoryError::NotFound
        })
    }

    #[instrument(skip(self, subscription), fields(id = subscription.id))]
    async fn update(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_subscription"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET service_name = $1, price = $2, user_id = $3, start_date = $4, end_date = $5
            WHERE id = $6
            "#,
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.id)
        .execute(self.db.pool())
        .await
        .map_err(|e| RepositoryError::database("Failed to update subscription", e))?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            warn!(id = subscription.id, "Subscription not found");
            return Err(RepositoryError::NotFound);
        }

        info!(id = subscription.id, "Subscription updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_subscription"])
            .start_timer();

        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(|e| RepositoryError::database("Failed to delete subscription", e))?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            warn!(id = id, "Subscription not found");
            return Err(RepositoryError::NotFound);
        }

        info!(id = id, "Subscription deleted");
        Ok(())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, offset = filter.offset))]
    async fn get_list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, RepositoryError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_subscriptions"])
            .start_timer();

        let mut query = build_list_query(filter);
        let subscriptions = query
            .build_query_as::<Subscription>()
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| RepositoryError::database("Failed to list subscriptions", e))?;

        timer.observe_duration();
        info!(count = subscriptions.len(), "Subscriptions listed");

        Ok(subscriptions)
    }

    #[instrument(skip(self, filter))]
    async fn get_total_sum(&self, filter: &SumFilter) -> Result<i64, RepositoryError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["total_sum"])
            .start_timer();

        let mut query = build_sum_query(filter);
        let total: i64 = query
            .build_query_scalar::<i64>()
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| RepositoryError::database("Failed to get total sum", e))?;

        timer.observe_duration();
        info!(total_sum = total, "Total sum computed");

        Ok(total)
    }
}
