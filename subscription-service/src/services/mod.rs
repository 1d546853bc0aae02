//! Services module for subscription-service.

pub mod database;
pub mod metrics;
pub mod query;
pub mod repository;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_error, record_subscription_operation};
pub use repository::{PgSubscriptionRepository, RepositoryError, SubscriptionRepository};
