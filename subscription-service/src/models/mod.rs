//! Domain models for subscription-service.

mod filter;
mod subscription;

pub use filter::{ListFilter, SumFilter};
pub use subscription::{NewSubscription, Subscription};
