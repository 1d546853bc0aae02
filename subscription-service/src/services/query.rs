//! Dynamic predicate query construction for list and sum reads.
//!
//! Each present filter field becomes a [`Predicate`]; predicates are folded
//! into a `QueryBuilder` in a fixed order, every value bound positionally.

use crate::models::{ListFilter, SumFilter};
use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

const SELECT_SUBSCRIPTIONS: &str =
    "SELECT id, service_name, price, user_id, start_date, end_date FROM subscriptions WHERE 1=1";

const SELECT_TOTAL_SUM: &str =
    "SELECT COALESCE(SUM(price), 0)::BIGINT FROM subscriptions WHERE 1=1";

/// Comparison applied between a column and its bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

/// Typed value carried by a predicate until it is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    Uuid(Uuid),
    Text(String),
    Date(NaiveDate),
}

/// One optional WHERE-clause condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: &'static str,
    pub operator: Operator,
    pub value: PredicateValue,
}

impl Predicate {
    fn new(column: &'static str, operator: Operator, value: PredicateValue) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }
}

/// Predicates for a list filter: user id, then service name.
pub fn list_predicates(filter: &ListFilter) -> Vec<Predicate> {
    let mut predicates = Vec::new();
    if let Some(user_id) = filter.user_id {
        predicates.push(Predicate::new("user_id", Operator::Eq, PredicateValue::Uuid(user_id)));
    }
    if let Some(service_name) = &filter.service_name {
        predicates.push(Predicate::new(
            "service_name",
            Operator::Eq,
            PredicateValue::Text(service_name.clone()),
        ));
    }
    predicates
}

/// Predicates for a sum filter: user id, service name, then the inclusive
/// bounds on `start_date`.
pub fn sum_predicates(filter: &SumFilter) -> Vec<Predicate> {
    let mut predicates = list_predicates(&ListFilter {
        user_id: filter.user_id,
        service_name: filter.service_name.clone(),
        ..ListFilter::default()
    });
    if let Some(lower) = filter.start_date {
        predicates.push(Predicate::new("start_date", Operator::Gte, PredicateValue::Date(lower)));
    }
    if let Some(upper) = filter.end_date {
        predicates.push(Predicate::new("start_date", Operator::Lte, PredicateValue::Date(upper)));
    }
    predicates
}

fn push_predicates(builder: &mut QueryBuilder<'static, Postgres>, predicates: Vec<Predicate>) {
    for predicate in predicates {
        builder
            .push(" AND ")
            .push(predicate.column)
            .push(" ")
            .push(predicate.operator.as_sql())
            .push(" ");
        match predicate.value {
            PredicateValue::Uuid(value) => builder.push_bind(value),
            PredicateValue::Text(value) => builder.push_bind(value),
            PredicateValue::Date(value) => builder.push_bind(value),
        };
    }
}

/// Paged select; pagination is always bound, even when zero.
pub fn build_list_query(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_SUBSCRIPTIONS);
    push_predicates(&mut builder, list_predicates(filter));
    builder
        .push(" ORDER BY id LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);
    builder
}

/// Aggregate select that yields zero when nothing matches.
pub fn build_sum_query(filter: &SumFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_TOTAL_SUM);
    push_predicates(&mut builder, sum_predicates(filter));
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_list_query_without_filters_still_paginates() {
        let filter = ListFilter {
            limit: 0,
            offset: 0,
            ..ListFilter::default()
        };
        let builder = build_list_query(&filter);

        assert_eq!(
            builder.sql(),
            format!("{} ORDER BY id LIMIT $1 OFFSET $2", SELECT_SUBSCRIPTIONS)
        );
    }

    #[test]
    fn test_list_query_numbers_parameters_in_field_order() {
        let filter = ListFilter {
            user_id: Some(Uuid::new_v4()),
            service_name: Some("Netflix".to_string()),
            limit: 10,
            offset: 20,
        };
        let builder = build_list_query(&filter);

        assert_eq!(
            builder.sql(),
            format!(
                "{} AND user_id = $1 AND service_name = $2 ORDER BY id LIMIT $3 OFFSET $4",
                SELECT_SUBSCRIPTIONS
            )
        );
    }

    #[test]
    fn test_list_query_skips_absent_user_id() {
        let filter = ListFilter {
            service_name: Some("Spotify".to_string()),
            limit: 5,
            ..ListFilter::default()
        };
        let builder = build_list_query(&filter);

        assert_eq!(
            builder.sql(),
            format!(
                "{} AND service_name = $1 ORDER BY id LIMIT $2 OFFSET $3",
                SELECT_SUBSCRIPTIONS
            )
        );
    }

    #[test]
    fn test_sum_query_coalesces_and_bounds_start_date() {
        let filter = SumFilter {
            user_id: Some(Uuid::new_v4()),
            service_name: None,
            start_date: Some(date("2025-01-01")),
            end_date: Some(date("2025-12-31")),
        };
        let builder = build_sum_query(&filter);

        assert_eq!(
            builder.sql(),
            format!(
                "{} AND user_id = $1 AND start_date >= $2 AND start_date <= $3",
                SELECT_TOTAL_SUM
            )
        );
    }

    #[test]
    fn test_sum_query_without_filters_is_unconditional() {
        let builder = build_sum_query(&SumFilter::default());
        assert_eq!(builder.sql(), SELECT_TOTAL_SUM);
    }

    #[test]
    fn test_sum_end_bound_targets_start_date_column() {
        let filter = SumFilter {
            end_date: Some(date("2025-06-30")),
            ..SumFilter::default()
        };
        let predicates = sum_predicates(&filter);

        assert_eq!(
            predicates,
            vec![Predicate::new(
                "start_date",
                Operator::Lte,
                PredicateValue::Date(date("2025-06-30"))
            )]
        );
    }
}
