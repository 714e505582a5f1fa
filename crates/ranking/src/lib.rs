//! # Atelier Order Ranking Engine
//!
//! Produces the ordered, filtered view of the order book that the shop staff
//! work from. It acts as the single source of truth for "what should be done
//! next".
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `rank` is a pure function over an in-memory
//!   collection and an explicit evaluation instant. It never fails, performs
//!   no I/O and keeps no cache, so it is safe to call repeatedly and
//!   concurrently.
//!
//! ## Public API
//!
//! - `rank`: filters and stable-sorts a collection of orders.
//! - `priority_score`: the urgency score used by the default sort.
//! - `RankParams`, `Tab`, `SortBy`, `SortOrder`: the recognized options.

use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Order, ProcessingStatus};
use serde::Deserialize;

/// Which slice of the order book a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    All,
    /// Everything that is not yet completed. The default working view.
    #[default]
    Ongoing,
    Completed,
}

/// The field a ranked view is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Priority,
    PickupDate,
    QueueNumber,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// The full set of recognized filter and sort options.
///
/// Every filter is optional; an unset or empty filter is a no-op and filters
/// compose as logical AND. Defaults match the staff working view: ongoing
/// orders, ascending priority score.
#[derive(Debug, Clone, Default)]
pub struct RankParams {
    pub tab: Tab,
    /// Exact match on processing status, applied after the tab filter.
    pub status_filter: Option<ProcessingStatus>,
    /// Keep orders whose queue number, as decimal text, contains this.
    pub queue_substring: Option<String>,
    /// Keep orders whose customer name (case-insensitive) or phone (exact
    /// substring) contains this.
    pub search_text: Option<String>,
    /// Keep orders picked up on this calendar day (UTC).
    pub pickup_date_exact: Option<NaiveDate>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// Filters and stable-sorts `orders` according to `params`.
///
/// `now` is the evaluation instant for the priority score; callers pass
/// `Utc::now()` in production and a fixed instant in tests.
///
/// The sort is stable: orders with an equal sort key keep their relative
/// input order, for ascending and descending runs alike (`Desc` reverses the
/// comparator, never the output). Ascending priority means least urgent
/// first; urgent-first views request `SortOrder::Desc`.
pub fn rank(orders: &[Order], params: &RankParams, now: DateTime<Utc>) -> Vec<Order> {
    // 1. Filter. Each predicate is independent and an unset filter keeps
    //    everything.
    let kept = orders.iter().filter(|o| matches_filters(o, params));

    // 2. Score once per surviving order, then stable-sort on the chosen key.
    let mut scored: Vec<(i64, Order)> = kept
        .map(|o| (priority_score(o, now), o.clone()))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        let ordering = match params.sort_by {
            SortBy::Priority => score_a.cmp(score_b),
            SortBy::PickupDate => a.pickup_date.cmp(&b.pickup_date),
            SortBy::QueueNumber => a.queue_number.cmp(&b.queue_number),
            SortBy::Price => a.price.cmp(&b.price),
        };
        match params.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    scored.into_iter().map(|(_, order)| order).collect()
}

/// Applies the tab, status, queue, search and pickup-date filters as a
/// single AND-composed predicate.
fn matches_filters(order: &Order, params: &RankParams) -> bool {
    let tab_ok = match params.tab {
        Tab::All => true,
        Tab::Ongoing => order.processing_status != ProcessingStatus::Completed,
        Tab::Completed => order.processing_status == ProcessingStatus::Completed,
    };
    if !tab_ok {
        return false;
    }

    if let Some(status) = params.status_filter {
        if order.processing_status != status {
            return false;
        }
    }

    if let Some(queue) = params.queue_substring.as_deref() {
        if !queue.is_empty() && !order.queue_number.to_string().contains(queue) {
            return false;
        }
    }

    if let Some(search) = params.search_text.as_deref() {
        if !search.is_empty() {
            let name_hit = order
                .customer_name
                .to_lowercase()
                .contains(&search.to_lowercase());
            let phone_hit = order.customer_phone.contains(search);
            if !name_hit && !phone_hit {
                return false;
            }
        }
    }

    if let Some(day) = params.pickup_date_exact {
        if order.pickup_date.date_naive() != day {
            return false;
        }
    }

    true
}

/// Computes the urgency score of an order at the instant `now`.
/// Higher means more urgent.
///
/// Workflow stage contributes 100 (not started) / 50 (in progress) / 0
/// (completed); due-date proximity contributes 200 / 150 / 100 / 50 / 0 by
/// tier; an unpaid order loses 10.
///
/// Overdue and due-today orders land in the same top proximity tier, however
/// long overdue they are. That is a deliberate simplification: the shop only
/// needs "deal with it now", not a severity gradient among late orders.
pub fn priority_score(order: &Order, now: DateTime<Utc>) -> i64 {
    let days_until_pickup = days_until(order.pickup_date, now);

    let mut score: i64 = match order.processing_status {
        ProcessingStatus::NotStarted => 100,
        ProcessingStatus::InProgress => 50,
        ProcessingStatus::Completed => 0,
    };

    score += if days_until_pickup <= 0 {
        200
    } else if days_until_pickup <= 1 {
        150
    } else if days_until_pickup <= 3 {
        100
    } else if days_until_pickup <= 7 {
        50
    } else {
        0
    };

    if !order.payment_status {
        score -= 10;
    }

    score
}

/// Whole days from `now` until `pickup`, rounded up on a millisecond delta.
/// Negative when the pickup date is already past. A pickup timestamp at or
/// before `now` (pickup dates are midnight-granular, so "later today" is
/// one of these) rounds to <= 0 and lands in the top urgency tier.
fn days_until(pickup: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = 86_400_000;
    // `i64::div_ceil` is still unstable (`int_roundings`); this is the
    // equivalent ceiling division given DAY_MS > 0.
    let delta = (pickup - now).num_milliseconds();
    let (quotient, remainder) = (delta / DAY_MS, delta % DAY_MS);
    if remainder > 0 { quotient + 1 } else { quotient }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::ServiceType;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 10, 0, 0).unwrap()
    }

    fn order(
        queue_number: i32,
        status: ProcessingStatus,
        pickup_offset_days: i64,
        paid: bool,
    ) -> Order {
        Order {
            id: Uuid::new_v4(),
            queue_number,
            customer_name: format!("Customer {queue_number}"),
            customer_phone: format!("08{queue_number:08}"),
            service_type: ServiceType::Sew,
            notes: None,
            pickup_date: now() + Duration::days(pickup_offset_days),
            price: Decimal::from(queue_number * 100),
            payment_status: paid,
            processing_status: status,
            image_refs: vec![],
            created_at: now() - Duration::days(1),
            updated_at: now() - Duration::days(1),
        }
    }

    #[test]
    fn score_tiers_follow_pickup_proximity() {
        let base = |offset| {
            let mut o = order(1, ProcessingStatus::Completed, 0, true);
            o.pickup_date = now() + Duration::days(offset);
            o
        };

        assert_eq!(priority_score(&base(-30), now()), 200); // long overdue
        assert_eq!(priority_score(&base(0), now()), 200); // due now
        assert_eq!(priority_score(&base(1), now()), 150); // due tomorrow
        assert_eq!(priority_score(&base(3), now()), 100);
        assert_eq!(priority_score(&base(7), now()), 50);
        assert_eq!(priority_score(&base(8), now()), 0);
    }

    #[test]
    fn overdue_and_due_today_share_the_top_tier() {
        let one_day_late = order(1, ProcessingStatus::InProgress, -1, true);
        let thirty_days_late = order(2, ProcessingStatus::InProgress, -30, true);
        assert_eq!(
            priority_score(&one_day_late, now()),
            priority_score(&thirty_days_late, now())
        );
    }

    #[test]
    fn pickup_later_today_counts_as_due_now() {
        // Pickup stored at midnight of the current day, i.e. before "now".
        let mut o = order(1, ProcessingStatus::Completed, 0, true);
        o.pickup_date = Utc.with_ymd_and_hms(2026, 8, 20, 0, 0, 0).unwrap();
        assert_eq!(priority_score(&o, now()), 200);
    }

    #[test]
    fn unpaid_orders_lose_ten_points() {
        let paid = order(1, ProcessingStatus::NotStarted, 0, true);
        let unpaid = order(2, ProcessingStatus::NotStarted, 0, false);
        assert_eq!(priority_score(&paid, now()), 300);
        assert_eq!(priority_score(&unpaid, now()), 290);
    }

    #[test]
    fn ascending_priority_puts_least_urgent_first() {
        // Scenario from the shop floor: an untouched, unpaid order due today
        // scores 290; a completed, paid order a month out scores 0. Ascending
        // score shows the quiet one first.
        let a = order(1, ProcessingStatus::NotStarted, 0, false);
        let b = order(2, ProcessingStatus::Completed, 30, true);

        let params = RankParams {
            tab: Tab::All,
            sort_by: SortBy::Priority,
            sort_order: SortOrder::Asc,
            ..RankParams::default()
        };
        let ranked = rank(&[a.clone(), b.clone()], &params, now());
        assert_eq!(ranked[0].id, b.id);
        assert_eq!(ranked[1].id, a.id);

        // The urgent-first working view is the same ranking, descending.
        let desc = RankParams {
            sort_order: SortOrder::Desc,
            ..params
        };
        let ranked = rank(&[a.clone(), b.clone()], &desc, now());
        assert_eq!(ranked[0].id, a.id);
    }

    #[test]
    fn sort_is_stable_on_equal_keys() {
        // Same score, same price, same pickup date: input order must survive,
        // ascending and descending alike.
        let mut a = order(1, ProcessingStatus::NotStarted, 5, true);
        let mut b = order(2, ProcessingStatus::NotStarted, 5, true);
        a.price = dec!(100);
        b.price = dec!(100);
        a.pickup_date = b.pickup_date;

        for sort_order in [SortOrder::Asc, SortOrder::Desc] {
            let params = RankParams {
                tab: Tab::All,
                sort_by: SortBy::Price,
                sort_order,
                ..RankParams::default()
            };
            let ranked = rank(&[a.clone(), b.clone()], &params, now());
            assert_eq!(ranked[0].id, a.id, "{sort_order:?} broke stability");
            assert_eq!(ranked[1].id, b.id);
        }
    }

    #[test]
    fn tab_filters_partition_the_order_book() {
        let orders = vec![
            order(1, ProcessingStatus::NotStarted, 2, false),
            order(2, ProcessingStatus::InProgress, 2, false),
            order(3, ProcessingStatus::Completed, 2, true),
        ];

        let view = |tab| {
            rank(
                &orders,
                &RankParams {
                    tab,
                    ..RankParams::default()
                },
                now(),
            )
        };

        assert_eq!(view(Tab::All).len(), 3);
        assert_eq!(view(Tab::Ongoing).len(), 2);
        assert_eq!(view(Tab::Completed).len(), 1);
    }

    #[test]
    fn filters_compose_as_and_and_never_grow_the_result() {
        let orders = vec![
            order(11, ProcessingStatus::NotStarted, 2, false),
            order(12, ProcessingStatus::InProgress, 2, false),
            order(21, ProcessingStatus::NotStarted, 4, true),
        ];

        let base = RankParams {
            tab: Tab::All,
            ..RankParams::default()
        };
        let all = rank(&orders, &base, now());

        let narrowed = RankParams {
            tab: Tab::All,
            queue_substring: Some("1".to_string()),
            status_filter: Some(ProcessingStatus::NotStarted),
            ..RankParams::default()
        };
        let subset = rank(&orders, &narrowed, now());

        assert!(subset.len() <= all.len());
        for o in &subset {
            assert!(all.iter().any(|kept| kept.id == o.id));
            assert_eq!(o.processing_status, ProcessingStatus::NotStarted);
            assert!(o.queue_number.to_string().contains('1'));
        }
        assert_eq!(subset.len(), 2); // queues 11 and 21
    }

    #[test]
    fn search_matches_name_case_insensitively_and_phone_exactly() {
        let mut a = order(1, ProcessingStatus::NotStarted, 2, false);
        a.customer_name = "Khun Malee".to_string();
        a.customer_phone = "0812345678".to_string();
        let b = order(2, ProcessingStatus::NotStarted, 2, false);

        let by_name = RankParams {
            tab: Tab::All,
            search_text: Some("malee".to_string()),
            ..RankParams::default()
        };
        assert_eq!(rank(&[a.clone(), b.clone()], &by_name, now()).len(), 1);

        let by_phone = RankParams {
            tab: Tab::All,
            search_text: Some("2345".to_string()),
            ..RankParams::default()
        };
        let hits = rank(&[a.clone(), b.clone()], &by_phone, now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a.id);
    }

    #[test]
    fn pickup_date_filter_compares_calendar_days() {
        let mut a = order(1, ProcessingStatus::NotStarted, 0, false);
        // Late in the evening of the same UTC day.
        a.pickup_date = Utc.with_ymd_and_hms(2026, 8, 22, 21, 30, 0).unwrap();
        let b = order(2, ProcessingStatus::NotStarted, 10, false);

        let params = RankParams {
            tab: Tab::All,
            pickup_date_exact: NaiveDate::from_ymd_opt(2026, 8, 22),
            ..RankParams::default()
        };
        let hits = rank(&[a.clone(), b], &params, now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a.id);
    }

    #[test]
    fn empty_filters_are_no_ops() {
        let orders = vec![order(1, ProcessingStatus::NotStarted, 2, false)];
        let params = RankParams {
            tab: Tab::All,
            queue_substring: Some(String::new()),
            search_text: Some(String::new()),
            ..RankParams::default()
        };
        assert_eq!(rank(&orders, &params, now()).len(), 1);
    }

    #[test]
    fn rank_is_idempotent() {
        let orders = vec![
            order(3, ProcessingStatus::NotStarted, 1, false),
            order(1, ProcessingStatus::InProgress, 0, true),
            order(2, ProcessingStatus::NotStarted, 9, true),
            order(4, ProcessingStatus::Completed, 2, false),
        ];
        for sort_by in [
            SortBy::Priority,
            SortBy::PickupDate,
            SortBy::QueueNumber,
            SortBy::Price,
        ] {
            let params = RankParams {
                tab: Tab::All,
                sort_by,
                ..RankParams::default()
            };
            let once = rank(&orders, &params, now());
            let twice = rank(&once, &params, now());
            assert_eq!(once, twice, "{sort_by:?} is not idempotent");
        }
    }

    #[test]
    fn sorts_by_raw_fields_when_requested() {
        let orders = vec![
            order(2, ProcessingStatus::NotStarted, 5, false),
            order(3, ProcessingStatus::NotStarted, 1, false),
            order(1, ProcessingStatus::NotStarted, 9, false),
        ];

        let by_queue = RankParams {
            tab: Tab::All,
            sort_by: SortBy::QueueNumber,
            ..RankParams::default()
        };
        let ranked = rank(&orders, &by_queue, now());
        let queues: Vec<i32> = ranked.iter().map(|o| o.queue_number).collect();
        assert_eq!(queues, vec![1, 2, 3]);

        let by_pickup_desc = RankParams {
            tab: Tab::All,
            sort_by: SortBy::PickupDate,
            sort_order: SortOrder::Desc,
            ..RankParams::default()
        };
        let ranked = rank(&orders, &by_pickup_desc, now());
        let queues: Vec<i32> = ranked.iter().map(|o| o.queue_number).collect();
        assert_eq!(queues, vec![1, 2, 3]); // 9, 5, 1 days out
    }
}
