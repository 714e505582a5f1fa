use crate::report::{
    DailyReport, DayBucket, IncomeReport, MonthBucket, MonthlyReport, YearlyReport,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use core_types::{Order, Period};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A stateless calculator that buckets paid orders' revenue over a report
/// window.
#[derive(Debug, Default)]
pub struct ReportingEngine {}

impl ReportingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the inclusive `[start, end]` window for a period anchored at
    /// `anchor`, in UTC.
    ///
    /// - `Daily`: the anchor day, 00:00:00.000 to 23:59:59.999.
    /// - `Monthly`: first to last calendar day of the anchor's month.
    /// - `Yearly`: Jan 1 to Dec 31 of the anchor's year.
    pub fn report_window(period: Period, anchor: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let (first_day, last_day) = match period {
            Period::Daily => (anchor, anchor),
            Period::Monthly => {
                let first = anchor.with_day(1).unwrap();
                (first, last_day_of_month(anchor.year(), anchor.month()))
            }
            Period::Yearly => (
                NaiveDate::from_ymd_opt(anchor.year(), 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap(),
            ),
        };

        (
            first_day.and_hms_milli_opt(0, 0, 0, 0).unwrap().and_utc(),
            last_day.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc(),
        )
    }

    /// The main entry point for building an income report.
    ///
    /// # Arguments
    ///
    /// * `orders` - The candidate orders. The engine selects the paid ones
    ///   created inside the window itself, so it accepts either the full
    ///   collection or a set the store already narrowed with the same
    ///   predicate; re-applying the filter is a no-op.
    /// * `period` - The bucketing granularity.
    /// * `anchor` - The date the window is anchored at.
    ///
    /// An empty selection is a valid outcome: zero totals and empty
    /// breakdowns, never an error.
    pub fn build_report(
        &self,
        orders: &[Order],
        period: Period,
        anchor: NaiveDate,
    ) -> IncomeReport {
        let (window_start, window_end) = Self::report_window(period, anchor);

        // 1. Select paid orders created inside the window, oldest first.
        let mut selected: Vec<Order> = orders
            .iter()
            .filter(|o| {
                o.payment_status && o.created_at >= window_start && o.created_at <= window_end
            })
            .cloned()
            .collect();
        selected.sort_by_key(|o| o.created_at);

        // 2. Total income is an exact Decimal sum; rounding is a
        //    presentation concern and happens elsewhere.
        let total_income: Decimal = selected.iter().map(|o| o.price).sum();
        let total_orders = selected.len();

        tracing::debug!(
            %period,
            %anchor,
            total_orders,
            %total_income,
            "built income report selection"
        );

        // 3. Shape the result for the requested period.
        match period {
            Period::Daily => IncomeReport::Daily(DailyReport {
                date: anchor,
                total_income,
                orders: selected,
            }),
            Period::Monthly => {
                // BTreeMap keys keep the breakdown sorted by day number.
                let mut days: BTreeMap<u32, (Decimal, usize)> = BTreeMap::new();
                for order in &selected {
                    let bucket = days.entry(order.created_at.day()).or_default();
                    bucket.0 += order.price;
                    bucket.1 += 1;
                }

                let daily_breakdown = days
                    .into_iter()
                    .map(|(day, (income, count))| DayBucket {
                        date: NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), day)
                            .unwrap(),
                        income,
                        count,
                    })
                    .collect();

                IncomeReport::Monthly(MonthlyReport {
                    year: anchor.year(),
                    month: anchor.month(),
                    total_income,
                    total_orders,
                    daily_breakdown,
                })
            }
            Period::Yearly => {
                let mut months: BTreeMap<u32, (Decimal, usize)> = BTreeMap::new();
                for order in &selected {
                    let bucket = months.entry(order.created_at.month()).or_default();
                    bucket.0 += order.price;
                    bucket.1 += 1;
                }

                let monthly_breakdown = months
                    .into_iter()
                    .map(|(month, (income, count))| MonthBucket {
                        month,
                        income,
                        count,
                    })
                    .collect();

                IncomeReport::Yearly(YearlyReport {
                    year: anchor.year(),
                    total_income,
                    total_orders,
                    monthly_breakdown,
                })
            }
        }
    }
}

/// The last calendar day of a month: the first day of the next month,
/// stepped back by one.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
}
