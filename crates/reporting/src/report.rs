use chrono::NaiveDate;
use core_types::Order;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The final output of the `ReportingEngine`.
///
/// The JSON shape depends on the requested period, matching what the report
/// pages consume, so the enum serializes untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncomeReport {
    Daily(DailyReport),
    Monthly(MonthlyReport),
    Yearly(YearlyReport),
}

/// One day's takings: the total plus the raw paid line items, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_income: Decimal,
    pub orders: Vec<Order>,
}

/// A month's takings, bucketed by calendar day.
///
/// Days without any paid order are omitted rather than zero-filled, and the
/// breakdown is sorted by day number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_income: Decimal,
    pub total_orders: usize,
    pub daily_breakdown: Vec<DayBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// The bucket's calendar date within the anchor month.
    pub date: NaiveDate,
    pub income: Decimal,
    pub count: usize,
}

/// A year's takings, bucketed by calendar month (1-12), sorted by month
/// number. Months without any paid order are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReport {
    pub year: i32,
    pub total_income: Decimal,
    pub total_orders: usize,
    pub monthly_breakdown: Vec<MonthBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub month: u32,
    pub income: Decimal,
    pub count: usize,
}
