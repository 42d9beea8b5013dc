use crate::date_utils::{month_abbreviation, shift_months, Period};
use crate::models::{Category, Transaction, TransactionType, DEFAULT_CATEGORY_COLOR};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Number of monthly buckets in the dashboard series, current month included.
pub const MONTHLY_WINDOW: i32 = 6;

/// Flat growth assumed when projecting next month's balance.
const FORECAST_GROWTH: f64 = 1.1;

/// Change indicator reported with every forecast. Not derived from data.
pub const FORECAST_TREND_PERCENT: f64 = 8.0;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Sum that clamps at the `i64` bounds instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

fn percent_of(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

pub fn filter_by_period(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.date, today))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub total_balance_cents: i64,
    pub savings_rate: f64,
    pub essential_expenses_cents: i64,
    pub non_essential_expenses_cents: i64,
}

/// Summarize a transaction set. Expenses without an essential flag count
/// towards the expense total but towards neither essential bucket.
pub fn compute_summary(transactions: &[Transaction]) -> FinancialSummary {
    let mut summary = FinancialSummary::default();

    for t in transactions {
        match t.transaction_type {
            TransactionType::Income => {
                summary.total_income_cents =
                    summary.total_income_cents.saturating_add(t.amount_cents)
            }
            TransactionType::Expense => {
                summary.total_expense_cents =
                    summary.total_expense_cents.saturating_add(t.amount_cents);
                match t.is_essential {
                    Some(true) => {
                        summary.essential_expenses_cents =
                            summary.essential_expenses_cents.saturating_add(t.amount_cents)
                    }
                    Some(false) => {
                        summary.non_essential_expenses_cents =
                            summary.non_essential_expenses_cents.saturating_add(t.amount_cents)
                    }
                    None => {}
                }
            }
        }
    }

    summary.total_balance_cents = summary
        .total_income_cents
        .saturating_sub(summary.total_expense_cents);
    summary.savings_rate = round_to(
        percent_of(summary.total_balance_cents, summary.total_income_cents),
        2,
    );
    summary
}

pub fn compute_period_summary(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> FinancialSummary {
    compute_summary(&filter_by_period(transactions, period, today))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDataPoint {
    pub month: &'static str,
    pub year: i32,
    pub month_number: u32,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
}

/// Build the rolling six-month series ending at `today`'s month, oldest first.
///
/// Buckets are keyed by `(year, month)`, so entries from the same month of an
/// earlier year do not leak into the window.
pub fn build_monthly_series(transactions: &[Transaction], today: NaiveDate) -> Vec<MonthlyDataPoint> {
    let mut series: Vec<MonthlyDataPoint> = (1 - MONTHLY_WINDOW..=0)
        .map(|offset| {
            let month = shift_months(today, offset);
            MonthlyDataPoint {
                month: month_abbreviation(month),
                year: month.year(),
                month_number: month.month(),
                income_cents: 0,
                expense_cents: 0,
                balance_cents: 0,
            }
        })
        .collect();

    let index: HashMap<(i32, u32), usize> = series
        .iter()
        .enumerate()
        .map(|(i, p)| ((p.year, p.month_number), i))
        .collect();

    for t in transactions {
        let Some(&i) = index.get(&(t.date.year(), t.date.month())) else {
            continue;
        };
        match t.transaction_type {
            TransactionType::Income => {
                series[i].income_cents = series[i].income_cents.saturating_add(t.amount_cents)
            }
            TransactionType::Expense => {
                series[i].expense_cents = series[i].expense_cents.saturating_add(t.amount_cents)
            }
        }
    }

    for point in &mut series {
        point.balance_cents = point.income_cents.saturating_sub(point.expense_cents);
    }

    series
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrendPoint {
    #[serde(flatten)]
    pub point: MonthlyDataPoint,
    pub income_trend_cents: f64,
    pub expense_trend_cents: f64,
}

/// Attach cumulative-average income and expense lines to a monthly series.
pub fn with_trend_lines(series: &[MonthlyDataPoint]) -> Vec<MonthlyTrendPoint> {
    let mut income_sum = 0i64;
    let mut expense_sum = 0i64;

    series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            income_sum = income_sum.saturating_add(point.income_cents);
            expense_sum = expense_sum.saturating_add(point.expense_cents);
            let n = (i + 1) as f64;
            MonthlyTrendPoint {
                point: point.clone(),
                income_trend_cents: round_to(income_sum as f64 / n, 2),
                expense_trend_cents: round_to(expense_sum as f64 / n, 2),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub name: String,
    pub value_cents: i64,
    pub percentage: f64,
    pub color: String,
    pub transaction_count: usize,
}

fn category_color<'a>(categories: &'a [Category], name: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.name == name && c.category_type == TransactionType::Expense)
        .or_else(|| categories.iter().find(|c| c.name == name))
        .map(|c| c.color.as_str())
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Spending per category over the expenses in `transactions`.
///
/// Categories without any matching expense are omitted. Labels missing from
/// `categories` are kept with the default color so the percentages always
/// cover the whole expense total.
pub fn build_category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryBreakdown> {
    let mut totals: HashMap<&str, (i64, usize)> = HashMap::new();

    for t in transactions.iter().filter(|t| t.is_expense()) {
        let entry = totals.entry(t.category.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(t.amount_cents);
        entry.1 += 1;
    }

    let total = saturating_sum(totals.values().map(|(cents, _)| *cents));

    let mut result: Vec<CategoryBreakdown> = totals
        .into_iter()
        .map(|(name, (value_cents, transaction_count))| CategoryBreakdown {
            name: name.to_string(),
            value_cents,
            percentage: round_to(percent_of(value_cents, total), 2),
            color: category_color(categories, name).to_string(),
            transaction_count,
        })
        .collect();

    result.sort_by(|a, b| {
        b.value_cents
            .cmp(&a.value_cents)
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EssentialSplit {
    pub essential_percent: i64,
    pub non_essential_percent: i64,
    pub essential_value_cents: i64,
    pub non_essential_value_cents: i64,
}

/// Share of total expenses classified as essential and non-essential. The two
/// percentages add up to less than 100 when some expenses are unclassified.
pub fn compute_essential_split(summary: &FinancialSummary) -> EssentialSplit {
    let total = summary.total_expense_cents;
    EssentialSplit {
        essential_percent: percent_of(summary.essential_expenses_cents, total).round() as i64,
        non_essential_percent: percent_of(summary.non_essential_expenses_cents, total).round()
            as i64,
        essential_value_cents: summary.essential_expenses_cents,
        non_essential_value_cents: summary.non_essential_expenses_cents,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    /// Accepted by clients; the flat-growth forecast never reports it.
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub next_month_cents: i64,
    pub trend: Trend,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

/// Project next month's balance assuming flat 10% growth, rounded to whole
/// currency units.
pub fn compute_forecast(summary: &FinancialSummary) -> Forecast {
    let balance = summary.total_balance_cents;
    // Halves round towards positive infinity, so -16.5 becomes -16.
    let next_month_units = (balance as f64 * FORECAST_GROWTH / 100.0 + 0.5).floor() as i64;

    let alert = match balance.signum() {
        1 => Some("Income growth expected next month".to_string()),
        -1 => Some("Expenses exceed income for this period".to_string()),
        _ => None,
    };

    Forecast {
        next_month_cents: next_month_units.saturating_mul(100),
        trend: if balance > 0 { Trend::Up } else { Trend::Down },
        percentage: FORECAST_TREND_PERCENT,
        alert,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReportRow {
    pub month: &'static str,
    pub year: i32,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
    pub savings_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub rows: Vec<MonthlyReportRow>,
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub total_balance_cents: i64,
    pub average_income_cents: i64,
    pub average_expense_cents: i64,
}

pub fn build_report(series: &[MonthlyDataPoint]) -> MonthlyReport {
    let rows: Vec<MonthlyReportRow> = series
        .iter()
        .map(|p| MonthlyReportRow {
            month: p.month,
            year: p.year,
            income_cents: p.income_cents,
            expense_cents: p.expense_cents,
            balance_cents: p.balance_cents,
            savings_rate: round_to(percent_of(p.balance_cents, p.income_cents), 1),
        })
        .collect();

    let total_income_cents = saturating_sum(series.iter().map(|p| p.income_cents));
    let total_expense_cents = saturating_sum(series.iter().map(|p| p.expense_cents));
    let months = series.len().max(1) as f64;

    MonthlyReport {
        rows,
        total_income_cents,
        total_expense_cents,
        total_balance_cents: total_income_cents.saturating_sub(total_expense_cents),
        average_income_cents: (total_income_cents as f64 / months).round() as i64,
        average_expense_cents: (total_expense_cents as f64 / months).round() as i64,
    }
}
