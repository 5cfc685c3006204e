//! Derived financial metrics
//!
//! Closed-form arithmetic over a normalized request: net worth, monthly cash
//! flow, ratios, debt payoff horizons and a 0-100 financial-health score.
//! All functions are total; a zero denominator yields 0.

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedAnalysisRequest;

/// Savings rate (percent of income) earning full marks
const TARGET_SAVINGS_RATE: f64 = 20.0;
/// Months of expenses held in cash earning full marks
const TARGET_EMERGENCY_MONTHS: f64 = 6.0;
/// Debt-to-income band (percent) scored from full marks down to zero
const DTI_HEALTHY: f64 = 15.0;
const DTI_CRITICAL: f64 = 50.0;
/// Credit utilization band (percent) scored from full marks down to zero
const UTILIZATION_HEALTHY: f64 = 10.0;
const UTILIZATION_CRITICAL: f64 = 90.0;
/// Points per health-score component (four components)
const COMPONENT_POINTS: f64 = 25.0;

/// Months needed to retire a debt with a fixed monthly payment
///
/// Uses the standard amortization formula
/// `n = -ln(1 - r*B/P) / ln(1 + r)` with `r` the monthly rate.
/// Returns `None` when the payment never covers the interest.
pub fn months_to_payoff(balance: i64, apr_percent: f64, monthly_payment: i64) -> Option<u32> {
    if balance <= 0 {
        return Some(0);
    }
    if monthly_payment <= 0 {
        return None;
    }

    let balance = balance as f64;
    let payment = monthly_payment as f64;
    let monthly_rate = apr_percent / 100.0 / 12.0;

    let months = if monthly_rate <= 0.0 {
        balance / payment
    } else {
        let interest = balance * monthly_rate;
        if payment <= interest {
            return None;
        }
        -(1.0 - interest / payment).ln() / (1.0 + monthly_rate).ln()
    };

    let months = months.ceil();
    if !months.is_finite() || months > u32::MAX as f64 {
        return None;
    }
    Some(months as u32)
}

/// Payoff outlook for one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoff {
    pub kind: String,
    pub name: String,
    pub balance: i64,
    pub rate: f64,
    pub monthly_payment: i64,
    pub months_to_payoff: Option<u32>,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub net_worth: i64,
    pub monthly_income: i64,
    pub monthly_expenses: i64,
    pub monthly_debt_payments: i64,
    pub monthly_surplus: i64,
    /// Percent of monthly income left after expenses and debt payments
    pub savings_rate: f64,
    /// Percent of monthly income going to debt payments
    pub debt_to_income: f64,
    pub emergency_fund_months: f64,
    /// Percent of total card limits in use
    pub credit_utilization: f64,
    pub health_score: u8,
    pub debts: Vec<DebtPayoff>,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Linear score: full marks at or below `healthy`, zero at or above `critical`
fn descending_score(value: f64, healthy: f64, critical: f64) -> f64 {
    let fraction = (critical - value) / (critical - healthy);
    fraction.clamp(0.0, 1.0) * COMPONENT_POINTS
}

/// Linear score: zero at or below 0, full marks at or above `target`
fn ascending_score(value: f64, target: f64) -> f64 {
    ratio(value, target).clamp(0.0, 1.0) * COMPONENT_POINTS
}

impl FinancialSnapshot {
    pub fn from_request(request: &NormalizedAnalysisRequest) -> Self {
        let liabilities = &request.liabilities;
        let assets = &request.assets;

        let monthly_income = request.income.total_annual_income / 12;
        let monthly_expenses = request.expenses.total_monthly_expenses;

        let mut debts = Vec::new();
        if liabilities.mortgage_balance > 0 {
            debts.push(DebtPayoff {
                kind: "mortgage".to_string(),
                name: "Mortgage".to_string(),
                balance: liabilities.mortgage_balance,
                rate: liabilities.mortgage_rate,
                monthly_payment: liabilities.mortgage_payment,
                months_to_payoff: months_to_payoff(
                    liabilities.mortgage_balance,
                    liabilities.mortgage_rate,
                    liabilities.mortgage_payment,
                ),
            });
        }
        for (kind, loans) in [("auto_loan", &liabilities.auto_loans), ("student_loan", &liabilities.student_loans)] {
            debts.extend(loans.iter().map(|loan| DebtPayoff {
                kind: kind.to_string(),
                name: loan.name.clone(),
                balance: loan.balance,
                rate: loan.rate,
                monthly_payment: loan.payment,
                months_to_payoff: months_to_payoff(loan.balance, loan.rate, loan.payment),
            }));
        }

        let monthly_debt_payments = debts
            .iter()
            .map(|d| d.monthly_payment.max(0))
            .fold(0i64, i64::saturating_add);
        let monthly_surplus = monthly_income
            .saturating_sub(monthly_expenses)
            .saturating_sub(monthly_debt_payments);

        let liquid = assets
            .checking
            .saturating_add(assets.savings)
            .saturating_add(assets.emergency_fund);

        let card_balances = liabilities
            .credit_cards
            .iter()
            .map(|c| c.balance)
            .fold(0i64, i64::saturating_add);
        let card_limits = liabilities
            .credit_cards
            .iter()
            .map(|c| c.limit)
            .fold(0i64, i64::saturating_add);

        let savings_rate = ratio(monthly_surplus as f64, monthly_income as f64) * 100.0;
        let debt_to_income = ratio(monthly_debt_payments as f64, monthly_income as f64) * 100.0;
        let emergency_fund_months = ratio(liquid as f64, monthly_expenses as f64);
        let credit_utilization = ratio(card_balances as f64, card_limits as f64) * 100.0;

        let health_score = if monthly_income <= 0 {
            0
        } else {
            let total = ascending_score(savings_rate, TARGET_SAVINGS_RATE)
                + ascending_score(emergency_fund_months, TARGET_EMERGENCY_MONTHS)
                + descending_score(debt_to_income, DTI_HEALTHY, DTI_CRITICAL)
                + descending_score(credit_utilization, UTILIZATION_HEALTHY, UTILIZATION_CRITICAL);
            total.round().clamp(0.0, 100.0) as u8
        };

        Self {
            net_worth: assets.total_assets.saturating_sub(liabilities.total_liabilities),
            monthly_income,
            monthly_expenses,
            monthly_debt_payments,
            monthly_surplus,
            savings_rate,
            debt_to_income,
            emergency_fund_months,
            credit_utilization,
            health_score,
            debts,
        }
    }
}
