//! Local money calculators. No I/O; the only failure is bad numeric input.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;

fn non_negative(value: f64, name: &str) -> Result<f64, ToolError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ToolError::validation(format!("{name} must not be negative")))
    }
}

fn at_least_one(value: u64, name: &str) -> Result<u64, ToolError> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(ToolError::validation(format!("{name} must be at least 1")))
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|e| ToolError::validation(format!("result could not be encoded: {e}")))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipBreakdown {
    pub bill: f64,
    pub tip_percentage: f64,
    pub tip: f64,
    pub total: f64,
}

pub fn tip(bill: f64, percentage: f64) -> Result<TipBreakdown, ToolError> {
    let bill = non_negative(bill, "bill_amount")?;
    let percentage = non_negative(percentage, "tip_percentage")?;
    let tip = bill * percentage / 100.0;
    Ok(TipBreakdown {
        bill,
        tip_percentage: percentage,
        tip,
        total: bill + tip,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitBreakdown {
    pub subtotal: f64,
    pub tip_percentage: f64,
    pub tip: f64,
    pub total: f64,
    pub num_people: u64,
    pub per_person: f64,
}

pub fn split_bill(total: f64, people: u64, percentage: f64) -> Result<SplitBreakdown, ToolError> {
    let people = at_least_one(people, "num_people")?;
    let base = tip(total, percentage)?;
    Ok(SplitBreakdown {
        subtotal: base.bill,
        tip_percentage: base.tip_percentage,
        tip: base.tip,
        total: base.total,
        num_people: people,
        per_person: base.total / people as f64,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestBreakdown {
    pub principal: f64,
    pub annual_rate: f64,
    pub years: u64,
    pub compounds_per_year: u64,
    pub final_amount: f64,
    pub earnings: f64,
}

/// `principal * (1 + r/n)^(n*t)` with `r` given as a percentage.
pub fn compound_interest(
    principal: f64,
    annual_rate: f64,
    years: u64,
    compounds_per_year: u64,
) -> Result<InterestBreakdown, ToolError> {
    let principal = non_negative(principal, "principal")?;
    let annual_rate = non_negative(annual_rate, "annual_rate")?;
    let n = at_least_one(compounds_per_year, "compounds_per_year")?;
    let periods = i32::try_from(n.saturating_mul(years))
        .map_err(|_| ToolError::validation("too many compounding periods"))?;

    let rate = annual_rate / 100.0;
    let final_amount = principal * (1.0 + rate / n as f64).powi(periods);
    Ok(InterestBreakdown {
        principal,
        annual_rate,
        years,
        compounds_per_year: n,
        final_amount,
        earnings: final_amount - principal,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanBreakdown {
    pub principal: f64,
    pub annual_rate: f64,
    pub years: u64,
    pub payments: u64,
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

/// Fixed-rate amortized monthly payment. Interest-free loans divide evenly.
pub fn loan_payment(principal: f64, annual_rate: f64, years: u64) -> Result<LoanBreakdown, ToolError> {
    let principal = non_negative(principal, "principal")?;
    let annual_rate = non_negative(annual_rate, "annual_rate")?;
    let years = at_least_one(years, "years")?;
    let payments = years.saturating_mul(12);
    let count = i32::try_from(payments)
        .map_err(|_| ToolError::validation("loan term is too long"))?;

    let monthly_rate = annual_rate / 100.0 / 12.0;
    let monthly_payment = if monthly_rate == 0.0 {
        principal / payments as f64
    } else {
        let growth = (1.0 + monthly_rate).powi(count);
        principal * monthly_rate * growth / (growth - 1.0)
    };
    let total_paid = monthly_payment * payments as f64;
    Ok(LoanBreakdown {
        principal,
        annual_rate,
        years,
        payments,
        monthly_payment,
        total_paid,
        total_interest: total_paid - principal,
    })
}

pub struct CalculateTipTool;

#[async_trait]
impl Tool for CalculateTipTool {
    fn name(&self) -> &str {
        "CalculateTip"
    }

    fn description(&self) -> &str {
        "Calculate the tip and total for a bill."
    }

    fn group(&self) -> &str {
        "Finance"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("bill_amount", "The bill amount before tip").minimum(0.0),
            ParamSpec::number("tip_percentage", "Tip percentage, e.g. 15, 18, 20").minimum(0.0),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        to_payload(&tip(args.f64("bill_amount")?, args.f64("tip_percentage")?)?)
    }
}

pub struct SplitBillTool;

#[async_trait]
impl Tool for SplitBillTool {
    fn name(&self) -> &str {
        "SplitBill"
    }

    fn description(&self) -> &str {
        "Split a bill, optionally with tip, evenly among several people."
    }

    fn group(&self) -> &str {
        "Finance"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("total_amount", "The total bill amount").minimum(0.0),
            ParamSpec::integer("num_people", "Number of people to split among").minimum(1.0),
            ParamSpec::number("tip_percentage", "Tip percentage to add")
                .minimum(0.0)
                .default_value(json!(0)),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let breakdown = split_bill(
            args.f64("total_amount")?,
            args.u64("num_people")?,
            args.f64("tip_percentage")?,
        )?;
        to_payload(&breakdown)
    }
}

pub struct CompoundInterestTool;

#[async_trait]
impl Tool for CompoundInterestTool {
    fn name(&self) -> &str {
        "CalculateCompoundInterest"
    }

    fn description(&self) -> &str {
        "Calculate how an investment grows with compound interest."
    }

    fn group(&self) -> &str {
        "Finance"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("principal", "Initial investment amount").minimum(0.0),
            ParamSpec::number("annual_rate", "Annual interest rate as a percentage").minimum(0.0),
            ParamSpec::integer("years", "Number of years to invest").minimum(0.0),
            ParamSpec::integer("compounds_per_year", "Times interest compounds per year")
                .minimum(1.0)
                .default_value(json!(12)),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let breakdown = compound_interest(
            args.f64("principal")?,
            args.f64("annual_rate")?,
            args.u64("years")?,
            args.u64("compounds_per_year")?,
        )?;
        to_payload(&breakdown)
    }
}

pub struct LoanPaymentTool;

#[async_trait]
impl Tool for LoanPaymentTool {
    fn name(&self) -> &str {
        "CalculateLoanPayment"
    }

    fn description(&self) -> &str {
        "Calculate the monthly payment, total cost and interest of a loan or mortgage."
    }

    fn group(&self) -> &str {
        "Finance"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("principal", "Loan amount").minimum(0.0),
            ParamSpec::number("annual_rate", "Annual interest rate as a percentage").minimum(0.0),
            ParamSpec::integer("years", "Loan term in years").minimum(1.0),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let breakdown = loan_payment(
            args.f64("principal")?,
            args.f64("annual_rate")?,
            args.u64("years")?,
        )?;
        to_payload(&breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_total_is_bill_plus_tip() {
        for (bill, pct) in [(100.0, 15.0), (42.5, 18.0), (0.0, 20.0), (19.99, 0.0)] {
            let b = tip(bill, pct).unwrap();
            assert_eq!(b.total, bill + bill * pct / 100.0);
        }
        let b = tip(80.0, 25.0).unwrap();
        assert_eq!(b.tip, 20.0);
        assert_eq!(b.total, 100.0);
    }

    #[test]
    fn tip_rejects_negatives() {
        assert_eq!(tip(-1.0, 15.0).unwrap_err().kind(), "validation");
        assert_eq!(tip(10.0, -5.0).unwrap_err().kind(), "validation");
    }

    #[test]
    fn split_divides_total_with_tip() {
        let s = split_bill(90.0, 3, 10.0).unwrap();
        assert_eq!(s.total, 99.0);
        assert!((s.per_person - 33.0).abs() < 1e-9);
        assert!(split_bill(90.0, 0, 10.0).is_err());
    }

    #[test]
    fn compound_interest_monthly() {
        let c = compound_interest(1000.0, 5.0, 10, 12).unwrap();
        assert!((c.final_amount - 1647.01).abs() < 0.01, "{}", c.final_amount);
        assert!((c.earnings - 647.01).abs() < 0.01);
        let flat = compound_interest(500.0, 0.0, 3, 4).unwrap();
        assert_eq!(flat.final_amount, 500.0);
        assert!(compound_interest(500.0, 3.0, 3, 0).is_err());
    }

    #[test]
    fn loan_payment_matches_amortization() {
        let l = loan_payment(200_000.0, 6.0, 30).unwrap();
        assert_eq!(l.payments, 360);
        assert!((l.monthly_payment - 1199.10).abs() < 0.01, "{}", l.monthly_payment);
        assert!((l.total_interest - (l.total_paid - 200_000.0)).abs() < 1e-6);
    }

    #[test]
    fn zero_rate_loan_divides_evenly() {
        let l = loan_payment(12_000.0, 0.0, 1).unwrap();
        assert_eq!(l.monthly_payment, 1000.0);
        assert_eq!(l.total_interest, 0.0);
        assert!(loan_payment(12_000.0, 0.0, 0).is_err());
    }

    #[tokio::test]
    async fn tip_tool_payload() {
        let args = ToolArgs::from_value(json!({"bill_amount": 50, "tip_percentage": 20})).unwrap();
        let out = CalculateTipTool.invoke(&args).await.unwrap();
        assert_eq!(out, json!({"bill": 50.0, "tip_percentage": 20.0, "tip": 10.0, "total": 60.0}));
    }
}
