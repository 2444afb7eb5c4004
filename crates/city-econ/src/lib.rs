#![deny(warnings)]

//! Economic and satisfaction models for the city simulation.
//!
//! This crate provides the pure daily computations:
//! - Income tax and VAT revenue, including the per-family income update
//! - Building upkeep, city-services and utility operation costs
//! - Satisfaction terms, the capped daily delta ledger and the high-end
//!   compression curve
//!
//! Nothing here owns city state; callers pass slices and ratios in and apply
//! the returned figures.

pub mod economy;
pub mod satisfaction;

pub use economy::{
    compute_expenses, compute_income, shortage_notes, spending_multiplier, ExpenseReport,
    IncomeReport,
};
pub use satisfaction::{
    compress_high, income_tax_impact, service_bonus, shortage_penalty, vat_impact,
    SatisfactionBreakdown, SatisfactionLedger, MAX_DAILY_DECREASE, MAX_DAILY_INCREASE,
};
