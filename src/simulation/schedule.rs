//! Full-precision amortization schedule

use serde::{Deserialize, Serialize};

/// One month of the amortization table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Installment number, 1-indexed
    pub month: u32,

    /// Fixed payment for the month
    pub installment: f64,

    /// Interest portion of the payment
    pub interest: f64,

    /// Principal (amortization) portion of the payment
    pub principal: f64,

    /// Outstanding balance after the payment
    pub balance: f64,
}

/// Complete amortization schedule for one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Amount borrowed
    pub principal: f64,

    /// Number of monthly installments
    pub term_months: u32,

    /// Nominal annual rate in percent
    pub annual_rate: f64,

    /// Periodic rate as a decimal (0.01 = 1% a.m.)
    pub monthly_rate: f64,

    /// Fixed monthly payment
    pub installment: f64,

    /// Monthly rows, `term_months` of them
    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    /// Aggregate totals for the schedule
    pub fn summary(&self) -> ScheduleSummary {
        let total_paid = self.installment * self.term_months as f64;
        let interest_paid: f64 = self.rows.iter().map(|r| r.interest).sum();
        let final_balance = self.rows.last().map(|r| r.balance).unwrap_or(self.principal);

        ScheduleSummary {
            total_paid,
            total_interest: total_paid - self.principal,
            interest_paid,
            final_balance,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// `installment * term`
    pub total_paid: f64,

    /// `total_paid - principal`
    pub total_interest: f64,

    /// Sum of the per-row interest; agrees with `total_interest` up to float residue
    pub interest_paid: f64,

    /// Balance after the last installment
    pub final_balance: f64,
}
