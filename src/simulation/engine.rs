//! Annuity (French / Price table) amortization engine

use log::debug;
use serde::{Deserialize, Serialize};

use crate::product::{Product, MAX_TERM_MONTHS};
use super::error::SimulationError;
use super::result::SimulationResult;
use super::schedule::{AmortizationRow, AmortizationSchedule};

/// How a nominal annual rate is turned into a monthly rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateConvention {
    /// Simple division: `annual / 12 / 100`
    #[default]
    Nominal,
    /// Compounding equivalent: `(1 + annual / 100)^(1/12) - 1`
    EffectiveAnnual,
}

/// Stateless amortization engine
///
/// The engine holds no state beyond its rate convention, so one instance can
/// be shared across threads and called concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationEngine {
    convention: RateConvention,
}

impl SimulationEngine {
    pub fn new(convention: RateConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> RateConvention {
        self.convention
    }

    /// Monthly rate as a decimal for an annual rate given in percent
    pub fn monthly_rate(&self, annual_rate: f64) -> f64 {
        match self.convention {
            RateConvention::Nominal => (annual_rate / 12.0) / 100.0,
            RateConvention::EffectiveAnnual => (1.0 + annual_rate / 100.0).powf(1.0 / 12.0) - 1.0,
        }
    }

    /// Fixed installment for `principal` over `term_months` at `monthly_rate`.
    ///
    /// A zero rate degenerates to `principal / term`; the annuity factor is
    /// undefined there. `(1 + r)^n - 1` is evaluated as `expm1(n * ln_1p(r))`
    /// so rates far below machine epsilon keep their precision. For terms long
    /// enough that the growth factor overflows, the installment converges to
    /// the pure interest payment `principal * r`.
    pub fn installment(&self, principal: f64, term_months: u32, monthly_rate: f64) -> f64 {
        let n = term_months as f64;
        if monthly_rate == 0.0 {
            return principal / n;
        }

        let growth_minus_one = (n * monthly_rate.ln_1p()).exp_m1();
        if growth_minus_one == 0.0 {
            return principal / n;
        }
        if growth_minus_one.is_infinite() {
            return principal * monthly_rate;
        }
        let growth = 1.0 + growth_minus_one;
        principal * (monthly_rate * growth) / growth_minus_one
    }

    /// Validate the inputs and build the full-precision amortization table
    pub fn schedule(
        &self,
        principal: f64,
        term_months: i64,
        product: &Product,
    ) -> Result<AmortizationSchedule, SimulationError> {
        let term = validate(principal, term_months, product)?;
        let monthly_rate = self.monthly_rate(product.annual_rate);
        let installment = self.installment(principal, term, monthly_rate);

        if !installment.is_finite() {
            return Err(SimulationError::InvalidInput(format!(
                "principal {} is too large to simulate",
                principal
            )));
        }

        debug!(
            "Simulating {} over {} months at {}% a.a. ({:?}): installment {:.6}",
            principal, term, product.annual_rate, self.convention, installment
        );

        let mut balance = principal;
        let mut rows = Vec::with_capacity(term as usize);

        for month in 1..=term {
            let interest = balance * monthly_rate;
            let amortization = installment - interest;
            balance -= amortization;

            // abs() absorbs the tiny negative residue left after the last installment
            rows.push(AmortizationRow {
                month,
                installment,
                interest,
                principal: amortization,
                balance: balance.abs(),
            });
        }

        Ok(AmortizationSchedule {
            principal,
            term_months: term,
            annual_rate: product.annual_rate,
            monthly_rate,
            installment,
            rows,
        })
    }

    /// Run a simulation and format it for presentation
    pub fn simulate(
        &self,
        principal: f64,
        term_months: i64,
        product: &Product,
    ) -> Result<SimulationResult, SimulationError> {
        let schedule = self.schedule(principal, term_months, product)?;
        Ok(SimulationResult::from_schedule(&product.name, &schedule))
    }
}

/// Simulate with the default (nominal rate) engine
pub fn simulate(
    principal: f64,
    term_months: i64,
    product: &Product,
) -> Result<SimulationResult, SimulationError> {
    SimulationEngine::default().simulate(principal, term_months, product)
}

/// Check the caller-facing rules; returns the term as a month count
pub(crate) fn validate(principal: f64, term_months: i64, product: &Product) -> Result<u32, SimulationError> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(SimulationError::InvalidInput(format!(
            "principal must be a positive number, got {}",
            principal
        )));
    }

    if term_months < 1 {
        return Err(SimulationError::InvalidInput(format!(
            "term must be a positive number of months, got {}",
            term_months
        )));
    }

    if term_months > MAX_TERM_MONTHS as i64 {
        return Err(SimulationError::InvalidInput(format!(
            "term of {} months exceeds the supported maximum of {}",
            term_months, MAX_TERM_MONTHS
        )));
    }

    if !product.annual_rate.is_finite() || product.annual_rate < 0.0 {
        return Err(SimulationError::InvalidRate(product.annual_rate));
    }

    if term_months > product.max_term as i64 {
        return Err(SimulationError::TermOutOfRange {
            term: term_months,
            max_term: product.max_term,
        });
    }

    Ok(term_months as u32)
}
