//! Presentation-ready simulation result
//!
//! All monetary fields are fixed-point strings with 2 decimals; the monthly
//! rate carries 4. Rounding happens here and nowhere earlier.

use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationRow, AmortizationSchedule};

/// Decimals for currency and the annual rate
pub const MONEY_DECIMALS: usize = 2;

/// Decimals for the monthly rate
pub const MONTHLY_RATE_DECIMALS: usize = 4;

/// Format `value` with `decimals` fractional digits, never printing a negative zero
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    match formatted.strip_prefix('-') {
        Some(magnitude) if magnitude.chars().all(|c| c == '0' || c == '.') => magnitude.to_string(),
        _ => formatted,
    }
}

fn money(value: f64) -> String {
    format_fixed(value, MONEY_DECIMALS)
}

/// A formatted amortization table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedRow {
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "parcela")]
    pub installment: String,
    #[serde(rename = "juros")]
    pub interest: String,
    #[serde(rename = "amortizacao")]
    pub principal: String,
    #[serde(rename = "saldoDevedor")]
    pub balance: String,
}

impl From<&AmortizationRow> for FormattedRow {
    fn from(row: &AmortizationRow) -> Self {
        Self {
            month: row.month,
            installment: money(row.installment),
            interest: money(row.interest),
            principal: money(row.principal),
            balance: money(row.balance),
        }
    }
}

/// Simulation outcome as handed to the presentation layer and sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(rename = "produto")]
    pub product: String,

    #[serde(rename = "valorEmprestimo")]
    pub principal: String,

    #[serde(rename = "prazo")]
    pub term_months: u32,

    /// Annual rate in percent, 2 decimals
    #[serde(rename = "taxaJurosAnual")]
    pub annual_rate: String,

    /// Monthly rate in percent, 4 decimals
    #[serde(rename = "taxaJurosMensal")]
    pub monthly_rate: String,

    #[serde(rename = "valorParcela")]
    pub installment: String,

    #[serde(rename = "totalPagar")]
    pub total_paid: String,

    #[serde(rename = "totalJuros")]
    pub total_interest: String,

    #[serde(rename = "memoriaCalculo")]
    pub schedule: Vec<FormattedRow>,
}

impl SimulationResult {
    pub fn from_schedule(product_name: &str, schedule: &AmortizationSchedule) -> Self {
        let summary = schedule.summary();

        Self {
            product: product_name.to_string(),
            principal: money(schedule.principal),
            term_months: schedule.term_months,
            annual_rate: format_fixed(schedule.annual_rate, MONEY_DECIMALS),
            monthly_rate: format_fixed(schedule.monthly_rate * 100.0, MONTHLY_RATE_DECIMALS),
            installment: money(schedule.installment),
            total_paid: money(summary.total_paid),
            total_interest: money(summary.total_interest),
            schedule: schedule.rows.iter().map(FormattedRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed_rounding() {
        assert_eq!(format_fixed(4395.794361, 2), "4395.79");
        assert_eq!(format_fixed(0.8333333, 4), "0.8333");
        assert_eq!(format_fixed(100.0, 2), "100.00");
        assert_eq!(format_fixed(-12.5, 2), "-12.50");
    }

    #[test]
    fn test_format_fixed_drops_negative_zero() {
        assert_eq!(format_fixed(-0.0, 2), "0.00");
        assert_eq!(format_fixed(-1.9e-10, 2), "0.00");
        assert_eq!(format_fixed(-0.00004, 4), "0.0000");
    }

    #[test]
    fn test_wire_field_names() {
        let schedule = AmortizationSchedule {
            principal: 100.0,
            term_months: 1,
            annual_rate: 0.0,
            monthly_rate: 0.0,
            installment: 100.0,
            rows: vec![AmortizationRow {
                month: 1,
                installment: 100.0,
                interest: 0.0,
                principal: 100.0,
                balance: 0.0,
            }],
        };
        let json = serde_json::to_value(SimulationResult::from_schedule("Sem Juros", &schedule)).unwrap();

        assert_eq!(json["produto"], "Sem Juros");
        assert_eq!(json["valorEmprestimo"], "100.00");
        assert_eq!(json["prazo"], 1);
        assert_eq!(json["taxaJurosMensal"], "0.0000");
        assert_eq!(json["totalJuros"], "0.00");
        assert_eq!(json["memoriaCalculo"][0]["saldoDevedor"], "0.00");
        assert_eq!(json["memoriaCalculo"][0]["amortizacao"], "100.00");
    }
}
