//! Loan simulation: annuity amortization engine, result formatting and providers

mod error;
mod engine;
mod schedule;
mod result;
mod request;
mod provider;

pub use error::{SimulationError, ProviderError, ErrorKind};
pub use engine::{SimulationEngine, RateConvention, simulate};
pub use schedule::{AmortizationRow, AmortizationSchedule, ScheduleSummary};
pub use result::{SimulationResult, FormattedRow, format_fixed};
pub use request::{SimulationRequest, ErrorPayload};
pub use provider::{
    SimulationProvider, LocalSimulationEngine, RemoteSimulationProvider, RemoteConfig,
};
