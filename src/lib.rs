//! Loan Simulator - product catalog and French amortization engine
//!
//! This library provides:
//! - Loan product registry with CSV-backed catalog
//! - Annuity (Price table) simulations with full month-by-month schedules
//! - Local and remote simulation providers behind one trait
//! - Request handling for the remote simulation endpoint
//! - Parallel batch simulation

pub mod product;
pub mod simulation;
pub mod api;
pub mod config;
pub mod scenario;

// Re-export commonly used types
pub use product::{Product, NewProduct, ProductRegistry};
pub use simulation::{
    simulate, SimulationEngine, SimulationResult, SimulationError, SimulationProvider,
    SimulationRequest, AmortizationSchedule,
};
pub use config::AppConfig;
pub use scenario::SimulationRunner;
