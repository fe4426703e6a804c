//! Simulation error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::RegistryError;

/// Input validation failures raised by the engine before any computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Non-finite or non-positive principal, non-positive or non-integer term
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Term above the product's maximum
    #[error("term of {term} months is outside the allowed range 1..={max_term}")]
    TermOutOfRange { term: i64, max_term: u32 },

    /// Negative or non-finite annual rate
    #[error("annual interest rate must be non-negative, got {0}")]
    InvalidRate(f64),
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::InvalidInput(_) => ErrorKind::InvalidInput,
            SimulationError::TermOutOfRange { .. } => ErrorKind::TermOutOfRange,
            SimulationError::InvalidRate(_) => ErrorKind::InvalidRate,
        }
    }
}

/// Error kind names as they appear in error payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "InvalidInputError")]
    InvalidInput,
    #[serde(rename = "TermOutOfRangeError")]
    TermOutOfRange,
    #[serde(rename = "InvalidRateError")]
    InvalidRate,
    #[serde(rename = "ProductNotFoundError")]
    ProductNotFound,
    /// Registration with a name already in the catalog
    #[serde(rename = "DuplicateProductError")]
    DuplicateProduct,
    #[serde(rename = "InvalidProductError")]
    InvalidProduct,
}

/// Failures surfaced by a [`SimulationProvider`](super::SimulationProvider)
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("product '{0}' not found")]
    ProductNotFound(String),

    #[error("could not reach simulation service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("simulation service returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("invalid simulation endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ProviderError {
    /// Payload kind, for errors that have one
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ProviderError::Simulation(e) => Some(e.kind()),
            ProviderError::ProductNotFound(_) => Some(ErrorKind::ProductNotFound),
            ProviderError::Registry(RegistryError::DuplicateName(_)) => Some(ErrorKind::DuplicateProduct),
            ProviderError::Registry(RegistryError::InvalidProduct(_)) => Some(ErrorKind::InvalidProduct),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::TermOutOfRange).unwrap(),
            "\"TermOutOfRangeError\""
        );
        let kind: ErrorKind = serde_json::from_str("\"InvalidRateError\"").unwrap();
        assert_eq!(kind, ErrorKind::InvalidRate);
    }

    #[test]
    fn test_term_out_of_range_message_names_maximum() {
        let err = SimulationError::TermOutOfRange { term: 30, max_term: 24 };
        assert_eq!(err.kind(), ErrorKind::TermOutOfRange);
        assert!(err.to_string().contains("1..=24"));
    }

    #[test]
    fn test_provider_error_kind() {
        let err = ProviderError::from(SimulationError::InvalidRate(-1.0));
        assert_eq!(err.kind(), Some(ErrorKind::InvalidRate));
        assert_eq!(
            ProviderError::ProductNotFound("9".into()).kind(),
            Some(ErrorKind::ProductNotFound)
        );
        assert_eq!(
            ProviderError::Remote { status: 502, message: "bad gateway".into() }.kind(),
            None
        );
        assert_eq!(
            ProviderError::from(RegistryError::DuplicateName("Pessoal".into())).kind(),
            Some(ErrorKind::DuplicateProduct)
        );
    }
}
