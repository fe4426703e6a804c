//! Wire types for the remote simulation endpoint

use serde::{Deserialize, Serialize, Serializer};

use crate::product::{Product, RegistryError};
use super::error::{ErrorKind, ProviderError, SimulationError};

/// `POST /simulacoes` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(rename = "productId", alias = "produtoId")]
    pub product_id: String,

    /// Amount to borrow
    pub valor: f64,

    /// Term in months; accepted as any JSON number, checked by [`Self::term_months`]
    #[serde(serialize_with = "serialize_term")]
    pub prazo: f64,
}

impl SimulationRequest {
    pub fn new(product_id: impl Into<String>, valor: f64, term_months: i64) -> Self {
        Self {
            product_id: product_id.into(),
            valor,
            prazo: term_months as f64,
        }
    }

    /// Term as a whole number of months
    pub fn term_months(&self) -> Result<i64, SimulationError> {
        if !self.prazo.is_finite() || self.prazo.fract() != 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "term must be a whole number of months, got {}",
                self.prazo
            )));
        }
        if self.prazo.abs() > i64::MAX as f64 {
            return Err(SimulationError::InvalidInput(format!(
                "term of {} months is not representable",
                self.prazo
            )));
        }
        Ok(self.prazo as i64)
    }
}

/// Whole terms go out as JSON integers (`12`, not `12.0`)
fn serialize_term<S: Serializer>(prazo: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if prazo.is_finite() && prazo.fract() == 0.0 && prazo.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*prazo as i64)
    } else {
        serializer.serialize_f64(*prazo)
    }
}

/// Error body returned by the remote endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,

    /// Product maximum, present for `TermOutOfRangeError`
    #[serde(rename = "prazoMaximo", default, skip_serializing_if = "Option::is_none")]
    pub max_term: Option<u32>,
}

impl ErrorPayload {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            max_term: None,
        }
    }

    /// Payload for a provider error, if the error has a wire kind
    pub fn from_provider_error(err: &ProviderError) -> Option<Self> {
        match err {
            ProviderError::Simulation(e) => Some(Self::from(e)),
            ProviderError::ProductNotFound(_) => {
                Some(Self::new(ErrorKind::ProductNotFound, err.to_string()))
            }
            ProviderError::Registry(e) => Self::from_registry_error(e),
            _ => None,
        }
    }

    /// Payload for a rejected product registration
    pub fn from_registry_error(err: &RegistryError) -> Option<Self> {
        match err {
            RegistryError::DuplicateName(_) => Some(Self::new(ErrorKind::DuplicateProduct, err.to_string())),
            RegistryError::InvalidProduct(_) => Some(Self::new(ErrorKind::InvalidProduct, err.to_string())),
            _ => None,
        }
    }

    /// Rebuild the typed error on the calling side of a simulation request.
    ///
    /// The payload only carries a kind and a message; the term and the
    /// product the caller sent fill in the structured context.
    pub fn into_provider_error(self, status: u16, product: &Product, term: i64) -> ProviderError {
        match self.kind {
            ErrorKind::InvalidInput => SimulationError::InvalidInput(self.message).into(),
            ErrorKind::TermOutOfRange => SimulationError::TermOutOfRange {
                term,
                max_term: self.max_term.unwrap_or(product.max_term),
            }
            .into(),
            ErrorKind::InvalidRate => SimulationError::InvalidRate(product.annual_rate).into(),
            ErrorKind::ProductNotFound => ProviderError::ProductNotFound(product.id.clone()),
            ErrorKind::DuplicateProduct | ErrorKind::InvalidProduct => ProviderError::Remote {
                status,
                message: self.message,
            },
        }
    }
}

impl From<&SimulationError> for ErrorPayload {
    fn from(err: &SimulationError) -> Self {
        let mut payload = Self::new(err.kind(), err.to_string());
        if let SimulationError::TermOutOfRange { max_term, .. } = err {
            payload.max_term = Some(*max_term);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_both_id_spellings() {
        let a: SimulationRequest =
            serde_json::from_str(r#"{"productId":"1","valor":5000,"prazo":12}"#).unwrap();
        let b: SimulationRequest =
            serde_json::from_str(r#"{"produtoId":"1","valor":5000,"prazo":12}"#).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.term_months(), Ok(12));
    }

    #[test]
    fn test_fractional_term_is_invalid_input() {
        let request = SimulationRequest {
            product_id: "1".into(),
            valor: 5000.0,
            prazo: 12.5,
        };
        assert!(matches!(request.term_months(), Err(SimulationError::InvalidInput(_))));

        let request = SimulationRequest { prazo: f64::NAN, ..request };
        assert!(request.term_months().is_err());
    }

    #[test]
    fn test_term_out_of_range_payload_carries_maximum() {
        let err = SimulationError::TermOutOfRange { term: 99, max_term: 84 };
        let json = serde_json::to_value(ErrorPayload::from(&err)).unwrap();

        assert_eq!(json["kind"], "TermOutOfRangeError");
        assert_eq!(json["prazoMaximo"], 84);
    }

    #[test]
    fn test_whole_term_serializes_as_integer() {
        let body = serde_json::to_string(&SimulationRequest::new("1", 1000.0, 12)).unwrap();
        assert_eq!(body, r#"{"productId":"1","valor":1000.0,"prazo":12}"#);

        let fractional = SimulationRequest {
            product_id: "1".into(),
            valor: 1000.0,
            prazo: 12.5,
        };
        let json = serde_json::to_value(&fractional).unwrap();
        assert_eq!(json["prazo"], 12.5);
    }

    #[test]
    fn test_payload_round_trips_into_typed_error() {
        let product = Product::new("1", "Crédito Pessoal", 10.5, 24);

        let payload: ErrorPayload =
            serde_json::from_str(r#"{"kind":"TermOutOfRangeError","message":"too long"}"#).unwrap();
        assert!(matches!(
            payload.into_provider_error(422, &product, 30),
            ProviderError::Simulation(SimulationError::TermOutOfRange { term: 30, max_term: 24 })
        ));

        let missing = Product::new("42", "Outro", 5.0, 24);
        let payload = ErrorPayload::new(ErrorKind::ProductNotFound, "missing");
        assert!(matches!(
            payload.into_provider_error(404, &missing, 12),
            ProviderError::ProductNotFound(id) if id == "42"
        ));
    }

    #[test]
    fn test_invalid_rate_payload_reports_product_rate() {
        let product = Product::new("5", "Negativo", -2.5, 24);
        let payload = ErrorPayload::new(ErrorKind::InvalidRate, "annual interest rate must be non-negative");

        match payload.into_provider_error(422, &product, 12) {
            ProviderError::Simulation(SimulationError::InvalidRate(rate)) => assert_eq!(rate, -2.5),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_registry_errors_have_payload_kinds() {
        let duplicate = ErrorPayload::from_registry_error(&RegistryError::DuplicateName("Pessoal".into())).unwrap();
        assert_eq!(duplicate.kind, ErrorKind::DuplicateProduct);

        let invalid = ErrorPayload::from_registry_error(&RegistryError::InvalidProduct("empty".into())).unwrap();
        assert_eq!(invalid.kind, ErrorKind::InvalidProduct);

        assert!(ErrorPayload::from_registry_error(&RegistryError::DuplicateId("1".into())).is_none());
    }
}
