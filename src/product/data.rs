//! Product data structures matching the catalog wire format

use serde::{Deserialize, Serialize};

use super::RegistryError;

/// Longest term any product may offer, in months (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// A registered loan product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable unique identifier
    pub id: String,

    /// Display name, unique under [`name_key`]
    #[serde(rename = "nome")]
    pub name: String,

    /// Nominal annual interest rate in percent (10.5 = 10.5% a.a.)
    #[serde(rename = "taxaJurosAnual")]
    pub annual_rate: f64,

    /// Longest term a simulation may request, in months
    #[serde(rename = "prazoMaximo")]
    pub max_term: u32,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, annual_rate: f64, max_term: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            annual_rate,
            max_term,
        }
    }

    /// Key used for the name uniqueness check
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Registration payload: a product before it has been assigned an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "taxaJurosAnual")]
    pub annual_rate: f64,

    #[serde(rename = "prazoMaximo")]
    pub max_term: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, annual_rate: f64, max_term: u32) -> Self {
        Self {
            name: name.into(),
            annual_rate,
            max_term,
        }
    }

    /// Check the fields a product must satisfy before it can be registered.
    ///
    /// Zero-rate products are accepted; negative or non-finite rates are not.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidProduct("name must not be empty".to_string()));
        }
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(RegistryError::InvalidProduct(format!(
                "annual rate must be a non-negative number, got {}",
                self.annual_rate
            )));
        }
        if self.max_term == 0 {
            return Err(RegistryError::InvalidProduct(
                "maximum term must be at least 1 month".to_string(),
            ));
        }
        if self.max_term > MAX_TERM_MONTHS {
            return Err(RegistryError::InvalidProduct(format!(
                "maximum term must not exceed {} months, got {}",
                MAX_TERM_MONTHS, self.max_term
            )));
        }
        Ok(())
    }

    pub(crate) fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            annual_rate: self.annual_rate,
            max_term: self.max_term,
        }
    }
}

/// Case- and surrounding-whitespace-insensitive form of a product name
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_ignores_case_and_padding() {
        assert_eq!(name_key("  Crédito Pessoal "), name_key("crédito pessoal"));
        assert_eq!(name_key("CREDIÁRIO CAIXA"), "crediário caixa");
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(NewProduct::new("   ", 10.0, 12).validate().is_err());
        assert!(NewProduct::new("Pessoal", -0.5, 12).validate().is_err());
        assert!(NewProduct::new("Pessoal", f64::NAN, 12).validate().is_err());
        assert!(NewProduct::new("Pessoal", 10.0, 0).validate().is_err());
    }

    #[test]
    fn test_validate_caps_maximum_term() {
        assert!(NewProduct::new("Habitacional", 9.0, MAX_TERM_MONTHS).validate().is_ok());
        assert!(matches!(
            NewProduct::new("Habitacional", 9.0, MAX_TERM_MONTHS + 1).validate(),
            Err(RegistryError::InvalidProduct(_))
        ));
        assert!(NewProduct::new("Habitacional", 9.0, u32::MAX).validate().is_err());
    }

    #[test]
    fn test_validate_accepts_zero_rate() {
        assert!(NewProduct::new("Sem Juros", 0.0, 12).validate().is_ok());
    }

    #[test]
    fn test_wire_field_names() {
        let product = Product::new("7", "Veicular", 18.2, 60);
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], "7");
        assert_eq!(json["nome"], "Veicular");
        assert_eq!(json["taxaJurosAnual"], 18.2);
        assert_eq!(json["prazoMaximo"], 60);
    }

    #[test]
    fn test_into_product_trims_name() {
        let product = NewProduct::new("  Consignado ", 6.8, 84).into_product("9".to_string());
        assert_eq!(product.name, "Consignado");
        assert_eq!(product.id, "9");
    }
}
