//! In-memory product registry with name de-duplication

use std::path::Path;

use log::info;
use thiserror::Error;

use super::data::name_key;
use super::loader::{load_products, write_products};
use super::{NewProduct, Product};

/// Errors raised by registry operations and catalog I/O
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a product named '{0}' already exists")]
    DuplicateName(String),

    #[error("duplicate product id '{0}'")]
    DuplicateId(String),

    #[error("invalid product: {0}")]
    InvalidProduct(String),

    #[error("catalog CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Products every fresh catalog starts with
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product::new("1", "Crédito Pessoal", 10.5, 24),
        Product::new("2", "Crediário CAIXA", 8.2, 36),
        Product::new("3", "Empréstimo Consignado", 6.8, 84),
    ]
}

/// Ordered collection of registered products
#[derive(Debug, Clone, Default)]
pub struct ProductRegistry {
    products: Vec<Product>,
}

impl ProductRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with [`default_catalog`]
    pub fn with_defaults() -> Self {
        Self {
            products: default_catalog(),
        }
    }

    /// Build a registry from existing records, enforcing id and name uniqueness
    pub fn from_products(products: Vec<Product>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for product in products {
            if registry.get(&product.id).is_some() {
                return Err(RegistryError::DuplicateId(product.id));
            }
            if registry.find_by_name(&product.name).is_some() {
                return Err(RegistryError::DuplicateName(product.name));
            }
            registry.products.push(product);
        }
        Ok(registry)
    }

    /// Load the catalog at `path`, seeding the defaults when the file does not exist yet
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            info!("No catalog at {}, starting from the default products", path.display());
            return Ok(Self::with_defaults());
        }
        let registry = Self::from_products(load_products(path)?)?;
        info!("Loaded {} products from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Persist the catalog to `path`
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        write_products(path, &self.products)
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Lookup by name, ignoring case and surrounding whitespace
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        let key = name_key(name);
        self.products.iter().find(|p| p.name_key() == key)
    }

    /// Validate and append a new product, assigning it a fresh id
    pub fn register(&mut self, new: NewProduct) -> Result<Product, RegistryError> {
        new.validate()?;
        if self.find_by_name(&new.name).is_some() {
            return Err(RegistryError::DuplicateName(new.name.trim().to_string()));
        }

        let product = new.into_product(self.next_id());
        info!("Registered product {} ({})", product.id, product.name);
        self.products.push(product.clone());
        Ok(product)
    }

    /// Remove the product with `id`; returns whether anything was removed
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        let removed = self.products.len() < before;
        if removed {
            info!("Deleted product {}", id);
        }
        removed
    }

    /// Drop every registered product and restore the defaults
    pub fn reset(&mut self) {
        self.products = default_catalog();
    }

    /// Millisecond timestamp, bumped past any id already taken
    fn next_id(&self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_list() {
        let mut registry = ProductRegistry::with_defaults();
        let created = registry
            .register(NewProduct::new("Financiamento Veicular", 18.2, 60))
            .unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.list().last(), Some(&created));
        assert_eq!(registry.get(&created.id), Some(&created));
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = ProductRegistry::with_defaults();
        let result = registry.register(NewProduct::new("  crédito PESSOAL  ", 12.0, 12));

        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_rejects_invalid_product() {
        let mut registry = ProductRegistry::new();
        assert!(matches!(
            registry.register(NewProduct::new("Pessoal", 10.0, 0)),
            Err(RegistryError::InvalidProduct(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique_for_rapid_registrations() {
        let mut registry = ProductRegistry::new();
        let a = registry.register(NewProduct::new("A", 1.0, 12)).unwrap();
        let b = registry.register(NewProduct::new("B", 1.0, 12)).unwrap();
        let c = registry.register(NewProduct::new("C", 1.0, 12)).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_delete() {
        let mut registry = ProductRegistry::with_defaults();
        assert!(registry.delete("2"));
        assert!(!registry.delete("2"));
        assert!(registry.get("2").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut registry = ProductRegistry::new();
        registry.register(NewProduct::new("Temporário", 3.0, 6)).unwrap();
        registry.reset();

        assert_eq!(registry.list(), default_catalog().as_slice());
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let same_id = vec![
            Product::new("1", "A", 1.0, 12),
            Product::new("1", "B", 1.0, 12),
        ];
        assert!(matches!(
            ProductRegistry::from_products(same_id),
            Err(RegistryError::DuplicateId(_))
        ));

        let same_name = vec![
            Product::new("1", "Pessoal", 1.0, 12),
            Product::new("2", "PESSOAL ", 1.0, 12),
        ];
        assert!(matches!(
            ProductRegistry::from_products(same_name),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_load_missing_catalog_seeds_defaults() {
        let registry = ProductRegistry::load(Path::new("data/does_not_exist.csv")).unwrap();
        assert_eq!(registry.len(), 3);
    }
}
