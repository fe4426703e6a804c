//! Loan product catalog: product records, CSV storage and the in-memory registry

mod data;
mod registry;
pub mod loader;

pub use data::{Product, NewProduct, name_key, MAX_TERM_MONTHS};
pub use registry::{ProductRegistry, RegistryError, default_catalog};
pub use loader::{load_products, load_products_from_reader, write_products, write_products_to_writer};
