//! Load and store the product catalog as CSV
//!
//! Columns: `id,nome,taxaJurosAnual,prazoMaximo`

use std::io::{Read, Write};
use std::path::Path;

use csv::{Reader, Writer};

use super::{NewProduct, Product, RegistryError};

/// Default path to the product catalog
pub const DEFAULT_CATALOG_PATH: &str = "data/products.csv";

/// Raw CSV row matching the catalog columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "id")]
    id: String,
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "taxaJurosAnual")]
    annual_rate: f64,
    #[serde(rename = "prazoMaximo")]
    max_term: u32,
}

impl CsvRow {
    fn to_product(self) -> Result<Product, RegistryError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(RegistryError::InvalidProduct(format!(
                "catalog row for '{}' has an empty id",
                self.name
            )));
        }

        let new = NewProduct::new(self.name, self.annual_rate, self.max_term);
        new.validate()?;
        Ok(new.into_product(id))
    }
}

/// Load all products from a CSV file
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<Product>, RegistryError> {
    let file = std::fs::File::open(path)?;
    load_products_from_reader(file)
}

/// Load products from any reader (e.g., string buffer, request body)
pub fn load_products_from_reader<R: Read>(reader: R) -> Result<Vec<Product>, RegistryError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut products = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        products.push(row.to_product()?);
    }

    Ok(products)
}

/// Write products to a CSV file, replacing its contents
pub fn write_products<P: AsRef<Path>>(path: P, products: &[Product]) -> Result<(), RegistryError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_products_to_writer(file, products)
}

/// Write products as CSV to any writer
pub fn write_products_to_writer<W: Write>(writer: W, products: &[Product]) -> Result<(), RegistryError> {
    let mut csv_writer = Writer::from_writer(writer);
    for product in products {
        csv_writer.serialize(product)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "id,nome,taxaJurosAnual,prazoMaximo\n\
                           1,Crédito Pessoal,10.5,24\n\
                           2, Crediário CAIXA ,8.2,36\n";

    #[test]
    fn test_load_from_reader() {
        let products = load_products_from_reader(CATALOG.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].id, "1");
        assert_eq!(products[0].name, "Crédito Pessoal");
        assert_eq!(products[0].max_term, 24);

        // Names are stored trimmed
        assert_eq!(products[1].name, "Crediário CAIXA");
        assert_eq!(products[1].annual_rate, 8.2);
    }

    #[test]
    fn test_load_rejects_invalid_rows() {
        let negative_rate = "id,nome,taxaJurosAnual,prazoMaximo\n1,Pessoal,-1.0,24\n";
        assert!(matches!(
            load_products_from_reader(negative_rate.as_bytes()),
            Err(RegistryError::InvalidProduct(_))
        ));

        let missing_id = "id,nome,taxaJurosAnual,prazoMaximo\n ,Pessoal,1.0,24\n";
        assert!(load_products_from_reader(missing_id.as_bytes()).is_err());

        let bad_term = "id,nome,taxaJurosAnual,prazoMaximo\n1,Pessoal,1.0,doze\n";
        assert!(matches!(
            load_products_from_reader(bad_term.as_bytes()),
            Err(RegistryError::Csv(_))
        ));
    }

    #[test]
    fn test_written_catalog_loads_back() {
        let products = vec![
            Product::new("1", "Crédito Pessoal", 10.5, 24),
            Product::new("1700000000000", "Sem Juros", 0.0, 12),
        ];

        let mut buffer = Vec::new();
        write_products_to_writer(&mut buffer, &products).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("id,nome,taxaJurosAnual,prazoMaximo"));

        let loaded = load_products_from_reader(buffer.as_slice()).unwrap();
        assert_eq!(loaded, products);
    }

    #[test]
    fn test_load_default_catalog() {
        let products = load_products(DEFAULT_CATALOG_PATH).expect("Failed to load catalog");
        assert_eq!(products.len(), 3);
        assert!(products.iter().any(|p| p.name == "Empréstimo Consignado" && p.max_term == 84));
    }
}
