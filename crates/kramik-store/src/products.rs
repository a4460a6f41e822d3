use kramik_core::{NewProduct, Product, ProductId};
use tracing::debug;

use crate::table::{read_table, write_table};
use crate::{LOG_TARGET, Storage, StorageResult};

pub(crate) const PRODUCT_COLUMNS: &[&str] =
    &["id", "name", "price", "quantity", "description", "category"];

/// Removal selector: a numeric path segment addresses a row by id,
/// anything else by exact name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductSelector {
    Id(ProductId),
    Name(String),
}

impl ProductSelector {
    pub fn parse(segment: &str) -> Self {
        match segment.parse() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(segment.to_owned()),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Id(id) => product.id == *id,
            Self::Name(name) => product.name == *name,
        }
    }
}

impl Storage {
    /// All products, read fresh from the table file.
    pub async fn list_products(&self) -> StorageResult<Vec<Product>> {
        let _guard = self.products_lock.lock().await;
        read_table(&self.products_path(), PRODUCT_COLUMNS)
    }

    /// Linear scan by id.
    pub async fn product_by_id(&self, id: ProductId) -> StorageResult<Option<Product>> {
        let _guard = self.products_lock.lock().await;
        let products: Vec<Product> = read_table(&self.products_path(), PRODUCT_COLUMNS)?;
        Ok(products.into_iter().find(|product| product.id == id))
    }

    /// Append a product under `max(existing ids) + 1` (`1` for an
    /// empty table) and rewrite the table.
    pub async fn insert_product(&self, new: NewProduct) -> StorageResult<Product> {
        let _guard = self.products_lock.lock().await;
        let path = self.products_path();

        let mut products: Vec<Product> = read_table(&path, PRODUCT_COLUMNS)?;
        let id = products
            .iter()
            .map(|product| product.id)
            .max()
            .map(ProductId::next)
            .unwrap_or(ProductId::new(1));

        let product = Product::from_new(id, new);
        products.push(product.clone());
        write_table(&path, PRODUCT_COLUMNS, &products)?;

        debug!(target: LOG_TARGET, %id, name = %product.name, "Inserted product");
        Ok(product)
    }

    /// Delete the rows matching the selector and rewrite the table;
    /// `false` when no row matched (the table file is left untouched).
    pub async fn remove_product(&self, selector: &ProductSelector) -> StorageResult<bool> {
        let _guard = self.products_lock.lock().await;
        let path = self.products_path();

        let products: Vec<Product> = read_table(&path, PRODUCT_COLUMNS)?;
        let remaining: Vec<Product> = products
            .iter()
            .filter(|product| !selector.matches(product))
            .cloned()
            .collect();

        if remaining.len() == products.len() {
            return Ok(false);
        }

        write_table(&path, PRODUCT_COLUMNS, &remaining)?;
        debug!(target: LOG_TARGET, ?selector, "Removed product");
        Ok(true)
    }
}
