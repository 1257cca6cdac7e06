//! In-memory product repository

use async_trait::async_trait;
use subsman_types::{Product, ProductId};

use super::{sorted_values, Table};
use crate::error::{DbError, DbResult};
use crate::repo::ProductRepository;

/// In-memory product repository
#[derive(Clone, Default)]
pub struct MemoryProductRepository {
    products: Table<ProductId, Product>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_table(products: Table<ProductId, Product>) -> Self {
        Self { products }
    }

    fn check_unique(&self, product: &Product) -> DbResult<()> {
        let taken = self
            .products
            .iter()
            .any(|r| r.id != product.id && r.name == product.name);
        if taken {
            return Err(DbError::Conflict("products_name_key".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, product: Product) -> DbResult<Product> {
        if self.products.contains_key(&product.id) {
            return Err(DbError::Conflict("products_pkey".to_string()));
        }
        self.check_unique(&product)?;
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: ProductId) -> DbResult<Product> {
        self.products
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> DbResult<Product> {
        self.products
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }

    async fn get_by_category(&self, category: &str) -> DbResult<Vec<Product>> {
        Ok(sorted_values(&self.products, |p| p.category == category))
    }

    async fn get_all(&self) -> DbResult<Vec<Product>> {
        Ok(sorted_values(&self.products, |_| true))
    }

    async fn get_active(&self) -> DbResult<Vec<Product>> {
        Ok(sorted_values(&self.products, Product::is_active))
    }

    async fn update(&self, product: &Product) -> DbResult<()> {
        self.check_unique(product)?;
        let mut stored = self.products.get_mut(&product.id).ok_or(DbError::NotFound)?;
        let created_at = stored.created_at;
        *stored = product.clone();
        stored.created_at = created_at;
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> DbResult<()> {
        self.products
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.products.len() as i64)
    }

    async fn clear(&self) -> DbResult<u64> {
        let removed = self.products.len() as u64;
        self.products.clear();
        Ok(removed)
    }
}
