//! Product catalog use cases

use std::sync::Arc;

use chrono::Utc;
use subsman_db::ProductRepository;
use subsman_types::{Product, ProductId};

use crate::error::{exists, ServiceError, ServiceResult};

/// Catalog management
pub struct ProductService<P: ProductRepository + ?Sized> {
    products: Arc<P>,
}

impl<P: ProductRepository + ?Sized> ProductService<P> {
    /// Create a new product service
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    /// Add a product to the catalog. Price is validated before the name
    /// uniqueness lookup.
    pub async fn create_product(&self, product: Product) -> ServiceResult<Product> {
        validate_price(&product)?;

        if exists(self.products.get_by_name(&product.name).await)? {
            return Err(ServiceError::Conflict(
                "product with this name already exists".to_string(),
            ));
        }

        let product = self.products.create(product).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: ProductId) -> ServiceResult<Product> {
        self.products
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::from_db("product", e))
    }

    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.get_all().await?)
    }

    pub async fn list_active_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.get_active().await?)
    }

    pub async fn list_products_by_category(&self, category: &str) -> ServiceResult<Vec<Product>> {
        Ok(self.products.get_by_category(category).await?)
    }

    pub async fn count_products(&self) -> ServiceResult<i64> {
        Ok(self.products.count().await?)
    }

    /// Replace a product's mutable fields
    pub async fn update_product(&self, mut product: Product) -> ServiceResult<Product> {
        validate_price(&product)?;
        product.updated_at = Utc::now();
        self.products
            .update(&product)
            .await
            .map_err(|e| ServiceError::from_db("product", e))?;
        Ok(product)
    }

    /// Take a product out of the catalog; existing subscriptions keep working
    pub async fn deactivate_product(&self, id: ProductId) -> ServiceResult<Product> {
        let mut product = self.get_product(id).await?;
        product.deactivate();
        self.products
            .update(&product)
            .await
            .map_err(|e| ServiceError::from_db("product", e))?;
        tracing::info!(product_id = %id, "Product deactivated");
        Ok(product)
    }

    /// Hard delete. Subscriptions pointing at the product disappear from
    /// every joined view.
    pub async fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        self.products
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_db("product", e))?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn validate_price(product: &Product) -> ServiceResult<()> {
    if product.validate_price() {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "invalid product price: {}",
            product.price
        )))
    }
}

impl<P: ProductRepository + ?Sized> std::fmt::Debug for ProductService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService").finish_non_exhaustive()
    }
}
