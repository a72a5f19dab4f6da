//! Product CRUD. Product fields are flat; the only referential rule is that
//! the owning network node must exist.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use crate::domain::error::ServiceError;
use crate::domain::product::{self, Product};
use crate::storage::{nodes, products};

#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub model: String,
    pub market_date: NaiveDate,
    pub network_node: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub model: Option<String>,
    pub market_date: Option<NaiveDate>,
    pub network_node: Option<i64>,
}

#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(products::list(&self.pool).await?)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ServiceError> {
        products::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    pub async fn create_product(&self, input: ProductCreate) -> Result<Product, ServiceError> {
        product::validate_name(&input.name)?;
        product::validate_model(&input.model)?;
        if !nodes::exists(&self.pool, input.network_node).await? {
            return Err(ServiceError::not_found("network node", input.network_node));
        }

        let created = products::insert(
            &self.pool,
            &input.name,
            &input.model,
            input.market_date,
            input.network_node,
        )
        .await?;
        info!(product_id = created.id, "created product");
        Ok(created)
    }

    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product, ServiceError> {
        if let Some(name) = &patch.name {
            product::validate_name(name)?;
        }
        if let Some(model) = &patch.model {
            product::validate_model(model)?;
        }
        if let Some(node_id) = patch.network_node {
            if !nodes::exists(&self.pool, node_id).await? {
                return Err(ServiceError::not_found("network node", node_id));
            }
        }

        let updated = products::update_fields(
            &self.pool,
            id,
            patch.name.as_deref(),
            patch.model.as_deref(),
            patch.market_date,
            patch.network_node,
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("product", id))?;
        info!(product_id = id, "updated product");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        if products::delete(&self.pool, id).await? == 0 {
            return Err(ServiceError::not_found("product", id));
        }
        info!(product_id = id, "deleted product");
        Ok(())
    }
}
