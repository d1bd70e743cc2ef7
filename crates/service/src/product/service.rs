use std::sync::Arc;

use tracing::{info, instrument};

use models::product;

use super::repository::ProductRepository;
use crate::errors::ServiceError;

/// Product business rules: name validation and not-found policy.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<product::Model>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<product::Model, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No product found with id={id}")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<product::Model, ServiceError> {
        let name = product::validate_name(name)?;
        let created = self.repo.create(&name).await?;
        info!(id = created.id, "product_created");
        Ok(created)
    }

    /// Replace the product's name.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, name: &str) -> Result<product::Model, ServiceError> {
        let name = product::validate_name(name)?;
        let updated = self
            .repo
            .update(id, &name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No product found with id={id}")))?;
        info!(id, "product_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(format!("No product found with id={id}")));
        }
        info!(id, "product_deleted");
        Ok(())
    }
}
