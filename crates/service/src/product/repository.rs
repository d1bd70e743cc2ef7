use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};

use models::product;

use crate::errors::ServiceError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<product::Model>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<product::Model>, ServiceError>;
    async fn create(&self, name: &str) -> Result<product::Model, ServiceError>;
    /// `Ok(None)` when no product has that id.
    async fn update(&self, id: i32, name: &str) -> Result<Option<product::Model>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository over the `products` table.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self) -> Result<Vec<product::Model>, ServiceError> {
        product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    async fn get(&self, id: i32) -> Result<Option<product::Model>, ServiceError> {
        product::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)
    }

    async fn create(&self, name: &str) -> Result<product::Model, ServiceError> {
        let am = product::ActiveModel { name: Set(name.to_string()), ..Default::default() };
        am.insert(&self.db).await.map_err(ServiceError::from_db)
    }

    async fn update(&self, id: i32, name: &str) -> Result<Option<product::Model>, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::from_db)?;
        let Some(found) = product::Entity::find_by_id(id).one(&txn).await.map_err(ServiceError::from_db)? else {
            return Ok(None);
        };
        let mut am: product::ActiveModel = found.into();
        am.name = Set(name.to_string());
        let model = am.update(&txn).await.map_err(ServiceError::from_db)?;
        txn.commit().await.map_err(ServiceError::from_db)?;
        Ok(Some(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = product::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.rows_affected > 0)
    }
}
