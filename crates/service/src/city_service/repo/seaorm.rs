use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use models::city_service;

use crate::city_service::domain::{CityService, CityServicePatch};
use crate::city_service::repository::CityServiceRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository over the `services` table.
///
/// Mutations run inside a single transaction; returning early with an error
/// drops the transaction, which rolls it back.
pub struct SeaOrmCityServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCityServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        self.db.begin().await.map_err(ServiceError::from_db)
    }
}

async fn name_taken(txn: &DatabaseTransaction, name: &str, except: Option<i32>) -> Result<bool, ServiceError> {
    let mut q = city_service::Entity::find().filter(city_service::Column::Name.eq(name));
    if let Some(id) = except {
        q = q.filter(city_service::Column::Id.ne(id));
    }
    Ok(q.one(txn).await.map_err(ServiceError::from_db)?.is_some())
}

#[async_trait]
impl CityServiceRepository for SeaOrmCityServiceRepository {
    async fn list(&self) -> Result<Vec<CityService>, ServiceError> {
        let rows = city_service::Entity::find()
            .order_by_asc(city_service::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(rows.into_iter().map(CityService::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CityService>, ServiceError> {
        let row = city_service::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(row.map(CityService::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CityService>, ServiceError> {
        let row = city_service::Entity::find()
            .filter(city_service::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(row.map(CityService::from))
    }

    async fn insert(&self, name: &str, service_type: Option<&str>) -> Result<CityService, ServiceError> {
        let txn = self.begin().await?;
        if name_taken(&txn, name, None).await? {
            return Err(ServiceError::Conflict(format!("Service name already exists: {name}")));
        }
        let am = city_service::ActiveModel {
            name: Set(name.to_string()),
            service_type: Set(service_type.map(str::to_string)),
            ..Default::default()
        };
        let model = am.insert(&txn).await.map_err(ServiceError::from_db)?;
        txn.commit().await.map_err(ServiceError::from_db)?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, patch: &CityServicePatch) -> Result<CityService, ServiceError> {
        let txn = self.begin().await?;
        let found = city_service::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::not_found("Service"))?;
        if patch.is_empty() {
            txn.commit().await.map_err(ServiceError::from_db)?;
            return Ok(found.into());
        }
        if let Some(name) = &patch.name {
            if name_taken(&txn, name, Some(id)).await? {
                return Err(ServiceError::Conflict(format!("Service name already exists: {name}")));
            }
        }
        let mut am: city_service::ActiveModel = found.into();
        if let Some(name) = &patch.name {
            am.name = Set(name.clone());
        }
        if let Some(service_type) = &patch.service_type {
            am.service_type = Set(service_type.clone());
        }
        let model = am.update(&txn).await.map_err(ServiceError::from_db)?;
        txn.commit().await.map_err(ServiceError::from_db)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.begin().await?;
        let res = city_service::Entity::delete_by_id(id).exec(&txn).await.map_err(ServiceError::from_db)?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("Service"));
        }
        txn.commit().await.map_err(ServiceError::from_db)?;
        Ok(())
    }
}
