use async_trait::async_trait;

use super::domain::{CityService, CityServicePatch};
use crate::errors::ServiceError;

/// Persistence abstraction for city service records.
///
/// Every method is one atomic unit: implementations must never expose a
/// half-applied mutation, and uniqueness checks happen under the same lock
/// or transaction as the write they guard.
#[async_trait]
pub trait CityServiceRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<CityService>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<CityService>, ServiceError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<CityService>, ServiceError>;
    /// Fails with `Conflict` if `name` is taken.
    async fn insert(&self, name: &str, service_type: Option<&str>) -> Result<CityService, ServiceError>;
    /// Fails with `NotFound` for an unknown id, `Conflict` if the new name is taken.
    async fn update(&self, id: i32, patch: &CityServicePatch) -> Result<CityService, ServiceError>;
    /// Fails with `NotFound` for an unknown id.
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// Process-local backend; records live in insertion order and ids restart at 1.
pub mod memory {
    use super::*;
    use tokio::sync::RwLock;

    struct Inner {
        records: Vec<CityService>,
        next_id: i32,
    }

    pub struct InMemoryCityServiceRepository {
        inner: RwLock<Inner>,
    }

    impl Default for InMemoryCityServiceRepository {
        fn default() -> Self {
            Self { inner: RwLock::new(Inner { records: Vec::new(), next_id: 1 }) }
        }
    }

    impl InMemoryCityServiceRepository {
        pub fn new() -> Self { Self::default() }
    }

    fn name_taken(records: &[CityService], name: &str, except: Option<i32>) -> bool {
        records.iter().any(|r| r.name == name && Some(r.id) != except)
    }

    #[async_trait]
    impl CityServiceRepository for InMemoryCityServiceRepository {
        async fn list(&self) -> Result<Vec<CityService>, ServiceError> {
            Ok(self.inner.read().await.records.clone())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<CityService>, ServiceError> {
            let inner = self.inner.read().await;
            Ok(inner.records.iter().find(|r| r.id == id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<CityService>, ServiceError> {
            let inner = self.inner.read().await;
            Ok(inner.records.iter().find(|r| r.name == name).cloned())
        }

        async fn insert(&self, name: &str, service_type: Option<&str>) -> Result<CityService, ServiceError> {
            let mut inner = self.inner.write().await;
            if name_taken(&inner.records, name, None) {
                return Err(ServiceError::Conflict(format!("Service name already exists: {name}")));
            }
            let id = inner.next_id;
            let next = id
                .checked_add(1)
                .ok_or_else(|| ServiceError::Internal("service id space exhausted".into()))?;
            let record = CityService { id, name: name.to_string(), service_type: service_type.map(str::to_string) };
            inner.records.push(record.clone());
            inner.next_id = next;
            Ok(record)
        }

        async fn update(&self, id: i32, patch: &CityServicePatch) -> Result<CityService, ServiceError> {
            let mut inner = self.inner.write().await;
            let Some(pos) = inner.records.iter().position(|r| r.id == id) else {
                return Err(ServiceError::not_found("Service"));
            };
            if let Some(name) = &patch.name {
                if name_taken(&inner.records, name, Some(id)) {
                    return Err(ServiceError::Conflict(format!("Service name already exists: {name}")));
                }
            }
            let record = &mut inner.records[pos];
            patch.apply_to(record);
            Ok(record.clone())
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            let mut inner = self.inner.write().await;
            let before = inner.records.len();
            inner.records.retain(|r| r.id != id);
            if inner.records.len() == before {
                return Err(ServiceError::not_found("Service"));
            }
            Ok(())
        }
    }

}
