use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{CityService, CityServicePatch, NewCityService};
use super::fingerprint::{fingerprint, if_none_match};
use super::repository::CityServiceRepository;
use crate::errors::ServiceError;
use models::errors::ModelError;

/// Outcome of a conditional read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional<T> {
    /// The caller's tag is stale (or absent); here is the current value.
    Modified { record: T, etag: String },
    /// The caller's tag still matches; no body should be sent.
    NotModified { etag: String },
}

/// Application service owning the city service collection.
/// Validates input here and leaves atomicity to the repository.
#[derive(Clone)]
pub struct CityServiceStore {
    repo: Arc<dyn CityServiceRepository>,
}

impl CityServiceStore {
    pub fn new(repo: Arc<dyn CityServiceRepository>) -> Self { Self { repo } }

    /// Store backed by the process-local list.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(super::repository::memory::InMemoryCityServiceRepository::new()))
    }

    pub async fn list(&self) -> Result<Vec<CityService>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<CityService, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Service"))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<CityService, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Invalid service name".into()));
        }
        self.repo.find_by_name(name).await?.ok_or_else(|| ServiceError::not_found("Service"))
    }

    /// Read by name, honouring a previously issued fingerprint.
    #[instrument(skip(self, if_none_match_header))]
    pub async fn get_by_name_conditional(
        &self,
        name: &str,
        if_none_match_header: Option<&str>,
    ) -> Result<Conditional<CityService>, ServiceError> {
        let record = self.get_by_name(name).await?;
        let etag = fingerprint(&record)?;
        if let Some(header) = if_none_match_header {
            if if_none_match(header, &etag) {
                debug!(id = record.id, %etag, "not modified");
                return Ok(Conditional::NotModified { etag });
            }
        }
        Ok(Conditional::Modified { record, etag })
    }

    /// Assign the next id and store a new record.
    ///
    /// Example:
    /// ```
    /// use service::city_service::{CityServiceStore, NewCityService};
    /// let store = CityServiceStore::in_memory();
    /// let water = tokio_test::block_on(store.create(NewCityService::new("Water", Some("Utility")))).unwrap();
    /// assert_eq!(water.id, 1);
    /// assert!(tokio_test::block_on(store.create(NewCityService::new("  ", None))).is_err());
    /// ```
    #[instrument(skip(self, input), fields(name = ?input.name))]
    pub async fn create(&self, input: NewCityService) -> Result<CityService, ServiceError> {
        let name = input.name.as_deref().unwrap_or_default();
        check_name(name)?;
        let created = self.repo.insert(name, input.service_type.as_deref()).await?;
        info!(id = created.id, name = %created.name, "service_created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: CityServicePatch) -> Result<CityService, ServiceError> {
        if let Some(name) = &patch.name {
            check_name(name)?;
        }
        let updated = self.repo.update(id, &patch).await?;
        info!(id = updated.id, "service_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        info!(id, "service_deleted");
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), ServiceError> {
    models::city_service::validate_name(name).map_err(|ModelError::Validation(msg)| ServiceError::Validation(msg))
}
