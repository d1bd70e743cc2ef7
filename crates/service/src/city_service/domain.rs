use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ServiceError;
use crate::notifier::ChangeEvent;

/// Event name announced after a record is created.
pub const SERVICE_CREATED: &str = "service.created";

/// A named city service record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityService {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

impl CityService {
    /// The `service.created` event carrying this record.
    pub fn created_event(&self) -> Result<ChangeEvent, ServiceError> {
        ChangeEvent::new(SERVICE_CREATED, self).map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

impl From<models::city_service::Model> for CityService {
    fn from(m: models::city_service::Model) -> Self {
        Self { id: m.id, name: m.name, service_type: m.service_type }
    }
}

/// Create request. `name` stays optional here so that a missing field is
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCityService {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
}

impl NewCityService {
    pub fn new(name: impl Into<String>, service_type: Option<&str>) -> Self {
        Self { name: Some(name.into()), service_type: service_type.map(str::to_string) }
    }
}

/// Partial update. Absent fields are left untouched; `"type": null` clears the type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CityServicePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub service_type: Option<Option<String>>,
}

impl CityServicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.service_type.is_none()
    }

    /// Apply the patch in place.
    pub fn apply_to(&self, record: &mut CityService) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(service_type) = &self.service_type {
            record.service_type = service_type.clone();
        }
    }
}

// Distinguishes `"type": null` (Some(None)) from a missing key (None via `default`).
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
