use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Longest name the `services.name` column holds.
pub const NAME_MAX_CHARS: usize = 255;

/// A service name must contain at least one non-whitespace character and
/// fit the column.
pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("Service name required".into()));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(errors::ModelError::Validation(format!(
            "Service name must be at most {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(())
}
