use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Product names are 2..=50 characters once surrounding whitespace is removed.
pub fn validate_name(name: &str) -> Result<String, errors::ModelError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(errors::ModelError::Validation(format!(
            "product name must be {NAME_MIN_LEN}..={NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
