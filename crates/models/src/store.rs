//! `store` table: one row per key, value kept as serialized JSON text.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{sea_query::OnConflict, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub created: DateTimeUtc,
    pub updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_key(key: &str) -> Result<(), ModelError> {
    if key.is_empty() {
        return Err(ModelError::Validation("key required".into()));
    }
    Ok(())
}

/// Insert the row, or on a `key` conflict replace `value` and `updated`.
///
/// A single `INSERT .. ON CONFLICT (key) DO UPDATE .. RETURNING` statement, so
/// two first writers racing on the same key cannot both insert, and `created`
/// is only ever written by the insert branch.
pub async fn upsert<C: ConnectionTrait>(db: &C, key: &str, value: String) -> Result<Model, ModelError> {
    validate_key(key)?;
    let now = Utc::now();
    let am = ActiveModel {
        key: Set(key.to_string()),
        value: Set(value),
        created: Set(now),
        updated: Set(now),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::column(Column::Key)
                .update_columns([Column::Value, Column::Updated])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find<C: ConnectionTrait>(db: &C, key: &str) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(key.to_string())
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Delete by key; returns the number of rows removed (0 or 1).
pub async fn delete<C: ConnectionTrait>(db: &C, key: &str) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(key.to_string())
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
