use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::objects::repo::{ConstructionObject, ObjectFields};

/// Request body for object create and full-replace update. Omitted money
/// fields coerce to zero, omitted optional fields overwrite with null; this
/// is the fixed API contract, not a partial patch.
#[derive(Debug, Deserialize)]
pub struct ObjectPayload {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub spent: Option<Decimal>,
    #[serde(default)]
    pub client_id: Option<i32>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl ObjectPayload {
    pub fn validate(self) -> Result<ObjectFields, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        let budget = self.budget.unwrap_or(Decimal::ZERO);
        let spent = self.spent.unwrap_or(Decimal::ZERO);
        if budget < Decimal::ZERO {
            return Err(AppError::Validation("budget must be non-negative".into()));
        }
        if spent < Decimal::ZERO {
            return Err(AppError::Validation("spent must be non-negative".into()));
        }
        Ok(ObjectFields {
            name,
            address: self.address,
            budget,
            spent,
            client_id: self.client_id,
            photo: self.photo,
        })
    }
}

/// Object as returned to the frontend; `remaining` is always derived,
/// never stored.
#[derive(Debug, Serialize)]
pub struct ObjectResponse {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub photo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ConstructionObject> for ObjectResponse {
    fn from(o: ConstructionObject) -> Self {
        Self {
            id: o.id,
            name: o.name,
            address: o.address,
            budget: o.budget,
            spent: o.spent,
            remaining: o.budget - o.spent,
            client_id: o.client_id,
            client_name: o.client_name,
            photo: o.photo,
            created_at: o.created_at,
        }
    }
}
