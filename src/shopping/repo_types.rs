use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub checked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<NewItem>,
}

#[derive(Debug, Deserialize)]
pub struct SetCheckedRequest {
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub removed: u64,
}
