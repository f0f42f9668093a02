use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account that owns garments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
}
