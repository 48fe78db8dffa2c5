//! Staff entity (database row mapping).

use sqlx::FromRow;

use domain::models::StaffMember;

/// Database row mapping for the staff table.
#[derive(Debug, Clone, FromRow)]
pub struct StaffEntity {
    pub id: i64,
    pub item_key: String,
    pub name: String,
    pub role: String,
    pub role_ja: Option<String>,
    pub image: String,
    pub message: Option<String>,
    pub order: i32,
}

impl From<StaffEntity> for StaffMember {
    fn from(entity: StaffEntity) -> Self {
        Self {
            id: entity.item_key,
            name: entity.name,
            role: entity.role,
            role_ja: entity.role_ja,
            image: entity.image,
            message: entity.message,
            order: entity.order,
        }
    }
}
