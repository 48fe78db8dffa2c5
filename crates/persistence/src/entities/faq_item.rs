//! FAQ entity (database row mapping).

use sqlx::FromRow;

use domain::models::FaqItem;

/// Database row mapping for the faq_items table.
#[derive(Debug, Clone, FromRow)]
pub struct FaqItemEntity {
    pub id: i64,
    pub item_key: String,
    pub question: String,
    pub answer: String,
    pub order: i32,
}

impl From<FaqItemEntity> for FaqItem {
    fn from(entity: FaqItemEntity) -> Self {
        Self {
            id: entity.item_key,
            question: entity.question,
            answer: entity.answer,
            order: entity.order,
        }
    }
}
