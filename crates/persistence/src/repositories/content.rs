//! Content repository: reads and transactional writes of all site content.

use async_trait::async_trait;
use metrics::counter;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error};
use uuid::Uuid;

use domain::models::{
    ContentSnapshot, FaqItem, GalleryItem, MenuItem, Section, SiteInfo, StaffMember,
};
use domain::services::{ContentError, ContentGateway, ListRecord, OrderedList};

use crate::entities::{
    FaqItemEntity, GalleryItemEntity, MenuItemEntity, SiteSettingsEntity, StaffEntity,
};
use crate::metrics::QueryTimer;

/// Key of the only row in site_settings.
pub const SETTINGS_SINGLETON_KEY: &str = "default";

/// Repository for site content.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

/// Logs and counts a failed section read, then substitutes `fallback`.
fn degrade<T>(section: Section, result: Result<T, sqlx::Error>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(section = section.as_str(), error = %e, "Failed to read content section");
            counter!("content_read_failures_total", "section" => section.as_str()).increment(1);
            fallback()
        }
    }
}

/// Admin-visible id for a row, minting one for records that never had it.
fn item_key<T: ListRecord>(record: &T) -> String {
    if record.id().trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        record.id().to_string()
    }
}

impl ContentRepository {
    /// Creates a new ContentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Menu rows in display order.
    pub async fn find_menu_items(&self) -> Result<Vec<MenuItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_menu_items");
        let result = sqlx::query_as::<_, MenuItemEntity>(
            r#"
            SELECT id, item_key, category, name, price, description, "order"
            FROM menu_items
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Staff rows in display order.
    pub async fn find_staff(&self) -> Result<Vec<StaffEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_staff");
        let result = sqlx::query_as::<_, StaffEntity>(
            r#"
            SELECT id, item_key, name, role, role_ja, image, message, "order"
            FROM staff
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Gallery rows in display order.
    pub async fn find_gallery_items(&self) -> Result<Vec<GalleryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gallery_items");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            SELECT id, item_key, title, description, images, image, category, "order"
            FROM gallery_items
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// FAQ rows in display order.
    pub async fn find_faq_items(&self) -> Result<Vec<FaqItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_faq_items");
        let result = sqlx::query_as::<_, FaqItemEntity>(
            r#"
            SELECT id, item_key, question, answer, "order"
            FROM faq_items
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The settings row, if one was ever saved.
    pub async fn find_site_settings(&self) -> Result<Option<SiteSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_site_settings");
        let result = sqlx::query_as::<_, SiteSettingsEntity>(
            r#"
            SELECT id, singleton_key, hero_images, concept, access, salon_space, metadata, updated_at
            FROM site_settings
            WHERE singleton_key = $1
            "#,
        )
        .bind(SETTINGS_SINGLETON_KEY)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Menu section; empty on failure.
    pub async fn menu(&self) -> OrderedList<MenuItem> {
        let rows = degrade(Section::Menu, self.find_menu_items().await, Vec::new);
        rows.into_iter().map(MenuItem::from).collect::<Vec<_>>().into()
    }

    /// Staff section; empty on failure.
    pub async fn staff(&self) -> OrderedList<StaffMember> {
        let rows = degrade(Section::Staff, self.find_staff().await, Vec::new);
        rows.into_iter().map(StaffMember::from).collect::<Vec<_>>().into()
    }

    /// Gallery section; empty on failure.
    pub async fn gallery(&self) -> OrderedList<GalleryItem> {
        let rows = degrade(Section::Gallery, self.find_gallery_items().await, Vec::new);
        rows.into_iter().map(GalleryItem::from).collect::<Vec<_>>().into()
    }

    /// FAQ section; empty on failure.
    pub async fn faq(&self) -> OrderedList<FaqItem> {
        let rows = degrade(Section::Faq, self.find_faq_items().await, Vec::new);
        rows.into_iter().map(FaqItem::from).collect::<Vec<_>>().into()
    }

    /// Site info; defaults when missing or on failure.
    pub async fn site_info(&self) -> SiteInfo {
        degrade(Section::SiteInfo, self.find_site_settings().await, || None)
            .map(SiteInfo::from)
            .unwrap_or_default()
    }

    async fn replace_menu(
        tx: &mut Transaction<'_, Postgres>,
        items: &OrderedList<MenuItem>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM menu_items").execute(&mut **tx).await?;

        for (index, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO menu_items (item_key, category, name, price, description, "order")
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item_key(item))
            .bind(item.category.as_str())
            .bind(&item.name)
            .bind(item.price)
            .bind(&item.description)
            .bind(index as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn replace_staff(
        tx: &mut Transaction<'_, Postgres>,
        members: &OrderedList<StaffMember>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM staff").execute(&mut **tx).await?;

        for (index, member) in members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO staff (item_key, name, role, role_ja, image, message, "order")
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item_key(member))
            .bind(&member.name)
            .bind(&member.role)
            .bind(&member.role_ja)
            .bind(&member.image)
            .bind(&member.message)
            .bind(index as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn replace_gallery(
        tx: &mut Transaction<'_, Postgres>,
        items: &OrderedList<GalleryItem>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM gallery_items").execute(&mut **tx).await?;

        for (index, item) in items.iter().enumerate() {
            let mut images = item.images.clone();
            if images.is_empty() {
                images.extend(item.image.iter().filter(|url| !url.is_empty()).cloned());
            }
            let main_image = images.first().cloned();

            sqlx::query(
                r#"
                INSERT INTO gallery_items (item_key, title, description, images, image, category, "order")
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item_key(item))
            .bind(&item.title)
            .bind(&item.description)
            .bind(Json(images))
            .bind(main_image)
            .bind(&item.category)
            .bind(index as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn replace_faq(
        tx: &mut Transaction<'_, Postgres>,
        items: &OrderedList<FaqItem>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM faq_items").execute(&mut **tx).await?;

        for (index, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO faq_items (item_key, question, answer, "order")
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item_key(item))
            .bind(&item.question)
            .bind(&item.answer)
            .bind(index as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn upsert_site_settings(
        tx: &mut Transaction<'_, Postgres>,
        info: &SiteInfo,
    ) -> Result<(), sqlx::Error> {
        let mut info = info.clone();
        info.normalize();

        sqlx::query(
            r#"
            INSERT INTO site_settings (singleton_key, hero_images, concept, access, salon_space, metadata, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (singleton_key) DO UPDATE SET
                hero_images = EXCLUDED.hero_images,
                concept = EXCLUDED.concept,
                access = EXCLUDED.access,
                salon_space = EXCLUDED.salon_space,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            "#,
        )
        .bind(SETTINGS_SINGLETON_KEY)
        .bind(Json(&info.hero_images))
        .bind(Json(&info.concept))
        .bind(Json(&info.access))
        .bind(Json(&info.salon_space))
        .bind(Json(&info.metadata))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Replaces all content in one transaction. Any failure rolls back every
    /// section.
    pub async fn replace_all(&self, snapshot: &ContentSnapshot) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("replace_all_content");
        let mut tx = self.pool.begin().await?;

        Self::replace_menu(&mut tx, &snapshot.menu).await?;
        Self::replace_staff(&mut tx, &snapshot.staff).await?;
        Self::replace_gallery(&mut tx, &snapshot.gallery).await?;
        Self::replace_faq(&mut tx, &snapshot.faq).await?;
        Self::upsert_site_settings(&mut tx, &snapshot.site_info).await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}

#[async_trait]
impl ContentGateway for ContentRepository {
    async fn fetch_all(&self) -> ContentSnapshot {
        let (menu, staff, gallery, faq, site_info) = tokio::join!(
            self.menu(),
            self.staff(),
            self.gallery(),
            self.faq(),
            self.site_info()
        );
        debug!(
            menu = menu.len(),
            staff = staff.len(),
            gallery = gallery.len(),
            faq = faq.len(),
            "Fetched site content"
        );
        ContentSnapshot {
            menu,
            staff,
            gallery,
            faq,
            site_info,
        }
    }

    async fn save_all(&self, snapshot: &ContentSnapshot) -> Result<(), ContentError> {
        self.replace_all(snapshot).await.map_err(|e| {
            error!(error = %e, "Content transaction rolled back");
            ContentError::Write(e.to_string())
        })
    }
}
