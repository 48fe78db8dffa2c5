//! Public content reads.
//!
//! These never fail: a section whose read fails comes back empty, or as the
//! default site info.

use axum::{extract::State, Json};
use domain::models::{
    ContentSnapshot, FaqItem, GalleryItem, MenuItem, SiteInfo, StaffMember,
};
use domain::services::OrderedList;

use crate::app::AppState;

/// Full site content.
pub async fn get_content(State(state): State<AppState>) -> Json<ContentSnapshot> {
    Json(state.content.public_snapshot().await)
}

pub async fn get_menu(State(state): State<AppState>) -> Json<OrderedList<MenuItem>> {
    Json(state.content.public_snapshot().await.menu)
}

pub async fn get_staff(State(state): State<AppState>) -> Json<OrderedList<StaffMember>> {
    Json(state.content.public_snapshot().await.staff)
}

pub async fn get_gallery(State(state): State<AppState>) -> Json<OrderedList<GalleryItem>> {
    Json(state.content.public_snapshot().await.gallery)
}

pub async fn get_faq(State(state): State<AppState>) -> Json<OrderedList<FaqItem>> {
    Json(state.content.public_snapshot().await.faq)
}

pub async fn get_site_info(State(state): State<AppState>) -> Json<SiteInfo> {
    Json(state.content.public_snapshot().await.site_info)
}
