//! Shared utilities and common types for the salon site backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Object key derivation for uploaded images
//! - Password hashing with Argon2id
//! - Admin session tokens
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
